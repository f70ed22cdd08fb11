use tracing::{debug, warn};

use crate::form::BookingPayload;
use crate::transport::BookingTransport;

/// Path every booking page can post to; always tried, and tried last
/// unless configured explicitly earlier.
pub const DEFAULT_BOOKING_PATH: &str = "/api/bookings";

/// Ordered, duplicate-free list of endpoints to offer a booking to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    /// Configured API URL first, then the form action, then the default path.
    pub fn build(api: &str, action: Option<&str>) -> Self {
        let mut urls: Vec<String> = Vec::with_capacity(3);
        for url in [Some(api), action, Some(DEFAULT_BOOKING_PATH)].into_iter().flatten() {
            if !url.is_empty() && !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
        Self(urls)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted(u16),
    Rejected(u16),
    Failed(String),
}

/// One POST against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub url: String,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    fn describe_failure(&self) -> Option<String> {
        match &self.outcome {
            AttemptOutcome::Accepted(_) => None,
            AttemptOutcome::Rejected(status) => Some(format!("Server returned {status} for {}", self.url)),
            AttemptOutcome::Failed(e) => Some(e.clone()),
        }
    }
}

/// Outcome of walking the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub attempts: Vec<Attempt>,
}

impl SubmitOutcome {
    /// The endpoint that took the booking, if any.
    pub fn accepted_url(&self) -> Option<&str> {
        self.attempts
            .last()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Accepted(_)))
            .map(|a| a.url.as_str())
    }

    pub fn last_error(&self) -> Option<String> {
        self.attempts.iter().rev().find_map(Attempt::describe_failure)
    }
}

/// Offer `payload` to each candidate in order; stop at the first 2xx.
pub async fn submit_first_success<T>(
    transport: &T,
    candidates: &CandidateList,
    payload: &BookingPayload,
) -> SubmitOutcome
where
    T: BookingTransport + ?Sized,
{
    let mut attempts = Vec::with_capacity(candidates.len());
    for url in candidates.as_slice() {
        let outcome = match transport.post_json(url, payload).await {
            Ok(status) if (200..300).contains(&status) => AttemptOutcome::Accepted(status),
            Ok(status) => AttemptOutcome::Rejected(status),
            Err(e) => AttemptOutcome::Failed(e.to_string()),
        };
        let attempt = Attempt { url: url.clone(), outcome };
        let accepted = matches!(attempt.outcome, AttemptOutcome::Accepted(_));
        match attempt.describe_failure() {
            None => debug!(%url, "booking accepted"),
            Some(reason) => warn!(%url, %reason, "booking candidate failed"),
        }
        attempts.push(attempt);
        if accepted {
            break;
        }
    }
    SubmitOutcome { attempts }
}
