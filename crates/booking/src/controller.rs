use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::availability::{self, Availability};
use crate::candidates::{submit_first_success, Attempt, CandidateList};
use crate::config::BookingConfig;
use crate::errors::BookingError;
use crate::form::{gather, BookingPayload, FormSnapshot};
use crate::hours::BusinessHours;
use crate::state::{render, BookingView, FormState};
use crate::transport::BookingTransport;

/// Everything one press of the submit button did.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub state: FormState,
    pub payload: BookingPayload,
    pub availability: Availability,
    pub candidates: Vec<String>,
    pub attempts: Vec<Attempt>,
}

impl SubmissionReport {
    fn stopped(state: FormState, payload: BookingPayload, availability: Availability) -> Self {
        Self { state, payload, availability, candidates: Vec::new(), attempts: Vec::new() }
    }

    fn busy() -> Self {
        Self::stopped(FormState::Error(BookingError::Busy), BookingPayload::default(), Availability::Unchecked)
    }

    /// `Ok(url)` of the endpoint that accepted the booking, or why none did.
    pub fn result(&self) -> Result<&str, &BookingError> {
        match &self.state {
            FormState::Error(e) => Err(e),
            _ => Ok(self.attempts.last().map(|a| a.url.as_str()).unwrap_or_default()),
        }
    }
}

/// Clears the in-flight flag when a submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the submit sequence for one booking form.
pub struct BookingController<T> {
    config: BookingConfig,
    hours: BusinessHours,
    transport: T,
    in_flight: AtomicBool,
}

impl<T: BookingTransport> BookingController<T> {
    pub fn new(config: BookingConfig, transport: T) -> Self {
        let hours = BusinessHours::from_config(&config);
        Self { config, hours, transport, in_flight: AtomicBool::new(false) }
    }

    /// Controller configured from the form's own data attributes.
    pub fn for_form(form: &FormSnapshot, transport: T) -> Self {
        Self::new(BookingConfig::from_data_attributes(&form.data), transport)
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Handle a submit press.
    ///
    /// While a previous submission is still running the press is refused
    /// with [`BookingError::Busy`] and the view is left alone. Otherwise the
    /// view sees the submitting state first and the final state last.
    pub async fn submit<V>(&self, form: &FormSnapshot, view: &mut V) -> SubmissionReport
    where
        V: BookingView + ?Sized,
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("submit ignored; a booking is already being sent");
            return SubmissionReport::busy();
        };

        view.apply(&render(&FormState::Submitting));
        let report = self.run(form).await;
        view.apply(&render(&report.state));
        report
    }

    async fn run(&self, form: &FormSnapshot) -> SubmissionReport {
        let payload = gather(form);
        debug!(fields = payload.len(), "booking payload gathered");

        if let Err(e) = self.hours.check(payload.text("time")) {
            info!(time = payload.text("time"), "booking outside opening hours");
            return SubmissionReport::stopped(FormState::Error(e), payload, Availability::Unchecked);
        }

        let availability =
            availability::check(&self.transport, self.config.availability_base(), &payload).await;
        debug!(?availability, "availability resolved");
        if let Some(max_tables) = self.config.max_tables.filter(|&max| availability.is_full(Some(max))) {
            let confirmed = availability.confirmed().unwrap_or_default();
            info!(confirmed, max_tables, "slot fully booked");
            let err = BookingError::FullyBooked { confirmed, max_tables };
            return SubmissionReport::stopped(FormState::Error(err), payload, availability);
        }

        let candidates = CandidateList::build(&self.config.api, form.action.as_deref());
        let outcome = submit_first_success(&self.transport, &candidates, &payload).await;

        let state = match outcome.accepted_url() {
            Some(url) => {
                info!(%url, attempts = outcome.attempts.len(), "booking submitted");
                FormState::Success
            }
            None => {
                let last_error = outcome.last_error().unwrap_or_default();
                warn!(
                    candidates = ?candidates.as_slice(),
                    %last_error,
                    "booking failed for all candidates"
                );
                FormState::Error(BookingError::Exhausted { attempts: outcome.attempts.len(), last_error })
            }
        };

        SubmissionReport {
            state,
            payload,
            availability,
            candidates: candidates.as_slice().to_vec(),
            attempts: outcome.attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::candidates::AttemptOutcome;
    use crate::config::AvailabilitySource;
    use crate::errors::TransportError;
    use crate::form::FormElement;
    use crate::state::WidgetModel;
    use crate::transport::JsonReply;

    /// Answers POSTs from a status table (unknown URLs get 404) and GETs
    /// with a fixed reply; records every call.
    #[derive(Default)]
    struct Scripted {
        statuses: HashMap<String, u16>,
        search: Option<JsonReply>,
        gate: Option<Arc<Notify>>,
        posts: Mutex<Vec<String>>,
        gets: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BookingTransport for Scripted {
        async fn post_json(&self, url: &str, _payload: &BookingPayload) -> Result<u16, TransportError> {
            self.posts.lock().unwrap().push(url.to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(*self.statuses.get(url).unwrap_or(&404))
        }

        async fn get_json(&self, url: &str, _query: &[(&str, &str)]) -> Result<JsonReply, TransportError> {
            self.gets.lock().unwrap().push(url.to_string());
            Ok(self.search.clone().unwrap_or(JsonReply { status: 503, body: None }))
        }
    }

    fn dinner_form(time: &str) -> FormSnapshot {
        FormSnapshot::with_elements(vec![
            FormElement::field("name", "Grace"),
            FormElement::field("date", "2026-10-20"),
            FormElement::field("time", time),
            FormElement::field("guests", "4"),
        ])
    }

    #[tokio::test]
    async fn out_of_hours_makes_no_calls() {
        let ctrl = BookingController::new(BookingConfig::default(), Scripted::default());
        let mut page = WidgetModel::default();
        let report = ctrl.submit(&dinner_form("12:00"), &mut page).await;

        assert_eq!(report.state, FormState::Error(BookingError::OutsideHours { open: 18, close: 23 }));
        assert!(ctrl.transport.posts.lock().unwrap().is_empty());
        assert!(ctrl.transport.gets.lock().unwrap().is_empty());
        assert!(!page.submit_disabled);
        assert_eq!(page.message_text, "Bookings allowed between 18:00 and 23:00.");
    }

    #[tokio::test]
    async fn full_slot_blocks_submission() {
        let transport = Scripted {
            search: Some(JsonReply { status: 200, body: Some(json!([{}, {}])) }),
            ..Default::default()
        };
        let config = BookingConfig {
            availability: AvailabilitySource::Endpoint("https://sheet.test/v1".into()),
            max_tables: Some(2),
            ..Default::default()
        };
        let ctrl = BookingController::new(config, transport);
        let report = ctrl.submit(&dinner_form("19:00"), &mut WidgetModel::default()).await;

        assert_eq!(report.availability, Availability::Checked { confirmed: 2 });
        assert!(matches!(report.state, FormState::Error(BookingError::FullyBooked { .. })));
        assert_eq!(*ctrl.transport.gets.lock().unwrap(), ["https://sheet.test/v1/search"]);
        assert!(ctrl.transport.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn broken_availability_check_fails_open() {
        let mut statuses = HashMap::new();
        statuses.insert("/api/bookings".to_string(), 201);
        let transport = Scripted { statuses, ..Default::default() };
        let config = BookingConfig {
            availability: AvailabilitySource::Endpoint("https://sheet.test/v1".into()),
            max_tables: Some(0),
            ..Default::default()
        };
        let ctrl = BookingController::new(config, transport);
        let report = ctrl.submit(&dinner_form("20:15"), &mut WidgetModel::default()).await;

        assert_eq!(report.availability, Availability::Unchecked);
        assert_eq!(report.state, FormState::Success);
        assert_eq!(report.result(), Ok("/api/bookings"));
    }

    #[tokio::test]
    async fn exhausted_candidates_reveal_fallback() {
        let ctrl = BookingController::new(
            BookingConfig { api: "https://api.test/book".into(), ..Default::default() },
            Scripted::default(),
        );
        let mut page = WidgetModel::default();
        let report = ctrl.submit(&dinner_form("21:00"), &mut page).await;

        assert_eq!(report.attempts.len(), 2);
        assert!(report.attempts.iter().all(|a| a.outcome == AttemptOutcome::Rejected(404)));
        match report.result() {
            Err(BookingError::Exhausted { attempts: 2, last_error }) => {
                assert_eq!(last_error, "Server returned 404 for /api/bookings")
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(page.fallback_visible);
        assert_eq!(page.fallback_scrolls, 1);
        assert_eq!(page.resets, 0);
    }

    #[tokio::test]
    async fn second_press_while_sending_is_refused() {
        let gate = Arc::new(Notify::new());
        let mut statuses = HashMap::new();
        statuses.insert("/api/bookings".to_string(), 200);
        let ctrl = BookingController::new(
            BookingConfig::default(),
            Scripted { statuses, gate: Some(gate.clone()), ..Default::default() },
        );
        let form = dinner_form("19:00");
        let (mut first_page, mut second_page) = (WidgetModel::default(), WidgetModel::default());

        let first = ctrl.submit(&form, &mut first_page);
        let second = async {
            while !ctrl.is_submitting() {
                tokio::task::yield_now().await;
            }
            let report = ctrl.submit(&form, &mut second_page).await;
            assert!(ctrl.is_submitting());
            gate.notify_one();
            report
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.state, FormState::Success);
        assert_eq!(second.state, FormState::Error(BookingError::Busy));
        assert_eq!(second_page, WidgetModel::default());
        assert_eq!(ctrl.transport.posts.lock().unwrap().len(), 1);
        assert!(!ctrl.is_submitting());
    }
}
