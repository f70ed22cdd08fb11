use tracing::debug;

use crate::form::BookingPayload;
use crate::transport::BookingTransport;

pub const CONFIRMED_STATUS: &str = "CONFIRMED";

/// Result of the best-effort capacity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    /// No lookup was made, or it failed; treated as room available.
    #[default]
    Unchecked,
    Checked { confirmed: usize },
}

impl Availability {
    pub fn confirmed(&self) -> Option<usize> {
        match self {
            Availability::Checked { confirmed } => Some(*confirmed),
            Availability::Unchecked => None,
        }
    }

    /// Whether the slot has no tables left. Unknown capacity is never full.
    pub fn is_full(&self, max_tables: Option<i64>) -> bool {
        match (self, max_tables) {
            (Availability::Checked { confirmed }, Some(max)) => *confirmed as i64 >= max,
            _ => false,
        }
    }
}

/// `{base}/search`, the spreadsheet service's filter endpoint.
pub fn search_url(base: &str) -> String {
    format!("{}/search", base.trim_end_matches('/'))
}

/// Count confirmed bookings for the payload's date and time.
///
/// Needs a search base and non-empty `date` and `time`. Any failure
/// (network, non-2xx, body that is not a JSON array) yields `Unchecked`.
pub async fn check<T>(transport: &T, base: Option<&str>, payload: &BookingPayload) -> Availability
where
    T: BookingTransport + ?Sized,
{
    let Some(base) = base else {
        return Availability::Unchecked;
    };
    let (date, time) = (payload.text("date"), payload.text("time"));
    if date.is_empty() || time.is_empty() {
        return Availability::Unchecked;
    }

    let url = search_url(base);
    let query = [("date", date), ("time", time), ("status", CONFIRMED_STATUS)];
    match transport.get_json(&url, &query).await {
        Ok(reply) if reply.is_success() => match reply.body.as_ref().and_then(|b| b.as_array()) {
            Some(rows) => Availability::Checked { confirmed: rows.len() },
            None => {
                debug!(%url, "availability reply is not an array; skipping check");
                Availability::Unchecked
            }
        },
        Ok(reply) => {
            debug!(%url, status = reply.status, "availability lookup rejected; skipping check");
            Availability::Unchecked
        }
        Err(e) => {
            debug!(%url, error = %e, "availability lookup failed; skipping check");
            Availability::Unchecked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_comparison() {
        let three = Availability::Checked { confirmed: 3 };
        assert!(three.is_full(Some(3)));
        assert!(three.is_full(Some(2)));
        assert!(!three.is_full(Some(4)));
        assert!(!three.is_full(None));
        assert!(!Availability::Unchecked.is_full(Some(0)));
    }

    #[test]
    fn search_url_appends_suffix() {
        assert_eq!(search_url("https://s.test/api/v1/abc"), "https://s.test/api/v1/abc/search");
        assert_eq!(search_url("https://s.test/api/v1/abc/"), "https://s.test/api/v1/abc/search");
    }
}
