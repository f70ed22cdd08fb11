use thiserror::Error;

/// Why a submission did not end with an accepted booking.
///
/// The `Display` text of the first two variants is what the guest sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Bookings allowed between {open}:00 and {close}:00.")]
    OutsideHours { open: i64, close: i64 },
    #[error("All tables are full at this time. Please try another slot.")]
    FullyBooked { confirmed: usize, max_tables: i64 },
    #[error("all {attempts} booking endpoints failed; last error: {last_error}")]
    Exhausted { attempts: usize, last_error: String },
    #[error("a booking submission is already in progress")]
    Busy,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}
