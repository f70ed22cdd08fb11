use crate::config::BookingConfig;
use crate::errors::BookingError;

/// Opening window `[open, close)` in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub open: Option<i64>,
    pub close: Option<i64>,
}

impl BusinessHours {
    pub fn from_config(cfg: &BookingConfig) -> Self {
        Self { open: cfg.open_hour, close: cfg.close_hour }
    }

    /// Check a submitted `HH:MM` time against the window.
    ///
    /// An empty time, an unreadable hour or an unset bound lets the booking through.
    pub fn check(&self, time: &str) -> Result<(), BookingError> {
        if time.is_empty() {
            return Ok(());
        }
        let (Some(open), Some(close)) = (self.open, self.close) else {
            return Ok(());
        };
        let Some(hour) = hour_of(time) else {
            return Ok(());
        };
        if hour < open as f64 || hour >= close as f64 {
            return Err(BookingError::OutsideHours { open, close });
        }
        Ok(())
    }
}

/// Numeric value of the part before the first `:`. A blank part reads as 0.
fn hour_of(time: &str) -> Option<f64> {
    let head = time.split(':').next().unwrap_or("").trim();
    if head.is_empty() {
        return Some(0.0);
    }
    head.parse::<f64>().ok().filter(|h| !h.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DINNER: BusinessHours = BusinessHours { open: Some(18), close: Some(23) };

    #[test]
    fn window_is_half_open() {
        assert!(DINNER.check("18:00").is_ok());
        assert!(DINNER.check("22:59").is_ok());
        assert_eq!(
            DINNER.check("23:00"),
            Err(BookingError::OutsideHours { open: 18, close: 23 })
        );
        assert!(DINNER.check("17:45").is_err());
    }

    #[test]
    fn message_names_the_window() {
        let err = DINNER.check("09:00").unwrap_err();
        assert_eq!(err.to_string(), "Bookings allowed between 18:00 and 23:00.");
    }

    #[test]
    fn unreadable_inputs_pass() {
        assert!(DINNER.check("").is_ok());
        assert!(DINNER.check("soon").is_ok());
        let open_ended = BusinessHours { open: Some(18), close: None };
        assert!(open_ended.check("03:00").is_ok());
    }

    #[test]
    fn blank_hour_reads_as_midnight() {
        assert!(DINNER.check(":30").is_err());
        let all_day = BusinessHours { open: Some(0), close: Some(24) };
        assert!(all_day.check(":30").is_ok());
    }
}
