//! Booking form controller.
//!
//! Collects a reservation from a form snapshot, enforces opening hours,
//! optionally asks a spreadsheet search service how many confirmed bookings
//! share the slot, then posts the booking to an ordered list of candidate
//! endpoints until one accepts it. UI changes are expressed as a
//! [`state::FormState`] rendered into [`state::ViewEffects`]; a
//! [`state::BookingView`] applies them to whatever hosts the form.

pub mod availability;
pub mod candidates;
pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod hours;
pub mod state;
pub mod transport;

pub use config::{AvailabilitySource, BookingConfig};
pub use controller::{BookingController, SubmissionReport};
pub use errors::{BookingError, TransportError};
pub use form::{BookingPayload, FormElement, FormSnapshot};
pub use state::{render, BookingView, FormState, ViewEffects, WidgetModel};
pub use transport::{BookingTransport, HttpTransport};
