//! Submit a booking form snapshot from the command line.
//!
//! Usage: `booking <form.json>` (or `BOOKING_FORM=<form.json>`). Settings
//! come from the form's `data` attributes when it has any, otherwise from
//! the `[booking]` section of `config.toml`.

use anyhow::Context;
use booking::{BookingConfig, BookingController, BookingView, FormSnapshot, HttpTransport, ViewEffects};
use booking::state::FallbackWidget;
use dotenvy::dotenv;
use tracing::{info, warn};

/// Prints each rendered effect instead of touching a page.
struct ConsoleView;

impl BookingView for ConsoleView {
    fn apply(&mut self, effects: &ViewEffects) {
        if let Some(msg) = &effects.message {
            println!("[{}] {}", msg.tone.class(), msg.text);
        }
        if effects.reset_form {
            println!("(form reset)");
        }
        if let FallbackWidget::Revealed { .. } = effects.fallback {
            println!("(fallback form revealed)");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_json();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BOOKING_FORM").ok())
        .context("usage: booking <form.json>")?;
    let raw = tokio::fs::read(&path).await.with_context(|| format!("reading {path}"))?;
    let mut form: FormSnapshot = serde_json::from_slice(&raw).with_context(|| format!("parsing {path}"))?;

    let app_cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "no usable config.toml; using defaults");
            configs::AppConfig::default()
        }
    };
    let section = &app_cfg.booking;
    if form.action.is_none() {
        form.action = section.action.clone();
    }
    let config = if form.data.is_empty() {
        BookingConfig::from_section(section)
    } else {
        BookingConfig::from_data_attributes(&form.data)
    };

    let transport = HttpTransport::new(section.origin.as_deref())?;
    let controller = BookingController::new(config, transport);
    let report = controller.submit(&form, &mut ConsoleView).await;

    match report.result() {
        Ok(url) => {
            info!(%url, "booking accepted");
            Ok(())
        }
        Err(e) => anyhow::bail!("booking not sent: {e}"),
    }
}
