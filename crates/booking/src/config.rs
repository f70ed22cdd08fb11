use std::collections::BTreeMap;

use configs::BookingSection;

/// Where the optional capacity lookup goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvailabilitySource {
    #[default]
    Disabled,
    /// A dedicated spreadsheet search base URL.
    Endpoint(String),
    /// Search the primary `api` URL itself.
    PrimaryApi,
}

/// Widget settings, read once when the form is wired up.
///
/// Numeric settings are `None` when the configured text is not a number,
/// which disables the check that depends on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfig {
    pub api: String,
    pub availability: AvailabilitySource,
    pub max_tables: Option<i64>,
    pub open_hour: Option<i64>,
    pub close_hour: Option<i64>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            api: String::new(),
            availability: AvailabilitySource::Disabled,
            max_tables: Some(12),
            open_hour: Some(18),
            close_hour: Some(23),
        }
    }
}

impl BookingConfig {
    /// Read settings from the form's data attributes.
    ///
    /// Recognised keys: `api`, `sheetdb`, `availability` (`"api"` searches the
    /// primary URL), `max` (or `maxtables`), `open`, `close`. Empty values
    /// count as absent.
    pub fn from_data_attributes(data: &BTreeMap<String, String>) -> Self {
        let attr = |key: &str| data.get(key).map(String::as_str).filter(|v| !v.is_empty());

        let api = attr("api").unwrap_or("").trim().to_string();
        let sheetdb = attr("sheetdb").unwrap_or("").trim();
        let availability = if !sheetdb.is_empty() {
            AvailabilitySource::Endpoint(sheetdb.to_string())
        } else if attr("availability") == Some("api") && !api.is_empty() {
            AvailabilitySource::PrimaryApi
        } else {
            AvailabilitySource::Disabled
        };

        Self {
            api,
            availability,
            max_tables: parse_int(attr("max").or_else(|| attr("maxtables")).unwrap_or("12")),
            open_hour: parse_int(attr("open").unwrap_or("18")),
            close_hour: parse_int(attr("close").unwrap_or("23")),
        }
    }

    /// Build from the `[booking]` section of the application config.
    pub fn from_section(section: &BookingSection) -> Self {
        let api = section.api.trim().to_string();
        let availability = match section.availability.as_str() {
            "sheet" if !section.sheetdb.trim().is_empty() => {
                AvailabilitySource::Endpoint(section.sheetdb.trim().to_string())
            }
            "api" if !api.is_empty() => AvailabilitySource::PrimaryApi,
            _ => AvailabilitySource::Disabled,
        };
        Self {
            api,
            availability,
            max_tables: Some(section.max_tables),
            open_hour: Some(section.open_hour),
            close_hour: Some(section.close_hour),
        }
    }

    /// Base URL of the search service, if a capacity check should run.
    pub fn availability_base(&self) -> Option<&str> {
        match &self.availability {
            AvailabilitySource::Disabled => None,
            AvailabilitySource::Endpoint(url) => Some(url.as_str()),
            AvailabilitySource::PrimaryApi if !self.api.is_empty() => Some(self.api.as_str()),
            AvailabilitySource::PrimaryApi => None,
        }
    }
}

/// Lenient base-10 integer parse: leading whitespace, optional sign, then
/// as many digits as present. Trailing garbage is ignored ("12px" is 12).
pub fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
