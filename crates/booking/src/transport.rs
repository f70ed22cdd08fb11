use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use serde_json::Value;

use crate::errors::TransportError;
use crate::form::BookingPayload;

// Characters a browser's encodeURIComponent leaves as-is.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build `k=v&k=v` with each part percent-encoded; a space becomes `%20`.
pub fn encode_query(query: &[(&str, &str)]) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", utf8_percent_encode(k, QUERY_VALUE), utf8_percent_encode(v, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Reply to a JSON GET. `body` is `None` unless the status was 2xx and the
/// body decoded as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: u16,
    pub body: Option<Value>,
}

impl JsonReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam of the booking controller.
#[async_trait]
pub trait BookingTransport: Send + Sync {
    /// POST `payload` as JSON; returns the response status.
    async fn post_json(&self, url: &str, payload: &BookingPayload) -> Result<u16, TransportError>;

    /// GET `url` with `query` appended.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<JsonReply, TransportError>;
}

/// `reqwest`-backed transport. Relative URLs such as `/api/bookings`
/// resolve against `origin`, the address of the page hosting the form.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Option<Url>,
}

impl HttpTransport {
    pub fn new(origin: Option<&str>) -> Result<Self, TransportError> {
        Self::with_client(reqwest::Client::new(), origin)
    }

    pub fn with_client(client: reqwest::Client, origin: Option<&str>) -> Result<Self, TransportError> {
        let origin = origin
            .map(|o| {
                Url::parse(o).map_err(|e| TransportError::InvalidUrl { url: o.to_string(), reason: e.to_string() })
            })
            .transpose()?;
        Ok(Self { client, origin })
    }

    fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let parsed = match &self.origin {
            Some(base) => base.join(url),
            None if url.starts_with('/') => {
                return Err(TransportError::InvalidUrl {
                    url: url.to_string(),
                    reason: "relative url and no page origin configured".to_string(),
                })
            }
            None => Url::parse(url),
        };
        parsed.map_err(|e| TransportError::InvalidUrl { url: url.to_string(), reason: e.to_string() })
    }
}

#[async_trait]
impl BookingTransport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &BookingPayload) -> Result<u16, TransportError> {
        let target = self.resolve(url)?;
        let res = self.client.post(target).json(payload).send().await?;
        Ok(res.status().as_u16())
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<JsonReply, TransportError> {
        let mut target = self.resolve(url)?;
        if !query.is_empty() {
            target.set_query(Some(&encode_query(query)));
        }
        let res = self.client.get(target).send().await?;
        let status = res.status();
        let body = if status.is_success() { res.json::<Value>().await.ok() } else { None };
        Ok(JsonReply { status: status.as_u16(), body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_urls_need_an_origin() {
        let bare = HttpTransport::new(None).unwrap();
        assert!(matches!(bare.resolve("/api/bookings"), Err(TransportError::InvalidUrl { .. })));
        assert_eq!(
            bare.resolve("https://api.test/book").unwrap().as_str(),
            "https://api.test/book"
        );

        let hosted = HttpTransport::new(Some("https://bistro.test/reserve/")).unwrap();
        assert_eq!(
            hosted.resolve("/api/bookings").unwrap().as_str(),
            "https://bistro.test/api/bookings"
        );
    }

    #[test]
    fn query_values_use_percent_twenty_for_spaces() {
        let qs = encode_query(&[("date", "2024-05-01"), ("time", "7:30 pm"), ("note", "a&b=c's (x)")]);
        assert_eq!(qs, "date=2024-05-01&time=7%3A30%20pm&note=a%26b%3Dc's%20(x)");
        assert_eq!(encode_query(&[]), "");
    }

    #[test]
    fn bad_origin_is_rejected() {
        assert!(HttpTransport::new(Some("not a url")).is_err());
    }
}
