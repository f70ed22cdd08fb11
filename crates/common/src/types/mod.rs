use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by operations that only acknowledge, e.g. `{"ok": true}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OkAck {
    pub ok: bool,
}

impl Default for OkAck {
    fn default() -> Self {
        Self { ok: true }
    }
}

/// Error body shared by every JSON error response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
