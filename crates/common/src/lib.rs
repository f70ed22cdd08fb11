//! Pieces shared by the server and the booking driver: logging setup,
//! runtime directory checks and small wire types.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_status() {
        let h = types::Health { status: "ok" };
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn ok_ack_serializes_flag() {
        let json = serde_json::to_value(types::OkAck::default()).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true}));
    }
}
