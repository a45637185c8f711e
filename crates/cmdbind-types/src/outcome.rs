//! Uniform handler outcome.

use serde::{Deserialize, Serialize};

/// Result code used when a handler does not supply one.
pub const DEFAULT_CODE: i64 = 1;

/// Normalized result of executing a command handler.
///
/// `code` doubles as a success count for batch-style commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Outcome {
    /// Plain success with the default code.
    pub fn success() -> Self {
        Self {
            success: true,
            code: DEFAULT_CODE,
            message: None,
        }
    }

    /// Plain failure with code 0.
    pub fn fail() -> Self {
        Self {
            success: false,
            code: 0,
            message: None,
        }
    }

    /// Success carrying an explicit result code.
    pub fn code(code: i64) -> Self {
        Self {
            success: true,
            code,
            message: None,
        }
    }

    /// Success carrying a message.
    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success()
        }
    }

    /// Failure carrying a message.
    pub fn fail_with(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::fail()
        }
    }

    /// Success iff `ok`, with the default code either way.
    pub fn from_bool(ok: bool) -> Self {
        Self {
            success: ok,
            code: DEFAULT_CODE,
            message: None,
        }
    }

    /// Attach or replace the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_plain_success() {
        let o = Outcome::default();
        assert!(o.success);
        assert_eq!(o.code, 1);
        assert!(o.message.is_none());
    }

    #[test]
    fn fail_has_zero_code() {
        let o = Outcome::fail_with("nope");
        assert!(!o.success);
        assert_eq!(o.code, 0);
        assert_eq!(o.message.as_deref(), Some("nope"));
    }

    #[test]
    fn from_bool_keeps_default_code() {
        assert!(Outcome::from_bool(true).success);
        let o = Outcome::from_bool(false);
        assert!(!o.success);
        assert_eq!(o.code, 1);
    }

    #[test]
    fn json_omits_missing_message() {
        let json = serde_json::to_string(&Outcome::code(7)).unwrap();
        assert_eq!(json, r#"{"success":true,"code":7}"#);
    }

    #[test]
    fn json_roundtrip_with_message() {
        let o = Outcome::success_with("done").with_message("really done");
        let json = serde_json::to_string(&o).unwrap();
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, o);
    }
}
