//! Result envelope.
//!
//! Every call, successful or not, produces exactly one envelope:
//! - on success `{"success": true, "error": null, "error_code": null, "result": {...}}`
//! - on failure `{"success": false, "error": "...", "error_code": 4001, "result": null}`
//!
//! Error code families: 3xxx redirect, 4xxx caller input, 5xxx transport/server.

use log::error;
use serde::{Deserialize, Serialize};

use crate::error_handling::{ErrorCode, ExecutorError};
use crate::fetch::response::ResponseSnapshot;

/// Rendered when the envelope itself cannot be serialized.
const SERIALIZATION_FALLBACK: &str =
    r#"{"success":false,"error":"failed to serialize result","error_code":5000,"result":null}"#;

/// The single success/error wrapper returned from every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub success: bool,
    pub error: Option<String>,
    pub error_code: Option<u16>,
    pub result: Option<ResponseSnapshot>,
}

impl ResultEnvelope {
    pub fn success(snapshot: ResponseSnapshot) -> Self {
        Self {
            success: true,
            error: None,
            error_code: None,
            result: Some(snapshot),
        }
    }

    pub fn failure(err: &ExecutorError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_code: Some(err.code().as_u16()),
            result: None,
        }
    }

    /// The classified error code, if this envelope reports a failure.
    pub fn code(&self) -> Option<ErrorCode> {
        use strum::IntoEnumIterator;
        let raw = self.error_code?;
        ErrorCode::iter().find(|code| code.as_u16() == raw)
    }

    /// Renders the envelope as compact JSON.
    ///
    /// Never fails; if serialization is impossible a fixed Unknown (5000)
    /// envelope is returned instead.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            error!("Failed to serialize result envelope: {e}");
            SERIALIZATION_FALLBACK.to_string()
        })
    }
}

impl From<Result<ResponseSnapshot, ExecutorError>> for ResultEnvelope {
    fn from(outcome: Result<ResponseSnapshot, ExecutorError>) -> Self {
        match outcome {
            Ok(snapshot) => ResultEnvelope::success(snapshot),
            Err(e) => ResultEnvelope::failure(&e),
        }
    }
}
