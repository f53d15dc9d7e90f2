//! Response envelopes.
//!
//! Every handler answers with an `Envelope`, success or failure. The envelope
//! serializes in API gateway proxy shape: `statusCode`, `headers`, and a
//! `body` that is itself a JSON string.

use crate::Error;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Generic body for 500 responses; internal detail stays in the logs
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// CORS policy attached to every response of an endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cors {
    pub allow_methods: &'static str,
    pub allow_headers: &'static str,
}

impl Cors {
    /// Calculators accepting a POST body
    pub const POST: Cors = Cors {
        allow_methods: "OPTIONS,POST",
        allow_headers: "Content-Type",
    };

    /// Diet report, reachable by POST or GET
    pub const POST_GET: Cors = Cors {
        allow_methods: "OPTIONS,POST,GET",
        allow_headers: "Content-Type",
    };

    /// Read-only lookups
    pub const GET: Cors = Cors {
        allow_methods: "OPTIONS,GET",
        allow_headers: "Content-Type",
    };

    /// Account endpoints, which also accept an Authorization header
    pub const ACCOUNT: Cors = Cors {
        allow_methods: "POST, OPTIONS",
        allow_headers: "Content-Type, Authorization",
    };
}

/// Status, headers and JSON body of a handler response
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl Envelope {
    pub fn new(status_code: u16, cors: Cors, body: Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            cors.allow_headers.to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            cors.allow_methods.to_string(),
        );

        Self {
            status_code,
            headers,
            body,
        }
    }

    /// 200 with any serializable payload
    ///
    /// Falls back to a 500 envelope if the payload cannot be serialized.
    pub fn ok<T: Serialize>(cors: Cors, payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(body) => Self::new(200, cors, body),
            Err(e) => Self::internal(cors, &Error::Json(e)),
        }
    }

    pub fn message(status_code: u16, cors: Cors, message: &str) -> Self {
        Self::new(status_code, cors, json!({ "message": message }))
    }

    pub fn bad_request(cors: Cors, field: &str, message: &str) -> Self {
        Self::new(400, cors, json!({ "error": message, "field": field }))
    }

    pub fn not_found(cors: Cors, message: &str) -> Self {
        Self::new(404, cors, json!({ "error": message }))
    }

    /// 500 with the generic message; the cause is logged, not returned
    pub fn internal(cors: Cors, cause: &Error) -> Self {
        tracing::error!("Request failed: {}", cause);
        Self::new(500, cors, json!({ "error": INTERNAL_ERROR_MESSAGE }))
    }

    /// 500 with a caller-facing message that names the failed operation
    pub fn internal_with(cors: Cors, cause: &Error, message: &str) -> Self {
        tracing::error!("Request failed: {}", cause);
        Self::new(500, cors, json!({ "error": message }))
    }

    /// Map an error to its envelope by status
    pub fn from_error(cors: Cors, err: &Error) -> Self {
        match err {
            Error::Validation { field, .. } => {
                tracing::warn!("Validation failed: {}", err);
                Self::bad_request(cors, field, &err.to_string())
            }
            _ => Self::internal(cors, err),
        }
    }

    /// Answer to a CORS preflight request
    pub fn preflight(cors: Cors) -> Self {
        Self::new(200, cors, json!({}))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The body as it goes on the wire
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 3)?;
        state.serialize_field("statusCode", &self.status_code)?;
        state.serialize_field("headers", &self.headers)?;
        state.serialize_field("body", &self.body_string())?;
        state.end()
    }
}
