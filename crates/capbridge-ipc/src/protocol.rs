//! Frames exchanged across the boundary.
//!
//! Every frame is one JSON object with a `type` tag:
//!
//! - renderer -> host: `invoke` (awaits a `reply`) and `send`
//! - host -> renderer: `reply` and `push`
//!
//! Arguments are positional JSON arrays.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable failure codes carried in `reply.error.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownChannel,
    WrongMode,
    BadArguments,
    HandlerFailed,
    HandlerPanicked,
    NotRegistered,
    TransportClosed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownChannel => "unknown_channel",
            Self::WrongMode => "wrong_mode",
            Self::BadArguments => "bad_arguments",
            Self::HandlerFailed => "handler_failed",
            Self::HandlerPanicked => "handler_panicked",
            Self::NotRegistered => "not_registered",
            Self::TransportClosed => "transport_closed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure delivered to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{channel}: {message} ({code})")]
pub struct RemoteError {
    pub code: ErrorCode,
    pub channel: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: ErrorCode, channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            channel: channel.into(),
            message: message.into(),
        }
    }

    pub fn transport_closed(channel: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportClosed, channel, "transport closed")
    }
}

/// Renderer-to-host frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Invoke {
        id: u64,
        channel: String,
        #[serde(default)]
        args: Value,
    },
    Send {
        channel: String,
        #[serde(default)]
        args: Value,
    },
}

/// Host-to-renderer frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostFrame {
    Reply {
        id: u64,
        ok: bool,
        /// Absent for a value-less reply; a present `null` stays `Some`.
        #[serde(
            default,
            deserialize_with = "present_value",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<RemoteError>,
    },
    Push {
        channel: String,
        #[serde(default)]
        payload: Value,
    },
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl HostFrame {
    /// `Ok(None)` is a success whose reply has no `value` field.
    pub fn reply(id: u64, result: Result<Option<Value>, RemoteError>) -> Self {
        match result {
            Ok(value) => HostFrame::Reply {
                id,
                ok: true,
                value,
                error: None,
            },
            Err(error) => HostFrame::Reply {
                id,
                ok: false,
                value: None,
                error: Some(error),
            },
        }
    }

    pub fn push(channel: &str, payload: Value) -> Self {
        HostFrame::Push {
            channel: channel.to_string(),
            payload,
        }
    }
}

/// Why an incoming frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed frame: {reason}")]
pub struct MalformedFrame {
    /// Set when the frame was an `invoke` whose id could still be read, so
    /// the sender can be answered.
    pub invoke_id: Option<u64>,
    pub channel: Option<String>,
    pub reason: String,
}

pub fn decode_client_frame(raw: &str) -> Result<ClientFrame, MalformedFrame> {
    let value: Value = serde_json::from_str(raw).map_err(|e| MalformedFrame {
        invoke_id: None,
        channel: None,
        reason: e.to_string(),
    })?;

    let invoke_id = match value.get("type").and_then(Value::as_str) {
        Some("invoke") => value.get("id").and_then(Value::as_u64),
        _ => None,
    };
    let channel = value
        .get("channel")
        .and_then(Value::as_str)
        .map(str::to_string);

    serde_json::from_value(value).map_err(|e| MalformedFrame {
        invoke_id,
        channel,
        reason: e.to_string(),
    })
}

pub fn decode_host_frame(raw: &str) -> Result<HostFrame, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn encode<T: Serialize>(frame: &T) -> String {
    // Frames only hold JSON values and strings.
    serde_json::to_string(frame).unwrap_or_else(|e| {
        format!(r#"{{"type":"error","message":{:?}}}"#, e.to_string())
    })
}

/// Encode an argument tuple as a positional array. `()` becomes `[]`.
pub fn encode_args<A: Serialize>(args: &A) -> Result<Value, serde_json::Error> {
    match serde_json::to_value(args)? {
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::Array(items) => Ok(Value::Array(items)),
        other => Ok(Value::Array(vec![other])),
    }
}

/// Decode a positional argument array into a tuple. A missing argument list
/// and `[]` both decode as `()`.
pub fn decode_args<A: DeserializeOwned>(args: Value) -> Result<A, serde_json::Error> {
    let normalized = match args {
        Value::Array(items) if items.is_empty() => Value::Null,
        other => other,
    };
    serde_json::from_value(normalized)
}
