//! Per-renderer secret shared between the host and the bootstrap closure.
//!
//! The token is baked into the bootstrap, never stored on a global, and
//! stamped on every frame the capability object posts. Page script can reach
//! the webview's raw IPC primitive but cannot learn the token, so its frames
//! are refused by the host and its calls into the receive hook are ignored.

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

#[derive(Deserialize)]
struct Stamp<'a> {
    #[serde(borrow)]
    token: Option<&'a str>,
}

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the frame in `body` carries this token.
    pub fn authenticate(&self, body: &str) -> bool {
        serde_json::from_str::<Stamp<'_>>(body)
            .ok()
            .and_then(|stamp| stamp.token)
            .is_some_and(|token| token == self.0)
    }
}
