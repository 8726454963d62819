use std::collections::{HashMap, HashSet};

use capbridge_config::schema::BridgeConfig;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::session::SessionToken;
use crate::client::CapabilityApi;
use crate::errors::BridgeError;

/// How the capability object reaches the renderer. Chosen from
/// configuration at startup, never by probing the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStrategy {
    /// Through the isolated context bridge; the object is frozen and its key
    /// cannot be rebound.
    ContextBridge,
    /// Attached to the renderer's shared global scope. Degraded mode.
    SharedGlobal,
}

impl InstallStrategy {
    pub fn from_config(config: &BridgeConfig) -> Self {
        if config.context_isolation {
            Self::ContextBridge
        } else {
            Self::SharedGlobal
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::SharedGlobal)
    }
}

/// The renderer-side scope the capability object is installed into.
pub trait RendererContext {
    /// Secure install. Fails if isolation is off in this context or `key` is
    /// already bound.
    fn expose_in_main_world(&mut self, key: &str, api: CapabilityApi) -> Result<(), BridgeError>;

    /// Plain assignment to the shared global scope.
    fn attach_global(&mut self, key: &str, api: CapabilityApi);
}

/// Outcome of [`CapabilityBridge::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub strategy: InstallStrategy,
    pub key: String,
    pub degraded: bool,
    /// `false` when installation failed and the renderer has no surface.
    pub installed: bool,
    pub error: Option<String>,
}

/// Installs one [`CapabilityApi`] per renderer under a fixed key.
#[derive(Debug, Clone)]
pub struct CapabilityBridge {
    strategy: InstallStrategy,
    key: String,
}

impl CapabilityBridge {
    pub fn new(strategy: InstallStrategy, key: impl Into<String>) -> Self {
        Self {
            strategy,
            key: key.into(),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(InstallStrategy::from_config(config), config.global_key.clone())
    }

    pub fn strategy(&self) -> InstallStrategy {
        self.strategy
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Install `api` into `ctx`. Failures are logged and reported, never
    /// raised; the caller keeps running without a surface.
    pub fn install(&self, ctx: &mut dyn RendererContext, api: CapabilityApi) -> Installation {
        let outcome = if !is_valid_key(&self.key) {
            Err(BridgeError::InvalidKey(self.key.clone()))
        } else {
            match self.strategy {
                InstallStrategy::ContextBridge => ctx.expose_in_main_world(&self.key, api),
                InstallStrategy::SharedGlobal => {
                    warn!(
                        key = %self.key,
                        "context isolation disabled; \
                         capability API attached to the shared global scope"
                    );
                    ctx.attach_global(&self.key, api);
                    Ok(())
                }
            }
        };

        let degraded = self.strategy.is_degraded();
        match outcome {
            Ok(()) => {
                info!(key = %self.key, strategy = ?self.strategy, "capability API installed");
                Installation {
                    strategy: self.strategy,
                    key: self.key.clone(),
                    degraded,
                    installed: true,
                    error: None,
                }
            }
            Err(e) => {
                error!(
                    key = %self.key,
                    strategy = ?self.strategy,
                    error = %e,
                    "failed to install capability API"
                );
                Installation {
                    strategy: self.strategy,
                    key: self.key.clone(),
                    degraded,
                    installed: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// JavaScript that performs the same installation inside a webview.
    /// Frames from the installed object carry `token`.
    pub fn bootstrap_script(&self, token: &SessionToken) -> Result<String, BridgeError> {
        if !is_valid_key(&self.key) {
            return Err(BridgeError::InvalidKey(self.key.clone()));
        }
        Ok(super::script::bootstrap_script(self.strategy, &self.key, token))
    }
}

/// Whether `key` is a plain JavaScript identifier.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// In-process [`RendererContext`] for tests and embedding.
///
/// `isolated` mirrors the renderer's isolation setting, which may disagree
/// with the configured strategy.
pub struct MemoryRendererContext {
    isolated: bool,
    main_world: HashMap<String, CapabilityApi>,
    globals: HashMap<String, CapabilityApi>,
    reserved: HashSet<String>,
}

impl MemoryRendererContext {
    pub fn isolated() -> Self {
        Self::with_isolation(true)
    }

    pub fn shared() -> Self {
        Self::with_isolation(false)
    }

    pub fn with_isolation(isolated: bool) -> Self {
        Self {
            isolated,
            main_world: HashMap::new(),
            globals: HashMap::new(),
            reserved: HashSet::new(),
        }
    }

    /// Mark `key` as taken by page script.
    pub fn reserve(&mut self, key: &str) {
        self.reserved.insert(key.to_string());
    }

    /// What page script sees under `key`.
    pub fn lookup(&self, key: &str) -> Option<&CapabilityApi> {
        self.main_world.get(key).or_else(|| self.globals.get(key))
    }

    /// Whether `key` was installed through the isolated bridge.
    pub fn is_exposed_in_main_world(&self, key: &str) -> bool {
        self.main_world.contains_key(key)
    }
}

impl RendererContext for MemoryRendererContext {
    fn expose_in_main_world(&mut self, key: &str, api: CapabilityApi) -> Result<(), BridgeError> {
        if !self.isolated {
            return Err(BridgeError::IsolationUnavailable);
        }
        if self.reserved.contains(key) || self.main_world.contains_key(key) {
            return Err(BridgeError::KeyAlreadyBound(key.to_string()));
        }
        self.main_world.insert(key.to_string(), api);
        Ok(())
    }

    fn attach_global(&mut self, key: &str, api: CapabilityApi) {
        self.globals.insert(key.to_string(), api);
    }
}
