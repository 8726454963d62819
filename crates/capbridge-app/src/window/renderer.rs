//! What the window loads and where it may go.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use capbridge_config::CapbridgeConfig;
use capbridge_platform::shell::is_external_url_allowed;
use tracing::{debug, warn};

/// Custom protocol serving the packaged renderer.
pub const PROTOCOL: &str = "capbridge";

/// Entry document of a packaged renderer.
pub const INDEX: &str = "index.html";

// =============================================================================
// SOURCE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererSource {
    /// Live dev server (hot reload).
    DevServer(String),
    /// Built renderer on disk, served over [`PROTOCOL`].
    Packaged(PathBuf),
}

impl RendererSource {
    /// Dev server when dev mode has a URL, otherwise `packaged_dir`.
    pub fn select(config: &CapbridgeConfig, packaged_dir: PathBuf) -> Self {
        match config.dev_renderer_url() {
            Some(url) => Self::DevServer(url.to_string()),
            None => Self::Packaged(packaged_dir),
        }
    }

    /// URL the window navigates to first.
    pub fn start_url(&self) -> String {
        match self {
            Self::DevServer(url) => url.clone(),
            Self::Packaged(_) => format!("{PROTOCOL}://localhost/{INDEX}"),
        }
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        let mut prefixes = vec!["about:blank".to_string()];
        match self {
            Self::DevServer(url) => prefixes.push(origin_prefix(url)),
            Self::Packaged(_) => {
                prefixes.push(format!("{PROTOCOL}://"));
                // WebView2 rewrites custom protocols to http://<scheme>.localhost/
                prefixes.push(format!("http://{PROTOCOL}.localhost/"));
            }
        }
        NavigationPolicy { prefixes }
    }
}

/// `scheme://host[:port]/` of `url`.
fn origin_prefix(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let host_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    format!("{}{}/", &url[..scheme_end + 3], &rest[..host_len])
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Prefix allowlist for in-window navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPolicy {
    prefixes: Vec<String>,
}

impl NavigationPolicy {
    pub fn allows(&self, url: &str) -> bool {
        let allowed = self.prefixes.iter().any(|prefix| {
            url.starts_with(prefix.as_str()) || url == prefix.trim_end_matches('/')
        });
        if !allowed {
            warn!(url, "navigation blocked: URL not in allowlist");
        }
        allowed
    }
}

/// What to do when the renderer asks for a new window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOpenDecision {
    /// Deny the window and hand the URL to the system browser.
    OpenExternally(String),
    Deny,
}

/// New windows are never created; web links go to the browser instead.
pub fn on_window_open(url: &str) -> WindowOpenDecision {
    if is_external_url_allowed(url) {
        debug!(url, "new window redirected to browser");
        WindowOpenDecision::OpenExternally(url.to_string())
    } else {
        warn!(url, "new window denied");
        WindowOpenDecision::Deny
    }
}

// =============================================================================
// PACKAGED ASSETS
// =============================================================================

/// Resolves custom-protocol requests to files under the packaged renderer
/// directory.
pub struct RendererAssets {
    base_dir: PathBuf,
}

impl RendererAssets {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// File bytes and MIME type for a request path. `/` maps to the index.
    /// Paths escaping the base directory resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Cow<'static, [u8]>)> {
        let clean = path.split(['?', '#']).next().unwrap_or_default();
        let clean = clean.trim_start_matches('/');
        let clean = if clean.is_empty() { INDEX } else { clean };

        let file_path = self.base_dir.join(clean);
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            warn!(path, "asset request outside renderer directory");
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((mime_from_extension(&canonical_file), Cow::Owned(data)))
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") | Some("map") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("wasm") => "application/wasm",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("ttf") => "font/ttf",
        _ => "application/octet-stream",
    }
}
