//! Handing URLs and files to the desktop shell.

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};

use capbridge_common::PlatformError;
use tracing::{debug, info};

const ALLOWED_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

/// Whether `url` may be handed to the OS. Only web and mail links are
/// allowed; `file:`, `javascript:` and custom schemes are refused.
pub fn is_external_url_allowed(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ALLOWED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

/// Open `url` in the user's default handler.
pub fn open_external(url: &str) -> Result<(), PlatformError> {
    if !is_external_url_allowed(url) {
        return Err(PlatformError::ShellError(format!(
            "refusing to open {url:?}: only http, https and mailto links are allowed"
        )));
    }
    spawn(open_command(url.trim()))?;
    info!(url, "opened external link");
    Ok(())
}

/// Reveal `path` in the platform file manager.
pub fn show_item_in_folder(path: &Path) -> Result<(), PlatformError> {
    if !path.exists() {
        return Err(PlatformError::ShellError(format!(
            "{} does not exist",
            path.display()
        )));
    }
    spawn(reveal_command(path))?;
    info!(path = %path.display(), "revealed item in folder");
    Ok(())
}

/// Launch `cmd` without waiting for it. A detached thread reaps the child
/// once it exits.
fn spawn(mut cmd: Command) -> Result<JoinHandle<Option<ExitStatus>>, PlatformError> {
    let mut child = cmd
        .spawn()
        .map_err(|e| PlatformError::ShellError(format!("failed to launch {cmd:?}: {e}")))?;
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            debug!(error = %e, "failed to reap launcher process");
            None
        }
    }))
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("rundll32");
    cmd.args(["url.dll,FileProtocolHandler", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("explorer");
    cmd.arg(format!("/select,{}", path.display()));
    cmd
}

// xdg-open has no "select" mode; open the containing directory.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn reveal_command(path: &Path) -> Command {
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };
    let mut cmd = Command::new("xdg-open");
    cmd.arg(dir);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_web_and_mail_links() {
        assert!(is_external_url_allowed("https://example.com"));
        assert!(is_external_url_allowed("HTTP://example.com/path"));
        assert!(is_external_url_allowed("mailto:someone@example.com"));
    }

    #[test]
    fn refuses_other_schemes() {
        assert!(!is_external_url_allowed("file:///etc/passwd"));
        assert!(!is_external_url_allowed("javascript:alert(1)"));
        assert!(!is_external_url_allowed("smb://share"));
        assert!(!is_external_url_allowed("https://"));
        assert!(!is_external_url_allowed(""));
    }

    #[test]
    fn open_external_rejects_before_spawning() {
        let err = open_external("file:///tmp").unwrap_err();
        assert!(matches!(err, PlatformError::ShellError(_)));
    }

    #[cfg(unix)]
    #[test]
    fn launched_process_is_reaped() {
        let reaper = spawn(Command::new("true")).unwrap();
        let status = reaper.join().unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn reveal_missing_path_fails() {
        let err = show_item_in_folder(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
