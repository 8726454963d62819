use capbridge_common::PlatformError;
#[cfg(any(target_os = "macos", target_os = "linux"))]
use tracing::info;

/// Sends a native notification to the user.
///
/// - macOS: `osascript`
/// - Linux: `notify-send`
///
/// Elsewhere, or when `notify-send` is not installed, this fails with
/// [`PlatformError::NotSupported`] so the caller's promise rejects.
pub fn notify(title: &str, body: &str) -> Result<(), PlatformError> {
    platform_notify(title, body)
}

#[cfg(target_os = "macos")]
fn platform_notify(title: &str, body: &str) -> Result<(), PlatformError> {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape_applescript(body),
        escape_applescript(title)
    );

    let output = std::process::Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .map_err(|e| PlatformError::NotificationError(format!("failed to run osascript: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PlatformError::NotificationError(format!(
            "osascript failed: {stderr}"
        )));
    }

    info!("native notification sent");
    Ok(())
}

#[cfg(target_os = "linux")]
fn platform_notify(title: &str, body: &str) -> Result<(), PlatformError> {
    match std::process::Command::new("notify-send")
        .arg("--")
        .arg(title)
        .arg(body)
        .output()
    {
        Ok(output) if output.status.success() => {
            info!("native notification sent");
            Ok(())
        }
        Ok(output) => Err(PlatformError::NotificationError(format!(
            "notify-send failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PlatformError::NotSupported(
            "notifications: notify-send is not installed".into(),
        )),
        Err(e) => Err(PlatformError::NotificationError(format!(
            "failed to run notify-send: {e}"
        ))),
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn platform_notify(_title: &str, _body: &str) -> Result<(), PlatformError> {
    Err(PlatformError::NotSupported(format!(
        "notifications on {}",
        std::env::consts::OS
    )))
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape_applescript(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
