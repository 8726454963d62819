use capbridge_common::{Platform, PlatformError};

use super::types::{Accelerator, Modifier};

/// Parse an accelerator for the platform this binary runs on.
pub fn parse(s: &str) -> Result<Accelerator, PlatformError> {
    parse_for(s, Platform::current())
}

/// Parse an accelerator string like `"CommandOrControl+K"`,
/// `"Ctrl+Shift+T"` or `"Alt+F4"` for `platform`.
///
/// Modifier aliases:
/// - `CommandOrControl` / `CmdOrCtrl` -> `Super` on macOS, `Ctrl` elsewhere
/// - `Command` / `Cmd` -> `Super` on macOS, `Ctrl` elsewhere
/// - `Control` / `Ctrl` -> `Ctrl`
/// - `Alt` / `Option` -> `Alt`
/// - `Super` / `Meta` / `Win` -> `Super`
///
/// The last token is the key and every token before it must be a modifier.
/// Tokens are matched case-insensitively.
pub fn parse_for(s: &str, platform: Platform) -> Result<Accelerator, PlatformError> {
    let tokens: Vec<&str> = s.split('+').map(str::trim).collect();

    let Some((key_token, modifier_tokens)) = tokens.split_last() else {
        return Err(invalid(s, "empty accelerator"));
    };
    if key_token.is_empty() {
        return Err(invalid(s, "accelerator has no key"));
    }

    let mut mods = 0u8;
    for token in modifier_tokens {
        let Some(modifier) = normalize_modifier(token, platform) else {
            return Err(invalid(s, &format!("unrecognized modifier: {token}")));
        };
        mods |= modifier.bit();
    }

    if normalize_modifier(key_token, platform).is_some() {
        return Err(invalid(s, "accelerator has only modifiers"));
    }
    let code = key_code(key_token).ok_or_else(|| invalid(s, &format!("unknown key: {key_token}")))?;

    Ok(Accelerator { mods, code })
}

/// Render an accelerator the way a user would type it on `platform`
/// (`Cmd+Shift+K` on macOS, `Ctrl+Shift+K` elsewhere).
pub fn to_display(accel: &Accelerator, platform: Platform) -> String {
    let mut parts: Vec<&str> = accel
        .modifiers()
        .into_iter()
        .map(|m| match (m, platform) {
            (Modifier::Ctrl, _) => "Ctrl",
            (Modifier::Alt, Platform::Mac) => "Option",
            (Modifier::Alt, _) => "Alt",
            (Modifier::Shift, _) => "Shift",
            (Modifier::Super, Platform::Mac) => "Cmd",
            (Modifier::Super, Platform::Windows) => "Win",
            (Modifier::Super, Platform::Linux) => "Super",
        })
        .collect();
    parts.push(accel.key_label());
    parts.join("+")
}

fn invalid(s: &str, reason: &str) -> PlatformError {
    PlatformError::InvalidAccelerator(format!("{s:?}: {reason}"))
}

fn normalize_modifier(token: &str, platform: Platform) -> Option<Modifier> {
    let primary = if platform == Platform::Mac {
        Modifier::Super
    } else {
        Modifier::Ctrl
    };
    match token.to_ascii_lowercase().as_str() {
        "commandorcontrol" | "cmdorctrl" => Some(primary),
        "command" | "cmd" => Some(primary),
        "control" | "ctrl" => Some(Modifier::Ctrl),
        "alt" | "option" | "altgr" => Some(Modifier::Alt),
        "shift" => Some(Modifier::Shift),
        "super" | "meta" | "win" => Some(Modifier::Super),
        _ => None,
    }
}

/// Map a key token to its `KeyboardEvent.code` name.
fn key_code(token: &str) -> Option<String> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(format!("Key{}", c.to_ascii_uppercase()));
        }
        if c.is_ascii_digit() {
            return Some(format!("Digit{c}"));
        }
        let punct = match c {
            '=' => "Equal",
            '-' => "Minus",
            ',' => "Comma",
            '.' => "Period",
            '/' => "Slash",
            '\\' => "Backslash",
            ';' => "Semicolon",
            '\'' => "Quote",
            '[' => "BracketLeft",
            ']' => "BracketRight",
            '`' => "Backquote",
            _ => return None,
        };
        return Some(punct.into());
    }

    let lower = token.to_ascii_lowercase();
    if let Some(n) = lower.strip_prefix('f') {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=24).contains(&n).then(|| format!("F{n}"));
        }
    }

    let code = match lower.as_str() {
        "plus" => "Equal",
        "space" => "Space",
        "tab" => "Tab",
        "enter" | "return" => "Enter",
        "escape" | "esc" => "Escape",
        "backspace" => "Backspace",
        "delete" | "del" => "Delete",
        "insert" => "Insert",
        "home" => "Home",
        "end" => "End",
        "pageup" => "PageUp",
        "pagedown" => "PageDown",
        "up" => "ArrowUp",
        "down" => "ArrowDown",
        "left" => "ArrowLeft",
        "right" => "ArrowRight",
        "printscreen" => "PrintScreen",
        _ => return None,
    };
    Some(code.into())
}
