use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) const MOD_CTRL: u8 = 0b0001;
pub(crate) const MOD_ALT: u8 = 0b0010;
pub(crate) const MOD_SHIFT: u8 = 0b0100;
pub(crate) const MOD_SUPER: u8 = 0b1000;

/// A keyboard modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Ctrl key on all platforms.
    Ctrl,
    /// Alt key (Option on macOS).
    Alt,
    /// Shift key.
    Shift,
    /// Super key: Cmd on macOS, Win on Windows, Super on Linux.
    Super,
}

impl Modifier {
    pub(crate) fn bit(self) -> u8 {
        match self {
            Modifier::Ctrl => MOD_CTRL,
            Modifier::Alt => MOD_ALT,
            Modifier::Shift => MOD_SHIFT,
            Modifier::Super => MOD_SUPER,
        }
    }
}

/// A parsed global shortcut.
///
/// `CmdOrCtrl+K` and `CommandOrControl+k` parse to the same value, so two
/// spellings of one key combination compare equal and hash alike. The key
/// is stored as a W3C `KeyboardEvent.code` name (`KeyK`, `Digit1`, `F5`,
/// `ArrowUp`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accelerator {
    /// Bitmask: Ctrl=1, Alt=2, Shift=4, Super=8.
    pub(crate) mods: u8,
    pub(crate) code: String,
}

impl Accelerator {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.mods & modifier.bit() != 0
    }

    pub fn modifiers(&self) -> Vec<Modifier> {
        [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Super]
            .into_iter()
            .filter(|m| self.has(*m))
            .collect()
    }

    /// The key as a `KeyboardEvent.code` name.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The key as a user would type it (`K`, `1`, `F5`, `Up`).
    pub fn key_label(&self) -> &str {
        if let Some(letter) = self.code.strip_prefix("Key") {
            return letter;
        }
        if let Some(digit) = self.code.strip_prefix("Digit") {
            return digit;
        }
        if let Some(arrow) = self.code.strip_prefix("Arrow") {
            return arrow;
        }
        match self.code.as_str() {
            "Equal" => "=",
            "Minus" => "-",
            "Comma" => ",",
            "Period" => ".",
            "Slash" => "/",
            "Backslash" => "\\",
            "Semicolon" => ";",
            "Quote" => "'",
            "BracketLeft" => "[",
            "BracketRight" => "]",
            "Backquote" => "`",
            other => other,
        }
    }
}

/// Canonical text form, e.g. `Ctrl+Shift+KeyK`. Modifiers are always in
/// Ctrl, Alt, Shift, Super order.
impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in self.modifiers() {
            write!(f, "{m:?}+")?;
        }
        f.write_str(&self.code)
    }
}
