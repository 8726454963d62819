//! Global shortcut accelerator strings (`CommandOrControl+K`).
//!
//! `CommandOrControl+Shift+K` and friends are parsed into an [`Accelerator`]
//! whose canonical form is shared by every hotkey backend. Two spellings of
//! the same key combination always produce equal accelerators.

mod parse;
mod types;

pub use parse::{parse, parse_for, to_display};
pub use types::{Accelerator, Modifier};
