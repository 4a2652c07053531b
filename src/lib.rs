//! themesync library - propagates the desktop color mode into app configs.
//!
//! This library exposes the core functionality of the `themesync` CLI for use
//! in tests and other tools.
//!
//! # Modules
//!
//! - `status`: Status file parsing
//! - `settings`: Derived settings and template rendering
//! - `patch`: Regex and line edits applied to target files
//! - `apply`: The apply run tying status, targets and reload together
//! - `reload`: Background style reload of the desktop shell
//! - `config`: Configuration file handling
//! - `output`: Output mode abstraction (robot/human)
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod apply;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod patch;
pub mod reload;
pub mod settings;
pub mod status;
