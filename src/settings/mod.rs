//! Settings module
//!
//! Process-wide configuration, loaded once at start-up from an optional TOML
//! file and read per request.

pub mod settings_struct;

pub use settings_struct::{init_settings, replace_settings, Settings, SettingsError};
