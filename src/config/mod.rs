//! Configuration handling.
//!
//! The config file names the status file, the values settings are derived
//! from, the reload command and the files to patch.

mod loader;
mod path;
mod schema;

pub use loader::{
    ConfigFormat, LoadedConfig, load_config, load_config_from_str, load_or_default,
    render_config, save_config,
};
pub use path::{
    PathResolver, config_home, default_config_path, home_dir, resolve_path, state_home, xdg_base,
};
pub use schema::{
    AppConfig, ByTransparency, DeriveConfig, EditSpec, ReloadConfig, TargetConfig, VALUE_GROUP,
    default_targets,
};
