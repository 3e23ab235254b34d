//! Booth configuration.
//!
//! All options are startup constants: they are read once from a TOML or YAML
//! file (or taken from built-in defaults), adjusted by CLI flags, validated,
//! and then passed by reference to every component.

mod loader;
mod path;
mod schema;

pub use loader::{ConfigFormat, load_config, load_config_from_str, load_or_default, to_toml};
pub use path::{PathResolver, default_config_path, home_dir, resolve_path};
pub use schema::{
    BoothConfig, CameraBackend, CaptureConfig, MAX_SHOTS, PathsConfig, ReviewConfig, ReviewMode,
    StripConfig, TimingConfig, TriggerBackend, TriggerConfig,
};
