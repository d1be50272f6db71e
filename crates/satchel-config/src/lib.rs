//! Configuration system for the Satchel session store.
//!
//! Provides TOML-based configuration with:
//! - A `[session]` table selecting the backend and its lifetimes
//! - Config file layering (XDG user config + project-local overrides)
//! - Conversion into [`satchel_session::StoreConfig`]

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
