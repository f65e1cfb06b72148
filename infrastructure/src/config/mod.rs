//! Configuration file loading for medpanel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `MEDPANEL_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./medpanel.toml` or `./.medpanel.toml`
//! 4. Global: `$XDG_CONFIG_HOME/medpanel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEvidenceConfig, FileInferenceConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FilePanelConfig, FileTimeoutsConfig,
};
pub use loader::ConfigLoader;
