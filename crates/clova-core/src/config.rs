//! Extension configuration loader.
//!
//! Reads `clova.toml` and deserializes it into [`ExtensionConfig`]. The
//! lenient loader falls back to defaults when the file is missing or
//! malformed; the strict one reports why.

use std::path::Path;

use clova_observe::cek_attrs::TARGET_CONFIG;
use clova_types::config::ExtensionConfig;
use clova_types::error::ConfigError;
use clova_types::language::Language;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "clova.toml";

/// Environment variable overriding `default_language`.
pub const LANGUAGE_ENV_VAR: &str = "CLOVA_DEFAULT_LANGUAGE";

/// Read and parse a config file, failing on any I/O or parse error.
pub fn try_load_extension_config(path: &Path) -> Result<ExtensionConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load configuration from `path`, then apply `CLOVA_DEFAULT_LANGUAGE`.
///
/// - Missing file: defaults (version `1.0`, language `ja`).
/// - Unreadable or unparseable file: logs a warning and uses defaults.
pub fn load_extension_config(path: &Path) -> ExtensionConfig {
    let mut config = match try_load_extension_config(path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                target: TARGET_CONFIG,
                "No {} found at {}, using defaults",
                CONFIG_FILE_NAME,
                path.display()
            );
            ExtensionConfig::default()
        }
        Err(err) => {
            tracing::warn!(target: TARGET_CONFIG, "{err} ({}), using defaults", path.display());
            ExtensionConfig::default()
        }
    };

    apply_language_override(&mut config, std::env::var(LANGUAGE_ENV_VAR).ok().as_deref());
    config
}

fn apply_language_override(config: &mut ExtensionConfig, raw: Option<&str>) {
    let Some(raw) = raw else {
        return;
    };
    match raw.parse::<Language>() {
        Ok(language) => config.default_language = language,
        Err(err) => {
            tracing::warn!(target: TARGET_CONFIG, "Ignoring {LANGUAGE_ENV_VAR}: {err}");
        }
    }
}
