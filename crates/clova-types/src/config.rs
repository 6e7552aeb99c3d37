//! Extension configuration types.
//!
//! `ExtensionConfig` represents the `clova.toml` that sets the protocol
//! version tag and the default speech language for every response.

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::response::DEFAULT_VERSION;

/// Per-extension settings. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionConfig {
    /// Version tag written to every response document.
    #[serde(default = "default_version")]
    pub version: String,

    /// Language used for text utterances added without an explicit tag.
    #[serde(default)]
    pub default_language: Language,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_language: Language::default(),
        }
    }
}
