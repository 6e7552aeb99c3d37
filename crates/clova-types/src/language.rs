use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Languages the platform can speak a `PlainText` utterance in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    Ko,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ja => write!(f, "ja"),
            Language::Ko => write!(f, "ko"),
            Language::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" => Ok(Language::Ja),
            "ko" => Ok(Language::Ko),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}
