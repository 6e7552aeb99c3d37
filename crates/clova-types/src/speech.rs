//! Output speech types.
//!
//! An `OutputSpeech` is always in exactly one of three shapes, carried as an
//! explicit variant rather than inferred from which fields are populated:
//!
//! - `SimpleSpeech`: zero or one utterance
//! - `SpeechList`: an ordered sequence of utterances
//! - `SpeechSet`: a `brief` utterance plus a `verbose` body (simple or list)
//!
//! The promotion rules that move a speech between shapes live in
//! `clova-core`'s response builder; this module only defines the wire form.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::language::Language;

/// One unit of speech output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpeechInfo {
    /// Literal text read out in `lang`.
    PlainText { lang: Language, value: String },
    /// An audio file played from `value`. Carries no language tag.
    #[serde(rename = "URL")]
    Url { value: String },
}

impl SpeechInfo {
    pub fn text(value: impl Into<String>, lang: Language) -> Self {
        SpeechInfo::PlainText {
            lang,
            value: value.into(),
        }
    }

    pub fn url(value: impl Into<String>) -> Self {
        SpeechInfo::Url {
            value: value.into(),
        }
    }

    /// The text or URL of this utterance.
    pub fn value(&self) -> &str {
        match self {
            SpeechInfo::PlainText { value, .. } | SpeechInfo::Url { value } => value,
        }
    }

    /// Language tag, `None` for URL utterances.
    pub fn lang(&self) -> Option<Language> {
        match self {
            SpeechInfo::PlainText { lang, .. } => Some(*lang),
            SpeechInfo::Url { .. } => None,
        }
    }
}

/// Which of the three shapes an output speech currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechShape {
    Simple,
    List,
    Set,
}

impl fmt::Display for SpeechShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechShape::Simple => write!(f, "SimpleSpeech"),
            SpeechShape::List => write!(f, "SpeechList"),
            SpeechShape::Set => write!(f, "SpeechSet"),
        }
    }
}

/// The verbose half of a `SpeechSet`.
///
/// A separate type from [`OutputSpeech`] so that a set can never nest
/// another set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerboseSpeech {
    #[serde(rename = "SimpleSpeech")]
    Simple {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<SpeechInfo>,
    },
    #[serde(rename = "SpeechList")]
    List { values: Vec<SpeechInfo> },
}

impl VerboseSpeech {
    pub fn values(&self) -> &[SpeechInfo] {
        match self {
            VerboseSpeech::Simple { values } => values.as_slice(),
            VerboseSpeech::List { values } => values,
        }
    }

    pub fn shape(&self) -> SpeechShape {
        match self {
            VerboseSpeech::Simple { .. } => SpeechShape::Simple,
            VerboseSpeech::List { .. } => SpeechShape::List,
        }
    }
}

impl Default for VerboseSpeech {
    fn default() -> Self {
        VerboseSpeech::Simple { values: None }
    }
}

/// Speech the platform reads out for a response or reprompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SimpleSpeech")]
    Simple {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<SpeechInfo>,
    },
    #[serde(rename = "SpeechList")]
    List { values: Vec<SpeechInfo> },
    #[serde(rename = "SpeechSet")]
    Set {
        brief: SpeechInfo,
        verbose: VerboseSpeech,
    },
}

impl OutputSpeech {
    /// Directly held utterances. Empty for a `SpeechSet`, whose content lives
    /// in [`brief`](Self::brief) and [`verbose`](Self::verbose).
    pub fn values(&self) -> &[SpeechInfo] {
        match self {
            OutputSpeech::Simple { values } => values.as_slice(),
            OutputSpeech::List { values } => values,
            OutputSpeech::Set { .. } => &[],
        }
    }

    pub fn brief(&self) -> Option<&SpeechInfo> {
        match self {
            OutputSpeech::Set { brief, .. } => Some(brief),
            _ => None,
        }
    }

    pub fn verbose(&self) -> Option<&VerboseSpeech> {
        match self {
            OutputSpeech::Set { verbose, .. } => Some(verbose),
            _ => None,
        }
    }

    pub fn shape(&self) -> SpeechShape {
        match self {
            OutputSpeech::Simple { .. } => SpeechShape::Simple,
            OutputSpeech::List { .. } => SpeechShape::List,
            OutputSpeech::Set { .. } => SpeechShape::Set,
        }
    }

    /// True for a `SimpleSpeech` with no utterance.
    pub fn is_empty(&self) -> bool {
        matches!(self, OutputSpeech::Simple { values: None })
    }
}

impl Default for OutputSpeech {
    fn default() -> Self {
        OutputSpeech::Simple { values: None }
    }
}
