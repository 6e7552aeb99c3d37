//! Response document returned to the platform.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::speech::OutputSpeech;

/// Protocol version tag sent when none is configured.
pub const DEFAULT_VERSION: &str = "1.0";

/// Top-level response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    #[serde(default = "default_version")]
    pub version: String,
    /// State round-tripped to the next turn of the conversation.
    #[serde(default)]
    pub session_attributes: HashMap<String, serde_json::Value>,
    pub response: ResponseBody,
}

impl ResponseDocument {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            session_attributes: HashMap::new(),
            response: ResponseBody::default(),
        }
    }
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// The `response` object of a [`ResponseDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default)]
    pub output_speech: OutputSpeech,
    /// Omitted from the wire while it holds no speech. An absent field parses
    /// back as an empty reprompt, matching a freshly built body, so a
    /// document equals its own round-trip.
    #[serde(default = "empty_reprompt", skip_serializing_if = "reprompt_is_empty")]
    pub reprompt: Option<Reprompt>,
    #[serde(default = "default_should_end_session")]
    pub should_end_session: bool,
    #[serde(default)]
    pub directives: Vec<Directive>,
    /// Opaque card payload; the builder always sends `{}`.
    #[serde(default = "empty_card")]
    pub card: serde_json::Value,
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self {
            output_speech: OutputSpeech::default(),
            reprompt: empty_reprompt(),
            should_end_session: default_should_end_session(),
            directives: Vec::new(),
            card: empty_card(),
        }
    }
}

fn default_should_end_session() -> bool {
    true
}

fn empty_card() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn empty_reprompt() -> Option<Reprompt> {
    Some(Reprompt::default())
}

fn reprompt_is_empty(reprompt: &Option<Reprompt>) -> bool {
    reprompt.as_ref().is_none_or(|r| r.output_speech.is_empty())
}

/// Speech played when the platform is waiting for the user's next input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// A platform directive (e.g. audio playback control).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub header: DirectiveHeader,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveHeader {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_request_id: Option<String>,
}
