//! Request envelope posted by the platform to an extension.
//!
//! Only the fields an extension commonly reads are modelled; anything else
//! the platform sends is ignored on deserialization.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A full webhook request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CekRequest {
    #[serde(default)]
    pub version: Option<String>,
    pub session: Session,
    #[serde(default)]
    pub context: Context,
    pub request: RequestKind,
}

impl CekRequest {
    /// Name of the intent for an `IntentRequest`.
    pub fn intent_name(&self) -> Option<&str> {
        match &self.request {
            RequestKind::Intent { intent } => Some(intent.name.as_str()),
            _ => None,
        }
    }

    /// Value of a filled slot on an `IntentRequest`.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        match &self.request {
            RequestKind::Intent { intent } => intent
                .slots
                .as_ref()?
                .get(slot)
                .and_then(|s| s.value.as_deref()),
            _ => None,
        }
    }

    /// Wire name of the request type, for logging.
    pub fn request_type(&self) -> &'static str {
        match self.request {
            RequestKind::Launch => "LaunchRequest",
            RequestKind::Intent { .. } => "IntentRequest",
            RequestKind::SessionEnded => "SessionEndedRequest",
            RequestKind::Event { .. } => "EventRequest",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    /// The platform sends `null` on the first turn.
    #[serde(default)]
    pub session_attributes: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    /// Deserialize the incoming session attributes into a typed state struct.
    ///
    /// Returns `Ok(None)` when the platform sent no attributes.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.session_attributes {
            None => Ok(None),
            Some(map) => {
                let object = serde_json::Map::from_iter(map.clone());
                serde_json::from_value(serde_json::Value::Object(object)).map(Some)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "System", default)]
    pub system: Option<SystemContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemContext {
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    /// Screen capabilities, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<serde_json::Value>,
}

/// The `request` object, tagged by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestKind {
    #[serde(rename = "LaunchRequest")]
    Launch,
    #[serde(rename = "IntentRequest")]
    Intent { intent: Intent },
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded,
    #[serde(rename = "EventRequest")]
    Event {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
        #[serde(default)]
        timestamp: Option<String>,
        event: Event,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: Option<HashMap<String, Slot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}
