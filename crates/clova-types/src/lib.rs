//! Wire types for the Clova Extension Kit (CEK) webhook protocol.
//!
//! This crate mirrors the platform's JSON request/response schema:
//! request envelope, output speech, reprompt, session attributes and
//! directives, plus the error and configuration types shared by the
//! other crates.
//!
//! Zero behaviour beyond serde -- only serde, serde_json, thiserror.

pub mod config;
pub mod error;
pub mod language;
pub mod request;
pub mod response;
pub mod speech;
