//! Response building and handler registration for Clova extensions.
//!
//! This crate holds the only logic in the SDK: the [`builder::ResponseBuilder`]
//! state machine that moves output speech between its simple, list and set
//! shapes, plus the [`extension`] seam that binds a handler implementation
//! and hands it a fresh builder per request. It performs no I/O apart from
//! reading the optional config file.

pub mod builder;
pub mod config;
pub mod extension;
