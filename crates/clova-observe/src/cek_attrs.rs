//! Span and field names used when instrumenting request handling.
//!
//! All constants are string slices usable as `tracing` span names and as the
//! `target` of events, so log filters can match them (`RUST_LOG=clova=debug`).
//!
//! Span fields follow the `cek.*` prefix: `cek.request_type`,
//! `cek.intent_name`, `cek.session_id`.

// --- Targets ---

/// Target for response-builder state transitions.
pub const TARGET_BUILDER: &str = "clova::builder";

/// Target for per-request handling events.
pub const TARGET_EXTENSION: &str = "clova::extension";

/// Target for configuration loading.
pub const TARGET_CONFIG: &str = "clova::config";

// --- Span names ---

/// Span wrapping a single webhook request, from parse to serialized response.
pub const SPAN_HANDLE_REQUEST: &str = "clova.handle_request";
