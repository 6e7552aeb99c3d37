//! Observability for Clova extensions: subscriber setup plus the span and
//! field names the SDK records under.

pub mod cek_attrs;
pub mod tracing_setup;
