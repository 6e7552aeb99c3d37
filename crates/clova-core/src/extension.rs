//! Extension handler seam.
//!
//! A host binds one [`ClovaExtension`] implementation through an
//! [`ExtensionRegistration`]. Every request gets its own handler instance
//! and its own [`ResponseBuilder`], so nothing built for one request can
//! leak into another even when the registration is shared across threads.

use std::sync::Arc;

use clova_observe::cek_attrs::{SPAN_HANDLE_REQUEST, TARGET_EXTENSION};
use clova_types::config::ExtensionConfig;
use clova_types::error::ResponseError;
use clova_types::request::CekRequest;
use clova_types::response::ResponseDocument;

use crate::builder::ResponseBuilder;

/// Errors surfaced while handling a webhook request.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// The body was not a valid request envelope.
    #[error("invalid request body: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Raised by the handler implementation itself.
    #[error("handler error: {0}")]
    Handler(String),
}

/// The capability an extension implements: turn a request into a response.
pub trait ClovaExtension: Send + Sync {
    /// Populate `response` for `request`.
    ///
    /// `response` is fresh for each call and finalized by the caller after
    /// this returns `Ok`.
    fn respond(
        &self,
        request: &CekRequest,
        response: &mut ResponseBuilder,
    ) -> Result<(), ExtensionError>;
}

type ExtensionFactory = dyn Fn() -> Box<dyn ClovaExtension> + Send + Sync;

/// Binds the extension capability to one concrete handler type.
#[derive(Clone)]
pub struct ExtensionRegistration {
    config: ExtensionConfig,
    factory: Arc<ExtensionFactory>,
}

impl ExtensionRegistration {
    /// Register `E`, constructed with `Default` for every request.
    pub fn new<E>(config: ExtensionConfig) -> Self
    where
        E: ClovaExtension + Default + 'static,
    {
        Self::with_factory(config, E::default)
    }

    /// Register a handler built by `factory` for every request.
    pub fn with_factory<E, F>(config: ExtensionConfig, factory: F) -> Self
    where
        E: ClovaExtension + 'static,
        F: Fn() -> E + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Arc::new(move || Box::new(factory()) as Box<dyn ClovaExtension>),
        }
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Run one request through a fresh handler and builder.
    pub fn handle(&self, request: &CekRequest) -> Result<ResponseDocument, ExtensionError> {
        let span = tracing::info_span!(
            target: TARGET_EXTENSION,
            SPAN_HANDLE_REQUEST,
            cek.request_type = request.request_type(),
            cek.intent_name = request.intent_name().unwrap_or_default(),
            cek.session_id = %request.session.session_id
        );
        let _guard = span.enter();

        let handler = (self.factory)();
        let mut builder = ResponseBuilder::from_config(&self.config);

        if let Err(err) = handler.respond(request, &mut builder) {
            tracing::warn!(target: TARGET_EXTENSION, error = %err, "extension handler failed");
            return Err(err);
        }

        let document = builder.build();
        tracing::debug!(
            target: TARGET_EXTENSION,
            output_speech = %document.response.output_speech.shape(),
            should_end_session = document.response.should_end_session,
            session_keys = document.session_attributes.len(),
            "response built"
        );
        Ok(document)
    }

    /// Parse a raw request body, handle it, and serialize the response.
    pub fn handle_json(&self, body: &[u8]) -> Result<String, ExtensionError> {
        let request: CekRequest =
            serde_json::from_slice(body).map_err(ExtensionError::InvalidRequest)?;
        let document = self.handle(&request)?;
        serde_json::to_string(&document).map_err(|e| ExtensionError::Response(e.into()))
    }
}

impl std::fmt::Debug for ExtensionRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistration")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
