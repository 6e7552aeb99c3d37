//! Fluent builder for a [`ResponseDocument`].
//!
//! Output speech moves through four states as calls accumulate:
//!
//! ```text
//! Simple(0) --append--> Simple(1) --append--> List --append--> List
//!     \                     |                   /
//!      +------ set_brief ---+------------------+--> Set
//! ```
//!
//! Entering `Set` is destructive: any utterances previously added to the main
//! output speech are dropped. Nothing leaves `Set`. The reprompt speech
//! follows the same append rule independently and never becomes a set.

use std::collections::HashMap;

use clova_observe::cek_attrs::TARGET_BUILDER;
use clova_types::config::ExtensionConfig;
use clova_types::error::ResponseError;
use clova_types::language::Language;
use clova_types::response::{Reprompt, ResponseDocument};
use clova_types::speech::{OutputSpeech, SpeechInfo, SpeechShape, VerboseSpeech};
use serde::Serialize;

/// Builds the response to a single request.
///
/// Mutators return `&mut Self` for chaining. The ones that can hit an
/// invalid shape return `Result<&mut Self, ResponseError>`.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    document: ResponseDocument,
    default_language: Language,
}

impl ResponseBuilder {
    /// Start an empty document: empty simple speech, empty reprompt,
    /// `shouldEndSession = true`, no session attributes, no directives.
    pub fn new(version: impl Into<String>, default_language: Language) -> Self {
        Self {
            document: ResponseDocument::new(version),
            default_language,
        }
    }

    pub fn from_config(config: &ExtensionConfig) -> Self {
        Self::new(config.version.clone(), config.default_language)
    }

    /// Language applied to text utterances added without an explicit tag.
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// The document as built so far.
    pub fn document(&self) -> &ResponseDocument {
        &self.document
    }

    pub fn build(self) -> ResponseDocument {
        self.document
    }

    /// Serialize the document in its current state to wire JSON.
    pub fn to_json(&self) -> Result<String, ResponseError> {
        Ok(serde_json::to_string(&self.document)?)
    }

    // -- main output speech ------------------------------------------------

    /// Append a text utterance; a second utterance turns the speech into a list.
    ///
    /// Fails with [`ResponseError::InvalidState`] once a brief has been set.
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        lang: impl Into<Option<Language>>,
    ) -> Result<&mut Self, ResponseError> {
        let info = self.plain_text(text, lang.into());
        append(&mut self.document.response.output_speech, info)?;
        Ok(self)
    }

    /// Append an audio URL utterance under the same rule as [`add_text`](Self::add_text).
    pub fn add_url(&mut self, url: impl Into<String>) -> Result<&mut Self, ResponseError> {
        append(
            &mut self.document.response.output_speech,
            SpeechInfo::url(url),
        )?;
        Ok(self)
    }

    // -- brief / verbose ---------------------------------------------------

    /// Switch the main output speech to a `SpeechSet` with this text as brief.
    ///
    /// Any utterances added with [`add_text`](Self::add_text) or
    /// [`add_url`](Self::add_url) are discarded, as is a verbose body from an
    /// earlier brief. Add the long form afterwards with
    /// [`add_verbose_text`](Self::add_verbose_text).
    pub fn set_brief_text(
        &mut self,
        text: impl Into<String>,
        lang: impl Into<Option<Language>>,
    ) -> &mut Self {
        let info = self.plain_text(text, lang.into());
        self.enter_set(info)
    }

    /// Like [`set_brief_text`](Self::set_brief_text) with an audio URL brief.
    pub fn set_brief_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.enter_set(SpeechInfo::url(url))
    }

    /// Append a text utterance to the verbose body of a `SpeechSet`.
    ///
    /// Fails with [`ResponseError::InvalidState`] unless a brief was set first.
    pub fn add_verbose_text(
        &mut self,
        text: impl Into<String>,
        lang: impl Into<Option<Language>>,
    ) -> Result<&mut Self, ResponseError> {
        let info = self.plain_text(text, lang.into());
        self.append_verbose(info)
    }

    pub fn add_verbose_url(&mut self, url: impl Into<String>) -> Result<&mut Self, ResponseError> {
        self.append_verbose(SpeechInfo::url(url))
    }

    // -- reprompt ----------------------------------------------------------

    /// Append a text utterance to the reprompt speech.
    ///
    /// Does not touch `shouldEndSession`; call
    /// [`keep_session_open`](Self::keep_session_open) for the reprompt to be heard.
    pub fn add_reprompt_text(
        &mut self,
        text: impl Into<String>,
        lang: impl Into<Option<Language>>,
    ) -> Result<&mut Self, ResponseError> {
        let info = self.plain_text(text, lang.into());
        append(self.reprompt_speech(), info)?;
        Ok(self)
    }

    pub fn add_reprompt_url(&mut self, url: impl Into<String>) -> Result<&mut Self, ResponseError> {
        append(self.reprompt_speech(), SpeechInfo::url(url))?;
        Ok(self)
    }

    // -- session -----------------------------------------------------------

    /// Insert or overwrite one session attribute.
    ///
    /// `value` goes through the same JSON encoding as the wire format, so
    /// structs, maps and options keep their shape.
    pub fn set_session(
        &mut self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<&mut Self, ResponseError> {
        let value = serde_json::to_value(value)?;
        self.document.session_attributes.insert(key.into(), value);
        Ok(self)
    }

    /// Replace all session attributes with the fields of `attributes`.
    ///
    /// `None` (or a value serializing to `null`) leaves the map empty. The
    /// value must otherwise serialize to a JSON object; nested values keep
    /// their shape. On error the existing attributes are left untouched.
    pub fn replace_session_attributes_from<T>(
        &mut self,
        attributes: Option<&T>,
    ) -> Result<&mut Self, ResponseError>
    where
        T: Serialize + ?Sized,
    {
        let fields = match attributes {
            None => HashMap::new(),
            Some(attributes) => match serde_json::to_value(attributes)? {
                serde_json::Value::Object(map) => map.into_iter().collect(),
                serde_json::Value::Null => HashMap::new(),
                other => {
                    return Err(ResponseError::SessionAttributesNotObject(
                        json_kind(&other).to_string(),
                    ));
                }
            },
        };

        self.document.session_attributes = fields;
        Ok(self)
    }

    /// Keep the session open for the user's next utterance.
    pub fn keep_session_open(&mut self) -> &mut Self {
        self.document.response.should_end_session = false;
        self
    }

    // -- internals ---------------------------------------------------------

    fn plain_text(&self, text: impl Into<String>, lang: Option<Language>) -> SpeechInfo {
        SpeechInfo::text(text, lang.unwrap_or(self.default_language))
    }

    fn reprompt_speech(&mut self) -> &mut OutputSpeech {
        &mut self
            .document
            .response
            .reprompt
            .get_or_insert_with(Reprompt::default)
            .output_speech
    }

    fn enter_set(&mut self, brief: SpeechInfo) -> &mut Self {
        let speech = &mut self.document.response.output_speech;
        if !speech.is_empty() {
            tracing::debug!(
                target: TARGET_BUILDER,
                from = %speech.shape(),
                discarded = speech.values().len(),
                "switching output speech to SpeechSet, prior speech dropped"
            );
        }
        *speech = OutputSpeech::Set {
            brief,
            verbose: VerboseSpeech::default(),
        };
        self
    }

    fn append_verbose(&mut self, info: SpeechInfo) -> Result<&mut Self, ResponseError> {
        let shape = self.document.response.output_speech.shape();
        let OutputSpeech::Set { verbose, .. } = &mut self.document.response.output_speech else {
            tracing::debug!(target: TARGET_BUILDER, %shape, "verbose utterance rejected");
            return Err(ResponseError::InvalidState(format!(
                "verbose speech requires a SpeechSet, output speech is {shape}; set a brief first"
            )));
        };
        append_to_verbose(verbose, info);
        Ok(self)
    }
}

/// Simple(0) -> Simple(1) -> List. A set only accepts brief/verbose calls.
fn append(speech: &mut OutputSpeech, info: SpeechInfo) -> Result<(), ResponseError> {
    *speech = match std::mem::take(speech) {
        OutputSpeech::Simple { values: None } => OutputSpeech::Simple { values: Some(info) },
        OutputSpeech::Simple {
            values: Some(first),
        } => OutputSpeech::List {
            values: vec![first, info],
        },
        OutputSpeech::List { mut values } => {
            values.push(info);
            OutputSpeech::List { values }
        }
        set @ OutputSpeech::Set { .. } => {
            *speech = set;
            return Err(ResponseError::InvalidState(format!(
                "cannot append to a {} directly; use the verbose mutators",
                SpeechShape::Set
            )));
        }
    };
    Ok(())
}

/// Same promotion rule for the verbose half of a set.
fn append_to_verbose(verbose: &mut VerboseSpeech, info: SpeechInfo) {
    *verbose = match std::mem::take(verbose) {
        VerboseSpeech::Simple { values: None } => VerboseSpeech::Simple { values: Some(info) },
        VerboseSpeech::Simple {
            values: Some(first),
        } => VerboseSpeech::List {
            values: vec![first, info],
        },
        VerboseSpeech::List { mut values } => {
            values.push(info);
            VerboseSpeech::List { values }
        }
    };
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> ResponseBuilder {
        ResponseBuilder::new("1.0", Language::Ja)
    }

    fn speech(b: &ResponseBuilder) -> &OutputSpeech {
        &b.document().response.output_speech
    }

    #[test]
    fn test_new_document_is_empty_single_turn() {
        let b = builder();
        let doc = b.document();
        assert_eq!(doc.version, "1.0");
        assert!(doc.response.output_speech.is_empty());
        assert!(doc.response.reprompt.as_ref().unwrap().output_speech.is_empty());
        assert!(doc.response.should_end_session);
        assert!(doc.session_attributes.is_empty());
        assert!(doc.response.directives.is_empty());
    }

    #[test]
    fn test_single_text_is_simple_speech() {
        let mut b = builder();
        b.add_text("こんにちは", None).unwrap();

        assert_eq!(speech(&b).shape(), SpeechShape::Simple);
        assert_eq!(speech(&b).values(), &[SpeechInfo::text("こんにちは", Language::Ja)]);
    }

    #[test]
    fn test_second_utterance_promotes_to_list_in_order() {
        let mut b = builder();
        b.add_text("one", Language::En)
            .unwrap()
            .add_url("https://example.com/two.mp3")
            .unwrap()
            .add_text("three", None)
            .unwrap();

        assert_eq!(speech(&b).shape(), SpeechShape::List);
        assert_eq!(
            speech(&b).values(),
            &[
                SpeechInfo::text("one", Language::En),
                SpeechInfo::url("https://example.com/two.mp3"),
                SpeechInfo::text("three", Language::Ja),
            ]
        );
    }

    #[test]
    fn test_text_without_lang_uses_builder_default() {
        let mut b = ResponseBuilder::new("1.0", Language::Ko);
        b.add_text("안녕하세요", None).unwrap();
        assert_eq!(speech(&b).values()[0].lang(), Some(Language::Ko));
    }

    #[test]
    fn test_from_config_carries_version_and_language() {
        let config = ExtensionConfig {
            version: "2.0".to_string(),
            default_language: Language::En,
        };
        let mut b = ResponseBuilder::from_config(&config);
        b.add_text("hello", None).unwrap();
        assert_eq!(b.document().version, "2.0");
        assert_eq!(b.default_language(), Language::En);
        assert_eq!(speech(&b).values()[0].lang(), Some(Language::En));
    }

    #[test]
    fn test_set_brief_discards_prior_utterances() {
        let mut b = builder();
        b.add_text("first", None).unwrap();
        b.add_text("second", None).unwrap();
        b.set_brief_text("x", None);

        assert_eq!(speech(&b).shape(), SpeechShape::Set);
        assert_eq!(speech(&b).brief(), Some(&SpeechInfo::text("x", Language::Ja)));
        assert!(speech(&b).verbose().unwrap().values().is_empty());

        let wire = b.to_json().unwrap();
        assert!(!wire.contains("first"));
        assert!(!wire.contains("second"));
    }

    #[test]
    fn test_verbose_accumulates_with_promotion() {
        let mut b = builder();
        b.set_brief_url("https://example.com/brief.mp3")
            .add_verbose_text("晴れ", None)
            .unwrap();
        assert_eq!(speech(&b).verbose().unwrap().shape(), SpeechShape::Simple);

        b.add_verbose_url("https://example.com/detail.mp3").unwrap();
        let verbose = speech(&b).verbose().unwrap();
        assert_eq!(verbose.shape(), SpeechShape::List);
        assert_eq!(
            verbose.values(),
            &[
                SpeechInfo::text("晴れ", Language::Ja),
                SpeechInfo::url("https://example.com/detail.mp3"),
            ]
        );
    }

    #[test]
    fn test_second_brief_resets_verbose() {
        let mut b = builder();
        b.set_brief_text("a", None).add_verbose_text("long a", None).unwrap();
        b.set_brief_text("b", None);

        assert_eq!(speech(&b).brief().unwrap().value(), "b");
        assert!(speech(&b).verbose().unwrap().values().is_empty());
    }

    #[test]
    fn test_verbose_without_brief_is_invalid_state() {
        let mut b = builder();
        b.add_text("plain", None).unwrap();

        let err = b.add_verbose_text("detail", None).unwrap_err();
        assert!(matches!(err, ResponseError::InvalidState(_)));
        let err = b.add_verbose_url("https://example.com/a.mp3").unwrap_err();
        assert!(matches!(err, ResponseError::InvalidState(_)));

        // The failed calls leave the speech untouched.
        assert_eq!(speech(&b).values(), &[SpeechInfo::text("plain", Language::Ja)]);
    }

    #[test]
    fn test_direct_append_to_set_is_invalid_state() {
        let mut b = builder();
        b.set_brief_text("brief", None);

        let err = b.add_text("more", None).unwrap_err();
        assert!(matches!(err, ResponseError::InvalidState(_)));
        assert_eq!(speech(&b).shape(), SpeechShape::Set);
        assert_eq!(speech(&b).brief().unwrap().value(), "brief");
    }

    #[test]
    fn test_reprompt_is_independent_of_main_speech() {
        let mut b = builder();
        b.add_text("main", None).unwrap();
        b.add_reprompt_text("again?", None)
            .unwrap()
            .add_reprompt_url("https://example.com/ping.mp3")
            .unwrap();

        let doc = b.document();
        assert_eq!(doc.response.output_speech.shape(), SpeechShape::Simple);
        let reprompt = &doc.response.reprompt.as_ref().unwrap().output_speech;
        assert_eq!(reprompt.shape(), SpeechShape::List);
        assert_eq!(reprompt.values().len(), 2);
        // Reprompt does not imply a multi-turn flag.
        assert!(doc.response.should_end_session);
    }

    #[test]
    fn test_set_brief_does_not_touch_reprompt() {
        let mut b = builder();
        b.add_reprompt_text("still there?", None).unwrap();
        b.set_brief_text("brief", None);

        let reprompt = &b.document().response.reprompt.as_ref().unwrap().output_speech;
        assert_eq!(reprompt.values()[0].value(), "still there?");
    }

    #[test]
    fn test_set_session_overwrites_key() {
        let mut b = builder();
        b.set_session("a", 1).unwrap().set_session("a", 2).unwrap();

        let attrs = &b.document().session_attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["a"], json!(2));
    }

    #[test]
    fn test_set_session_keeps_nested_struct_shape() {
        #[derive(Serialize)]
        struct Cart {
            items: Vec<String>,
            coupon: Option<String>,
        }

        let mut b = builder();
        b.set_session(
            "cart",
            &Cart {
                items: vec!["margherita".to_string()],
                coupon: None,
            },
        )
        .unwrap()
        .set_session("cart", &Cart {
            items: vec!["margherita".to_string(), "pepperoni".to_string()],
            coupon: Some("HALF".to_string()),
        })
        .unwrap();

        let attrs = &b.document().session_attributes;
        assert_eq!(attrs.len(), 1);
        assert_eq!(
            attrs["cart"],
            json!({"items": ["margherita", "pepperoni"], "coupon": "HALF"})
        );
    }

    #[test]
    fn test_set_session_propagates_serializer_error() {
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "v");

        let mut b = builder();
        b.set_session("keep", 1).unwrap();
        let err = b.set_session("bad", &bad).unwrap_err();
        assert!(matches!(err, ResponseError::Serialization(_)));
        assert_eq!(b.document().session_attributes.len(), 1);
        assert!(!b.document().session_attributes.contains_key("bad"));
    }

    #[test]
    fn test_replace_session_attributes_clears_first() {
        #[derive(Serialize)]
        struct State {
            x: u32,
            y: String,
        }

        let mut b = builder();
        b.set_session("old", true).unwrap();
        b.replace_session_attributes_from(Some(&State {
            x: 1,
            y: "s".to_string(),
        }))
        .unwrap();

        let attrs = &b.document().session_attributes;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["x"], json!(1));
        assert_eq!(attrs["y"], json!("s"));
        assert!(!attrs.contains_key("old"));
    }

    #[test]
    fn test_replace_session_attributes_keeps_nested_shape() {
        let mut b = builder();
        b.replace_session_attributes_from(Some(&json!({
            "cart": {"items": ["margherita", "pepperoni"], "total": 24.5}
        })))
        .unwrap();

        assert_eq!(
            b.document().session_attributes["cart"],
            json!({"items": ["margherita", "pepperoni"], "total": 24.5})
        );
    }

    #[test]
    fn test_replace_session_attributes_with_none_clears() {
        let mut b = builder();
        b.set_session("old", true).unwrap();
        b.replace_session_attributes_from::<serde_json::Value>(None)
            .unwrap();
        assert!(b.document().session_attributes.is_empty());

        b.set_session("old", true).unwrap();
        b.replace_session_attributes_from(Some(&serde_json::Value::Null))
            .unwrap();
        assert!(b.document().session_attributes.is_empty());
    }

    #[test]
    fn test_replace_session_attributes_rejects_non_object() {
        let mut b = builder();
        b.set_session("keep", "me").unwrap();

        let err = b
            .replace_session_attributes_from(Some(&vec![1, 2, 3]))
            .unwrap_err();
        assert!(matches!(
            err,
            ResponseError::SessionAttributesNotObject(ref kind) if kind == "array"
        ));
        assert_eq!(b.document().session_attributes["keep"], json!("me"));
    }

    #[test]
    fn test_replace_session_attributes_propagates_serializer_error() {
        // Maps with non-string keys cannot become JSON objects.
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "v");

        let mut b = builder();
        let err = b.replace_session_attributes_from(Some(&bad)).unwrap_err();
        assert!(matches!(err, ResponseError::Serialization(_)));
    }

    #[test]
    fn test_should_end_session_only_changed_by_keep_open() {
        let mut b = builder();
        b.add_text("a", None).unwrap();
        b.add_reprompt_text("b", None).unwrap();
        b.set_session("k", 1).unwrap();
        b.set_brief_text("c", None).add_verbose_text("d", None).unwrap();
        assert!(b.document().response.should_end_session);

        b.keep_session_open();
        assert!(!b.document().response.should_end_session);
    }

    #[test]
    fn test_wire_json_roundtrip() {
        let mut b = builder();
        b.add_text("one", None)
            .unwrap()
            .add_text("two", Language::En)
            .unwrap()
            .add_reprompt_text("hello?", None)
            .unwrap();
        b.keep_session_open().set_session("turn", 1).unwrap();

        let wire = b.to_json().unwrap();
        let parsed: ResponseDocument = serde_json::from_str(&wire).unwrap();
        assert_eq!(&parsed, b.document());

        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["response"]["outputSpeech"]["type"], "SpeechList");
        assert_eq!(value["response"]["outputSpeech"]["values"][1]["lang"], "en");
        assert_eq!(
            value["response"]["reprompt"]["outputSpeech"]["type"],
            "SimpleSpeech"
        );
        assert_eq!(value["response"]["shouldEndSession"], false);
        assert_eq!(value["sessionAttributes"]["turn"], 1);
        assert_eq!(value["response"]["card"], json!({}));
    }

    #[test]
    fn test_roundtrip_without_reprompt_equals_original() {
        let mut b = builder();
        b.add_text("one", None).unwrap().add_text("two", None).unwrap();
        let wire = b.to_json().unwrap();
        assert!(!wire.contains("reprompt"));

        let parsed: ResponseDocument = serde_json::from_str(&wire).unwrap();
        assert_eq!(&parsed, b.document());
        assert_eq!(
            parsed.response.reprompt.unwrap().output_speech,
            OutputSpeech::default()
        );
    }
}
