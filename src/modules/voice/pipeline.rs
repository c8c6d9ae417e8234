//! Voice input for a report description.
//!
//! Starting to listen snapshots the current description as the base. Each
//! finalized speech segment replaces everything after that base, after
//! translation to English when the speaker's language is not English. A failed
//! translation falls back to the untranslated segment, so captured speech is
//! never dropped.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::language::{SpeechLanguage, ENGLISH_US};
use crate::flows::translate::{translate_text, TranslateRequest};
use crate::flows::ModelBackend;

pub const TARGET_LANGUAGE: &str = "English";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceState {
    Idle,
    Listening,
    Translating,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Voice input is already active")]
    AlreadyListening,
    #[error("Voice input is not listening")]
    NotListening,
    #[error("Unsupported speech language: {0}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOutcome {
    pub description: String,
    pub translated: bool,
    pub translation_failed: bool,
}

#[derive(Debug, Clone)]
pub struct VoicePipeline {
    state: VoiceState,
    language: SpeechLanguage,
    base: String,
    description: String,
    last_error: Option<String>,
}

impl Default for VoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl VoicePipeline {
    pub fn new() -> Self {
        Self {
            state: VoiceState::Idle,
            language: ENGLISH_US,
            base: String::new(),
            description: String::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn language(&self) -> SpeechLanguage {
        self.language
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn start_listening(&mut self, description: &str, language_code: &str) -> Result<(), PipelineError> {
        if self.state != VoiceState::Idle {
            return Err(PipelineError::AlreadyListening);
        }

        let language = SpeechLanguage::find(language_code)
            .ok_or_else(|| PipelineError::UnsupportedLanguage(language_code.to_string()))?;

        self.language = language;
        self.base = description.to_string();
        self.description = description.to_string();
        self.last_error = None;
        self.state = VoiceState::Listening;
        debug!(language = language.code, "voice input listening");

        Ok(())
    }

    /// Sets the description to the base plus one finalized segment. Callers
    /// must not run two of these concurrently for the same pipeline.
    pub async fn on_segment(
        &mut self,
        backend: &dyn ModelBackend,
        segment: &str,
    ) -> Result<SegmentOutcome, PipelineError> {
        if self.state != VoiceState::Listening {
            return Err(PipelineError::NotListening);
        }

        if segment.trim().is_empty() {
            return Ok(SegmentOutcome {
                description: self.description.clone(),
                translated: false,
                translation_failed: false,
            });
        }

        if self.language.is_english() {
            self.description = format!("{}{}", self.base, segment);
            return Ok(SegmentOutcome {
                description: self.description.clone(),
                translated: false,
                translation_failed: false,
            });
        }

        self.state = VoiceState::Translating;
        let request = TranslateRequest {
            text: segment.to_string(),
            source_language: self.language.label.to_string(),
            target_language: TARGET_LANGUAGE.to_string(),
        };
        let result = translate_text(backend, &request).await;
        self.state = VoiceState::Listening;

        let (text, translated, translation_failed) = match result {
            Ok(result) => (result.translated_text, true, false),
            Err(e) => {
                warn!(language = self.language.code, error = %e, "translation failed, keeping original speech");
                (segment.to_string(), false, true)
            }
        };
        self.description = format!("{}{}", self.base, text);

        Ok(SegmentOutcome {
            description: self.description.clone(),
            translated,
            translation_failed,
        })
    }

    /// A recognizer error ends the session. There is no automatic restart.
    pub fn on_error(&mut self, message: &str) {
        warn!(error = message, "speech recognition error");
        self.last_error = Some(message.to_string());
        self.state = VoiceState::Idle;
    }

    pub fn stop(&mut self) -> String {
        self.state = VoiceState::Idle;
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::stub::StubBackend;
    use crate::flows::FlowError;

    const HINDI_SEGMENT: &str = "मुझे कॉल आया";

    fn listening(description: &str, language: &str) -> VoicePipeline {
        let mut pipeline = VoicePipeline::new();
        pipeline.start_listening(description, language).unwrap();
        pipeline
    }

    #[tokio::test]
    async fn translated_segment_is_appended_to_snapshot() {
        let backend = StubBackend::replying(r#"{"translatedText": "I received a call"}"#);
        let mut pipeline = listening("Report: ", "hi-IN");

        let outcome = pipeline.on_segment(&backend, HINDI_SEGMENT).await.unwrap();

        assert_eq!(outcome.description, "Report: I received a call");
        assert!(outcome.translated);
        assert!(!outcome.translation_failed);
        assert_eq!(pipeline.state(), VoiceState::Listening);

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].user.contains("from Hindi to English"));
    }

    #[tokio::test]
    async fn failed_translation_keeps_the_original_speech() {
        let backend = StubBackend::failing(FlowError::Remote("timeout".to_string()));
        let mut pipeline = listening("Report: ", "hi-IN");

        let outcome = pipeline.on_segment(&backend, HINDI_SEGMENT).await.unwrap();

        assert_eq!(outcome.description, format!("Report: {}", HINDI_SEGMENT));
        assert!(outcome.translation_failed);
        assert_eq!(pipeline.state(), VoiceState::Listening);
    }

    #[tokio::test]
    async fn schema_invalid_translation_also_falls_back() {
        let backend = StubBackend::replying(r#"{"translatedText": ""}"#);
        let mut pipeline = listening("", "ta-IN");

        let outcome = pipeline.on_segment(&backend, "வணக்கம்").await.unwrap();
        assert_eq!(outcome.description, "வணக்கம்");
        assert!(outcome.translation_failed);
    }

    #[tokio::test]
    async fn english_segments_skip_the_model() {
        let backend = StubBackend::new(vec![]);
        let mut pipeline = listening("Report: ", "en-GB");

        let outcome = pipeline.on_segment(&backend, "I got a call from a fake bank").await.unwrap();

        assert_eq!(outcome.description, "Report: I got a call from a fake bank");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn each_segment_replaces_the_previous_one_after_the_base() {
        let backend = StubBackend::new(vec![
            Ok(r#"{"translatedText": "I received a call"}"#.to_string()),
            Ok(r#"{"translatedText": "from a bank"}"#.to_string()),
        ]);
        let mut pipeline = listening("Report: ", "hi-IN");

        let first = pipeline.on_segment(&backend, HINDI_SEGMENT).await.unwrap();
        assert_eq!(first.description, "Report: I received a call");

        let second = pipeline.on_segment(&backend, "बैंक से").await.unwrap();
        assert_eq!(second.description, "Report: from a bank");
        assert_eq!(pipeline.base(), "Report: ");
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn restarting_snapshots_a_new_base() {
        let backend = StubBackend::new(vec![]);
        let mut pipeline = listening("Report: ", "en-US");
        pipeline.on_segment(&backend, "first take").await.unwrap();

        let kept = pipeline.stop();
        pipeline.start_listening(&kept, "en-US").unwrap();
        let outcome = pipeline.on_segment(&backend, ", second take").await.unwrap();

        assert_eq!(outcome.description, "Report: first take, second take");
    }

    #[tokio::test]
    async fn segments_are_ignored_unless_listening() {
        let backend = StubBackend::new(vec![]);
        let mut pipeline = VoicePipeline::new();

        let err = pipeline.on_segment(&backend, "hello").await.unwrap_err();
        assert_eq!(err, PipelineError::NotListening);

        pipeline.start_listening("", "en-US").unwrap();
        pipeline.on_error("network");
        assert_eq!(pipeline.state(), VoiceState::Idle);
        assert_eq!(pipeline.last_error(), Some("network"));

        let err = pipeline.on_segment(&backend, "hello").await.unwrap_err();
        assert_eq!(err, PipelineError::NotListening);
    }

    #[test]
    fn start_validates_language_and_state() {
        let mut pipeline = VoicePipeline::new();
        assert_eq!(
            pipeline.start_listening("", "xx-XX"),
            Err(PipelineError::UnsupportedLanguage("xx-XX".to_string()))
        );

        pipeline.start_listening("base", "kn-IN").unwrap();
        assert_eq!(pipeline.start_listening("base", "kn-IN"), Err(PipelineError::AlreadyListening));

        assert_eq!(pipeline.stop(), "base");
        assert_eq!(pipeline.state(), VoiceState::Idle);
        assert!(pipeline.start_listening("again", "en-US").is_ok());
    }
}
