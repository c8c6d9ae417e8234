use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeechLanguage {
    pub code: &'static str,
    pub label: &'static str,
}

pub const ENGLISH_US: SpeechLanguage = SpeechLanguage { code: "en-US", label: "English (US)" };

pub const SPEECH_LANGUAGES: &[SpeechLanguage] = &[
    ENGLISH_US,
    SpeechLanguage { code: "en-GB", label: "English (UK)" },
    SpeechLanguage { code: "hi-IN", label: "Hindi" },
    SpeechLanguage { code: "ta-IN", label: "Tamil" },
    SpeechLanguage { code: "te-IN", label: "Telugu" },
    SpeechLanguage { code: "kn-IN", label: "Kannada" },
    SpeechLanguage { code: "ml-IN", label: "Malayalam" },
];

impl SpeechLanguage {
    pub fn find(code: &str) -> Option<SpeechLanguage> {
        SPEECH_LANGUAGES
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code.trim()))
            .copied()
    }

    pub fn is_english(&self) -> bool {
        self.code.starts_with("en-")
    }
}
