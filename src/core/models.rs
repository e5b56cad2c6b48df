//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the translated text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Text passed on the command line or typed in
    Argument,
    /// Active selection of the focused application
    Selection,
    /// Clipboard fallback
    Clipboard,
    /// Nothing to translate
    #[default]
    Empty,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Argument => write!(f, "argument"),
            InputSource::Selection => write!(f, "selection"),
            InputSource::Clipboard => write!(f, "clipboard"),
            InputSource::Empty => write!(f, "empty"),
        }
    }
}

/// Everything known about the text of one translation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequestContext {
    /// Text before truncation, kept for display
    pub raw_text: String,
    /// Text actually sent to the API
    pub effective_text: String,
    pub source: InputSource,
    pub truncated: bool,
    pub char_limit: usize,
}

impl TranslationRequestContext {
    /// Whether the request would translate anything
    pub fn is_empty(&self) -> bool {
        self.effective_text.trim().is_empty()
    }
}

/// Dictionary entry for single words
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicEntry {
    pub phonetic: Option<String>,
    #[serde(rename = "explains")]
    pub explanations: Vec<String>,
}

/// Web phrase translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebEntry {
    pub key: String,
    #[serde(rename = "value")]
    pub values: Vec<String>,
}

/// Link to the dictionary page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDict {
    pub url: Option<String>,
}

/// Parsed Youdao API response
///
/// Field names follow the wire format; anything missing takes its empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    #[serde(rename = "translation", default)]
    pub translation_lines: Vec<String>,
    #[serde(default)]
    pub basic: Option<BasicEntry>,
    #[serde(rename = "web", default)]
    pub web_entries: Vec<WebEntry>,
    #[serde(rename = "l", default)]
    pub language_pair: String,
    #[serde(rename = "webdict", default)]
    pub web_dict: Option<WebDict>,
    #[serde(rename = "speakUrl", default)]
    pub speak_url: Option<String>,
    #[serde(rename = "tSpeakUrl", default)]
    pub translated_speak_url: Option<String>,
    #[serde(rename = "isWord", default)]
    pub is_word: bool,
    #[serde(rename = "errorCode")]
    pub error_code: String,
}

impl TranslationResult {
    /// Success code of the API
    pub const SUCCESS_CODE: &'static str = "0";

    /// Whether the API reported success
    pub fn is_success(&self) -> bool {
        self.error_code == Self::SUCCESS_CODE
    }

    /// URL of the dictionary page, if the API returned one
    pub fn dictionary_url(&self) -> Option<&str> {
        self.web_dict.as_ref().and_then(|d| d.url.as_deref())
    }

    /// Phonetic transcription of a single word
    pub fn phonetic(&self) -> Option<&str> {
        self.basic.as_ref().and_then(|b| b.phonetic.as_deref())
    }

    /// Source language half of the language pair, e.g. `en` for `en2zh-CHS`
    pub fn source_language(&self) -> &str {
        self.language_pair.split('2').next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_language_from_pair() {
        let result = TranslationResult {
            language_pair: "en2zh-CHS".to_string(),
            ..Default::default()
        };
        assert_eq!(result.source_language(), "en");

        let empty = TranslationResult::default();
        assert_eq!(empty.source_language(), "");
    }

    #[test]
    fn test_context_whitespace_is_empty() {
        let context = TranslationRequestContext {
            effective_text: "  \n".to_string(),
            ..Default::default()
        };
        assert!(context.is_empty());
    }
}
