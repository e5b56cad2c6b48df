//! Plain result structure handed to renderers

use reqwest::Url;
use serde::Serialize;

use crate::core::config::DEFAULT_CHAR_LIMIT;
use crate::core::localize::{locale_for_pair, localize};
use crate::core::models::{InputSource, TranslationResult};
use crate::core::session::DisplayState;

/// Modern Youdao result page
const MODERN_WEB_URL: &str = "https://www.youdao.com/result";

/// Characters of the original text shown in item metadata
const ORIGINAL_PREVIEW_CHARS: usize = 100;

/// Label shown next to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataLabel {
    pub title: String,
    pub text: String,
}

/// Pronunciation action with its localized label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakAction {
    pub label: String,
    pub url: String,
}

impl SpeakAction {
    fn new(key: &str, locale: &str, url: Option<&str>) -> Option<Self> {
        url.filter(|u| !u.is_empty()).map(|url| Self {
            label: localize(key, locale, &[]),
            url: url.to_string(),
        })
    }
}

/// What an item lets the user do
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemActions {
    pub copy_content: String,
    pub web_url: Option<String>,
    pub read_original: Option<SpeakAction>,
    pub read_translated: Option<SpeakAction>,
}

/// One row of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub title: String,
    pub subtitle: Option<String>,
    /// Markdown shown in the detail pane
    pub detail: Option<String>,
    pub metadata: Vec<MetadataLabel>,
    pub actions: ItemActions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    pub title: String,
    pub message: String,
}

/// Everything a renderer needs to show one display state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub search_text: String,
    pub source: InputSource,
    pub is_loading: bool,
    pub placeholder: String,
    pub sections: Vec<Section>,
    pub notification: Option<NotificationView>,
}

impl ResultView {
    /// Build the view of `state`; `modern_web` links to the new result page
    pub fn build(state: &DisplayState, modern_web: bool) -> Self {
        let sections = match &state.result {
            Some(result) => build_sections(state, result, modern_web),
            None => Vec::new(),
        };

        Self {
            search_text: state.search_text.clone(),
            source: state.source,
            is_loading: state.is_loading,
            placeholder: placeholder(state),
            sections,
            notification: state.notification.as_ref().map(|n| NotificationView {
                title: n.title().to_string(),
                message: n.message(),
            }),
        }
    }

    /// Whether there is anything to list
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }
}

fn placeholder(state: &DisplayState) -> String {
    let origin = match state.source {
        InputSource::Clipboard => "Clipboard",
        InputSource::Selection => "Selection",
        _ => return "input content wants to translate...".to_string(),
    };

    if state.search_text.is_empty() {
        format!("default search from {}", origin)
    } else {
        format!("default search from {} : {}", origin, state.search_text)
    }
}

fn build_sections(state: &DisplayState, result: &TranslationResult, modern_web: bool) -> Vec<Section> {
    let locale = locale_for_pair(&result.language_pair);
    let limit = if state.char_limit == 0 {
        DEFAULT_CHAR_LIMIT
    } else {
        state.char_limit
    };
    let limit_param = [("limit", limit.to_string())];
    let mut sections = Vec::new();

    if !result.translation_lines.is_empty() {
        let heading = localize("translationResult", locale, &[]);
        let last = result.translation_lines.len() - 1;

        let items = result
            .translation_lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let display_text = if state.is_truncated && index == last {
                    format!("{}...{}", line, localize("truncatedMessage", locale, &limit_param))
                } else {
                    line.clone()
                };

                let mut metadata = vec![MetadataLabel {
                    title: localize("originalText", locale, &[]),
                    text: shorten(&state.search_text, ORIGINAL_PREVIEW_CHARS),
                }];
                if let Some(phonetic) = result.phonetic() {
                    metadata.push(MetadataLabel {
                        title: localize("phonetic", locale, &[]),
                        text: phonetic.to_string(),
                    });
                }
                if state.is_truncated {
                    metadata.push(MetadataLabel {
                        title: localize("hint", locale, &[]),
                        text: localize("truncatedMetadata", locale, &limit_param),
                    });
                }

                ListItem {
                    title: if index == 0 {
                        heading.clone()
                    } else {
                        format!("{} {}", heading, index + 1)
                    },
                    subtitle: None,
                    detail: Some(display_text.clone()),
                    metadata,
                    actions: ItemActions {
                        copy_content: display_text,
                        web_url: web_url(result, Some(state.search_text.as_str()), modern_web),
                        read_original: SpeakAction::new(
                            "readOriginal",
                            locale,
                            result.speak_url.as_deref(),
                        ),
                        read_translated: SpeakAction::new(
                            "readTranslated",
                            locale,
                            result.translated_speak_url.as_deref(),
                        ),
                    },
                }
            })
            .collect();

        sections.push(Section {
            title: heading.clone(),
            items,
        });
    }

    let explanations = result
        .basic
        .as_ref()
        .map(|b| b.explanations.as_slice())
        .unwrap_or_default();
    if !explanations.is_empty() {
        sections.push(Section {
            title: localize("detail", locale, &[]),
            items: explanations
                .iter()
                .map(|item| plain_item(item.clone(), None, web_url(result, None, modern_web)))
                .collect(),
        });
    }

    if !result.web_entries.is_empty() {
        sections.push(Section {
            title: localize("webTranslate", locale, &[]),
            items: result
                .web_entries
                .iter()
                .map(|entry| {
                    plain_item(
                        entry.values.join(", "),
                        Some(entry.key.clone()),
                        web_url(result, None, modern_web),
                    )
                })
                .collect(),
        });
    }

    sections
}

fn plain_item(title: String, subtitle: Option<String>, web_url: Option<String>) -> ListItem {
    ListItem {
        actions: ItemActions {
            copy_content: title.clone(),
            web_url,
            ..Default::default()
        },
        title,
        subtitle,
        detail: None,
        metadata: Vec::new(),
    }
}

/// Link for "open in browser"
///
/// The modern page needs both the searched text and a source language;
/// without them the dictionary URL from the response is used.
pub fn web_url(result: &TranslationResult, text: Option<&str>, modern_web: bool) -> Option<String> {
    let dictionary = result.dictionary_url().map(str::to_string);
    if !modern_web {
        return dictionary;
    }

    let lang = result.source_language();
    match text {
        Some(text) if !text.is_empty() && !lang.is_empty() => {
            Url::parse_with_params(MODERN_WEB_URL, &[("word", text), ("lang", lang)])
                .map(String::from)
                .ok()
        }
        _ => dictionary,
    }
}

/// First `limit` characters of `text`, with `...` when cut
pub fn shorten(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
