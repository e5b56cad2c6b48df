//! Terminal rendering of a [`ResultView`]

use std::fmt::Write;

use crate::view::result::ResultView;

/// Render sections as plain text for stdout
pub fn render_text(view: &ResultView) -> String {
    let mut out = String::new();

    if view.is_empty() {
        if !view.search_text.is_empty() && view.notification.is_none() {
            let _ = writeln!(out, "No translation for |{}|", view.search_text);
        }
        return out;
    }

    for section in &view.sections {
        let _ = writeln!(out, "== {} ==", section.title);
        for item in &section.items {
            let body = item.detail.as_deref().unwrap_or(&item.title);
            match &item.subtitle {
                Some(subtitle) => {
                    let _ = writeln!(out, "  • {}  ({})", body, subtitle);
                }
                None => {
                    let _ = writeln!(out, "  • {}", body.trim_end());
                }
            }
            for label in &item.metadata {
                let _ = writeln!(out, "      {}: {}", label.title, label.text);
            }
        }
        out.push('\n');
    }

    if let Some(actions) = view
        .sections
        .first()
        .and_then(|s| s.items.first())
        .map(|i| &i.actions)
    {
        if let Some(url) = actions.web_url.as_deref() {
            let _ = writeln!(out, "↗ {}", url);
        }
        for speak in [&actions.read_original, &actions.read_translated]
            .into_iter()
            .flatten()
        {
            let _ = writeln!(out, "♪ {}: {}", speak.label, speak.url);
        }
    }

    out
}

/// Render the notification, if any, for stderr
pub fn render_notification(view: &ResultView) -> Option<String> {
    view.notification
        .as_ref()
        .map(|n| format!("✗ {}: {}", n.title, n.message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{InputSource, TranslationResult, WebEntry};
    use crate::core::session::{DisplayState, Notification};

    fn view_of(result: Option<TranslationResult>, notification: Option<Notification>) -> ResultView {
        let state = DisplayState {
            generation: 1,
            search_text: "good".to_string(),
            source: InputSource::Argument,
            char_limit: 200,
            result,
            notification,
            ..Default::default()
        };
        ResultView::build(&state, false)
    }

    #[test]
    fn test_render_sections() {
        let result = TranslationResult {
            translation_lines: vec!["好".to_string()],
            web_entries: vec![WebEntry {
                key: "good morning".to_string(),
                values: vec!["早上好".to_string()],
            }],
            language_pair: "en2zh-CHS".to_string(),
            speak_url: Some("https://example.com/speak".to_string()),
            error_code: "0".to_string(),
            ..Default::default()
        };

        let text = render_text(&view_of(Some(result), None));
        assert!(text.contains("♪ 朗读原文: https://example.com/speak"));
        assert!(!text.contains("朗读译文"));
        assert!(text.contains("== 翻译结果 =="));
        assert!(text.contains("  • 好\n"));
        assert!(text.contains("原文: good"));
        assert!(text.contains("  • 早上好  (good morning)"));
    }

    #[test]
    fn test_render_no_result() {
        let text = render_text(&view_of(None, None));
        assert_eq!(text, "No translation for |good|\n");
    }

    #[test]
    fn test_render_notification() {
        let view = view_of(
            None,
            Some(Notification::TransportFailure {
                message: "Network error: dns".to_string(),
            }),
        );
        assert_eq!(render_text(&view), "");
        assert_eq!(
            render_notification(&view).unwrap(),
            "✗ Could not perform search: Network error: dns"
        );
    }
}
