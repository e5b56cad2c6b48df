//! Text acquisition: selection, argument and clipboard, plus truncation

use std::process::Command;
use tracing::{debug, warn};

use crate::core::models::{InputSource, TranslationRequestContext};

/// Reads the text currently selected in the focused application
pub trait SelectionProvider: Send + Sync {
    /// Selected text; fails when nothing is selected or access is denied
    fn read_text(&self) -> anyhow::Result<String>;
}

/// Reads the system clipboard
pub trait ClipboardProvider: Send + Sync {
    /// Clipboard text; fails when the clipboard is empty or inaccessible
    fn read_text(&self) -> anyhow::Result<String>;
}

/// Selection read through an external command such as `xclip -o -selection primary`
#[derive(Debug, Clone)]
pub struct CommandSelection {
    argv: Vec<String>,
}

impl CommandSelection {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl SelectionProvider for CommandSelection {
    fn read_text(&self) -> anyhow::Result<String> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("no selection command configured"))?;

        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Platform without selection access
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSelection;

impl SelectionProvider for NoSelection {
    fn read_text(&self) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("selection is not available"))
    }
}

/// Clipboard backed by `arboard`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn read_text(&self) -> anyhow::Result<String> {
        let mut clipboard = arboard::Clipboard::new()?;
        Ok(clipboard.get_text()?)
    }
}

/// Text picked by the resolver together with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub text: String,
    pub source: InputSource,
}

impl ResolvedInput {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            source: InputSource::Empty,
        }
    }
}

/// Picks the text to translate
///
/// Order: active selection, then the explicit argument, then the clipboard
/// when enabled. An active selection wins over the argument. Read failures
/// fall through silently.
pub struct InputResolver<'a> {
    selection: &'a dyn SelectionProvider,
    clipboard: &'a dyn ClipboardProvider,
}

impl<'a> InputResolver<'a> {
    pub fn new(selection: &'a dyn SelectionProvider, clipboard: &'a dyn ClipboardProvider) -> Self {
        Self { selection, clipboard }
    }

    pub fn resolve(&self, argument: &str, clipboard_enabled: bool) -> ResolvedInput {
        match self.selection.read_text() {
            Ok(text) if !text.trim().is_empty() => {
                return ResolvedInput {
                    text: text.trim().to_string(),
                    source: InputSource::Selection,
                };
            }
            Ok(_) => debug!("Selection is empty"),
            Err(e) => debug!("Get selected text error: {}", e),
        }

        if !argument.is_empty() {
            return ResolvedInput {
                text: argument.to_string(),
                source: InputSource::Argument,
            };
        }

        if clipboard_enabled {
            match self.clipboard.read_text() {
                Ok(text) if !text.is_empty() => {
                    return ResolvedInput {
                        text,
                        source: InputSource::Clipboard,
                    };
                }
                Ok(_) => debug!("Clipboard is empty"),
                Err(e) => warn!("Get clipboard text error: {}", e),
            }
        }

        ResolvedInput::empty()
    }
}

/// Outcome of enforcing the character limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub effective_text: String,
    pub truncated: bool,
}

/// Cut `text` to at most `limit` characters and trim it
///
/// Lengths count Unicode scalar values, so multi-byte text is never split
/// inside a character.
pub fn truncate(text: &str, limit: usize) -> Truncation {
    if text.is_empty() {
        return Truncation {
            effective_text: String::new(),
            truncated: false,
        };
    }

    match text.char_indices().nth(limit) {
        None => Truncation {
            effective_text: text.trim().to_string(),
            truncated: false,
        },
        Some((cut, _)) => Truncation {
            effective_text: text[..cut].trim().to_string(),
            truncated: true,
        },
    }
}

impl TranslationRequestContext {
    /// Apply the character limit to resolved input
    ///
    /// Empty text always reports as [`InputSource::Empty`].
    pub fn build(input: ResolvedInput, char_limit: usize) -> Self {
        let Truncation {
            effective_text,
            truncated,
        } = truncate(&input.text, char_limit);

        let source = if input.text.is_empty() {
            InputSource::Empty
        } else {
            input.source
        };

        Self {
            raw_text: input.text,
            effective_text,
            source,
            truncated,
            char_limit,
        }
    }
}
