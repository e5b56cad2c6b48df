//! Youdao Translator - translate selected, typed or copied text
//!
//! This library resolves the text to translate, signs and sends requests to
//! the Youdao text translation API with supersession of in-flight requests,
//! and maps responses into a plain view structure.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod view;

// Re-export key types for convenience
pub use crate::core::{
    client::YoudaoClient,
    config::TranslatorConfig,
    errors::TranslationError,
    models::{InputSource, TranslationRequestContext, TranslationResult},
    session::{DisplayState, Notification, RequestOutcome, RequestTicket, TranslationSession},
};

pub use view::result::ResultView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
