//! CLI command definitions and handlers

use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::core::client::YoudaoClient;
use crate::core::config::TranslatorConfig;
use crate::core::input::{CommandSelection, NoSelection, SelectionProvider, SystemClipboard};
use crate::core::session::{DisplayState, RequestOutcome, TranslationSession};
use crate::core::speech::{CommandPlayer, SpeechClient};
use crate::view::render::{render_notification, render_text};
use crate::view::result::ResultView;

/// Options of the translate command
#[derive(Args, Debug, Clone, Default)]
pub struct TranslateArgs {
    /// Text to translate; an active selection takes precedence
    pub text: Option<String>,

    /// Keep reading lines from stdin, each one superseding the previous request
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the result view as JSON
    #[arg(long)]
    pub json: bool,

    /// Play the pronunciation of the original text
    #[arg(long)]
    pub speak: bool,

    /// Play the pronunciation of the translation
    #[arg(long)]
    pub speak_translation: bool,

    /// Do not read the active selection
    #[arg(long)]
    pub no_selection: bool,
}

/// Wire the session from resolved configuration
pub fn build_session(
    config: Arc<TranslatorConfig>,
    use_selection: bool,
) -> anyhow::Result<Arc<TranslationSession>> {
    let client = YoudaoClient::new(config.clone())?;

    let argv = config.selection_argv();
    let selection: Arc<dyn SelectionProvider> = if use_selection && !argv.is_empty() {
        Arc::new(CommandSelection::new(argv))
    } else {
        Arc::new(NoSelection)
    };

    Ok(Arc::new(TranslationSession::new(
        client,
        selection,
        Arc::new(SystemClipboard),
    )))
}

/// Handle one-shot translation
pub async fn handle_translate(args: TranslateArgs, config: TranslatorConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let session = build_session(config.clone(), !args.no_selection)?;

    if args.interactive {
        return handle_interactive(session, args, config.is_using_modern_web).await;
    }

    let outcome = session
        .translate(args.text.as_deref().unwrap_or_default())
        .await;
    info!("Translation finished: {}", outcome_label(&outcome));

    let state = session.state();
    emit(&state, args.json, config.is_using_modern_web)?;

    if args.speak || args.speak_translation {
        speak(&session, &state, &args, &config).await;
    }

    Ok(())
}

/// Handle interactive mode: every stdin line is a new text-input event
async fn handle_interactive(
    session: Arc<TranslationSession>,
    args: TranslateArgs,
    modern_web: bool,
) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let renderer = tokio::spawn(render_loop(
        session.subscribe(),
        shutdown.clone(),
        args.json,
        modern_web,
    ));

    let mut last = spawn_translate(&session, args.text.clone().unwrap_or_default());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        last = spawn_translate(&session, line);
    }

    if let Err(e) = last.await {
        warn!("Translation task failed: {}", e);
    }

    shutdown.cancel();
    renderer.await??;
    Ok(())
}

/// Claim the slot now, in input order, and translate on a separate task
fn spawn_translate(session: &Arc<TranslationSession>, text: String) -> JoinHandle<RequestOutcome> {
    let ticket = session.begin();
    let session = Arc::clone(session);
    tokio::spawn(async move { session.run(ticket, &text).await })
}

/// Print every settled state once
async fn render_loop(
    mut rx: tokio::sync::watch::Receiver<DisplayState>,
    shutdown: CancellationToken,
    json: bool,
    modern_web: bool,
) -> anyhow::Result<()> {
    let mut printed = 0;

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = shutdown.cancelled() => break,
        }

        let state = rx.borrow_and_update().clone();
        if !state.is_loading && state.generation != printed {
            printed = state.generation;
            emit(&state, json, modern_web)?;
        }
    }

    let state = rx.borrow().clone();
    if !state.is_loading && state.generation != printed {
        emit(&state, json, modern_web)?;
    }

    Ok(())
}

fn emit(state: &DisplayState, json: bool, modern_web: bool) -> anyhow::Result<()> {
    let view = ResultView::build(state, modern_web);

    if let Some(notice) = render_notification(&view) {
        eprintln!("{}", notice);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view));
    }

    Ok(())
}

async fn speak(
    session: &TranslationSession,
    state: &DisplayState,
    args: &TranslateArgs,
    config: &TranslatorConfig,
) {
    let Some(result) = state.result.as_ref().filter(|r| r.is_success()) else {
        return;
    };

    let player = Arc::new(CommandPlayer::new(config.player_argv()));
    let speech = SpeechClient::new(session.client(), player);

    if args.speak {
        if let Err(e) = speech
            .speak(result.speak_url.as_deref(), &state.search_text)
            .await
        {
            warn!("Failed to read original text: {}", e);
        }
    }

    if args.speak_translation {
        let translated = result.translation_lines.join("\n");
        if let Err(e) = speech
            .speak(result.translated_speak_url.as_deref(), &translated)
            .await
        {
            warn!("Failed to read translation: {}", e);
        }
    }
}

fn outcome_label(outcome: &RequestOutcome) -> &'static str {
    match outcome {
        RequestOutcome::Completed(Some(_)) => "completed",
        RequestOutcome::Completed(None) => "nothing to translate",
        RequestOutcome::Failed(_) => "failed",
        RequestOutcome::Aborted => "aborted",
    }
}
