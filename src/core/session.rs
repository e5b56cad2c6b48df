//! Request orchestration: one in-flight request, one display state

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::client::YoudaoClient;
use crate::core::input::{ClipboardProvider, InputResolver, ResolvedInput, SelectionProvider};
use crate::core::models::{InputSource, TranslationRequestContext, TranslationResult};

/// Where the API error codes are documented
pub const ERROR_CODE_DOCS: &str =
    "https://ai.youdao.com/DOCSIRMA/html/自然语言翻译/API文档/文本翻译服务/文本翻译服务-API文档.html";

/// User-facing notice attached to the display state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// The request never produced a usable response
    TransportFailure { message: String },
    /// The API answered with a non-zero error code
    ApiError { code: String },
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::TransportFailure { .. } => "Could not perform search",
            Notification::ApiError { .. } => "Translation Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notification::TransportFailure { message } => message.clone(),
            Notification::ApiError { code } => format!(
                "error code: {}. You can find all error codes here: {}",
                code, ERROR_CODE_DOCS
            ),
        }
    }
}

/// Transitions of the display state
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Started {
        generation: u64,
        context: TranslationRequestContext,
    },
    Completed {
        generation: u64,
        result: Option<TranslationResult>,
    },
    Failed {
        generation: u64,
        message: String,
    },
    Aborted {
        generation: u64,
    },
}

impl SessionEvent {
    fn generation(&self) -> u64 {
        match self {
            SessionEvent::Started { generation, .. }
            | SessionEvent::Completed { generation, .. }
            | SessionEvent::Failed { generation, .. }
            | SessionEvent::Aborted { generation } => *generation,
        }
    }
}

/// What the renderer sees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Request the state belongs to; 0 before the first request
    pub generation: u64,
    pub is_loading: bool,
    pub search_text: String,
    pub source: InputSource,
    pub is_truncated: bool,
    pub char_limit: usize,
    pub result: Option<TranslationResult>,
    pub notification: Option<Notification>,
}

impl DisplayState {
    /// Pure transition function
    ///
    /// `Started` takes over unless an equal or newer request already did.
    /// Terminal events of any other generation are stale and leave the
    /// state untouched.
    pub fn apply(self, event: SessionEvent) -> Self {
        if let SessionEvent::Started { generation, context } = event {
            if generation <= self.generation {
                debug!(
                    "Ignoring start of request {} (current {})",
                    generation, self.generation
                );
                return self;
            }
            return Self {
                generation,
                is_loading: true,
                search_text: context.raw_text,
                source: context.source,
                is_truncated: context.truncated,
                char_limit: context.char_limit,
                result: self.result,
                notification: None,
            };
        }

        if event.generation() != self.generation {
            debug!(
                "Discarding stale event for request {} (current {})",
                event.generation(),
                self.generation
            );
            return self;
        }

        match event {
            SessionEvent::Completed { result, .. } => {
                let notification = result
                    .as_ref()
                    .filter(|r| !r.is_success())
                    .map(|r| Notification::ApiError {
                        code: r.error_code.clone(),
                    });
                Self {
                    is_loading: false,
                    result,
                    notification,
                    ..self
                }
            }
            SessionEvent::Failed { message, .. } => Self {
                is_loading: false,
                notification: Some(Notification::TransportFailure { message }),
                ..self
            },
            SessionEvent::Aborted { .. } => Self {
                is_loading: false,
                ..self
            },
            SessionEvent::Started { .. } => self,
        }
    }
}

/// How a single `translate` call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Response received, or nothing to translate
    Completed(Option<TranslationResult>),
    /// Transport or parse failure, already reported on the display state
    Failed(String),
    /// Superseded or cancelled; nothing was reported
    Aborted,
}

/// Handle of the request currently in flight
#[derive(Debug)]
struct InFlightRequest {
    generation: u64,
    token: CancellationToken,
}

/// Slot claimed by [`TranslationSession::begin`], consumed by [`TranslationSession::run`]
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Translation pipeline with single-slot supersession
pub struct TranslationSession {
    client: YoudaoClient,
    selection: Arc<dyn SelectionProvider>,
    clipboard: Arc<dyn ClipboardProvider>,
    in_flight: Mutex<Option<InFlightRequest>>,
    next_generation: AtomicU64,
    state: watch::Sender<DisplayState>,
}

impl TranslationSession {
    pub fn new(
        client: YoudaoClient,
        selection: Arc<dyn SelectionProvider>,
        clipboard: Arc<dyn ClipboardProvider>,
    ) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self {
            client,
            selection,
            clipboard,
            in_flight: Mutex::new(None),
            next_generation: AtomicU64::new(1),
            state,
        }
    }

    /// Client used for requests
    pub fn client(&self) -> &YoudaoClient {
        &self.client
    }

    /// Observe display state changes
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// Snapshot of the current display state
    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    /// Supersede any in-flight request and translate
    ///
    /// Never fails: every outcome ends up on the display state, except
    /// cancellation which is silent.
    pub async fn translate(&self, argument: &str) -> RequestOutcome {
        let ticket = self.begin();
        self.run(ticket, argument).await
    }

    /// Resolve input and send the request claimed by `ticket`
    ///
    /// Input resolution runs on the blocking pool. A ticket superseded
    /// before resolution finishes ends as [`RequestOutcome::Aborted`]
    /// without touching the display state.
    pub async fn run(&self, ticket: RequestTicket, argument: &str) -> RequestOutcome {
        let RequestTicket { generation, token } = ticket;

        let context = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            context = self.resolve(argument) => Some(context),
        };
        let Some(context) = context else {
            debug!("Request {} superseded while resolving input", generation);
            self.finish(generation);
            return RequestOutcome::Aborted;
        };

        let text = context.effective_text.clone();
        self.publish(SessionEvent::Started {
            generation,
            context,
        });

        let outcome = match self.client.translate(&text, &token).await {
            Ok(result) => {
                if let Some(r) = result.as_ref().filter(|r| !r.is_success()) {
                    warn!("Translation API returned error code {}", r.error_code);
                }
                self.publish(SessionEvent::Completed {
                    generation,
                    result: result.clone(),
                });
                RequestOutcome::Completed(result)
            }
            Err(e) if e.is_aborted() => {
                debug!("Request {} aborted", generation);
                self.publish(SessionEvent::Aborted { generation });
                RequestOutcome::Aborted
            }
            Err(e) => {
                warn!("Search error: {}", e);
                let message = e.to_string();
                self.publish(SessionEvent::Failed {
                    generation,
                    message: message.clone(),
                });
                RequestOutcome::Failed(message)
            }
        };

        self.finish(generation);
        outcome
    }

    /// Cancel the previous request and claim the slot
    ///
    /// Synchronous, so callers fix the order of requests at the moment the
    /// input event arrives rather than when a task gets polled.
    pub fn begin(&self) -> RequestTicket {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();

        if let Some(previous) = slot.replace(InFlightRequest {
            generation,
            token: token.clone(),
        }) {
            debug!(
                "Request {} superseded by {}",
                previous.generation, generation
            );
            previous.token.cancel();
        }

        RequestTicket { generation, token }
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&self) {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(request) = slot.take() {
            info!("Cancelling request {}", request.generation);
            request.token.cancel();
        }
    }

    /// Release the slot if it still belongs to `generation`
    fn finish(&self, generation: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if slot.as_ref().map(|r| r.generation) == Some(generation) {
            *slot = None;
        }
    }

    /// Selection, argument or clipboard, truncated to the configured limit
    async fn resolve(&self, argument: &str) -> TranslationRequestContext {
        let config = self.client.config();
        let char_limit = config.char_limit();
        let clipboard_enabled = config.is_search_clipboard;
        let selection = Arc::clone(&self.selection);
        let clipboard = Arc::clone(&self.clipboard);
        let argument = argument.to_string();

        let resolved = tokio::task::spawn_blocking(move || {
            InputResolver::new(selection.as_ref(), clipboard.as_ref())
                .resolve(&argument, clipboard_enabled)
        })
        .await
        .unwrap_or_else(|e| {
            warn!("Input resolution task failed: {}", e);
            ResolvedInput::empty()
        });

        let context = TranslationRequestContext::build(resolved, char_limit);
        debug!(
            "Resolved {} chars from {} (truncated: {})",
            context.effective_text.chars().count(),
            context.source,
            context.truncated
        );
        context
    }

    fn publish(&self, event: SessionEvent) {
        self.state.send_modify(|state| {
            *state = std::mem::take(state).apply(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(text: &str) -> TranslationRequestContext {
        TranslationRequestContext {
            raw_text: text.to_string(),
            effective_text: text.to_string(),
            source: InputSource::Argument,
            truncated: false,
            char_limit: 200,
        }
    }

    fn result(code: &str, line: &str) -> TranslationResult {
        TranslationResult {
            translation_lines: vec![line.to_string()],
            error_code: code.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_started_sets_loading() {
        let state = DisplayState::default().apply(SessionEvent::Started {
            generation: 1,
            context: context("hello"),
        });
        assert!(state.is_loading);
        assert_eq!(state.generation, 1);
        assert_eq!(state.search_text, "hello");
        assert_eq!(state.source, InputSource::Argument);
    }

    #[test]
    fn test_completed_success() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("hello"),
            })
            .apply(SessionEvent::Completed {
                generation: 1,
                result: Some(result("0", "你好")),
            });
        assert!(!state.is_loading);
        assert!(state.notification.is_none());
        assert_eq!(state.result.unwrap().translation_lines, vec!["你好"]);
    }

    #[test]
    fn test_api_error_code_notifies() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("hello"),
            })
            .apply(SessionEvent::Completed {
                generation: 1,
                result: Some(result("40", "")),
            });
        assert_eq!(
            state.notification,
            Some(Notification::ApiError {
                code: "40".to_string()
            })
        );
        assert!(state.result.is_some());
    }

    #[test]
    fn test_failure_keeps_last_result() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("a"),
            })
            .apply(SessionEvent::Completed {
                generation: 1,
                result: Some(result("0", "A")),
            })
            .apply(SessionEvent::Started {
                generation: 2,
                context: context("b"),
            })
            .apply(SessionEvent::Failed {
                generation: 2,
                message: "dns".to_string(),
            });
        assert!(!state.is_loading);
        assert_eq!(state.result.unwrap().translation_lines, vec!["A"]);
        assert!(matches!(
            state.notification,
            Some(Notification::TransportFailure { .. })
        ));
    }

    #[test]
    fn test_stale_events_are_discarded() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("a"),
            })
            .apply(SessionEvent::Started {
                generation: 2,
                context: context("b"),
            })
            .apply(SessionEvent::Completed {
                generation: 1,
                result: Some(result("0", "A")),
            })
            .apply(SessionEvent::Failed {
                generation: 1,
                message: "late".to_string(),
            })
            .apply(SessionEvent::Aborted { generation: 1 });

        assert!(state.is_loading);
        assert!(state.result.is_none());
        assert!(state.notification.is_none());

        let state = state.apply(SessionEvent::Completed {
            generation: 2,
            result: Some(result("0", "B")),
        });
        assert_eq!(state.result.unwrap().translation_lines, vec!["B"]);
    }

    #[test]
    fn test_older_start_cannot_roll_back() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 2,
                context: context("B"),
            })
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("A"),
            })
            .apply(SessionEvent::Aborted { generation: 1 })
            .apply(SessionEvent::Completed {
                generation: 2,
                result: Some(result("0", "b")),
            });

        assert_eq!(state.generation, 2);
        assert_eq!(state.search_text, "B");
        assert!(!state.is_loading);
        assert_eq!(state.result.unwrap().translation_lines, vec!["b"]);
    }

    #[test]
    fn test_empty_completion_clears_result() {
        let state = DisplayState::default()
            .apply(SessionEvent::Started {
                generation: 1,
                context: context("a"),
            })
            .apply(SessionEvent::Completed {
                generation: 1,
                result: Some(result("0", "A")),
            })
            .apply(SessionEvent::Started {
                generation: 2,
                context: TranslationRequestContext::default(),
            })
            .apply(SessionEvent::Completed {
                generation: 2,
                result: None,
            });
        assert!(state.result.is_none());
        assert_eq!(state.source, InputSource::Empty);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_notification_text() {
        let notice = Notification::ApiError {
            code: "108".to_string(),
        };
        assert_eq!(notice.title(), "Translation Error");
        assert!(notice.message().contains("108"));
        assert!(notice.message().contains(ERROR_CODE_DOCS));
    }
}
