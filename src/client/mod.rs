//! Run submitter and view updater
//!
//! `RunClient` reads the input text from a [`View`], asks a [`RunBackend`] to
//! analyse it and writes the tokens, AST and rendered graphic back into the
//! view. Unchanged non-empty input is not resubmitted, and a response is only
//! applied if no newer request has been issued since.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use std::sync::PoisonError;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

/// Class attached to graphics inserted by [`update_svg`]
pub const SVG_MARKER_CLASS: &str = "rendered-svg";

/// A failed request or an unusable response.
///
/// All variants are handled the same way; they only differ in what gets logged.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Analysis results as returned by `/run`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunResult {
    #[serde(default)]
    pub tokens: Value,
    #[serde(default)]
    pub ast: Value,
    #[serde(default)]
    pub svg: Option<String>,
}

/// Something that can analyse input text
#[async_trait]
pub trait RunBackend: Send + Sync {
    /// Analyse `input` and return the results
    async fn run(&self, input: &str) -> Result<RunResult, RequestError>;
}

/// A rendered graphic inside the graphic region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graphic {
    pub class: String,
    pub markup: String,
}

/// The display surface: one input field and three output regions
pub trait View: Send {
    /// Current contents of the input field
    fn input_text(&self) -> String;

    /// Replace the tokens region's text
    fn set_tokens_text(&mut self, text: String);

    /// Replace the AST region's text
    fn set_ast_text(&mut self, text: String);

    /// Remove every graphic carrying `class`
    fn remove_graphics(&mut self, class: &str);

    /// Append a graphic to the graphic region
    fn append_graphic(&mut self, graphic: Graphic);
}

/// 2-space indented JSON
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn update_tokens(view: &mut impl View, tokens: &Value) {
    view.set_tokens_text(pretty_json(tokens));
}

pub fn update_ast(view: &mut impl View, ast: &Value) {
    view.set_ast_text(pretty_json(ast));
}

/// Replace the previously rendered graphic with `markup`
pub fn update_svg(view: &mut impl View, markup: &str) {
    view.remove_graphics(SVG_MARKER_CLASS);
    view.append_graphic(Graphic {
        class: SVG_MARKER_CLASS.to_string(),
        markup: markup.to_string(),
    });
}

/// What a call to [`RunClient::submit_new_input`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input matched the last applied submission, nothing was sent
    Unchanged,
    /// Response was written into the view
    Applied { seq: u64 },
    /// A newer request was issued while this one was in flight
    Discarded { seq: u64, latest: u64 },
    /// Request or response failed; the view was left alone
    Failed { seq: u64, error: String },
}

#[derive(Debug, Default)]
struct ClientState {
    /// Text of the last response that was applied
    last_submitted: Option<String>,
    /// Sequence number of the most recently issued request
    latest_seq: u64,
}

/// Submits input to a backend and keeps a view up to date
pub struct RunClient<B, V> {
    backend: B,
    view: Mutex<V>,
    /// Only ever locked briefly and never across an `.await`
    state: std::sync::Mutex<ClientState>,
}

impl<B: RunBackend, V: View> RunClient<B, V> {
    /// Create a new client. Nothing is submitted until [`RunClient::on_load`].
    pub fn new(backend: B, view: V) -> Self {
        Self {
            backend,
            view: Mutex::new(view),
            state: std::sync::Mutex::new(ClientState::default()),
        }
    }

    /// Lock the view for reading or editing the input field
    pub async fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().await
    }

    /// Text of the last applied submission
    pub fn last_submitted(&self) -> Option<String> {
        self.state().last_submitted.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initial submission of whatever the input field holds, possibly nothing
    pub async fn on_load(&self) -> SubmitOutcome {
        self.submit_new_input().await
    }

    /// Submit the current input unless it is non-empty and already applied
    pub async fn submit_new_input(&self) -> SubmitOutcome {
        let input = self.view.lock().await.input_text();

        let seq = {
            let mut state = self.state();
            if !input.is_empty() && state.last_submitted.as_deref() == Some(input.as_str()) {
                debug!(input = %input, "Input unchanged, not resubmitting");
                return SubmitOutcome::Unchanged;
            }
            state.latest_seq += 1;
            state.latest_seq
        };

        debug!(seq, input = %input, "Submitting input");

        let result = match self.backend.run(&input).await {
            Ok(result) => result,
            Err(e) => {
                error!(seq, error = %e, "Run request failed");
                return SubmitOutcome::Failed {
                    seq,
                    error: e.to_string(),
                };
            }
        };

        let mut view = self.view.lock().await;
        {
            let mut state = self.state();
            if seq != state.latest_seq {
                debug!(seq, latest = state.latest_seq, "Discarding stale response");
                return SubmitOutcome::Discarded {
                    seq,
                    latest: state.latest_seq,
                };
            }
            state.last_submitted = Some(input);
        }

        update_tokens(&mut *view, &result.tokens);
        update_ast(&mut *view, &result.ast);
        if let Some(svg) = &result.svg {
            update_svg(&mut *view, svg);
        }
        drop(view);

        info!(seq, has_svg = result.svg.is_some(), "Applied run result");
        SubmitOutcome::Applied { seq }
    }
}

/// In-memory view, used by tests and by embedders that render elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryView {
    pub input: String,
    pub tokens_text: String,
    pub ast_text: String,
    pub graphics: Vec<Graphic>,
}

impl MemoryView {
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }
}

impl View for MemoryView {
    fn input_text(&self) -> String {
        self.input.clone()
    }

    fn set_tokens_text(&mut self, text: String) {
        self.tokens_text = text;
    }

    fn set_ast_text(&mut self, text: String) {
        self.ast_text = text;
    }

    fn remove_graphics(&mut self, class: &str) {
        self.graphics.retain(|g| g.class != class);
    }

    fn append_graphic(&mut self, graphic: Graphic) {
        self.graphics.push(graphic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Echoes the input back as the single token
    #[derive(Default)]
    struct EchoBackend {
        calls: AtomicUsize,
        fail: bool,
        svg: bool,
    }

    #[async_trait]
    impl RunBackend for EchoBackend {
        async fn run(&self, input: &str) -> Result<RunResult, RequestError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RequestError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(RunResult {
                tokens: json!([input]),
                ast: json!({"input": input}),
                svg: self.svg.then(|| format!("<svg>{input}</svg>")),
            })
        }
    }

    /// Holds each request until the test releases it
    #[derive(Default)]
    struct GatedBackend {
        calls: AtomicUsize,
        gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<RunResult>>>,
    }

    impl GatedBackend {
        fn gate(&self, input: &str) -> oneshot::Sender<RunResult> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(input.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl RunBackend for GatedBackend {
        async fn run(&self, input: &str) -> Result<RunResult, RequestError> {
            let rx = self.gates.lock().unwrap().remove(input).expect("no gate");
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(rx.await.expect("gate dropped"))
        }
    }

    fn tokens_result(tokens: Value) -> RunResult {
        RunResult {
            tokens,
            ast: Value::Null,
            svg: None,
        }
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        assert_eq!(pretty_json(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_update_svg_replaces_only_marked_graphics() {
        let mut view = MemoryView::default();
        view.append_graphic(Graphic {
            class: "legend".to_string(),
            markup: "<svg/>".to_string(),
        });

        update_svg(&mut view, "<svg>1</svg>");
        update_svg(&mut view, "<svg>2</svg>");

        assert_eq!(view.graphics.len(), 2);
        assert_eq!(view.graphics[0].class, "legend");
        assert_eq!(view.graphics[1].markup, "<svg>2</svg>");
        assert_eq!(view.graphics[1].class, SVG_MARKER_CLASS);
    }

    #[test]
    fn test_run_result_tolerates_missing_svg() {
        let result: RunResult = serde_json::from_str(r#"{"tokens": [], "ast": null}"#).unwrap();
        assert_eq!(result.svg, None);
        let result: RunResult =
            serde_json::from_str(r#"{"tokens": [], "ast": null, "svg": null}"#).unwrap();
        assert_eq!(result.svg, None);
    }

    #[tokio::test]
    async fn test_same_input_submitted_once() {
        let client = RunClient::new(EchoBackend::default(), MemoryView::with_input("a b"));

        assert_eq!(client.submit_new_input().await, SubmitOutcome::Applied { seq: 1 });
        assert_eq!(client.submit_new_input().await, SubmitOutcome::Unchanged);
        assert_eq!(client.backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.last_submitted().as_deref(), Some("a b"));
    }

    #[tokio::test]
    async fn test_empty_input_always_submitted() {
        let client = RunClient::new(EchoBackend::default(), MemoryView::default());

        assert!(matches!(client.on_load().await, SubmitOutcome::Applied { .. }));
        assert!(matches!(client.submit_new_input().await, SubmitOutcome::Applied { .. }));
        assert_eq!(client.backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_changed_input_is_resubmitted() {
        let client = RunClient::new(EchoBackend::default(), MemoryView::with_input("a"));
        client.on_load().await;
        client.view().await.set_input("b");
        client.submit_new_input().await;

        assert_eq!(client.backend.calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.view().await.tokens_text, "[\n  \"b\"\n]");
    }

    #[tokio::test]
    async fn test_response_renders_regions() {
        let backend = EchoBackend {
            svg: true,
            ..Default::default()
        };
        let client = RunClient::new(backend, MemoryView::with_input("x"));
        client.on_load().await;

        let view = client.view().await;
        assert_eq!(view.tokens_text, "[\n  \"x\"\n]");
        assert_eq!(view.ast_text, "{\n  \"input\": \"x\"\n}");
        assert_eq!(view.graphics.len(), 1);
        assert_eq!(view.graphics[0].markup, "<svg>x</svg>");
    }

    #[tokio::test]
    async fn test_missing_svg_leaves_graphic_region_alone() {
        let backend = GatedBackend::default();
        let first = backend.gate("a");
        let second = backend.gate("b");
        let client = RunClient::new(backend, MemoryView::with_input("a"));

        first
            .send(RunResult {
                svg: Some("<svg>a</svg>".to_string()),
                ..tokens_result(json!({"a": 1}))
            })
            .unwrap();
        client.on_load().await;

        second.send(tokens_result(json!({"b": 2}))).unwrap();
        client.view().await.set_input("b");
        client.submit_new_input().await;

        let view = client.view().await;
        assert_eq!(view.tokens_text, "{\n  \"b\": 2\n}");
        assert_eq!(view.graphics.len(), 1);
        assert_eq!(view.graphics[0].markup, "<svg>a</svg>");
    }

    #[tokio::test]
    async fn test_failure_leaves_view_unchanged() {
        let mut view = MemoryView::with_input("a");
        view.tokens_text = "old tokens".to_string();
        view.ast_text = "old ast".to_string();
        let before = view.clone();

        let backend = EchoBackend {
            fail: true,
            ..Default::default()
        };
        let client = RunClient::new(backend, view);

        assert!(matches!(
            client.submit_new_input().await,
            SubmitOutcome::Failed { seq: 1, .. }
        ));
        assert_eq!(*client.view().await, before);
        assert_eq!(client.last_submitted(), None);

        // Not recorded as submitted, so the same text is tried again
        client.submit_new_input().await;
        assert_eq!(client.backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_response_applies_even_if_field_changed() {
        let backend = GatedBackend::default();
        let gate = backend.gate("a");
        let client = Arc::new(RunClient::new(backend, MemoryView::with_input("a")));

        let task = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.submit_new_input().await }
        });
        while client.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Edited, but not submitted
        client.view().await.set_input("a b");
        gate.send(tokens_result(json!(["a"]))).unwrap();

        assert_eq!(task.await.unwrap(), SubmitOutcome::Applied { seq: 1 });
        let view = client.view().await;
        assert_eq!(view.tokens_text, "[\n  \"a\"\n]");
        assert_eq!(view.input, "a b");
    }

    #[tokio::test]
    async fn test_state_readable_while_view_is_held() {
        let backend = GatedBackend::default();
        let gate = backend.gate("a");
        let client = Arc::new(RunClient::new(backend, MemoryView::with_input("a")));

        let task = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.submit_new_input().await }
        });
        while client.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // The response arrives while someone else holds the view
        let view = client.view().await;
        gate.send(tokens_result(json!(["a"]))).unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!task.is_finished());
        assert!(client.state.try_lock().is_ok());
        let read = tokio::time::timeout(Duration::from_secs(2), async {
            client.last_submitted()
        })
        .await;
        assert_eq!(read.unwrap(), None);

        drop(view);
        assert_eq!(task.await.unwrap(), SubmitOutcome::Applied { seq: 1 });
        assert_eq!(client.last_submitted().as_deref(), Some("a"));
        assert_eq!(client.view().await.tokens_text, "[\n  \"a\"\n]");
    }

    #[tokio::test]
    async fn test_overtaken_response_is_discarded() {
        let backend = GatedBackend::default();
        let slow = backend.gate("a");
        let fast = backend.gate("b");
        let client = Arc::new(RunClient::new(backend, MemoryView::with_input("a")));

        let first = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.submit_new_input().await }
        });
        while client.backend.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        client.view().await.set_input("b");
        fast.send(tokens_result(json!(["b"]))).unwrap();
        assert_eq!(client.submit_new_input().await, SubmitOutcome::Applied { seq: 2 });

        slow.send(tokens_result(json!(["a"]))).unwrap();
        assert_eq!(
            first.await.unwrap(),
            SubmitOutcome::Discarded { seq: 1, latest: 2 }
        );

        assert_eq!(client.view().await.tokens_text, "[\n  \"b\"\n]");
        assert_eq!(client.last_submitted().as_deref(), Some("b"));
    }
}
