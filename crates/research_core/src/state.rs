use crate::view_model::AppViewModel;

/// Counter distinguishing successive submissions. Responses tagged with an
/// older generation are stale.
pub type Generation = u64;

/// Generic message shown when a failed request carries no usable server error.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    /// Transient: only held inside `update` while a submit is being checked.
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchResult {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    pub tools_used: Vec<String>,
}

/// Failure reported by the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportFailure {
    /// `error` field supplied by the server, if any.
    pub server_error: Option<String>,
    /// Diagnostic detail for logs; never shown to the user.
    pub detail: String,
}

impl TransportFailure {
    /// The message to surface to the user.
    pub fn user_message(&self) -> String {
        self.server_error
            .as_deref()
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string()
    }
}

pub type ResearchOutcome = Result<ResearchResult, TransportFailure>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Unknown,
    Checking,
    Healthy(String),
    Unreachable(String),
}

/// What the last cycle left on screen. A single slot keeps result and error
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Presented {
    Result(ResearchResult),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    query: String,
    lifecycle: LifecycleState,
    presented: Option<Presented>,
    generation: Generation,
    /// Trimmed topic of the request in flight, if any.
    in_flight: Option<String>,
    api_status: ApiStatus,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn result(&self) -> Option<&ResearchResult> {
        match &self.presented {
            Some(Presented::Result(result)) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.presented {
            Some(Presented::Error(message)) => Some(message),
            _ => None,
        }
    }

    pub fn api_status(&self) -> &ApiStatus {
        &self.api_status
    }

    /// The topic that was actually sent, while `Submitting`.
    pub fn submitted_query(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            lifecycle: self.lifecycle,
            query: self.query.clone(),
            submitted_query: self.in_flight.clone(),
            result: self.result().cloned(),
            error: self.error().map(ToOwned::to_owned),
            api_status: self.api_status.clone(),
            can_submit: self.lifecycle != LifecycleState::Submitting,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything observable changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, text: String) {
        if self.query != text {
            self.query = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn begin_validation(&mut self) {
        self.lifecycle = LifecycleState::Validating;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.in_flight = None;
        self.presented = Some(Presented::Error(message));
        self.lifecycle = LifecycleState::Failed;
        self.mark_dirty();
    }

    /// Clears the previous cycle and moves to `Submitting`; returns the new generation.
    pub(crate) fn begin_submission(&mut self, query: String) -> Generation {
        self.generation += 1;
        self.in_flight = Some(query);
        self.presented = None;
        self.lifecycle = LifecycleState::Submitting;
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn is_awaiting(&self, generation: Generation) -> bool {
        self.lifecycle == LifecycleState::Submitting && self.generation == generation
    }

    pub(crate) fn succeed(&mut self, result: ResearchResult) {
        self.in_flight = None;
        self.presented = Some(Presented::Result(result));
        self.lifecycle = LifecycleState::Success;
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        // Bumping the generation orphans any request still in flight.
        self.generation += 1;
        self.query.clear();
        self.in_flight = None;
        self.presented = None;
        self.lifecycle = LifecycleState::Idle;
        self.mark_dirty();
    }

    pub(crate) fn set_api_status(&mut self, status: ApiStatus) {
        if self.api_status == status {
            return;
        }
        self.api_status = status;
        // The status line is only part of the idle screen.
        if self.lifecycle == LifecycleState::Idle {
            self.mark_dirty();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
