use crate::{ApiStatus, LifecycleState, ResearchResult};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub lifecycle: LifecycleState,
    pub query: String,
    /// Trimmed topic of the request in flight; `None` unless `Submitting`.
    pub submitted_query: Option<String>,
    pub result: Option<ResearchResult>,
    pub error: Option<String>,
    pub api_status: ApiStatus,
    /// False while a request is in flight; the submit trigger should be disabled.
    pub can_submit: bool,
    pub dirty: bool,
}
