#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the topic input. Stored verbatim.
    QueryChanged(String),
    /// User submitted the current topic.
    SubmitClicked,
    /// User asked to start over.
    ResetClicked,
    /// Transport finished a research request.
    ResearchCompleted {
        generation: crate::Generation,
        outcome: crate::ResearchOutcome,
    },
    /// Platform wants to (re)check the API health endpoint.
    HealthCheckRequested,
    /// Transport finished a health probe.
    HealthChecked(crate::ApiStatus),
}
