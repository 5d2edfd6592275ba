use crate::Generation;

/// Side effects requested by `update`; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue exactly one research request for `query`, tagged with the
    /// generation it was submitted under.
    SubmitResearch { generation: Generation, query: String },
    /// Probe the API health endpoint.
    CheckHealth,
}
