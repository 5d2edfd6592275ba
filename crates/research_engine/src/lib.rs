//! Research engine: API configuration, HTTP transport and background execution.
mod client;
mod config;
mod engine;
mod types;

pub use client::{ClientSettings, ReqwestResearchClient, ResearchClient};
pub use config::{ApiConfig, ConfigError, API_URL_ENV, DEV_API_URL, PROD_API_URL};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use types::{
    EngineEvent, FailureKind, Generation, HealthStatus, ResearchError, ResearchRequest,
    ResearchResponse,
};
