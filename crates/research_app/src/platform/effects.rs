use std::sync::{mpsc, Arc};

use research_core::{ApiStatus, Effect, Msg, ResearchResult, TransportFailure};
use research_engine::{
    ApiConfig, ClientSettings, EngineEvent, EngineHandle, EventSink, HealthStatus,
    ReqwestResearchClient, ResearchError, ResearchResponse,
};
use research_logging::{research_info, research_warn};

use super::app::AppEvent;

/// Executes core effects on the engine and feeds completions back as messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        config: ApiConfig,
        settings: ClientSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<Self> {
        research_info!("Research API endpoint {}", config.research_endpoint());
        let client = ReqwestResearchClient::new(config, settings)?;
        let sink = Arc::new(MsgSink { tx: event_tx });
        let engine = EngineHandle::new(Arc::new(client), sink)?;
        Ok(Self { engine })
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitResearch { generation, query } => {
                    research_info!(
                        "SubmitResearch generation={} query_len={}",
                        generation,
                        query.len()
                    );
                    self.engine.submit(generation, query);
                }
                Effect::CheckHealth => self.engine.check_health(),
            }
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Core(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ResearchCompleted { generation, result } => Msg::ResearchCompleted {
            generation,
            outcome: result.map(map_response).map_err(map_failure),
        },
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(map_health(result)),
    }
}

fn map_response(response: ResearchResponse) -> ResearchResult {
    ResearchResult {
        topic: response.topic,
        summary: response.summary,
        sources: response.sources,
        tools_used: response.tools_used,
    }
}

fn map_failure(err: ResearchError) -> TransportFailure {
    TransportFailure {
        detail: err.to_string(),
        server_error: err.server_error,
    }
}

fn map_health(result: Result<HealthStatus, ResearchError>) -> ApiStatus {
    match result {
        Ok(health) if health.is_healthy() => ApiStatus::Healthy(health.message.unwrap_or_default()),
        Ok(health) => {
            research_warn!("Research API reports status {}", health.status);
            ApiStatus::Unreachable(health.message.unwrap_or(health.status))
        }
        Err(err) => {
            research_warn!("Research API health check failed: {}", err);
            ApiStatus::Unreachable(err.kind.to_string())
        }
    }
}
