use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use research_logging::{research_debug, research_info};

use crate::{EngineEvent, Generation, ResearchClient};

/// Receives engine completions. Called from the engine's runtime threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Submit {
        generation: Generation,
        query: String,
    },
    CheckHealth,
}

/// Runs requests on a background tokio runtime. Requests are never cancelled;
/// every submit produces exactly one `ResearchCompleted` tagged with its generation.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(client: Arc<dyn ResearchClient>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("research-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, sink.as_ref()).await;
                    });
                }
                research_debug!("Engine command channel closed; shutting down runtime");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, generation: Generation, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            generation,
            query: query.into(),
        });
    }

    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth);
    }
}

async fn handle_command(client: &dyn ResearchClient, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Submit { generation, query } => {
            research_info!("Research request started generation={}", generation);
            let result = client.research(&query).await;
            sink.emit(EngineEvent::ResearchCompleted { generation, result });
        }
        EngineCommand::CheckHealth => {
            let result = client.health().await;
            sink.emit(EngineEvent::HealthChecked(result));
        }
    }
}
