use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use research_core::{update, AppState, LifecycleState, Msg};
use research_engine::ClientSettings;
use research_logging::{research_debug, research_info};

use super::effects::EffectRunner;
use super::ui::input::{parse_command, Command, HELP_TEXT};
use super::ui::render::render;
use crate::cli::CliArgs;

const BUSY_NOTICE: &str = "A search is already running; wait for it or :reset.";

/// Everything the main loop reacts to, funnelled through one channel.
pub(crate) enum AppEvent {
    Input(Command),
    InputClosed,
    Core(Msg),
}

pub(crate) fn run_app(args: CliArgs) -> anyhow::Result<ExitCode> {
    research_logging::initialize(args.log, &args.log_file, args.log_level());

    let config = args.api_config()?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config, ClientSettings::default(), event_tx.clone())?;
    let mut session = Session::new(runner, io::stdout());

    match args.topic {
        Some(topic) => {
            let outcome = run_once(&mut session, &event_rx, topic)?;
            Ok(if outcome == LifecycleState::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            spawn_stdin_reader(event_tx)?;
            run_interactive(&mut session, &event_rx)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Run one search cycle and return the lifecycle state it settled in.
fn run_once<W: Write>(
    session: &mut Session<W>,
    events: &mpsc::Receiver<AppEvent>,
    topic: String,
) -> io::Result<LifecycleState> {
    session.dispatch_all([Msg::QueryChanged(topic), Msg::SubmitClicked])?;

    while session.lifecycle() == LifecycleState::Submitting {
        match events.recv() {
            Ok(AppEvent::Core(msg)) => session.dispatch_all([msg])?,
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(session.lifecycle())
}

fn run_interactive<W: Write>(
    session: &mut Session<W>,
    events: &mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    session.render_current()?;
    session.dispatch_all([Msg::HealthCheckRequested])?;

    while let Ok(event) = events.recv() {
        let flow = match event {
            AppEvent::Core(msg) => {
                session.dispatch_all([msg])?;
                Flow::Continue
            }
            AppEvent::Input(command) => session.handle_command(command)?,
            AppEvent::InputClosed => Flow::Quit,
        };
        if flow == Flow::Quit {
            break;
        }
    }

    research_info!("Interactive session finished");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(AppEvent::Input(parse_command(&line))).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}

/// Owns the controller state for the lifetime of the process.
struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn lifecycle(&self) -> LifecycleState {
        self.state.lifecycle()
    }

    /// Apply messages in order, run their effects, then render once if anything changed.
    fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) -> io::Result<()> {
        let mut was_dirty = false;
        for msg in msgs {
            research_debug!("dispatch {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            was_dirty |= state.consume_dirty();
            self.state = state;
            self.runner.enqueue(effects);
        }

        if was_dirty {
            self.render_current()?;
        }
        Ok(())
    }

    fn handle_command(&mut self, command: Command) -> io::Result<Flow> {
        let msgs = match command {
            Command::Submit(_) if self.lifecycle() == LifecycleState::Submitting => {
                // Keep the input that belongs to the running search.
                self.print([BUSY_NOTICE.to_string()])?;
                return Ok(Flow::Continue);
            }
            Command::Submit(text) => vec![Msg::QueryChanged(text), Msg::SubmitClicked],
            Command::Reset => vec![Msg::ResetClicked],
            Command::Health => vec![Msg::HealthCheckRequested],
            Command::Help => {
                self.print(HELP_TEXT.iter().map(|line| line.to_string()))?;
                return Ok(Flow::Continue);
            }
            Command::Unknown(name) => {
                self.print([format!("Unknown command {name}; try :help")])?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        };
        self.dispatch_all(msgs)?;
        Ok(Flow::Continue)
    }

    fn render_current(&mut self) -> io::Result<()> {
        let lines = render(&self.state.view());
        self.print(lines)
    }

    fn print(&mut self, lines: impl IntoIterator<Item = String>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_engine::ApiConfig;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(
        server: &MockServer,
    ) -> (Session<Vec<u8>>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let config = ApiConfig::new(&server.uri()).unwrap();
        let runner = EffectRunner::new(config, ClientSettings::default(), tx).unwrap();
        (Session::new(runner, Vec::new()), rx)
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_shot_prints_results_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/research"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "topic": "quantum computing",
                "summary": "Qubits.",
                "sources": ["a", "b"],
                "tools_used": ["wikipedia", "search"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (session, rx) = session_for(&server);

        let (session, outcome) = tokio::task::spawn_blocking(move || {
            let mut session = session;
            let outcome = run_once(&mut session, &rx, "quantum computing".to_string());
            (session, outcome)
        })
        .await
        .unwrap();

        assert_eq!(outcome.unwrap(), LifecycleState::Success);
        let text = output(&session);
        assert!(text.contains("Researching \"quantum computing\"..."));
        assert!(text.contains("   2. b"));
        assert!(text.contains("TOOLS USED: wikipedia, search"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_shot_reports_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/research"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "rate limited" })))
            .mount(&server)
            .await;
        let (session, rx) = session_for(&server);

        let (session, outcome) = tokio::task::spawn_blocking(move || {
            let mut session = session;
            let outcome = run_once(&mut session, &rx, "blockchain".to_string());
            (session, outcome)
        })
        .await
        .unwrap();

        assert_eq!(outcome.unwrap(), LifecycleState::Failed);
        assert!(output(&session).contains("Error: rate limited"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn topic_typed_during_search_is_refused_with_notice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/research"))
            .and(body_json(json!({ "query": "first topic" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(200))
                    .set_body_json(json!({
                        "topic": "first topic",
                        "summary": "s",
                        "sources": [],
                        "tools_used": []
                    })),
            )
            .mount(&server)
            .await;
        let (mut session, _rx) = session_for(&server);

        session
            .handle_command(Command::Submit("first topic".to_string()))
            .unwrap();
        session.out.clear();

        let flow = session
            .handle_command(Command::Submit("second topic".to_string()))
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(session.lifecycle(), LifecycleState::Submitting);
        assert_eq!(session.state.query(), "first topic");
        assert_eq!(session.state.submitted_query(), Some("first topic"));
        assert_eq!(output(&session), format!("{BUSY_NOTICE}\n"));

        // A reset is still accepted while the search runs.
        session.handle_command(Command::Reset).unwrap();
        assert_eq!(session.lifecycle(), LifecycleState::Idle);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn one_shot_rejects_short_topic_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let (mut session, rx) = session_for(&server);

        let outcome = run_once(&mut session, &rx, " AI ".to_string()).unwrap();

        assert_eq!(outcome, LifecycleState::Failed);
        assert_eq!(
            output(&session),
            "Error: Topic too short. Please be more specific.\n"
        );
    }
}
