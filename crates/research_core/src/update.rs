use research_logging::{research_debug, research_info, research_warn};

use crate::{validate_topic, AppState, Effect, LifecycleState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(text) => {
            // Stale results stay visible while editing; only submit/reset clear them.
            state.set_query(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ResetClicked => {
            state.reset();
            Vec::new()
        }
        Msg::ResearchCompleted {
            generation,
            outcome,
        } => {
            if !state.is_awaiting(generation) {
                research_debug!(
                    "Discarding stale research response generation={} current={} state={:?}",
                    generation,
                    state.generation(),
                    state.lifecycle()
                );
                return (state, Vec::new());
            }
            match outcome {
                Ok(result) => {
                    research_info!(
                        "Research succeeded generation={} sources={} tools={}",
                        generation,
                        result.sources.len(),
                        result.tools_used.len()
                    );
                    state.succeed(result);
                }
                Err(failure) => {
                    research_warn!(
                        "Research failed generation={} detail={}",
                        generation,
                        failure.detail
                    );
                    state.fail(failure.user_message());
                }
            }
            Vec::new()
        }
        Msg::HealthCheckRequested => {
            state.set_api_status(crate::ApiStatus::Checking);
            vec![Effect::CheckHealth]
        }
        Msg::HealthChecked(status) => {
            state.set_api_status(status);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // At most one request in flight, regardless of what the view disables.
    if state.lifecycle() == LifecycleState::Submitting {
        research_debug!("Submit ignored: request already in flight");
        return Vec::new();
    }

    state.begin_validation();
    let query = match validate_topic(state.query()) {
        Ok(topic) => topic.to_owned(),
        Err(err) => {
            research_debug!("Submit rejected: {}", err);
            state.fail(err.to_string());
            return Vec::new();
        }
    };

    let generation = state.begin_submission(query.clone());
    research_info!(
        "Submitting research generation={} query_len={}",
        generation,
        query.chars().count()
    );
    vec![Effect::SubmitResearch { generation, query }]
}
