//! Research core: the query lifecycle controller as a pure state machine,
//! plus the view model the presentation layer renders from.
mod effect;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    ApiStatus, AppState, Generation, LifecycleState, ResearchOutcome, ResearchResult,
    TransportFailure, FALLBACK_ERROR_MESSAGE,
};
pub use update::update;
pub use validate::{validate_topic, ValidationError, MIN_TOPIC_CHARS};
pub use view_model::AppViewModel;
