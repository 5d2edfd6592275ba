mod app;
mod effects;
mod ui;

pub(crate) use app::run_app;
