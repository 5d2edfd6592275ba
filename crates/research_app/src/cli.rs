use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use research_engine::{ApiConfig, ConfigError};
use research_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "research_app",
    version,
    about = "Submit a research topic to the research API and read the summary, sources and tools used"
)]
/// Command-line arguments accepted by the `research_app` binary.
pub(crate) struct CliArgs {
    #[arg(
        value_name = "TOPIC",
        help = "Research a single topic, print the outcome and exit (default: interactive session)"
    )]
    pub(crate) topic: Option<String>,
    #[arg(
        long,
        value_name = "URL",
        env = "RESEARCH_API_URL",
        help = "Base origin of the research API (default: localhost in debug builds, hosted API otherwise)"
    )]
    pub(crate) api_url: Option<String>,
    #[arg(
        long,
        value_name = "DEST",
        default_value_t = LogDestination::File,
        help = "Where to send logs: file, terminal, both or off"
    )]
    pub(crate) log: LogDestination,
    #[arg(
        long,
        value_name = "FILE",
        default_value = "research.log",
        help = "Log file used by the file destination"
    )]
    pub(crate) log_file: PathBuf,
    #[arg(short, long, help = "Log at debug level")]
    pub(crate) verbose: bool,
}

impl CliArgs {
    pub(crate) fn api_config(&self) -> Result<ApiConfig, ConfigError> {
        ApiConfig::resolve(self.api_url.as_deref(), cfg!(debug_assertions))
    }

    pub(crate) fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
