use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::model::{EventSpec, FailureMode, ParsePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_seconds, validate_url, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "swim-scrape")]
#[command(about = "Fetch swim meet results and write them to CSV")]
pub struct CliConfig {
    /// Base URL for the swim meet data service
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds (also bounds page rendering)
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: f64,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Retry once with headless rendering when the response cannot be parsed
    #[arg(long, global = true)]
    pub render_js: bool,

    /// Fail when no rows can be parsed (default for `fetch`)
    #[arg(long, global = true, conflicts_with = "lenient")]
    pub strict: bool,

    /// Log a warning and write an empty file when no rows can be parsed (default for `fetch-all`)
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch a single event
    Fetch(FetchArgs),
    /// Fetch events defined in a YAML, TOML or JSON config file
    FetchAll {
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Season identifier (e.g. 2024-2025)
    #[arg(long)]
    pub season: String,
    /// Season phase (e.g. prelims, finals)
    #[arg(long)]
    pub phase: String,
    /// Gender category (e.g. girls, boys)
    #[arg(long)]
    pub gender: String,
    /// Division identifier (e.g. d1)
    #[arg(long)]
    pub division: String,
    /// Event slug (e.g. 50-freestyle)
    #[arg(long)]
    pub event_slug: String,
    /// State abbreviation or name
    #[arg(long)]
    pub state: String,
    /// Meet slug; switches to the per-meet URL layout
    #[arg(long)]
    pub meet_slug: Option<String>,
    #[arg(long, default_value = "xml")]
    pub extension: String,
    /// Output CSV path
    #[arg(long)]
    pub out: String,
}

impl FetchArgs {
    pub fn to_event(&self) -> EventSpec {
        EventSpec {
            season: self.season.clone(),
            phase: self.phase.clone(),
            gender: self.gender.clone(),
            division: self.division.clone(),
            event_slug: self.event_slug.clone(),
            state: self.state.clone(),
            out: self.out.clone(),
            meet_slug: self.meet_slug.clone(),
            extension: Some(self.extension.clone()),
            render_js: None,
        }
    }
}

impl CliConfig {
    /// 單一事件預設嚴格、批次預設寬鬆；`--strict`/`--lenient` 可覆寫
    pub fn failure_mode(&self) -> FailureMode {
        if self.strict {
            FailureMode::Strict
        } else if self.lenient {
            FailureMode::Lenient
        } else {
            match self.command {
                Command::Fetch(_) => FailureMode::Strict,
                Command::FetchAll { .. } => FailureMode::Lenient,
            }
        }
    }

    pub fn policy(&self) -> ParsePolicy {
        ParsePolicy {
            render_js: self.render_js,
            failure_mode: self.failure_mode(),
            timeout_secs: self.timeout,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_positive_seconds("timeout", self.timeout)?;
        if let Command::Fetch(args) = &self.command {
            args.to_event().validate()?;
        }
        Ok(())
    }
}
