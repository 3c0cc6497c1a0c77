pub mod batch_config;
#[cfg(feature = "cli")]
pub mod cli;

pub const DEFAULT_BASE_URL: &str = "https://www.swimmeet.com";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

pub use batch_config::{BatchConfig, ConfigFormat, RejectedEvent};
#[cfg(feature = "cli")]
pub use cli::CliConfig;
