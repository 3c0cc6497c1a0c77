use clap::Parser;
use std::sync::Arc;
use swim_scrape::adapters::default_renderer;
use swim_scrape::config::cli::Command;
use swim_scrape::utils::error::ErrorCategory;
use swim_scrape::utils::{logger, validation::Validate};
use swim_scrape::{
    BatchConfig, CliConfig, EventScraper, HttpTransport, LocalStorage, ResultsPipeline,
    ScrapeError,
};

fn exit_code(error: &ScrapeError) -> i32 {
    match error.category() {
        ErrorCategory::Config | ErrorCategory::Payload | ErrorCategory::Renderer => 1,
        ErrorCategory::Transport => 2,
        ErrorCategory::Io => 3,
    }
}

fn report(error: &ScrapeError) -> i32 {
    tracing::error!(
        "❌ {} (Category: {:?})",
        error,
        error.category()
    );
    tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error);
    exit_code(error)
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting swim-scrape");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        std::process::exit(report(&e));
    }

    let transport = match HttpTransport::new() {
        Ok(transport) => Arc::new(transport),
        Err(e) => std::process::exit(report(&e)),
    };
    let pipeline = match default_renderer() {
        Some(renderer) => ResultsPipeline::with_renderer(renderer),
        None => ResultsPipeline::new(),
    };
    if config.render_js && !pipeline.has_renderer() {
        tracing::warn!("⚠️ --render-js requested but this build has no page renderer");
    }

    let scraper = EventScraper::new(
        config.base_url.clone(),
        transport,
        pipeline,
        LocalStorage::default(),
    );
    let policy = config.policy();

    let code = match &config.command {
        Command::Fetch(args) => match scraper.scrape_to_csv(&args.to_event(), &policy).await {
            Ok(path) => {
                println!("📁 Output saved to: {}", path);
                0
            }
            Err(e) => report(&e),
        },
        Command::FetchAll { config: path } => {
            let batch = match BatchConfig::from_file(path) {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!("Could not read config: {}", e);
                    std::process::exit(report(&e));
                }
            };

            for rejected in &batch.rejected {
                tracing::error!(
                    "Skipping event #{} with {}: {}",
                    rejected.index,
                    rejected.reason,
                    rejected.entry
                );
            }

            let summary = scraper.run_batch(&batch.events, &policy).await;
            for path in &summary.written {
                println!("📁 {}", path);
            }

            if summary.is_success() && batch.rejected.is_empty() {
                0
            } else {
                1
            }
        }
    };

    std::process::exit(code);
}
