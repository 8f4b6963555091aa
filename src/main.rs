use clap::Parser;
use parts_pricing::utils::logger;
use parts_pricing::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();

    logger::init_logger(config.verbose, config.log_json);

    tracing::info!("Starting parts-pricing service");
    if config.verbose {
        tracing::debug!(
            "Rules service: {:?}, rules: {:?}",
            config.service_host,
            config.rule_set()
        );
    }

    // Missing settings only fail the calls that need them.
    for problem in config.problems() {
        tracing::warn!("⚠️ Configuration: {}", problem);
    }

    if config.log_success {
        tracing::info!("🔍 Success logging enabled");
    }

    parts_pricing::serve(config).await
}
