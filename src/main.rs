use anon_to_zenodo::utils::logger;
use anon_to_zenodo::{app, CliConfig};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting anon-to-zenodo");
    tracing::debug!(
        "dir={}, sandbox={}, publish={}, json={}",
        config.dir.display(),
        config.sandbox,
        config.publish(),
        config.json
    );

    match app::run(&config, |name| std::env::var(name).ok()).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("Upload failed: {} (Category: {:?})", e, e.category());
            tracing::debug!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
