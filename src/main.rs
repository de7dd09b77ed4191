use clap::Parser;
use tokio::net::TcpListener;
use vehicle_models_api::utils::{logger, validation::Validate};
use vehicle_models_api::{api, create_app, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting vehicle-models-api");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證設定
    let settings = match cli.load_settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Upstream {} (make: {}, timeout: {}s), years {}-{}",
        settings.nhtsa_base_url,
        settings.make,
        settings.request_timeout,
        settings.min_year,
        settings.max_year
    );

    let listener = TcpListener::bind(settings.bind_address()).await?;
    let app = create_app(settings);

    api::serve(listener, app).await?;

    Ok(())
}
