use clap::Parser;
use support_relay::utils::{logger, validation::Validate};
use support_relay::{server, CliArgs, RelayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Starting support-relay");

    // 載入配置：指定檔案時用 TOML，否則讀環境變數
    let loaded = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            RelayConfig::from_file(path)
        }
        None => RelayConfig::from_env(),
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    if args.verbose {
        tracing::debug!("Relay config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "Relaying to {} via {}:{} ({} mode, token cache {})",
        config.mail.operator_address,
        config.mail.smtp_host,
        config.mail.smtp_port,
        config.environment().as_str(),
        if config.dispatch.cache_tokens { "on" } else { "off" }
    );

    let app = server::app_from_config(&config)?;
    server::serve(("0.0.0.0", config.server.port), app).await?;

    tracing::info!("Server stopped");
    Ok(())
}
