use clap::Parser;
use tinywebdb_edge::adapters::server;
use tinywebdb_edge::core::ConfigProvider;
use tinywebdb_edge::utils::{logger, validation::Validate};
use tinywebdb_edge::{connect_pool, CliConfig, Env};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting tinywebdb-edge");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let settings = config.resolve()?;

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let pool = connect_pool(settings.database_url(), settings.max_connections()).await?;
    tracing::info!("🗄️ Database ready: {}", settings.database_url());

    let listener = TcpListener::bind(&settings.bind).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    server::serve(listener, Env { db: pool }, settings.max_body_bytes).await?;
    Ok(())
}
