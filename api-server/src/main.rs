use api_server::core::{Config, Server};
use api_server::utils::logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    logger::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        config.log_dir.as_deref(),
    );

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Starting API server"
    );

    Server::new(config).run().await
}
