use dotenv::dotenv;
use headline_skew::config::AppConfig;
use headline_skew::routes;
use headline_skew::services::pipeline::SentimentService;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    info!("Using PORT: {}", config.port);
    info!("Sentiment backend: {:?}", config.backend);

    // The classifier and headline source live for the whole process
    let service = Arc::new(
        SentimentService::from_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to build sentiment service: {}", e))?,
    );

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let app = routes::routes(service).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(app).run(addr).await;
    Ok(())
}
