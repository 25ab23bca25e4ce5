// src/main.rs

use std::sync::Arc;

use axum::{routing::post, serve, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use exads_adapter::adapter::ExadsAdapter;
use exads_adapter::api::{handlers::handle_auction, AppState};
use exads_adapter::bidding::dispatcher::Dispatcher;
use exads_adapter::config::{AdapterConfig, ConfigAdapter, FileConfigAdapter};
use exads_adapter::logging::init_tracing;
use exads_adapter::mock_server;

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "Demo gateway for the exads bid adapter")]
struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    /// 模拟 exads 广告服务器端口，0 表示不启动
    #[arg(long, default_value_t = 9001)]
    mock_port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// 适配器配置文件（JSON），缺失时使用默认配置
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let _guard = match init_tracing(&args.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Unable to set global tracing subscriber: {}", e);
            return;
        }
    };
    info!("exads gateway starting on port {}", args.port);

    let config = match &args.config {
        Some(path) => FileConfigAdapter::new(path).load(),
        None => AdapterConfig::default(),
    };
    info!(
        "adapter config: bidder={}, partners={:?}, timeout={}ms",
        config.bidder_code, config.partners, config.request_timeout_ms
    );

    if args.mock_port != 0 {
        let mock_port = args.mock_port;
        tokio::spawn(async move {
            if let Err(e) = mock_server::start_mock_server(mock_port).await {
                error!("mock exads server stopped: {}", e);
            }
        });
    }

    let state = Arc::new(AppState {
        dispatcher: Arc::new(Dispatcher::new(config.request_timeout_ms)),
        adapter: Arc::new(ExadsAdapter::new(config)),
    });

    let app = Router::new()
        .route("/auction", post(handle_auction))
        .with_state(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("unable to bind {}: {}", addr, e);
            return;
        }
    };
    info!("exads gateway running at http://{}", addr);

    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("unable to listen for shutdown signal: {}", e);
        }
        info!("Shutting down gracefully...");
    };
    if let Err(e) = serve(listener, app).with_graceful_shutdown(shutdown).await {
        error!("gateway stopped: {}", e);
    }
    info!("exads gateway shut down.");
}
