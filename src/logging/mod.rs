pub mod auction_log;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// 初始化全局 tracing：JSON 格式，按小时滚动写入 `log_dir`
///
/// 返回的 guard 需要一直持有，drop 时会把缓冲区刷盘。
pub fn init_tracing(log_dir: &str) -> Result<WorkerGuard, tracing::subscriber::SetGlobalDefaultError> {
    let log_file = rolling::hourly(log_dir, "exads_gateway.json");
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let subscriber = Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
