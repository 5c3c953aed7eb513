//! 日志安装入口。
//!
//! # 教案式说明
//! - **意图 (Why)**：运行器的控制台报告写 stdout，诊断日志走 `tracing` 写 stderr，两者互不干扰，
//!   便于把报告重定向到文件而保留日志。
//! - **逻辑 (How)**：`registry + EnvFilter + fmt` 组装全局 Subscriber；`RUST_LOG` 缺省时取 `info`。
//! - **契约 (What)**：进程内只允许安装一次；外部已设置全局 Subscriber 时返回
//!   [`LoggingError::SubscriberAlreadySet`]。

use std::io;

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// 日志安装失败。
#[derive(Debug, Error)]
pub enum LoggingError {
    /// 进程内已经存在全局 Subscriber。
    #[error("a global tracing subscriber is already installed")]
    SubscriberAlreadySet,

    #[error("failed to install tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 安装全局日志 Subscriber。
pub fn install_logging() -> Result<(), LoggingError> {
    if dispatcher::has_been_set() {
        return Err(LoggingError::SubscriberAlreadySet);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
