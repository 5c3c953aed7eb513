//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义“用例之外”的失败：配置读取/解析/校验、场景声明非法、报告落盘失败；
//! - 用例内部的断言失败不在此处，它们由 [`crate::case::CaseFailure`] 表达并被运行器逐条记录，
//!   永远不会中断整次运行。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，可直接交给调用方的 `?` 链路；
//! - 变体携带足够的上下文（路径、字段名），便于 CLI 直接打印给用户。

use std::path::PathBuf;

use thiserror::Error;

use crate::sequence::SequenceError;

/// 工作区内统一的 `Result` 别名。
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// 运行器层面的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：CLI 需要区分“断言失败”（退出码 1）与“运行环境错误”（退出码 2），
///   因此后者集中建模为 `HarnessError`，前者走 `RunReport` 聚合。
/// - **契约 (What)**：所有变体均为 `Send + Sync + 'static`；`Display` 文本面向终端用户。
#[derive(Debug, Error)]
pub enum HarnessError {
    /// 读取配置文件失败。
    #[error("failed to read config file `{path}`: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件不是合法的 TOML，或字段类型不符。
    #[error("failed to parse config file `{path}`: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 配置可以解析，但取值违反约束（例如序列长度为 0）。
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// 场景声明的分歧集合无法应用到目标序列。
    #[error("scenario `{scenario}` is invalid: {source}")]
    InvalidScenario {
        scenario: String,
        #[source]
        source: SequenceError,
    },

    /// 运行报告序列化失败。
    #[error("failed to serialize run report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    /// 运行报告写入失败。
    #[error("failed to write run report `{path}`: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
