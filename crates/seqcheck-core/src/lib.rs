//! seqcheck 核心：有序序列相等断言、差异诊断与用例运行器。
//!
//! # 教案式综述（Why / How / What）
//! - **为什么存在**：演示“通用相等断言”与“专用有序容器匹配器”在同一失败场景下的诊断差异。
//!   场景固定为两条长度 `n` 的整型序列：期望序列全零，实际序列在开头、中间、结尾或多个位置偏离。
//! - **如何组织**：
//!   - [`sequence`]：定长零初始化序列与分歧集合；
//!   - [`compare`] / [`diff`]：两种比较策略、结构化诊断与文本渲染；
//!   - [`case`]：用例/套件元信息与断言辅助函数；
//!   - [`scenario`]：参数化用例生成器，`(场景, 策略)` → 用例；
//!   - [`samples`]：阶乘与素数判定的通过型示例套件；
//!   - [`runner`]：顺序执行、捕获 panic、聚合为 [`runner::RunReport`]；
//!   - [`config`] / [`error`] / [`observability`]：配置、错误域与日志安装；
//!   - `conformance`：自检套件，经 `run_*_conformance` 与 `#[seqcheck_tck]` 宏暴露。
//! - **契约说明**：用例列表由调用方显式构造并传入 [`runner::run`]，不存在全局注册表；
//!   断言失败只记录、不中断，退出码由 [`runner::RunReport::exit_code`] 给出。
//!
//! # 模块结构
//! - 顶层 re-export 常用类型与 `run_*_conformance` 入口，宏展开时直接引用这些路径。

pub mod case;
pub mod compare;
pub mod config;
mod conformance;
pub mod diff;
pub mod error;
pub mod observability;
pub mod runner;
pub mod samples;
pub mod scenario;
pub mod sequence;

pub use case::{AssertionFailure, Case, CaseFailure, CaseResult, Suite};
pub use compare::{DiagnosticLimits, Diagnosis, Mismatch, Strategy, Verdict};
pub use config::HarnessConfig;
pub use conformance::{
    run_beginning_conformance, run_end_conformance, run_idempotence_conformance,
    run_middle_conformance, run_multiple_conformance, run_samples_conformance,
};
pub use error::{HarnessError, Result};
pub use runner::{CaseFilter, ConsoleReporter, Reporter, RunOptions, RunReport, run};
pub use seqcheck_macros::seqcheck_tck;
pub use sequence::{MutationSet, Sequence, SequenceError};

/// 按配置构造默认套件列表：`std_vector` 在前，`sample1` 在后。
pub fn default_suites(config: &HarnessConfig) -> Result<Vec<Suite>> {
    Ok(vec![
        scenario::vector_suite(config)?,
        samples::sample_suite(),
    ])
}
