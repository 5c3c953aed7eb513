//! 运行配置：TOML 文件 + 默认值 + 校验。
//!
//! # 教案式说明
//! - **意图 (Why)**：序列长度、分歧值、诊断截断参数与运行选项需要在不改代码的前提下调整，
//!   同时保持“零配置即可跑”的体验。
//! - **逻辑 (How)**：各节均为 `#[serde(default, deny_unknown_fields)]`，缺省字段取默认值，拼写错误的字段
//!   直接报错；解析后统一经过 [`HarnessConfig::validate`]。
//! - **契约 (What)**：通过 [`HarnessConfig::load`] / [`HarnessConfig::from_toml_str`] 得到的配置一定已校验。
//!
//! 示例：
//!
//! ```toml
//! [sequence]
//! length = 1000000
//! divergence_value = 20
//!
//! [diagnostics]
//! max_reported_mismatches = 10
//! preview_elements = 8
//!
//! [run]
//! repeat = 1
//! filter = "std_vector.*"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::compare::DiagnosticLimits;
use crate::error::{HarnessError, Result};
use crate::scenario::MULTIPLE_OFFSETS;

/// 默认序列长度，足以体现整段比较的开销。
pub const DEFAULT_SEQUENCE_LENGTH: usize = 1_000_000;

/// 默认分歧值。
pub const DEFAULT_DIVERGENCE_VALUE: i32 = 20;

/// 顶层配置。
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub sequence: SequenceConfig,
    pub diagnostics: DiagnosticLimits,
    pub run: RunConfig,
}

/// `[sequence]` 节。
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SequenceConfig {
    pub length: usize,
    pub divergence_value: i32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_SEQUENCE_LENGTH,
            divergence_value: DEFAULT_DIVERGENCE_VALUE,
        }
    }
}

/// `[run]` 节；命令行参数会覆盖这里的取值。
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub repeat: u32,
    pub filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repeat: 1,
            filter: None,
        }
    }
}

impl HarnessConfig {
    /// 从文件加载并校验。
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HarnessError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// 从内存中的 TOML 文本解析并校验，`origin` 仅用于错误信息。
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| HarnessError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值约束。
    pub fn validate(&self) -> Result<()> {
        if self.sequence.length == 0 {
            return Err(invalid("sequence.length", "must be at least 1"));
        }
        if self.sequence.divergence_value == 0 {
            return Err(invalid(
                "sequence.divergence_value",
                "must be non-zero so the actual sequence diverges",
            ));
        }
        let value = self.sequence.divergence_value;
        if MULTIPLE_OFFSETS
            .iter()
            .any(|offset| value.saturating_add(*offset) == 0)
        {
            return Err(invalid(
                "sequence.divergence_value",
                "must not be -10 or -20: the multi-position scenario would write a zero",
            ));
        }
        if self.diagnostics.max_reported_mismatches == 0 {
            return Err(invalid(
                "diagnostics.max_reported_mismatches",
                "must be at least 1",
            ));
        }
        if self.run.repeat == 0 {
            return Err(invalid("run.repeat", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> HarnessError {
    HarnessError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
