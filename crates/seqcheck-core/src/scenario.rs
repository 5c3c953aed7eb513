//! 向量分歧场景与参数化用例生成器。
//!
//! # 教案式说明
//! - **意图 (Why)**：“开头/中间/结尾/多点”四个场景在两种断言风格下结构完全一致，
//!   只差分歧集合与比较策略；因此由 [`build_case`] 按 `(场景, 策略)` 生成，避免复制用例体。
//! - **逻辑 (How)**：场景在构造时即校验分歧集合（越界、重复、零值），用例体内部只做
//!   “构造两条零序列 → 对实际序列应用分歧 → 断言”。
//! - **契约 (What)**：期望序列恒为长度 `n` 的零序列且从不被修改；实际序列只在声明下标处非零。

use std::sync::Arc;

use tracing::warn;

use crate::case::{Case, Suite, assert_sequences_eq};
use crate::compare::{DiagnosticLimits, Strategy};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::sequence::{MutationSet, Sequence, SequenceError};

/// 向量场景所在套件的名称。
pub const VECTOR_SUITE: &str = "std_vector";

/// 多点场景在下标 0、1、2 处相对分歧值的偏移。
pub const MULTIPLE_OFFSETS: [i32; 3] = [0, 10, 20];

/// 一个已校验的分歧场景。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scenario {
    name: String,
    len: usize,
    divergences: MutationSet<i32>,
}

impl Scenario {
    /// 以任意分歧集合构造场景，立即校验。
    pub fn new(name: impl Into<String>, len: usize, divergences: MutationSet<i32>) -> Result<Self> {
        let name = name.into();
        divergences
            .validate(len)
            .map_err(|source| HarnessError::InvalidScenario {
                scenario: name.clone(),
                source,
            })?;
        Ok(Self {
            name,
            len,
            divergences,
        })
    }

    /// 下标 0 处分歧。
    pub fn beginning(len: usize, value: i32) -> Result<Self> {
        Self::new("differs_in_the_beginning", len, MutationSet::new().with(0, value))
    }

    /// 下标 `len / 2` 处分歧。
    pub fn middle(len: usize, value: i32) -> Result<Self> {
        Self::new(
            "differs_in_the_middle",
            len,
            MutationSet::new().with(len / 2, value),
        )
    }

    /// 下标 `len - 1` 处分歧。
    pub fn end(len: usize, value: i32) -> Result<Self> {
        Self::new(
            "differs_in_the_end",
            len,
            MutationSet::new().with(len.saturating_sub(1), value),
        )
    }

    /// 下标 0、1、2 处分别写入 `value`、`value + 10`、`value + 20`（见 [`MULTIPLE_OFFSETS`]）。
    pub fn multiple(len: usize, value: i32) -> Result<Self> {
        let divergences = MULTIPLE_OFFSETS
            .iter()
            .enumerate()
            .map(|(index, offset)| (index, value.saturating_add(*offset)))
            .collect();
        Self::new("differs_at_several_positions", len, divergences)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn divergences(&self) -> &MutationSet<i32> {
        &self.divergences
    }

    /// 构造“期望”序列：长度 `len` 的零序列。
    pub fn expected(&self) -> Sequence<i32> {
        Sequence::zeroed(self.len)
    }

    /// 构造“实际”序列：零序列叠加分歧集合。
    pub fn actual(&self) -> std::result::Result<Sequence<i32>, SequenceError> {
        let mut actual = Sequence::zeroed(self.len);
        actual.apply(&self.divergences)?;
        Ok(actual)
    }
}

/// 参数化用例生成器：同一场景、指定比较策略。
///
/// 用例名为 `<场景名>/<策略名>`。
pub fn build_case(scenario: Arc<Scenario>, strategy: Strategy, limits: DiagnosticLimits) -> Case {
    let name = format!("{}/{}", scenario.name(), strategy.name());
    Case::new(name, move || {
        let expected = scenario.expected();
        let actual = scenario.actual()?;
        assert_sequences_eq(strategy, expected.as_slice(), actual.as_slice(), &limits)?;
        Ok(())
    })
}

/// 按配置生成全部向量场景。
///
/// 序列长度不足 3 时跳过多点场景并记录告警。
pub fn standard_scenarios(config: &HarnessConfig) -> Result<Vec<Scenario>> {
    let len = config.sequence.length;
    let value = config.sequence.divergence_value;

    let mut scenarios = vec![
        Scenario::beginning(len, value)?,
        Scenario::middle(len, value)?,
        Scenario::end(len, value)?,
    ];
    if len >= 3 {
        scenarios.push(Scenario::multiple(len, value)?);
    } else {
        warn!(len, "sequence too short for the multi-position scenario, skipping it");
    }
    Ok(scenarios)
}

/// 生成 `std_vector` 套件：每个场景在每种策略下各一个用例。
pub fn vector_suite(config: &HarnessConfig) -> Result<Suite> {
    let mut suite = Suite::new(VECTOR_SUITE);
    for scenario in standard_scenarios(config)? {
        let scenario = Arc::new(scenario);
        for strategy in Strategy::ALL {
            suite.push(build_case(
                Arc::clone(&scenario),
                strategy,
                config.diagnostics.clone(),
            ));
        }
    }
    Ok(suite)
}
