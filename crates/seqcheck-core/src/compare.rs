//! 有序容器相等比较：两种策略、同一份诊断结构。
//!
//! # 教案式说明
//! - **意图 (Why)**：同一个“期望全零、实际在若干下标偏离”的场景，需要分别用“通用相等断言”与
//!   “专用有序容器匹配器”跑一遍，以对比两者的诊断输出。两种策略共享 [`Diagnosis`]，区别只在
//!   判定路径与渲染格式（见 [`crate::diff`]）。
//! - **逻辑 (How)**：
//!   - [`Strategy::PlainEquality`] 先做整体 `==`，只有判定不等时才额外扫描一遍收集诊断；
//!   - [`Strategy::ContainerEquality`] 始终逐元素遍历，并单独核对长度。
//! - **契约 (What)**：两种策略对同一输入给出相同的相等性结论与相同的分歧计数；
//!   详细条目受 [`DiagnosticLimits::max_reported_mismatches`] 截断，但计数永不截断。

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// 比较策略。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 通用相等断言：整体 `==`，失败时打印两侧预览。
    PlainEquality,
    /// 专用有序容器匹配器：逐元素比较并列出每一处差异。
    ContainerEquality,
}

impl Strategy {
    /// 所有策略，按报告顺序排列。
    pub const ALL: [Strategy; 2] = [Strategy::PlainEquality, Strategy::ContainerEquality];

    pub const fn name(self) -> &'static str {
        match self {
            Strategy::PlainEquality => "plain_equality",
            Strategy::ContainerEquality => "container_equality",
        }
    }

    /// 比较两条有序序列。
    ///
    /// # 契约 (What)
    /// - 长度不同或任一公共下标处元素不同，即返回 [`Verdict::Unequal`]；
    /// - 返回的诊断中 `mismatch_count` 覆盖全部公共下标，不受截断影响。
    pub fn compare<T>(self, expected: &[T], actual: &[T], limits: &DiagnosticLimits) -> Verdict
    where
        T: PartialEq + Debug,
    {
        match self {
            Strategy::PlainEquality => {
                if expected == actual {
                    Verdict::Equal
                } else {
                    Verdict::Unequal(Box::new(diagnose(self, expected, actual, limits)))
                }
            }
            Strategy::ContainerEquality => {
                let diagnosis = diagnose(self, expected, actual, limits);
                if diagnosis.mismatch_count == 0 && diagnosis.expected_len == diagnosis.actual_len
                {
                    Verdict::Equal
                } else {
                    Verdict::Unequal(Box::new(diagnosis))
                }
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 诊断输出的截断参数。
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticLimits {
    /// 最多逐条列出的分歧数量。
    pub max_reported_mismatches: usize,
    /// 预览窗口中每侧展示的元素数量。
    pub preview_elements: usize,
}

impl Default for DiagnosticLimits {
    fn default() -> Self {
        Self {
            max_reported_mismatches: 10,
            preview_elements: 8,
        }
    }
}

/// 比较结论。
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Equal,
    Unequal(Box<Diagnosis>),
}

impl Verdict {
    pub fn is_equal(&self) -> bool {
        matches!(self, Verdict::Equal)
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Verdict::Equal => None,
            Verdict::Unequal(diagnosis) => Some(&**diagnosis),
        }
    }
}

/// 单个下标处的分歧，元素以 `Debug` 文本保存以便跨类型序列化。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Mismatch {
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

/// 围绕首个分歧点截取的一段元素预览。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Window {
    /// 预览首元素在原序列中的下标。
    pub start: usize,
    pub values: Vec<String>,
    /// 原序列长度，用于判断两端是否需要省略号。
    pub total_len: usize,
}

impl Window {
    fn capture<T: Debug>(values: &[T], center: usize, width: usize) -> Self {
        let start = center
            .saturating_sub(width / 2)
            .min(values.len().saturating_sub(width));
        let end = (start + width).min(values.len());
        Self {
            start,
            values: values[start..end]
                .iter()
                .map(|value| format!("{value:?}"))
                .collect(),
            total_len: values.len(),
        }
    }

    pub fn is_clipped_front(&self) -> bool {
        self.start > 0
    }

    pub fn is_clipped_back(&self) -> bool {
        self.start + self.values.len() < self.total_len
    }
}

/// 一次不等比较的完整诊断。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Diagnosis {
    pub strategy: Strategy,
    pub expected_len: usize,
    pub actual_len: usize,
    /// 公共下标范围内的分歧总数。
    pub mismatch_count: usize,
    /// 按下标升序列出的分歧条目，最多 `max_reported_mismatches` 条。
    pub mismatches: Vec<Mismatch>,
    /// 首个分歧点：首个不同元素，或在公共前缀完全一致时为较短一侧的长度。
    pub first_divergence: usize,
    pub expected_window: Window,
    pub actual_window: Window,
}

impl Diagnosis {
    /// 已列出条目的下标。
    pub fn mismatch_indices(&self) -> Vec<usize> {
        self.mismatches.iter().map(|mismatch| mismatch.index).collect()
    }

    /// 是否有分歧因截断而未逐条列出。
    pub fn is_truncated(&self) -> bool {
        self.mismatch_count > self.mismatches.len()
    }

    pub fn length_differs(&self) -> bool {
        self.expected_len != self.actual_len
    }
}

fn diagnose<T>(
    strategy: Strategy,
    expected: &[T],
    actual: &[T],
    limits: &DiagnosticLimits,
) -> Diagnosis
where
    T: PartialEq + Debug,
{
    let common = expected.len().min(actual.len());
    let mut mismatch_count = 0;
    let mut mismatches = Vec::new();
    let mut first_divergence = None;

    for (index, (lhs, rhs)) in expected.iter().zip(actual).enumerate() {
        if lhs == rhs {
            continue;
        }
        mismatch_count += 1;
        first_divergence.get_or_insert(index);
        if mismatches.len() < limits.max_reported_mismatches {
            mismatches.push(Mismatch {
                index,
                expected: format!("{lhs:?}"),
                actual: format!("{rhs:?}"),
            });
        }
    }

    let first_divergence = first_divergence.unwrap_or(common);
    Diagnosis {
        strategy,
        expected_len: expected.len(),
        actual_len: actual.len(),
        mismatch_count,
        mismatches,
        first_divergence,
        expected_window: Window::capture(expected, first_divergence, limits.preview_elements),
        actual_window: Window::capture(actual, first_divergence, limits.preview_elements),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> DiagnosticLimits {
        DiagnosticLimits::default()
    }

    #[test]
    fn equal_slices_are_equal_under_both_strategies() {
        let lhs = [1, 2, 3];
        for strategy in Strategy::ALL {
            assert!(strategy.compare(&lhs, &lhs, &limits()).is_equal(), "{strategy}");
        }
    }

    #[test]
    fn both_strategies_agree_on_mismatch_positions() {
        let expected = vec![0; 32];
        let mut actual = vec![0; 32];
        actual[3] = 7;
        actual[31] = 9;

        for strategy in Strategy::ALL {
            let verdict = strategy.compare(&expected, &actual, &limits());
            let diagnosis = verdict.diagnosis().expect("应判定不等");
            assert_eq!(diagnosis.strategy, strategy);
            assert_eq!(diagnosis.mismatch_count, 2);
            assert_eq!(diagnosis.mismatch_indices(), vec![3, 31]);
            assert_eq!(diagnosis.first_divergence, 3);
            assert_eq!(diagnosis.mismatches[1].actual, "9");
        }
    }

    #[test]
    fn length_difference_with_equal_prefix_is_reported() {
        let expected = [1, 2, 3, 4];
        let actual = [1, 2];
        let verdict = Strategy::ContainerEquality.compare(&expected, &actual, &limits());
        let diagnosis = verdict.diagnosis().expect("长度不同必须判定不等");

        assert!(diagnosis.length_differs());
        assert_eq!(diagnosis.mismatch_count, 0);
        assert_eq!(diagnosis.first_divergence, 2);
    }

    #[test]
    fn detail_is_capped_but_count_is_exact() {
        let expected = vec![0u8; 100];
        let actual = vec![1u8; 100];
        let capped = DiagnosticLimits {
            max_reported_mismatches: 4,
            preview_elements: 4,
        };
        let verdict = Strategy::PlainEquality.compare(&expected, &actual, &capped);
        let diagnosis = verdict.diagnosis().expect("应判定不等");

        assert_eq!(diagnosis.mismatch_count, 100);
        assert_eq!(diagnosis.mismatch_indices(), vec![0, 1, 2, 3]);
        assert!(diagnosis.is_truncated());
    }

    #[test]
    fn window_is_centred_and_clamped() {
        let values: Vec<i32> = (0..20).collect();

        let middle = Window::capture(&values, 10, 4);
        assert_eq!(middle.start, 8);
        assert_eq!(middle.values, vec!["8", "9", "10", "11"]);
        assert!(middle.is_clipped_front() && middle.is_clipped_back());

        let tail = Window::capture(&values, 19, 4);
        assert_eq!(tail.start, 16);
        assert!(!tail.is_clipped_back());

        let short = Window::capture(&values[..2], 0, 8);
        assert_eq!(short.start, 0);
        assert_eq!(short.values.len(), 2);
    }
}
