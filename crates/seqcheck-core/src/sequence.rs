//! 定长有序序列与分歧（mutation）集合。
//!
//! # 教案式说明
//! - **意图 (Why)**：每个向量用例都需要一对“期望/实际”序列，且实际序列只能在声明的下标处偏离零值；
//!   把构造与校验收敛到这里，用例体就只剩“构造 → 应用分歧 → 断言”三步。
//! - **契约 (What)**：[`Sequence::zeroed`] 产出的序列全部为 `T::default()`；
//!   [`Sequence::apply`] 要么完整应用整个 [`MutationSet`]，要么在任何写入之前返回错误。

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// 应用分歧集合时可能出现的错误。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SequenceError {
    /// 下标越界。
    #[error("divergence index {index} is out of range for a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// 同一下标被声明了多次。
    #[error("divergence index {index} is declared more than once")]
    DuplicateIndex { index: usize },

    /// 分歧值等于零值，无法真正制造差异。
    #[error("divergence at index {index} uses the zero value and would not diverge")]
    ZeroDivergence { index: usize },
}

/// 定长、零初始化的有序序列。
///
/// 构造后长度不可变；元素只能通过 [`Sequence::apply`] 按分歧集合覆盖。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sequence<T> {
    values: Vec<T>,
}

impl<T> Sequence<T>
where
    T: Copy + Default + PartialEq,
{
    /// 构造长度为 `len`、全部元素为 `T::default()` 的序列。
    pub fn zeroed(len: usize) -> Self {
        Self {
            values: vec![T::default(); len],
        }
    }

    /// 将分歧集合写入序列。
    ///
    /// # 教案式说明
    /// - **逻辑 (How)**：先调用 [`MutationSet::validate`] 整体校验，再逐条覆盖，保证失败时序列保持原样。
    /// - **契约 (What)**：成功后序列只在 `mutations` 声明的下标处与零值不同。
    pub fn apply(&mut self, mutations: &MutationSet<T>) -> Result<(), SequenceError> {
        mutations.validate(self.values.len())?;
        for &(index, value) in mutations.iter() {
            self.values[index] = value;
        }
        Ok(())
    }

    /// 返回给定下标处的元素。
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }
}

impl<T> Sequence<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> AsRef<[T]> for Sequence<T> {
    fn as_ref(&self) -> &[T] {
        &self.values
    }
}

/// 一组 `(下标, 值)` 分歧声明，按声明顺序保存。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MutationSet<T> {
    entries: Vec<(usize, T)>,
}

impl<T> MutationSet<T>
where
    T: Copy + Default + PartialEq,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 追加一条分歧声明，构建器风格。
    pub fn with(mut self, index: usize, value: T) -> Self {
        self.entries.push((index, value));
        self
    }

    /// 校验分歧集合能否作用于长度为 `len` 的序列。
    ///
    /// 检查顺序与声明顺序一致，返回遇到的第一个问题。
    pub fn validate(&self, len: usize) -> Result<(), SequenceError> {
        let mut seen = BTreeSet::new();
        for &(index, value) in &self.entries {
            if index >= len {
                return Err(SequenceError::IndexOutOfRange { index, len });
            }
            if !seen.insert(index) {
                return Err(SequenceError::DuplicateIndex { index });
            }
            if value == T::default() {
                return Err(SequenceError::ZeroDivergence { index });
            }
        }
        Ok(())
    }
}

impl<T> MutationSet<T> {
    pub fn iter(&self) -> impl Iterator<Item = &(usize, T)> {
        self.entries.iter()
    }

    /// 声明的下标，按升序返回。
    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.entries.iter().map(|(index, _)| *index).collect();
        indices.sort_unstable();
        indices
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<(usize, T)> for MutationSet<T> {
    fn from_iter<I: IntoIterator<Item = (usize, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for MutationSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (position, (index, value)) in self.entries.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "[{index}] = {value:?}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_sequence_has_requested_length_and_default_values() {
        let seq = Sequence::<i32>::zeroed(16);
        assert_eq!(seq.len(), 16);
        assert!(seq.as_slice().iter().all(|value| *value == 0));
    }

    #[test]
    fn apply_overwrites_only_declared_indices() {
        let mut seq = Sequence::<i32>::zeroed(8);
        let mutations = MutationSet::new().with(0, 20).with(7, 40);
        seq.apply(&mutations).expect("合法分歧应被接受");

        assert_eq!(seq.get(0), Some(20));
        assert_eq!(seq.get(7), Some(40));
        assert_eq!(&seq.as_slice()[1..7], &[0; 6]);
    }

    #[test]
    fn apply_rejects_out_of_range_without_partial_writes() {
        let mut seq = Sequence::<i32>::zeroed(4);
        let mutations = MutationSet::new().with(1, 5).with(4, 6);

        let err = seq.apply(&mutations).unwrap_err();
        assert_eq!(err, SequenceError::IndexOutOfRange { index: 4, len: 4 });
        assert_eq!(seq, Sequence::zeroed(4), "失败时序列必须保持零值");
    }

    #[test]
    fn validate_rejects_duplicates_and_zero_values() {
        let dup = MutationSet::new().with(2, 1).with(2, 3);
        assert_eq!(
            dup.validate(10),
            Err(SequenceError::DuplicateIndex { index: 2 })
        );

        let zero = MutationSet::new().with(3, 0);
        assert_eq!(
            zero.validate(10),
            Err(SequenceError::ZeroDivergence { index: 3 })
        );
    }

    #[test]
    fn indices_are_sorted() {
        let set: MutationSet<i32> = [(9, 1), (0, 2), (4, 3)].into_iter().collect();
        assert_eq!(set.indices(), vec![0, 4, 9]);
        assert_eq!(set.to_string(), "{[9] = 1, [0] = 2, [4] = 3}");
    }
}
