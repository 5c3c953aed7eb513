//! 用例与套件的元信息，以及用例体内使用的断言辅助函数。
//!
//! # 教案式说明
//! - **意图 (Why)**：用例不再自注册到全局集合，而是由调用方显式构造 [`Suite`] 列表交给
//!   [`crate::runner::run`]；因此用例本身只是“名称 + 可调用体”。
//! - **逻辑 (How)**：用例体返回 [`CaseResult`]，断言辅助函数在失败时构造 [`AssertionFailure`]
//!   并经 `?` 提前返回；panic 仍由运行器兜底捕获。
//! - **契约 (What)**：用例体不得依赖跨用例的共享可变状态，多次执行结果必须一致。

use std::any::Any;
use std::fmt::{self, Debug};
use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

use crate::compare::{DiagnosticLimits, Diagnosis, Strategy, Verdict};
use crate::diff;
use crate::sequence::SequenceError;

/// 用例体的返回值。
pub type CaseResult = Result<(), CaseFailure>;

/// 用例体：零参数、可重复调用、可跨线程移动。
pub type CaseBody = Box<dyn Fn() -> CaseResult + Send + Sync>;

/// 一次失败的断言。
#[derive(Clone, Debug, Error, Eq, PartialEq, Serialize)]
#[error("{location}: {message}")]
pub struct AssertionFailure {
    /// 断言所在源码位置，形如 `file.rs:42`。
    pub location: String,
    /// 渲染后的诊断文本。
    pub message: String,
    /// 序列比较失败时附带的结构化诊断。
    pub diagnosis: Option<Diagnosis>,
}

impl AssertionFailure {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Location::caller(), message.into(), None)
    }

    fn at(location: &Location<'_>, message: String, diagnosis: Option<Diagnosis>) -> Self {
        Self {
            location: format!("{}:{}", location.file(), location.line()),
            message,
            diagnosis,
        }
    }
}

/// 用例失败的全部类别。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CaseFailure {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    /// 用例准备阶段失败，断言尚未执行。
    #[error("case setup failed: {0}")]
    Setup(#[from] SequenceError),
}

/// 单个用例：名称加可调用体。
pub struct Case {
    name: String,
    body: CaseBody,
}

impl Case {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> CaseResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 执行用例体。panic 不在此处捕获。
    pub fn execute(&self) -> CaseResult {
        (self.body)()
    }
}

impl Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case").field("name", &self.name).finish_non_exhaustive()
    }
}

/// 同一主题的一组用例。
///
/// # 教案式说明
/// - **逻辑 (How)**：用例按插入顺序保存，运行器按同一顺序执行并报告。
/// - **契约 (What)**：同一套件内用例名唯一；全名为 `套件名.用例名`，过滤器基于全名匹配。
#[derive(Debug)]
pub struct Suite {
    name: String,
    cases: Vec<Case>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    /// 追加用例，构建器风格。
    pub fn with_case(mut self, case: Case) -> Self {
        self.push(case);
        self
    }

    pub fn push(&mut self, case: Case) {
        debug_assert!(
            self.cases.iter().all(|existing| existing.name != case.name),
            "套件 `{}` 中用例名 `{}` 重复",
            self.name,
            case.name
        );
        self.cases.push(case);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// 用例全名。
    pub fn full_name(&self, case: &Case) -> String {
        format!("{}.{}", self.name, case.name)
    }
}

/// 以给定策略断言两条有序序列相等。
///
/// 失败信息中两侧分别标注为 `expected` 与 `actual`。
#[track_caller]
pub fn assert_sequences_eq<T>(
    strategy: Strategy,
    expected: &[T],
    actual: &[T],
    limits: &DiagnosticLimits,
) -> Result<(), AssertionFailure>
where
    T: PartialEq + Debug,
{
    let location = Location::caller();
    match strategy.compare(expected, actual, limits) {
        Verdict::Equal => Ok(()),
        Verdict::Unequal(diagnosis) => {
            let message = diff::render(&diagnosis, "expected", "actual");
            Err(AssertionFailure::at(location, message, Some(*diagnosis)))
        }
    }
}

/// 断言两个标量相等，`what` 描述被比较的表达式。
#[track_caller]
pub fn assert_eq_values<T>(expected: T, actual: T, what: &str) -> Result<(), AssertionFailure>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        return Ok(());
    }
    Err(AssertionFailure::new(format!(
        "Expected equality of these values:\n  {what}\n    Which is: {actual:?}\n  expected\n    Which is: {expected:?}"
    )))
}

/// 断言条件成立。
#[track_caller]
pub fn assert_true(condition: bool, what: &str) -> Result<(), AssertionFailure> {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new(format!(
            "Value of: {what}\n  Actual: false\nExpected: true"
        )))
    }
}

/// 把 panic 载荷转成可读文本。
///
/// 载荷通常是 `&str` 或 `String`；其余类型统一记为未知。
pub(crate) fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<unknown panic payload>".to_string()
    }
}
