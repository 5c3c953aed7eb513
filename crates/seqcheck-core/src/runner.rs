//! 用例运行器：顺序执行、逐条记录、整体汇总。
//!
//! # 教案式说明
//! - **意图 (Why)**：运行器只负责“聚合”，不负责“恢复”。任何一个用例失败（断言失败、准备失败或 panic）
//!   都只会写入该用例的记录，后续用例照常执行；最终由 [`RunReport::exit_code`] 映射为进程退出码。
//! - **逻辑 (How)**：
//!   1. 依据 [`CaseFilter`] 选出用例，顺序不变；
//!   2. 每轮迭代对每个用例调用 [`Case::execute`]，外层包一层 [`panic::catch_unwind`]；
//!   3. 结果转成 [`CaseRecord`]，同时回调 [`Reporter`] 并写 `tracing` 日志。
//! - **契约 (What)**：单线程同步执行；同一用例在不同迭代间不共享状态；`repeat` 至少为 1。

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::case::{AssertionFailure, Case, CaseFailure, Suite, describe_panic};
use crate::error::{HarnessError, Result};

/// 运行选项。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunOptions {
    pub filter: CaseFilter,
    pub repeat: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            filter: CaseFilter::all(),
            repeat: 1,
        }
    }
}

/// 基于用例全名（`套件.用例`）的过滤器。
///
/// # 教案式说明
/// - **语法 (What)**：`正向模式[:正向模式...][-负向模式[:负向模式...]]`；`*` 匹配任意长度字符，
///   `?` 匹配单个字符；正向部分为空等价于 `*`。
/// - **判定 (How)**：命中任一正向模式且不命中任何负向模式即选中。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseFilter {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl CaseFilter {
    /// 选中全部用例。
    pub fn all() -> Self {
        Self {
            positive: vec!["*".to_string()],
            negative: Vec::new(),
        }
    }

    pub fn parse(pattern: &str) -> Self {
        let (positive, negative) = match pattern.split_once('-') {
            Some((positive, negative)) => (positive, negative),
            None => (pattern, ""),
        };
        let split = |part: &str| -> Vec<String> {
            part.split(':')
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut positive = split(positive);
        if positive.is_empty() {
            positive.push("*".to_string());
        }
        Self {
            positive,
            negative: split(negative),
        }
    }

    pub fn matches(&self, full_name: &str) -> bool {
        self.positive
            .iter()
            .any(|pattern| wildcard_match(pattern, full_name))
            && !self
                .negative
                .iter()
                .any(|pattern| wildcard_match(pattern, full_name))
    }
}

impl Default for CaseFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// `*` / `?` 通配匹配，回溯最近一个 `*`。
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|ch| *ch == '*')
}

/// 单个用例一次执行的结果。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed { failure: AssertionFailure },
    SetupFailed { message: String },
    Panicked { message: String },
}

impl CaseStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    /// 失败时的可读说明。
    pub fn message(&self) -> Option<String> {
        match self {
            CaseStatus::Passed => None,
            CaseStatus::Failed { failure } => Some(failure.to_string()),
            CaseStatus::SetupFailed { message } => Some(format!("setup failed: {message}")),
            CaseStatus::Panicked { message } => Some(format!("panicked: {message}")),
        }
    }
}

/// 一条执行记录。
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CaseRecord {
    pub suite: String,
    pub case: String,
    /// 从 1 开始的迭代序号。
    pub iteration: u32,
    #[serde(flatten)]
    pub status: CaseStatus,
    #[serde(serialize_with = "serialize_micros", rename = "elapsed_us")]
    pub elapsed: Duration,
}

impl CaseRecord {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.case)
    }
}

fn serialize_micros<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

/// 整次运行的汇总。
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RunReport {
    passed: usize,
    failed: usize,
    records: Vec<CaseRecord>,
}

impl RunReport {
    fn push(&mut self, record: CaseRecord) {
        if record.status.is_passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.records.push(record);
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// 失败记录，按执行顺序。
    pub fn failures(&self) -> impl Iterator<Item = &CaseRecord> {
        self.records.iter().filter(|record| !record.status.is_passed())
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// 全部通过为 0，否则为 1。
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 以 JSON 写入文件，末尾附换行。
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        std::fs::write(path, json).map_err(|source| HarnessError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// 运行过程回调。
///
/// 默认实现全部为空，实现方按需覆盖。
pub trait Reporter {
    fn on_run_start(&mut self, _selected: usize, _repeat: u32) {}
    fn on_iteration_start(&mut self, _iteration: u32, _repeat: u32) {}
    fn on_case_start(&mut self, _full_name: &str) {}
    fn on_case_end(&mut self, _record: &CaseRecord) {}
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// 不输出任何内容的报告器。
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// 终端报告器，版式为 `[ RUN      ]` / `[       OK ]` / `[  FAILED  ]`。
///
/// 写入失败会被忽略：报告输出不影响运行结果。
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, selected: usize, _repeat: u32) {
        let _ = writeln!(self.out, "[==========] Running {selected} case(s).");
    }

    fn on_iteration_start(&mut self, iteration: u32, repeat: u32) {
        if repeat > 1 {
            let _ = writeln!(self.out, "\nRepeating all cases (iteration {iteration}) . . .\n");
        }
    }

    fn on_case_start(&mut self, full_name: &str) {
        let _ = writeln!(self.out, "[ RUN      ] {full_name}");
    }

    fn on_case_end(&mut self, record: &CaseRecord) {
        let millis = record.elapsed.as_millis();
        match record.status.message() {
            None => {
                let _ = writeln!(self.out, "[       OK ] {} ({millis} ms)", record.full_name());
            }
            Some(message) => {
                let _ = writeln!(self.out, "{message}");
                let _ = writeln!(self.out, "[  FAILED  ] {} ({millis} ms)", record.full_name());
            }
        }
    }

    fn on_run_end(&mut self, report: &RunReport) {
        let _ = writeln!(self.out, "[==========] {} case(s) ran.", report.total());
        let _ = writeln!(self.out, "[  PASSED  ] {} case(s).", report.passed());
        if report.failed() > 0 {
            let _ = writeln!(
                self.out,
                "[  FAILED  ] {} case(s), listed below:",
                report.failed()
            );
            for record in report.failures() {
                let _ = writeln!(self.out, "[  FAILED  ] {}", record.full_name());
            }
        }
        let _ = self.out.flush();
    }
}

/// 按选项列出被选中的用例全名，不执行。
pub fn list_cases(suites: &[Suite], filter: &CaseFilter) -> Vec<String> {
    selected(suites, filter)
        .map(|(suite, case)| suite.full_name(case))
        .collect()
}

fn selected<'a>(
    suites: &'a [Suite],
    filter: &'a CaseFilter,
) -> impl Iterator<Item = (&'a Suite, &'a Case)> + 'a {
    suites.iter().flat_map(move |suite| {
        suite
            .cases()
            .iter()
            .filter(move |case| filter.matches(&suite.full_name(case)))
            .map(move |case| (suite, case))
    })
}

/// 执行全部被选中的用例并返回汇总。
///
/// # 教案式说明
/// - **逻辑 (How)**：外层按迭代、内层按“套件 → 用例”顺序执行；每个用例独立捕获 panic。
/// - **契约 (What)**：
///   - 无论前序用例如何失败，都会执行完全部被选中的用例；
///   - `options.repeat` 为 0 时按 1 处理；
///   - 返回的记录数 = 被选中用例数 × 迭代次数。
pub fn run(suites: &[Suite], options: &RunOptions, reporter: &mut dyn Reporter) -> RunReport {
    let repeat = options.repeat.max(1);
    let cases: Vec<(&Suite, &Case)> = selected(suites, &options.filter).collect();
    info!(selected = cases.len(), repeat, "starting run");
    reporter.on_run_start(cases.len(), repeat);

    let mut report = RunReport::default();
    for iteration in 1..=repeat {
        reporter.on_iteration_start(iteration, repeat);
        for &(suite, case) in &cases {
            let full_name = suite.full_name(case);
            reporter.on_case_start(&full_name);
            let record = run_case(suite, case, iteration);
            reporter.on_case_end(&record);
            report.push(record);
        }
    }

    info!(
        passed = report.passed(),
        failed = report.failed(),
        "run finished"
    );
    reporter.on_run_end(&report);
    report
}

fn run_case(suite: &Suite, case: &Case, iteration: u32) -> CaseRecord {
    debug!(suite = suite.name(), case = case.name(), iteration, "running case");
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| case.execute()));
    let elapsed = started.elapsed();

    let status = match outcome {
        Ok(Ok(())) => CaseStatus::Passed,
        Ok(Err(CaseFailure::Assertion(failure))) => CaseStatus::Failed { failure },
        Ok(Err(CaseFailure::Setup(error))) => CaseStatus::SetupFailed {
            message: error.to_string(),
        },
        Err(payload) => CaseStatus::Panicked {
            message: describe_panic(payload.as_ref()),
        },
    };

    if let Some(message) = status.message() {
        warn!(
            suite = suite.name(),
            case = case.name(),
            iteration,
            "case failed: {message}"
        );
    }

    CaseRecord {
        suite: suite.name().to_string(),
        case: case.name().to_string(),
        iteration,
        status,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::assert_true;
    use crate::sequence::SequenceError;
    use tracing_test::traced_test;

    fn mixed_suite() -> Suite {
        Suite::new("mixed")
            .with_case(Case::new("passes", || Ok(())))
            .with_case(Case::new("fails", || {
                assert_true(false, "always_false")?;
                Ok(())
            }))
            .with_case(Case::new("panics", || panic!("kaboom")))
            .with_case(Case::new("passes_again", || Ok(())))
    }

    #[test]
    fn wildcard_matching_follows_glob_rules() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("std_vector.*", "std_vector.differs_in_the_end/plain"));
        assert!(wildcard_match("*.differs_in_the_?nd/*", "a.differs_in_the_end/x"));
        assert!(!wildcard_match("sample1.*", "std_vector.a"));
        assert!(wildcard_match("a*b*c", "aXXbYYc"));
        assert!(!wildcard_match("a*b*c", "aXXbYY"));
    }

    #[test]
    fn filter_supports_positive_and_negative_patterns() {
        let filter = CaseFilter::parse("std_vector.*:sample1.factorial/*-*container*");
        assert!(filter.matches("std_vector.differs_in_the_end/plain_equality"));
        assert!(!filter.matches("std_vector.differs_in_the_end/container_equality"));
        assert!(filter.matches("sample1.factorial/zero"));
        assert!(!filter.matches("sample1.is_prime/trivial"));

        let negative_only = CaseFilter::parse("-sample1.*");
        assert!(negative_only.matches("std_vector.x"));
        assert!(!negative_only.matches("sample1.x"));
    }

    #[test]
    fn failures_do_not_stop_later_cases() {
        let suites = vec![mixed_suite()];
        let report = run(&suites, &RunOptions::default(), &mut SilentReporter);

        assert_eq!(report.total(), 4);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.records()[3].case, "passes_again");
        assert!(report.records()[3].status.is_passed());
        assert_eq!(
            report.records()[2].status,
            CaseStatus::Panicked {
                message: "kaboom".to_string()
            }
        );
    }

    #[test]
    fn repeat_runs_every_case_each_iteration() {
        let suites = vec![mixed_suite()];
        let options = RunOptions {
            filter: CaseFilter::parse("mixed.pass*"),
            repeat: 3,
        };
        let report = run(&suites, &options, &mut SilentReporter);

        assert_eq!(report.total(), 6);
        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
        let iterations: Vec<u32> = report.records().iter().map(|r| r.iteration).collect();
        assert_eq!(iterations, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn console_reporter_prints_progress_and_summary() {
        let suites = vec![mixed_suite()];
        let mut reporter = ConsoleReporter::new(Vec::new());
        run(&suites, &RunOptions::default(), &mut reporter);
        let output = String::from_utf8(reporter.into_inner()).unwrap();

        assert!(output.starts_with("[==========] Running 4 case(s)."));
        assert!(output.contains("[ RUN      ] mixed.passes\n[       OK ] mixed.passes"));
        assert!(output.contains("Value of: always_false"));
        assert!(output.contains("panicked: kaboom\n[  FAILED  ] mixed.panics"));
        assert!(output.contains("[  PASSED  ] 2 case(s)."));
        assert!(output.contains("[  FAILED  ] 2 case(s), listed below:\n[  FAILED  ] mixed.fails\n[  FAILED  ] mixed.panics\n"));
    }

    #[test]
    fn report_serializes_flattened_status() {
        let suites = vec![mixed_suite()];
        let report = run(&suites, &RunOptions::default(), &mut SilentReporter);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["passed"], 2);
        assert_eq!(json["records"][0]["status"], "passed");
        assert_eq!(json["records"][1]["status"], "failed");
        assert!(json["records"][1]["failure"]["message"]
            .as_str()
            .unwrap()
            .contains("always_false"));
        assert_eq!(json["records"][2]["message"], "kaboom");
        assert!(json["records"][0]["elapsed_us"].is_u64());
    }

    #[test]
    fn list_cases_applies_filter_without_running() {
        let suites = vec![mixed_suite()];
        let names = list_cases(&suites, &CaseFilter::parse("*pass*"));
        assert_eq!(names, vec!["mixed.passes", "mixed.passes_again"]);
    }

    #[traced_test]
    #[test]
    fn setup_failures_are_recorded_and_later_cases_still_run() {
        let suites = vec![
            Suite::new("prep")
                .with_case(Case::new("setup", || {
                    Err(SequenceError::IndexOutOfRange { index: 3, len: 1 }.into())
                }))
                .with_case(Case::new("after", || Ok(()))),
        ];
        let mut reporter = ConsoleReporter::new(Vec::new());
        let report = run(&suites, &RunOptions::default(), &mut reporter);

        assert_eq!(report.total(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.records()[0].status,
            CaseStatus::SetupFailed {
                message: "divergence index 3 is out of range for a sequence of length 1"
                    .to_string()
            }
        );
        assert!(report.records()[1].status.is_passed());

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.contains(
            "setup failed: divergence index 3 is out of range for a sequence of length 1\n[  FAILED  ] prep.setup"
        ));
        assert!(output.contains("[       OK ] prep.after"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["records"][0]["status"], "setup_failed");
        assert!(json["records"][0]["message"]
            .as_str()
            .unwrap()
            .contains("out of range"));
        assert!(logs_contain("case failed: setup failed"));
    }

    #[traced_test]
    #[test]
    fn failures_are_logged_with_case_context() {
        let suites = vec![mixed_suite()];
        run(&suites, &RunOptions::default(), &mut SilentReporter);

        assert!(logs_contain("starting run"));
        assert!(logs_contain("case failed"));
        assert!(logs_contain("kaboom"));
        assert!(logs_contain("run finished"));
    }
}
