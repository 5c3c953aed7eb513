//! 自检套件（TCK）：确认运行器对每个场景给出声明中的诊断。
//!
//! # 教案式说明
//! - **意图 (Why)**：向量场景“按构造必然失败”，因此不能直接作为 `#[test]`；这里把它们包一层，
//!   断言失败的**形状**（失败类型、分歧计数、分歧下标与取值）与场景声明完全一致。
//! - **如何集成 (How)**：在任意测试模块上标注 `#[seqcheck_tck]`（或 `#[seqcheck_tck(suites(...))]`），
//!   宏会为每个主题生成一个调用 `run_*_conformance` 的 `#[test]`。
//! - **契约 (What)**：所有检查失败时 panic，panic 文本带有 `[seqcheck-tck::主题::检查]` 前缀。

use std::fmt::Write;
use std::panic;
use std::sync::Arc;

use crate::case::{CaseFailure, describe_panic};
use crate::compare::{DiagnosticLimits, Strategy};
use crate::config::{DEFAULT_DIVERGENCE_VALUE, DEFAULT_SEQUENCE_LENGTH, HarnessConfig};
use crate::runner::{self, CaseStatus, RunOptions, SilentReporter};
use crate::samples::sample_suite;
use crate::scenario::{Scenario, build_case, vector_suite};

/// 单个检查。
#[derive(Clone, Copy)]
struct Check {
    name: &'static str,
    test: fn(),
}

/// 同一主题的检查集合。
#[derive(Clone, Copy)]
struct CheckSet {
    name: &'static str,
    checks: &'static [Check],
}

const BEGINNING: CheckSet = CheckSet {
    name: "beginning",
    checks: &[Check {
        name: "reports_divergence_at_index_zero",
        test: reports_divergence_at_index_zero,
    }],
};

const MIDDLE: CheckSet = CheckSet {
    name: "middle",
    checks: &[Check {
        name: "reports_divergence_at_half_length",
        test: reports_divergence_at_half_length,
    }],
};

const END: CheckSet = CheckSet {
    name: "end",
    checks: &[Check {
        name: "reports_divergence_at_last_index",
        test: reports_divergence_at_last_index,
    }],
};

const MULTIPLE: CheckSet = CheckSet {
    name: "multiple",
    checks: &[
        Check {
            name: "reports_every_divergence",
            test: reports_every_divergence,
        },
        Check {
            name: "declares_twenty_thirty_forty",
            test: declares_twenty_thirty_forty,
        },
    ],
};

const IDEMPOTENCE: CheckSet = CheckSet {
    name: "idempotence",
    checks: &[Check {
        name: "repeated_runs_produce_identical_outcomes",
        test: repeated_runs_produce_identical_outcomes,
    }],
};

const SAMPLES: CheckSet = CheckSet {
    name: "samples",
    checks: &[Check {
        name: "every_sample_case_passes",
        test: every_sample_case_passes,
    }],
};

/// 运行“开头分歧”检查：n = 1,000,000，B[0] = 20。
pub fn run_beginning_conformance() {
    run_checks(&BEGINNING);
}

/// 运行“中间分歧”检查：B[n/2] = 20。
pub fn run_middle_conformance() {
    run_checks(&MIDDLE);
}

/// 运行“结尾分歧”检查：B[n-1] = 20。
pub fn run_end_conformance() {
    run_checks(&END);
}

/// 运行“多点分歧”检查：B[0] = 20、B[1] = 30、B[2] = 40，三处都必须被报告。
pub fn run_multiple_conformance() {
    run_checks(&MULTIPLE);
}

/// 运行“幂等”检查：同一进程内重复执行，结果逐条一致。
pub fn run_idempotence_conformance() {
    run_checks(&IDEMPOTENCE);
}

/// 运行示例套件检查。
pub fn run_samples_conformance() {
    run_checks(&SAMPLES);
}

/// 在捕获 panic 的前提下执行整个检查集合，失败时附加“主题/检查”上下文后重新抛出。
fn run_checks(set: &CheckSet) {
    assert!(!set.checks.is_empty(), "检查集合不应为空");
    for check in set.checks {
        let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| (check.test)()));
        if let Err(payload) = outcome {
            let mut message = String::new();
            let _ = write!(
                &mut message,
                "[seqcheck-tck::{}::{}] 检查失败：{}",
                set.name,
                check.name,
                describe_panic(payload.as_ref())
            );
            panic::resume_unwind(Box::new(message));
        }
    }
}

/// 对场景在两种策略下分别执行，核对失败形状。
fn verify_scenario(scenario: crate::error::Result<Scenario>) {
    let scenario = Arc::new(scenario.expect("场景声明应合法"));

    let expected = scenario.expected();
    assert!(
        expected.as_slice().iter().all(|value| *value == 0),
        "期望序列必须全为零"
    );
    let actual = scenario.actual().expect("分歧应能应用");
    let declared = scenario.divergences().indices();
    for (index, value) in actual.as_slice().iter().enumerate() {
        if declared.binary_search(&index).is_err() {
            assert_eq!(*value, 0, "未声明的下标 {index} 不应被修改");
        }
    }

    for strategy in Strategy::ALL {
        let case = build_case(Arc::clone(&scenario), strategy, DiagnosticLimits::default());
        let failure = match case.execute() {
            Err(CaseFailure::Assertion(failure)) => failure,
            other => panic!("{} 应以断言失败结束，得到 {other:?}", case.name()),
        };
        let diagnosis = failure
            .diagnosis
            .as_ref()
            .expect("序列断言失败必须附带诊断");

        assert_eq!(diagnosis.strategy, strategy);
        assert_eq!(diagnosis.expected_len, scenario.len());
        assert_eq!(diagnosis.actual_len, scenario.len());
        assert_eq!(
            diagnosis.mismatch_count,
            declared.len(),
            "{}: 分歧计数不符",
            case.name()
        );
        assert_eq!(
            diagnosis.mismatch_indices(),
            declared,
            "{}: 分歧下标不符",
            case.name()
        );
        assert_eq!(diagnosis.first_divergence, declared[0]);
        for mismatch in &diagnosis.mismatches {
            assert_eq!(mismatch.expected, "0");
            let declared_value = actual
                .get(mismatch.index)
                .expect("分歧下标在范围内");
            assert_eq!(mismatch.actual, declared_value.to_string());
        }
    }
}

fn reports_divergence_at_index_zero() {
    verify_scenario(Scenario::beginning(
        DEFAULT_SEQUENCE_LENGTH,
        DEFAULT_DIVERGENCE_VALUE,
    ));
}

fn reports_divergence_at_half_length() {
    verify_scenario(Scenario::middle(
        DEFAULT_SEQUENCE_LENGTH,
        DEFAULT_DIVERGENCE_VALUE,
    ));
}

fn reports_divergence_at_last_index() {
    verify_scenario(Scenario::end(
        DEFAULT_SEQUENCE_LENGTH,
        DEFAULT_DIVERGENCE_VALUE,
    ));
}

fn reports_every_divergence() {
    verify_scenario(Scenario::multiple(
        DEFAULT_SEQUENCE_LENGTH,
        DEFAULT_DIVERGENCE_VALUE,
    ));
}

fn declares_twenty_thirty_forty() {
    let scenario = Scenario::multiple(DEFAULT_SEQUENCE_LENGTH, DEFAULT_DIVERGENCE_VALUE)
        .expect("场景声明应合法");
    let declared: Vec<(usize, i32)> = scenario.divergences().iter().copied().collect();
    assert_eq!(declared, vec![(0, 20), (1, 30), (2, 40)]);
}

fn repeated_runs_produce_identical_outcomes() {
    let mut config = HarnessConfig::default();
    config.sequence.length = 4096;
    let suites = vec![vector_suite(&config).expect("默认场景应合法"), sample_suite()];
    let options = RunOptions {
        repeat: 2,
        ..RunOptions::default()
    };
    let report = runner::run(&suites, &options, &mut SilentReporter);

    let per_iteration = report.total() / 2;
    assert_eq!(per_iteration, 14);
    let (first, second) = report.records().split_at(per_iteration);
    for (lhs, rhs) in first.iter().zip(second) {
        assert_eq!(lhs.full_name(), rhs.full_name());
        assert_eq!(lhs.status, rhs.status, "{} 两次执行结果不同", lhs.full_name());
    }
    assert_eq!(report.failed(), 16);
}

fn every_sample_case_passes() {
    let suites = vec![sample_suite()];
    let report = runner::run(&suites, &RunOptions::default(), &mut SilentReporter);
    assert_eq!(report.total(), 6);
    for record in report.records() {
        assert_eq!(record.status, CaseStatus::Passed, "{}", record.full_name());
    }
}
