//! `seqcheck`：执行全部序列相等断言用例的进程入口。
//!
//! # 设计动机（Why）
//! - 用例列表由这里显式构造（`std_vector` + `sample1`），再交给 `seqcheck_core::run` 顺序执行；
//!   没有隐式的全局注册表。
//! - 单个用例失败不会中断运行，进程退出码只反映汇总结果。
//!
//! # 工作方式（How）
//! 1. 解析命令行参数（见 [`args`]）；
//! 2. 安装 `tracing` 日志（写 stderr，`RUST_LOG` 控制级别）；
//! 3. 加载配置并叠加命令行覆盖项；
//! 4. 构造套件，`--list` 时只打印用例名，否则执行并把报告写到 stdout，按需落盘 JSON。
//!
//! # 使用契约（What）
//! - 退出码：全部通过为 0；任一用例失败为 1；参数、配置或报告写入错误为 2。

mod args;

use std::env;
use std::process::ExitCode;

use seqcheck_core::observability::install_logging;
use seqcheck_core::runner::{ConsoleReporter, list_cases};
use seqcheck_core::{CaseFilter, HarnessConfig, HarnessError, RunOptions};
use tracing::{error, info, warn};

use crate::args::{Args, USAGE};

const SETUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let args = match Args::parse_os(env::args_os().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("seqcheck: 参数错误：{error}\n\n{USAGE}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    if let Err(error) = install_logging() {
        eprintln!("seqcheck: 日志初始化失败，继续运行：{error}");
    }

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            error!(%error, "run aborted");
            eprintln!("seqcheck: {error}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

/// 运行主逻辑，返回用例层面的退出码。
///
/// # 契约约束（What）
/// - 返回 `Err` 仅代表环境问题（配置、场景声明、报告落盘）；用例失败体现在 `Ok(1)`。
fn run(args: &Args) -> Result<u8, HarnessError> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(filter) = &args.filter {
        config.run.filter = Some(filter.clone());
    }
    if let Some(repeat) = args.repeat {
        config.run.repeat = repeat;
    }
    config.validate()?;

    let suites = seqcheck_core::default_suites(&config)?;
    let filter = config
        .run
        .filter
        .as_deref()
        .map(CaseFilter::parse)
        .unwrap_or_default();

    if args.list {
        for name in list_cases(&suites, &filter) {
            println!("{name}");
        }
        return Ok(0);
    }

    let options = RunOptions {
        filter,
        repeat: config.run.repeat,
    };
    let report = seqcheck_core::run(&suites, &options, &mut ConsoleReporter::stdout());
    if report.total() == 0 {
        warn!("filter selected no cases");
    }

    if let Some(path) = &args.output {
        report.write_json(path)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(report.exit_code())
}
