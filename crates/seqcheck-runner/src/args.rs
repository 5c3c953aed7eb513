//! 命令行参数解析。
//!
//! # 解析逻辑（How）
//! - 逐项消费参数迭代器，识别长参数；同时接受 `--flag value` 与 `--flag=value` 两种写法；
//! - 非法或缺失的取值立即返回 [`ArgsError`]，未知参数同样视为错误。
//!
//! # 契约（What）
//! - 输入不包含程序名；解析成功不代表配置合法，`--repeat` 之外的取值约束由配置校验负责。

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

/// 用法说明。
pub const USAGE: &str = "\
Usage: seqcheck [OPTIONS]

Options:
  --filter <PATTERN>  run only cases whose `suite.case` name matches PATTERN
                      (`*` and `?` wildcards, `:` separates patterns, `-` starts exclusions)
  --repeat <N>        run every selected case N times (N >= 1)
  --list              print the selected case names and exit
  --config <PATH>     load settings from a TOML file
  --output <PATH>     write the run report as JSON
  --help              print this message

Exit status: 0 when every case passed, 1 when any case failed, 2 on usage or setup errors.";

/// 解析后的参数。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Args {
    pub filter: Option<String>,
    pub repeat: Option<u32>,
    pub list: bool,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub help: bool,
}

/// 参数错误。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ArgsError {
    #[error("`{flag}` expects a value")]
    MissingValue { flag: String },

    #[error("invalid value `{value}` for `{flag}`: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    #[error("`{flag}` does not take a value")]
    UnexpectedValue { flag: String },

    #[error("unknown argument `{0}`")]
    Unknown(String),

    /// 参数不是合法的 UTF-8，保存的是有损转换后的文本。
    #[error("argument `{0}` is not valid UTF-8")]
    NotUnicode(String),
}

impl Args {
    /// 解析进程原始参数；任一参数不是 UTF-8 时返回 [`ArgsError::NotUnicode`]。
    pub fn parse_os<I>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let args = args
            .into_iter()
            .map(|arg| {
                arg.into_string()
                    .map_err(|raw| ArgsError::NotUnicode(raw.to_string_lossy().into_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::parse(args)
    }

    pub fn parse<I>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut parsed = Args::default();

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = |flag: &str| -> Result<String, ArgsError> {
                match inline.clone() {
                    Some(value) => Ok(value),
                    None => args.next().ok_or_else(|| ArgsError::MissingValue {
                        flag: flag.to_string(),
                    }),
                }
            };

            match flag.as_str() {
                "--filter" => parsed.filter = Some(value(&flag)?),
                "--repeat" => {
                    let raw = value(&flag)?;
                    let repeat = raw.parse::<u32>().map_err(|error| ArgsError::InvalidValue {
                        flag: flag.clone(),
                        value: raw.clone(),
                        reason: error.to_string(),
                    })?;
                    if repeat == 0 {
                        return Err(ArgsError::InvalidValue {
                            flag: flag.clone(),
                            value: raw,
                            reason: "must be at least 1".to_string(),
                        });
                    }
                    parsed.repeat = Some(repeat);
                }
                "--config" => parsed.config = Some(PathBuf::from(value(&flag)?)),
                "--output" => parsed.output = Some(PathBuf::from(value(&flag)?)),
                "--list" | "--help" | "-h" => {
                    if inline.is_some() {
                        return Err(ArgsError::UnexpectedValue { flag: flag.clone() });
                    }
                    if flag == "--list" {
                        parsed.list = true;
                    } else {
                        parsed.help = true;
                    }
                }
                _ => return Err(ArgsError::Unknown(flag.clone())),
            }
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn empty_arguments_use_defaults() {
        assert_eq!(parse(&[]).unwrap(), Args::default());
    }

    #[test]
    fn both_value_syntaxes_are_accepted() {
        let args = parse(&[
            "--filter",
            "std_vector.*",
            "--repeat=3",
            "--config",
            "seqcheck.toml",
            "--output=report.json",
            "--list",
        ])
        .unwrap();

        assert_eq!(args.filter.as_deref(), Some("std_vector.*"));
        assert_eq!(args.repeat, Some(3));
        assert_eq!(args.config, Some(PathBuf::from("seqcheck.toml")));
        assert_eq!(args.output, Some(PathBuf::from("report.json")));
        assert!(args.list);
        assert!(!args.help);
    }

    #[test]
    fn filter_value_may_contain_equals_and_dashes() {
        let args = parse(&["--filter=*-sample1.*"]).unwrap();
        assert_eq!(args.filter.as_deref(), Some("*-sample1.*"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert_eq!(
            parse(&["--repeat"]),
            Err(ArgsError::MissingValue {
                flag: "--repeat".to_string()
            })
        );
        assert!(matches!(
            parse(&["--repeat", "zero"]),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse(&["--repeat", "0"]),
            Err(ArgsError::InvalidValue { reason, .. }) if reason == "must be at least 1"
        ));
        assert_eq!(
            parse(&["--list=yes"]),
            Err(ArgsError::UnexpectedValue {
                flag: "--list".to_string()
            })
        );
        assert_eq!(
            parse(&["--gtest_color"]),
            Err(ArgsError::Unknown("--gtest_color".to_string()))
        );
    }

    #[test]
    fn os_arguments_are_parsed_like_strings() {
        let args = Args::parse_os(["--repeat", "2", "--list"].map(OsString::from)).unwrap();
        assert_eq!(args.repeat, Some(2));
        assert!(args.list);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_is_a_usage_error() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'-', b'-', 0xff]);
        let err = Args::parse_os([OsString::from("--list"), raw]).unwrap_err();
        assert_eq!(err, ArgsError::NotUnicode("--\u{fffd}".to_string()));
    }
}
