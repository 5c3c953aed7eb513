//! 集成示例：用 `#[seqcheck_tck]` 把全部自检主题生成为标准测试。
//!
//! - 默认展开 `beginning`、`middle`、`end`、`multiple`、`idempotence`、`samples` 六个主题；
//! - 第二个模块演示按需选择主题。

use seqcheck_core::seqcheck_tck;

#[seqcheck_tck]
mod full_conformance {}

#[seqcheck_tck(suites(beginning, multiple))]
mod selected_conformance {}

#[seqcheck_tck(suites)]
mod bare_keyword_conformance {}

#[seqcheck_tck(suites(samples, idempotence))]
mod reordered_conformance {
    #[test]
    fn existing_items_are_kept() {
        assert!(seqcheck_core::samples::is_prime(23));
    }
}
