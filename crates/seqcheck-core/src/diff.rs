//! 把 [`Diagnosis`] 渲染为终端可读的差异文本。
//!
//! 两种策略的版式不同：通用相等断言打印两侧预览加分歧下标列表；
//! 容器匹配器逐条列出 `expected[i] = a, actual[i] = b`，并单独说明长度差异。

use std::fmt::Write;

use crate::compare::{Diagnosis, Strategy, Window};

/// 渲染失败信息。`expected_label` / `actual_label` 为断言两侧的表达式名称。
pub fn render(diagnosis: &Diagnosis, expected_label: &str, actual_label: &str) -> String {
    match diagnosis.strategy {
        Strategy::PlainEquality => render_plain(diagnosis, expected_label, actual_label),
        Strategy::ContainerEquality => render_container(diagnosis, expected_label, actual_label),
    }
}

fn render_plain(diagnosis: &Diagnosis, expected_label: &str, actual_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Expected equality of these values:");
    let _ = writeln!(out, "  {expected_label}");
    let _ = writeln!(
        out,
        "    Which is: {} ({} elements)",
        preview(&diagnosis.expected_window),
        diagnosis.expected_len
    );
    let _ = writeln!(out, "  {actual_label}");
    let _ = writeln!(
        out,
        "    Which is: {} ({} elements)",
        preview(&diagnosis.actual_window),
        diagnosis.actual_len
    );

    if diagnosis.mismatch_count > 0 {
        let indices = diagnosis
            .mismatch_indices()
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            out,
            "Values differ at {} position(s): {indices}",
            diagnosis.mismatch_count
        );
        if diagnosis.is_truncated() {
            let _ = write!(
                out,
                ", ... and {} more",
                diagnosis.mismatch_count - diagnosis.mismatches.len()
            );
        }
    } else {
        let _ = write!(
            out,
            "Values agree on the first {} element(s) but lengths differ",
            diagnosis.first_divergence
        );
    }
    out
}

fn render_container(diagnosis: &Diagnosis, expected_label: &str, actual_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Value of: {actual_label}");
    let _ = writeln!(
        out,
        "Expected: equals {expected_label} ({} elements)",
        diagnosis.expected_len
    );
    let _ = write!(
        out,
        "  Actual: {} elements, differs at {} position(s)",
        diagnosis.actual_len, diagnosis.mismatch_count
    );
    for mismatch in &diagnosis.mismatches {
        let _ = write!(
            out,
            "\n    {expected_label}[{index}] = {lhs}, {actual_label}[{index}] = {rhs}",
            index = mismatch.index,
            lhs = mismatch.expected,
            rhs = mismatch.actual,
        );
    }
    if diagnosis.is_truncated() {
        let _ = write!(
            out,
            "\n    ({} more mismatch(es) not shown)",
            diagnosis.mismatch_count - diagnosis.mismatches.len()
        );
    }

    let common = diagnosis.expected_len.min(diagnosis.actual_len);
    if diagnosis.actual_len < diagnosis.expected_len {
        let _ = write!(
            out,
            "\n    missing {} trailing element(s) starting at index {common}",
            diagnosis.expected_len - diagnosis.actual_len
        );
    } else if diagnosis.actual_len > diagnosis.expected_len {
        let _ = write!(
            out,
            "\n    unexpected {} trailing element(s) starting at index {common}",
            diagnosis.actual_len - diagnosis.expected_len
        );
    }
    out
}

fn preview(window: &Window) -> String {
    let mut parts = Vec::with_capacity(window.values.len() + 2);
    if window.is_clipped_front() {
        parts.push("...".to_string());
    }
    parts.extend(window.values.iter().cloned());
    if window.is_clipped_back() {
        parts.push("...".to_string());
    }
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::DiagnosticLimits;

    fn diagnose(strategy: Strategy, expected: &[i32], actual: &[i32]) -> Diagnosis {
        let limits = DiagnosticLimits {
            max_reported_mismatches: 2,
            preview_elements: 4,
        };
        strategy
            .compare(expected, actual, &limits)
            .diagnosis()
            .cloned()
            .expect("输入不等")
    }

    #[test]
    fn plain_rendering_previews_both_sides() {
        let expected = [0; 10];
        let mut actual = [0; 10];
        actual[5] = 20;
        let text = render(
            &diagnose(Strategy::PlainEquality, &expected, &actual),
            "x",
            "y",
        );

        assert!(text.starts_with("Expected equality of these values:"));
        assert!(text.contains("Which is: { ..., 0, 0, 20, 0, ... } (10 elements)"));
        assert!(text.ends_with("Values differ at 1 position(s): 5"));
    }

    #[test]
    fn container_rendering_lists_each_mismatch_and_truncation() {
        let expected = [0; 6];
        let actual = [1, 2, 3, 0, 0, 0];
        let text = render(
            &diagnose(Strategy::ContainerEquality, &expected, &actual),
            "x",
            "y",
        );

        assert!(text.contains("differs at 3 position(s)"));
        assert!(text.contains("x[0] = 0, y[0] = 1"));
        assert!(text.contains("x[1] = 0, y[1] = 2"));
        assert!(!text.contains("x[2]"));
        assert!(text.contains("(1 more mismatch(es) not shown)"));
    }

    #[test]
    fn container_rendering_reports_length_difference() {
        let text = render(
            &diagnose(Strategy::ContainerEquality, &[1, 2, 3], &[1]),
            "x",
            "y",
        );
        assert!(text.contains("missing 2 trailing element(s) starting at index 1"));

        let plain = render(&diagnose(Strategy::PlainEquality, &[1], &[1, 2]), "x", "y");
        assert!(plain.ends_with("Values agree on the first 1 element(s) but lengths differ"));
    }
}
