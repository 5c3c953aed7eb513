//! 示例函数（阶乘、素数判定）及其通过型用例套件。
//!
//! 与向量分歧套件相反，这组用例在正确实现下全部通过，用来展示运行器对“通过 + 失败”混合结果的汇总。

use crate::case::{Case, CaseResult, Suite, assert_eq_values, assert_true};

/// 示例套件名称。
pub const SAMPLE_SUITE: &str = "sample1";

/// 返回 `n!`。负数的阶乘定义为 1；结果超出 `i64` 时返回 `None`。
pub fn factorial(n: i32) -> Option<i64> {
    (1..=i64::from(n.max(0))).try_fold(1_i64, |acc, factor| acc.checked_mul(factor))
}

/// 判定 `n` 是否为素数。
///
/// 对奇数 `n >= 3` 仅试除到 `sqrt(n)`；`divisor <= n / divisor` 的写法避免平方溢出。
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor = 3;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// 构造示例套件。
pub fn sample_suite() -> Suite {
    Suite::new(SAMPLE_SUITE)
        .with_case(Case::new("factorial/negative", factorial_of_negative_numbers))
        .with_case(Case::new("factorial/zero", factorial_of_zero))
        .with_case(Case::new("factorial/positive", factorial_of_positive_numbers))
        .with_case(Case::new("is_prime/negative", negative_numbers_are_not_prime))
        .with_case(Case::new("is_prime/trivial", trivial_cases))
        .with_case(Case::new("is_prime/positive", positive_numbers))
}

fn factorial_of_negative_numbers() -> CaseResult {
    assert_eq_values(Some(1), factorial(-5), "factorial(-5)")?;
    assert_eq_values(Some(1), factorial(-1), "factorial(-1)")?;
    assert_true(factorial(-10).is_some_and(|value| value > 0), "factorial(-10) > 0")?;
    Ok(())
}

fn factorial_of_zero() -> CaseResult {
    assert_eq_values(Some(1), factorial(0), "factorial(0)")?;
    Ok(())
}

fn factorial_of_positive_numbers() -> CaseResult {
    assert_eq_values(Some(1), factorial(1), "factorial(1)")?;
    assert_eq_values(Some(2), factorial(2), "factorial(2)")?;
    assert_eq_values(Some(6), factorial(3), "factorial(3)")?;
    assert_eq_values(Some(40320), factorial(8), "factorial(8)")?;
    Ok(())
}

fn negative_numbers_are_not_prime() -> CaseResult {
    assert_true(!is_prime(-1), "is_prime(-1)")?;
    assert_true(!is_prime(-2), "is_prime(-2)")?;
    assert_true(!is_prime(i64::MIN), "is_prime(i64::MIN)")?;
    Ok(())
}

fn trivial_cases() -> CaseResult {
    assert_true(!is_prime(0), "is_prime(0)")?;
    assert_true(!is_prime(1), "is_prime(1)")?;
    assert_true(is_prime(2), "is_prime(2)")?;
    assert_true(is_prime(3), "is_prime(3)")?;
    Ok(())
}

fn positive_numbers() -> CaseResult {
    assert_true(!is_prime(4), "is_prime(4)")?;
    assert_true(is_prime(5), "is_prime(5)")?;
    assert_true(!is_prime(6), "is_prime(6)")?;
    assert_true(is_prime(23), "is_prime(23)")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorial_overflows_to_none() {
        assert_eq!(factorial(20), Some(2_432_902_008_176_640_000));
        assert_eq!(factorial(21), None);
    }

    #[test]
    fn is_prime_handles_squares_and_large_primes() {
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(is_prime(7919));
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(i64::MAX));
    }

    #[test]
    fn every_sample_case_passes() {
        let suite = sample_suite();
        assert_eq!(suite.len(), 6);
        for case in suite.cases() {
            assert_eq!(case.execute(), Ok(()), "{}", suite.full_name(case));
        }
    }
}
