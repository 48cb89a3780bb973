//! Closed-form sums over an inclusive integer range `[lo, hi]` used by the overlap derivation.
//! `lo` may exceed zero or be negative; an empty range (`hi < lo`) sums to zero.

/// Σ_{m=1}^{n} m², extended to negative `n` by the same polynomial so that
/// `square_prefix(n) - square_prefix(n - 1) == n²` for every integer `n`.
fn square_prefix(n: i64) -> f64 {
    (n * (n + 1) * (2 * n + 1)) as f64 / 6.0
}

fn count(lo: i32, hi: i32) -> f64 {
    (hi - lo + 1).max(0) as f64
}

/// Σ_{n=lo}^{hi} (n − mean)
pub fn first_order_sum(lo: i32, hi: i32, mean: f64) -> f64 {
    if hi < lo {
        return 0.0;
    }
    count(lo, hi) * ((lo + hi) as f64 / 2.0 - mean)
}

/// Σ_{n=lo}^{hi} (n − mean)²
pub fn second_order_sum(lo: i32, hi: i32, mean: f64) -> f64 {
    if hi < lo {
        return 0.0;
    }
    let n = count(lo, hi);
    let squares = square_prefix(hi as i64) - square_prefix(lo as i64 - 1);
    let linear = n * (lo + hi) as f64 / 2.0;
    squares - 2.0 * mean * linear + n * mean * mean
}

/// Σ_{n=lo}^{hi} (n − mean1)(n + offset − mean2)
pub fn second_order_offset_sum(lo: i32, hi: i32, mean1: f64, mean2: f64, offset: i32) -> f64 {
    second_order_sum(lo, hi, mean1) + (mean1 + offset as f64 - mean2) * first_order_sum(lo, hi, mean1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brute(lo: i32, hi: i32, f: impl Fn(f64) -> f64) -> f64 {
        (lo..=hi).map(|n| f(n as f64)).sum()
    }

    #[test]
    fn test_sums_against_brute_force() {
        for &(lo, hi) in &[(0, 0), (2, 4), (-3, 5), (-7, -2), (10, 31)] {
            let m1 = 2.5;
            let m2 = -1.25;
            assert_relative_eq!(
                first_order_sum(lo, hi, m1),
                brute(lo, hi, |n| n - m1),
                epsilon = 1e-9
            );
            assert_relative_eq!(
                second_order_sum(lo, hi, m1),
                brute(lo, hi, |n| (n - m1) * (n - m1)),
                epsilon = 1e-9
            );
            assert_relative_eq!(
                second_order_offset_sum(lo, hi, m1, m2, -3),
                brute(lo, hi, |n| (n - m1) * (n - 3.0 - m2)),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_empty_range() {
        assert_eq!(first_order_sum(3, 2, 0.0), 0.0);
        assert_eq!(second_order_sum(3, 2, 1.0), 0.0);
    }

    #[test]
    fn test_centered_first_order_vanishes() {
        assert_relative_eq!(first_order_sum(2, 4, 3.0), 0.0);
        // {2,3,4} around 3 -> 1 + 0 + 1
        assert_relative_eq!(second_order_sum(2, 4, 3.0), 2.0);
    }
}
