//! Tolerance-aware comparisons shared by the simplex engine and the
//! branch-and-cut driver.
//!
//! Every comparison against zero goes through these helpers with the
//! caller's epsilon, never through exact equality.

/// Default epsilon for zero tests.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default distance from the nearest integer accepted as integral.
pub const DEFAULT_INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// `|v| <= tol`.
#[inline]
pub fn is_zero(v: f64, tol: f64) -> bool {
    v.abs() <= tol
}

/// `v > tol`.
#[inline]
pub fn is_positive(v: f64, tol: f64) -> bool {
    v > tol
}

/// `v < -tol`.
#[inline]
pub fn is_negative(v: f64, tol: f64) -> bool {
    v < -tol
}

/// Equality up to `tol`, scaled by the operands' magnitude.
#[inline]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

/// Replaces values within `tol` of zero by an exact zero.
#[inline]
pub fn snap_zero(v: f64, tol: f64) -> f64 {
    if v.abs() <= tol {
        0.0
    } else {
        v
    }
}

/// Distance from `v` to its nearest integer, in `[0, 0.5]`.
#[inline]
pub fn fractionality(v: f64) -> f64 {
    (v - v.round()).abs()
}

/// Whether `v` is within `tol` of an integer.
#[inline]
pub fn is_integral(v: f64, tol: f64) -> bool {
    fractionality(v) <= tol
}

/// Tie-breaking policy of the minimum-ratio test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioTie {
    /// Lowest row index among tied rows.
    LowestRow,
    /// Row whose basic column has the lowest index (Bland's rule).
    LowestBasicColumn,
}

/// One candidate row of the minimum-ratio test.
#[derive(Debug, Clone, Copy)]
pub struct RatioCandidate {
    /// Row index in the tableau.
    pub row: usize,
    /// Entry of the entering column in this row.
    pub pivot: f64,
    /// Current value of the row's basic variable.
    pub rhs: f64,
    /// Column currently basic in this row.
    pub basic_column: usize,
}

/// Minimum-ratio test.
///
/// Only rows with `pivot > tol` participate; the ratio is
/// `max(rhs, 0) / pivot`. Ratios within `tol` of the minimum count as
/// ties and are resolved by `tie`. Returns `None` when no row has a
/// positive pivot entry, i.e. the entering direction is unbounded.
pub fn ratio_test<I>(candidates: I, tol: f64, tie: RatioTie) -> Option<usize>
where
    I: IntoIterator<Item = RatioCandidate>,
{
    let eligible: Vec<(f64, RatioCandidate)> = candidates
        .into_iter()
        .filter(|c| is_positive(c.pivot, tol))
        .map(|c| (c.rhs.max(0.0) / c.pivot, c))
        .collect();

    let min_ratio = eligible
        .iter()
        .map(|(ratio, _)| *ratio)
        .fold(f64::INFINITY, f64::min);
    if !min_ratio.is_finite() {
        return None;
    }

    eligible
        .iter()
        .filter(|(ratio, _)| *ratio <= min_ratio + tol)
        .map(|(_, c)| c)
        .min_by_key(|c| match tie {
            RatioTie::LowestRow => (c.row, c.basic_column),
            RatioTie::LowestBasicColumn => (c.basic_column, c.row),
        })
        .map(|c| c.row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(row: usize, pivot: f64, rhs: f64, basic_column: usize) -> RatioCandidate {
        RatioCandidate {
            row,
            pivot,
            rhs,
            basic_column,
        }
    }

    #[test]
    fn test_sign_helpers() {
        assert!(is_zero(1e-12, 1e-9));
        assert!(!is_zero(1e-6, 1e-9));
        assert!(is_positive(1e-6, 1e-9));
        assert!(!is_positive(1e-12, 1e-9));
        assert!(is_negative(-1e-6, 1e-9));
        assert!(!is_negative(-1e-12, 1e-9));
    }

    #[test]
    fn test_approx_eq_scales() {
        assert!(approx_eq(1e6, 1e6 + 1e-4, 1e-9));
        assert!(!approx_eq(1.0, 1.001, 1e-9));
    }

    #[test]
    fn test_fractionality() {
        assert!((fractionality(2.5) - 0.5).abs() < 1e-12);
        assert!((fractionality(2.9) - 0.1).abs() < 1e-12);
        assert!((fractionality(-1.25) - 0.25).abs() < 1e-12);
        assert!(is_integral(3.0000001, 1e-6));
        assert!(!is_integral(3.1, 1e-6));
    }

    #[test]
    fn test_ratio_test_minimum() {
        let rows = vec![cand(0, 1.0, 4.0, 5), cand(1, 2.0, 4.0, 6), cand(2, -1.0, 0.0, 7)];
        assert_eq!(ratio_test(rows, 1e-9, RatioTie::LowestRow), Some(1));
    }

    #[test]
    fn test_ratio_test_unbounded() {
        let rows = vec![cand(0, -1.0, 4.0, 5), cand(1, 0.0, 4.0, 6)];
        assert_eq!(ratio_test(rows, 1e-9, RatioTie::LowestRow), None);
    }

    #[test]
    fn test_ratio_test_tie_breaks() {
        let rows = vec![cand(0, 1.0, 0.0, 9), cand(1, 3.0, 0.0, 2)];
        assert_eq!(ratio_test(rows.clone(), 1e-9, RatioTie::LowestRow), Some(0));
        assert_eq!(ratio_test(rows, 1e-9, RatioTie::LowestBasicColumn), Some(1));
    }

    #[test]
    fn test_ratio_test_clamps_negative_rhs() {
        let rows = vec![cand(0, 1.0, -1e-12, 3), cand(1, 1.0, 1.0, 4)];
        assert_eq!(ratio_test(rows, 1e-9, RatioTie::LowestRow), Some(0));
    }
}
