//! Dense simplex tableau.

#![allow(clippy::needless_range_loop)]

use super::standard::StandardForm;
use crate::error::{SolveError, SolveResult};
use crate::numeric::snap_zero;

/// Working state of one simplex solve: `B^-1 A`, the basic values, the
/// reduced-cost row and the running objective.
///
/// Owned by a single solve call and mutated in place by [`pivot`](Self::pivot).
#[derive(Debug, Clone)]
pub struct Tableau {
    /// `B^-1 A`, row-major.
    rows: Vec<Vec<f64>>,
    /// Values of the basic variables (`B^-1 b`).
    rhs: Vec<f64>,
    /// Column basic in each row.
    basis: Vec<usize>,
    /// Reduced costs `c - c_B B^-1 A`.
    reduced: Vec<f64>,
    /// Current objective value `c_B B^-1 b`.
    objective: f64,
    tol: f64,
}

impl Tableau {
    /// Tableau on the initial identity basis of `sf`, with zero costs.
    pub fn new(sf: &StandardForm, tol: f64) -> Self {
        Self {
            rows: sf.a.clone(),
            rhs: sf.b.clone(),
            basis: sf.unit_col.clone(),
            reduced: vec![0.0; sf.num_cols()],
            objective: 0.0,
            tol,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rhs.len()
    }

    pub fn num_cols(&self) -> usize {
        self.reduced.len()
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    pub fn reduced_costs(&self) -> &[f64] {
        &self.reduced
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Entry `(row, col)` of `B^-1 A`.
    pub fn entry(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Installs a new cost vector and prices it against the current basis.
    pub fn set_costs(&mut self, costs: &[f64]) {
        let n = self.num_cols();
        let mut reduced = costs.to_vec();
        reduced.resize(n, 0.0);
        let mut objective = 0.0;
        for (i, &bc) in self.basis.iter().enumerate() {
            let cb = costs.get(bc).copied().unwrap_or(0.0);
            if cb == 0.0 {
                continue;
            }
            objective += cb * self.rhs[i];
            for j in 0..n {
                reduced[j] -= cb * self.rows[i][j];
            }
        }
        for v in reduced.iter_mut() {
            *v = snap_zero(*v, self.tol);
        }
        self.reduced = reduced;
        self.objective = objective;
    }

    /// Gauss-Jordan pivot bringing `col` into the basis at `row`.
    ///
    /// The objective moves by `d_col * theta`, where `theta` is the new
    /// value of the entering variable.
    pub fn pivot(&mut self, row: usize, col: usize) -> SolveResult<()> {
        let pivot = self.rows[row][col];
        if !pivot.is_finite() || pivot.abs() <= self.tol {
            return Err(SolveError::Numerical(format!(
                "pivot element {pivot:e} at row {row}, column {col} is too small"
            )));
        }

        let n = self.num_cols();
        for j in 0..n {
            self.rows[row][j] /= pivot;
        }
        self.rows[row][col] = 1.0;
        self.rhs[row] = snap_zero(self.rhs[row] / pivot, self.tol);

        let pivot_row = std::mem::take(&mut self.rows[row]);
        let pivot_rhs = self.rhs[row];
        for i in 0..self.num_rows() {
            if i == row {
                continue;
            }
            let factor = self.rows[i][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                self.rows[i][j] = snap_zero(self.rows[i][j] - factor * pivot_row[j], self.tol);
            }
            self.rows[i][col] = 0.0;
            self.rhs[i] = snap_zero(self.rhs[i] - factor * pivot_rhs, self.tol);
        }

        let factor = self.reduced[col];
        if factor != 0.0 {
            for j in 0..n {
                self.reduced[j] = snap_zero(self.reduced[j] - factor * pivot_row[j], self.tol);
            }
            self.objective += factor * pivot_rhs;
        }
        self.reduced[col] = 0.0;
        self.rows[row] = pivot_row;
        self.basis[row] = col;

        if !self.objective.is_finite()
            || self.rhs.iter().any(|v| !v.is_finite())
            || self.reduced.iter().any(|v| !v.is_finite())
        {
            return Err(SolveError::Numerical(format!(
                "non-finite tableau entry after pivot at row {row}, column {col}"
            )));
        }
        Ok(())
    }

    /// Value of every column at the current basic solution.
    pub fn column_values(&self) -> Vec<f64> {
        let mut z = vec![0.0; self.num_cols()];
        for (i, &bc) in self.basis.iter().enumerate() {
            z[bc] = self.rhs[i].max(0.0);
        }
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comparator, LinearExpr, Model, Sense, Variable};

    fn small_form() -> StandardForm {
        // max x + y  s.t.  x + 2y <= 4, 3x + y <= 6
        let mut model = Model::new("small", Sense::Maximize);
        let x = model.add_variable(Variable::new("x")).unwrap();
        let y = model.add_variable(Variable::new("y")).unwrap();
        model.set_objective(LinearExpr::new().term(x, 1.0).term(y, 1.0)).unwrap();
        model
            .add_constraint("a", LinearExpr::new().term(x, 1.0).term(y, 2.0), Comparator::Le, 4.0)
            .unwrap();
        model
            .add_constraint("b", LinearExpr::new().term(x, 3.0).term(y, 1.0), Comparator::Le, 6.0)
            .unwrap();
        StandardForm::from_model(&model).unwrap()
    }

    #[test]
    fn test_initial_pricing() {
        let sf = small_form();
        let mut t = Tableau::new(&sf, 1e-9);
        t.set_costs(&sf.c);
        assert_eq!(t.basis(), &[2, 3]);
        assert_eq!(t.reduced_costs(), &[-1.0, -1.0, 0.0, 0.0]);
        assert_eq!(t.objective(), 0.0);
    }

    #[test]
    fn test_pivot_updates_objective() {
        let sf = small_form();
        let mut t = Tableau::new(&sf, 1e-9);
        t.set_costs(&sf.c);
        // x enters, row b leaves (ratio 2 < 4)
        t.pivot(1, 0).unwrap();
        assert_eq!(t.basis(), &[2, 0]);
        assert!((t.rhs()[1] - 2.0).abs() < 1e-12);
        assert!((t.rhs()[0] - 2.0).abs() < 1e-12);
        assert!((t.objective() + 2.0).abs() < 1e-12);
        assert!((t.reduced_costs()[1] + 2.0 / 3.0).abs() < 1e-12);

        // y enters, row a leaves
        t.pivot(0, 1).unwrap();
        let z = t.column_values();
        assert!((z[0] - 1.6).abs() < 1e-12);
        assert!((z[1] - 1.2).abs() < 1e-12);
        assert!((t.objective() + 2.8).abs() < 1e-12);
        assert!(t.reduced_costs().iter().all(|&d| d >= -1e-12));
    }

    #[test]
    fn test_pivot_rejects_zero_entry() {
        let sf = small_form();
        let mut t = Tableau::new(&sf, 1e-9);
        // column 3 (slack of b) has a zero in row 0
        let err = t.pivot(0, 3).unwrap_err();
        assert!(matches!(err, SolveError::Numerical(_)));
    }
}
