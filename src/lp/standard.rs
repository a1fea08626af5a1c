//! Conversion of a [`Model`] into equality standard form.
//!
//! Every model variable is mapped onto one or two non-negative columns:
//!
//! | Bounds            | Transform             | Extra row        |
//! |-------------------|-----------------------|------------------|
//! | `[l, u]`, `l > -inf` | `x = l + z`        | `z <= u - l` if `u` finite |
//! | `(-inf, u]`       | `x = u - z`           | none             |
//! | `(-inf, +inf)`    | `x = z+ - z-`         | none             |
//!
//! Rows are scaled so that every right-hand side is non-negative, then
//! receive a slack (`<=`), a surplus plus an artificial (`>=`) or an
//! artificial (`=`). The slack or artificial of each row forms the
//! initial identity basis.

use crate::error::ValidationError;
use crate::model::{Bounds, Comparator, Model};

/// How one model variable is expressed through standard-form columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarTransform {
    /// `x = lower + z`.
    Shifted { col: usize, lower: f64 },
    /// `x = upper - z`.
    Reflected { col: usize, upper: f64 },
    /// `x = pos - neg`.
    Split { pos: usize, neg: usize },
}

impl VarTransform {
    /// Constant part of the transform.
    pub fn offset(&self) -> f64 {
        match *self {
            VarTransform::Shifted { lower, .. } => lower,
            VarTransform::Reflected { upper, .. } => upper,
            VarTransform::Split { .. } => 0.0,
        }
    }

    /// `(column, coefficient)` pairs of the transform.
    pub fn columns(&self) -> Vec<(usize, f64)> {
        match *self {
            VarTransform::Shifted { col, .. } => vec![(col, 1.0)],
            VarTransform::Reflected { col, .. } => vec![(col, -1.0)],
            VarTransform::Split { pos, neg } => vec![(pos, 1.0), (neg, -1.0)],
        }
    }

    /// The column whose reduced cost reports on the variable, with its sign.
    fn primary(&self) -> (usize, f64) {
        match *self {
            VarTransform::Shifted { col, .. } => (col, 1.0),
            VarTransform::Reflected { col, .. } => (col, -1.0),
            VarTransform::Split { pos, .. } => (pos, 1.0),
        }
    }
}

/// Role of a standard-form column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Carries (part of) model variable `var`.
    Structural { var: usize },
    /// Slack (`+1`) or surplus (`-1`) of `row`.
    Slack { row: usize },
    /// Phase I artificial of `row`.
    Artificial { row: usize },
}

/// Where a standard-form row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Model constraint with this index.
    Constraint(usize),
    /// Finite upper bound of the model variable with this index.
    UpperBound(usize),
}

/// Equality standard form `A z = b, z >= 0, b >= 0` of a model, minimizing
/// `c z`.
#[derive(Debug, Clone)]
pub struct StandardForm {
    /// Dense row-major coefficient matrix.
    pub a: Vec<Vec<f64>>,
    /// Right-hand sides, all non-negative.
    pub b: Vec<f64>,
    /// Phase II costs (minimization; artificials cost zero).
    pub c: Vec<f64>,
    /// Role of each column.
    pub columns: Vec<ColumnKind>,
    /// Origin of each row.
    pub rows: Vec<RowOrigin>,
    /// `-1` where a row was negated to make its right-hand side non-negative.
    pub row_sign: Vec<f64>,
    /// Column forming row `i` of the initial identity basis.
    pub unit_col: Vec<usize>,
    /// Per-variable transforms, indexed like the model's variables.
    pub transforms: Vec<VarTransform>,
    /// `+1` for a minimization model, `-1` for maximization.
    pub sense: f64,
    /// Objective value (model sense) when every column is zero.
    pub objective_offset: f64,
    /// Index of the first artificial column; every later column is
    /// artificial.
    pub first_artificial: usize,
}

struct PendingRow {
    origin: RowOrigin,
    coefs: Vec<(usize, f64)>,
    cmp: Comparator,
    rhs: f64,
}

impl StandardForm {
    /// Standardizes `model` with its declared bounds.
    pub fn from_model(model: &Model) -> Result<Self, ValidationError> {
        Self::build(model, &model.bounds())
    }

    /// Standardizes `model`, replacing the declared variable bounds by
    /// `bounds` (one entry per variable).
    pub fn build(model: &Model, bounds: &[Bounds]) -> Result<Self, ValidationError> {
        model.validate()?;
        if bounds.len() != model.num_variables() {
            return Err(ValidationError::UnknownVariableIndex {
                index: bounds.len(),
                context: "bound overrides".to_string(),
            });
        }

        let mut columns = Vec::new();
        let mut transforms = Vec::with_capacity(bounds.len());
        let mut pending = Vec::new();

        for (j, (var, b)) in model.variables().iter().zip(bounds).enumerate() {
            if b.lower.is_nan() || b.upper.is_nan() {
                return Err(ValidationError::NonFinite(format!("bounds of variable `{}`", var.name())));
            }
            if b.lower == f64::INFINITY || b.upper == f64::NEG_INFINITY || b.lower > b.upper {
                return Err(ValidationError::InvalidBounds {
                    name: var.name().to_string(),
                    lower: b.lower,
                    upper: b.upper,
                });
            }

            let transform = if b.lower.is_finite() {
                let col = columns.len();
                columns.push(ColumnKind::Structural { var: j });
                if b.upper.is_finite() {
                    pending.push(PendingRow {
                        origin: RowOrigin::UpperBound(j),
                        coefs: vec![(col, 1.0)],
                        cmp: Comparator::Le,
                        rhs: b.upper - b.lower,
                    });
                }
                VarTransform::Shifted { col, lower: b.lower }
            } else if b.upper.is_finite() {
                let col = columns.len();
                columns.push(ColumnKind::Structural { var: j });
                VarTransform::Reflected { col, upper: b.upper }
            } else {
                let pos = columns.len();
                columns.push(ColumnKind::Structural { var: j });
                columns.push(ColumnKind::Structural { var: j });
                VarTransform::Split { pos, neg: pos + 1 }
            };
            transforms.push(transform);
        }

        // Model constraints come first so row i is constraint i.
        let mut rows: Vec<PendingRow> = model
            .constraints()
            .iter()
            .enumerate()
            .map(|(i, con)| {
                let mut coefs = Vec::new();
                let mut rhs = con.rhs() - con.lhs().constant_term();
                for &(var, coef) in con.lhs().terms() {
                    let t = &transforms[var.index()];
                    rhs -= coef * t.offset();
                    for (col, sign) in t.columns() {
                        coefs.push((col, coef * sign));
                    }
                }
                PendingRow {
                    origin: RowOrigin::Constraint(i),
                    coefs,
                    cmp: con.comparator(),
                    rhs,
                }
            })
            .collect();
        rows.append(&mut pending);

        let m = rows.len();
        let mut row_sign = vec![1.0; m];
        for (i, row) in rows.iter_mut().enumerate() {
            let negate = row.rhs < 0.0 || (row.rhs == 0.0 && row.cmp == Comparator::Ge);
            if negate {
                row.rhs = -row.rhs;
                row.cmp = row.cmp.flipped();
                for (_, coef) in row.coefs.iter_mut() {
                    *coef = -*coef;
                }
                row_sign[i] = -1.0;
            }
        }

        // Slack and surplus columns, then artificials.
        let mut slack_of = vec![None; m];
        let mut unit_col = vec![0; m];
        for (i, row) in rows.iter().enumerate() {
            if row.cmp != Comparator::Eq {
                slack_of[i] = Some(columns.len());
                unit_col[i] = columns.len();
                columns.push(ColumnKind::Slack { row: i });
            }
        }
        let first_artificial = columns.len();
        let mut artificial_of = vec![None; m];
        for (i, row) in rows.iter().enumerate() {
            if row.cmp != Comparator::Le {
                artificial_of[i] = Some(columns.len());
                unit_col[i] = columns.len();
                columns.push(ColumnKind::Artificial { row: i });
            }
        }

        let n = columns.len();
        let mut a = vec![vec![0.0; n]; m];
        let mut b = Vec::with_capacity(m);
        for (i, row) in rows.iter().enumerate() {
            for &(col, coef) in &row.coefs {
                a[i][col] += coef;
            }
            if let Some(s) = slack_of[i] {
                a[i][s] = if row.cmp == Comparator::Ge { -1.0 } else { 1.0 };
            }
            if let Some(art) = artificial_of[i] {
                a[i][art] = 1.0;
            }
            b.push(row.rhs);
        }

        let sense = model.sense().factor();
        let objective = &model.objective().expr;
        let mut c = vec![0.0; n];
        let mut objective_offset = objective.constant_term();
        for &(var, coef) in objective.terms() {
            let t = &transforms[var.index()];
            objective_offset += coef * t.offset();
            for (col, sign) in t.columns() {
                c[col] += sense * coef * sign;
            }
        }

        for (i, row) in a.iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) || !b[i].is_finite() {
                return Err(ValidationError::NonFinite(format!("standardized row {i}")));
            }
        }
        if c.iter().any(|v| !v.is_finite()) || !objective_offset.is_finite() {
            return Err(ValidationError::NonFinite("standardized objective".to_string()));
        }
        Ok(Self {
            a,
            b,
            c,
            columns,
            rows: rows.iter().map(|r| r.origin).collect(),
            row_sign,
            unit_col,
            transforms,
            sense,
            objective_offset,
            first_artificial,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.b.len()
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_artificial(&self, col: usize) -> bool {
        col >= self.first_artificial
    }

    pub fn has_artificials(&self) -> bool {
        self.first_artificial < self.num_cols()
    }

    /// Phase I costs: one on every artificial column.
    pub fn phase_one_costs(&self) -> Vec<f64> {
        (0..self.num_cols())
            .map(|j| if self.is_artificial(j) { 1.0 } else { 0.0 })
            .collect()
    }

    /// Model variable values from standard-form column values.
    pub fn recover_values(&self, z: &[f64]) -> Vec<f64> {
        self.transforms
            .iter()
            .map(|t| {
                t.offset()
                    + t.columns()
                        .iter()
                        .map(|&(col, sign)| sign * z.get(col).copied().unwrap_or(0.0))
                        .sum::<f64>()
            })
            .collect()
    }

    /// Model objective (its own sense) from the internal minimization value.
    pub fn recover_objective(&self, internal: f64) -> f64 {
        self.sense * internal + self.objective_offset
    }

    /// Reduced cost `c_j - y A_j` of each model variable, in the model's
    /// sense, from the final reduced-cost row.
    ///
    /// A finite upper bound is a bound of the variable, not a constraint,
    /// so the dual of its row is folded into the variable's reduced cost.
    pub fn recover_reduced_costs(&self, d: &[f64]) -> Vec<f64> {
        let at = |col: usize| d.get(col).copied().unwrap_or(0.0);
        let mut bound_row = vec![None; self.transforms.len()];
        for (i, origin) in self.rows.iter().enumerate() {
            if let RowOrigin::UpperBound(j) = *origin {
                bound_row[j] = Some(i);
            }
        }
        self.transforms
            .iter()
            .zip(bound_row)
            .map(|(t, row)| {
                let (col, sign) = t.primary();
                let bound_dual = row.map_or(0.0, |i| self.row_sign[i] * at(self.unit_col[i]));
                self.sense * sign * (at(col) - bound_dual)
            })
            .collect()
    }

    /// Shadow price of each model constraint from the final reduced-cost
    /// row: `d(objective) / d(rhs)` in the model's sense.
    ///
    /// Upper-bound rows are reported through
    /// [`recover_reduced_costs`](Self::recover_reduced_costs) instead.
    pub fn recover_duals(&self, d: &[f64]) -> Vec<f64> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, origin)| matches!(origin, RowOrigin::Constraint(_)))
            .map(|(i, _)| {
                let y = -d.get(self.unit_col[i]).copied().unwrap_or(0.0);
                self.sense * self.row_sign[i] * y
            })
            .collect()
    }
}
