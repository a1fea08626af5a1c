//! Linear expressions over model variables.

use super::variables::VarId;

/// `sum(coef_i * x_i) + constant`.
///
/// Terms are kept sorted by variable with no duplicate keys; adding a term
/// for a variable already present sums the coefficients, and zero
/// coefficients are dropped.
///
/// # Examples
///
/// ```
/// use u_linprog::model::{LinearExpr, Model, Sense, Variable};
///
/// let mut model = Model::new("demo", Sense::Minimize);
/// let x = model.add_variable(Variable::new("x")).unwrap();
/// let y = model.add_variable(Variable::new("y")).unwrap();
///
/// let expr = LinearExpr::new().term(x, 3.0).term(y, 2.0).term(x, -1.0).constant(4.0);
/// assert_eq!(expr.coefficient(x), 2.0);
/// assert_eq!(expr.evaluate(&[1.0, 1.0]), 8.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// Empty expression (value zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an expression from `(variable, coefficient)` pairs.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (VarId, f64)>,
    {
        let mut expr = Self::new();
        for (var, coef) in terms {
            expr.add_term(var, coef);
        }
        expr
    }

    /// Adds `coef * var` (builder form).
    pub fn term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    /// Sets the scalar constant (builder form).
    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// Adds `coef * var`, merging with an existing term on the same variable.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        match self.terms.binary_search_by_key(&var, |&(v, _)| v) {
            Ok(pos) => {
                self.terms[pos].1 += coef;
                if self.terms[pos].1 == 0.0 {
                    self.terms.remove(pos);
                }
            }
            Err(pos) => {
                if coef != 0.0 {
                    self.terms.insert(pos, (var, coef));
                }
            }
        }
    }

    /// Adds to the scalar constant.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// `(variable, coefficient)` pairs in variable order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Coefficient of `var` (zero if absent).
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .binary_search_by_key(&var, |&(v, _)| v)
            .map(|pos| self.terms[pos].1)
            .unwrap_or(0.0)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value of the expression at `values` (indexed by [`VarId::index`]).
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// First non-finite coefficient or constant, if any.
    pub(crate) fn first_non_finite(&self) -> Option<(Option<VarId>, f64)> {
        if !self.constant.is_finite() {
            return Some((None, self.constant));
        }
        self.terms
            .iter()
            .find(|(_, coef)| !coef.is_finite())
            .map(|&(var, coef)| (Some(var), coef))
    }
}
