//! LP/MILP model definition.

use super::expression::LinearExpr;
use super::variables::{Bounds, VarId, Variable};
use crate::error::ValidationError;
use std::collections::HashMap;
use std::fmt;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Sense {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "min"))]
    Minimize,
    #[cfg_attr(feature = "serde", serde(alias = "max"))]
    Maximize,
}

impl Sense {
    /// `+1` for minimization, `-1` for maximization.
    ///
    /// Multiplying an objective by this factor turns it into a
    /// minimization objective.
    pub fn factor(self) -> f64 {
        match self {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        }
    }
}

/// Constraint comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
    /// `lhs <= rhs`
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// `lhs >= rhs`
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// `lhs == rhs`
    #[cfg_attr(feature = "serde", serde(rename = "=", alias = "=="))]
    Eq,
}

impl Comparator {
    /// The comparator obtained by multiplying both sides by `-1`.
    pub fn flipped(self) -> Self {
        match self {
            Comparator::Le => Comparator::Ge,
            Comparator::Ge => Comparator::Le,
            Comparator::Eq => Comparator::Eq,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
            Comparator::Eq => "=",
        };
        f.write_str(s)
    }
}

/// Stable row index of a constraint within its [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear constraint `lhs cmp rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) name: String,
    pub(crate) lhs: LinearExpr,
    pub(crate) cmp: Comparator,
    pub(crate) rhs: f64,
    pub(crate) index: usize,
}

impl Constraint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lhs(&self) -> &LinearExpr {
        &self.lhs
    }

    pub fn comparator(&self) -> Comparator {
        self.cmp
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn id(&self) -> ConstraintId {
        ConstraintId(self.index)
    }

    /// Left-hand side evaluated at `values`.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.lhs.evaluate(values)
    }

    /// Signed violation at `values` (zero when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let activity = self.activity(values);
        match self.cmp {
            Comparator::Le => (activity - self.rhs).max(0.0),
            Comparator::Ge => (self.rhs - activity).max(0.0),
            Comparator::Eq => (activity - self.rhs).abs(),
        }
    }

    /// Whether `values` satisfies the constraint up to a scaled `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        self.violation(values) <= tol * (1.0 + self.rhs.abs())
    }

    /// Whether the constraint holds with equality at `values`.
    pub fn is_binding(&self, values: &[f64], tol: f64) -> bool {
        (self.activity(values) - self.rhs).abs() <= tol * (1.0 + self.rhs.abs())
    }
}

/// Objective function: a linear expression and a direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    pub expr: LinearExpr,
}

/// A linear (or mixed-integer linear) program.
///
/// Variables and constraints receive stable indices in insertion order.
/// Every insertion is validated, so a `Model` never holds duplicate names,
/// dangling variable references or inverted bounds. The engine treats a
/// model as read-only.
///
/// # Examples
///
/// ```
/// use u_linprog::model::{Comparator, LinearExpr, Model, Sense, Variable};
///
/// let mut model = Model::new("diet", Sense::Minimize);
/// let x = model.add_variable(Variable::new("x")).unwrap();
/// let y = model.add_variable(Variable::new("y")).unwrap();
/// model.set_objective(LinearExpr::new().term(x, 3.0).term(y, 2.0)).unwrap();
/// model
///     .add_constraint("c1", LinearExpr::new().term(x, 1.0).term(y, 2.0), Comparator::Ge, 8.0)
///     .unwrap();
///
/// assert_eq!(model.num_variables(), 2);
/// assert_eq!(model.num_constraints(), 1);
/// assert!(model.add_variable(Variable::new("x")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    objective: Objective,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    var_index: HashMap<String, usize>,
    constraint_index: HashMap<String, usize>,
}

impl Model {
    /// Creates an empty model with a zero objective.
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            name: name.into(),
            objective: Objective {
                sense,
                expr: LinearExpr::new(),
            },
            ..Self::default()
        }
    }

    /// Adds a variable and returns its column index.
    pub fn add_variable(&mut self, mut var: Variable) -> Result<VarId, ValidationError> {
        if var.name.is_empty() {
            return Err(ValidationError::EmptyName("variable"));
        }
        if self.var_index.contains_key(&var.name) {
            return Err(ValidationError::DuplicateVariable(var.name));
        }
        check_bounds(&var.name, var.bounds)?;

        let index = self.variables.len();
        var.index = index;
        self.var_index.insert(var.name.clone(), index);
        self.variables.push(var);
        Ok(VarId(index))
    }

    /// Adds a constraint `lhs cmp rhs` and returns its row index.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        lhs: LinearExpr,
        cmp: Comparator,
        rhs: f64,
    ) -> Result<ConstraintId, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName("constraint"));
        }
        if self.constraint_index.contains_key(&name) {
            return Err(ValidationError::DuplicateConstraint(name));
        }
        self.check_references(&lhs, &format!("constraint `{name}`"))?;

        let index = self.constraints.len();
        self.constraint_index.insert(name.clone(), index);
        self.constraints.push(Constraint {
            name,
            lhs,
            cmp,
            rhs,
            index,
        });
        Ok(ConstraintId(index))
    }

    /// Replaces the objective expression (the sense is kept).
    pub fn set_objective(&mut self, expr: LinearExpr) -> Result<(), ValidationError> {
        self.check_references(&expr, "objective")?;
        self.objective.expr = expr;
        Ok(())
    }

    /// Changes the optimization direction.
    pub fn set_sense(&mut self, sense: Sense) {
        self.objective.sense = sense;
    }

    /// Re-checks every model invariant.
    ///
    /// Insertion already enforces these; this is the entry check run by the
    /// solvers and includes the finiteness of every coefficient.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for var in &self.variables {
            check_bounds(&var.name, var.bounds)?;
        }
        self.check_references(&self.objective.expr, "objective")?;
        check_finite(&self.objective.expr, "objective")?;
        for c in &self.constraints {
            let context = format!("constraint `{}`", c.name);
            self.check_references(&c.lhs, &context)?;
            check_finite(&c.lhs, &context)?;
            if !c.rhs.is_finite() {
                return Err(ValidationError::NonFinite(format!("right-hand side of {context}")));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.objective.sense
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.0)
    }

    /// Looks up a variable by name.
    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.var_index.get(name).map(|&i| VarId(i))
    }

    /// Looks up a constraint by name.
    pub fn constraint_id(&self, name: &str) -> Option<ConstraintId> {
        self.constraint_index.get(name).map(|&i| ConstraintId(i))
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether any variable is flagged integral.
    pub fn has_integers(&self) -> bool {
        self.variables.iter().any(|v| v.integer)
    }

    /// Declared bounds of every variable, indexed by column.
    pub fn bounds(&self) -> Vec<Bounds> {
        self.variables.iter().map(|v| v.bounds).collect()
    }

    /// Objective value at `values`, constant included.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.expr.evaluate(values)
    }

    /// Whether `values` satisfies every bound and constraint up to `tol`.
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(values)
                .all(|(v, &x)| v.bounds.contains(x, tol * (1.0 + x.abs())))
            && self.constraints.iter().all(|c| c.is_satisfied(values, tol))
    }

    fn check_references(&self, expr: &LinearExpr, context: &str) -> Result<(), ValidationError> {
        match expr.terms().iter().find(|(var, _)| var.0 >= self.variables.len()) {
            Some((var, _)) => Err(ValidationError::UnknownVariableIndex {
                index: var.0,
                context: context.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn check_bounds(name: &str, bounds: Bounds) -> Result<(), ValidationError> {
    let Bounds { lower, upper } = bounds;
    if lower.is_nan() || upper.is_nan() {
        return Err(ValidationError::NonFinite(format!("bounds of variable `{name}`")));
    }
    if lower == f64::INFINITY || upper == f64::NEG_INFINITY || lower > upper {
        return Err(ValidationError::InvalidBounds {
            name: name.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

fn check_finite(expr: &LinearExpr, context: &str) -> Result<(), ValidationError> {
    match expr.first_non_finite() {
        Some((Some(var), value)) => Err(ValidationError::NonFinite(format!(
            "coefficient {value} of variable #{} in {context}",
            var.index()
        ))),
        Some((None, value)) => Err(ValidationError::NonFinite(format!(
            "constant {value} in {context}"
        ))),
        None => Ok(()),
    }
}
