//! JSON model and solution documents.
//!
//! A model document looks like
//!
//! ```json
//! {
//!   "name": "diet",
//!   "sense": "minimize",
//!   "objective": {"terms": [{"var": "x", "coef": 3.0}, {"var": "y", "coef": 2.0}], "constant": 0.0},
//!   "variables": [{"name": "x", "lb": 0.0, "ub": null, "integer": false}, {"name": "y"}],
//!   "constraints": [
//!     {"name": "c1", "lhs": {"terms": [{"var": "x", "coef": 1.0}, {"var": "y", "coef": 2.0}]}, "cmp": ">=", "rhs": 8.0}
//!   ]
//! }
//! ```
//!
//! A missing `lb` means `0` and an explicit `null` means unbounded below;
//! a missing or `null` `ub` means unbounded above.

use crate::error::{SolveError, SolveResult, ValidationError};
use crate::model::{Comparator, LinearExpr, Model, Sense, Variable};
use crate::options::SolveOptions;
use crate::solution::Solution;
use crate::solver::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One `coef * var` term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDocument {
    pub var: String,
    pub coef: f64,
}

/// A linear expression by variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExprDocument {
    #[serde(default)]
    pub terms: Vec<TermDocument>,
    #[serde(default)]
    pub constant: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDocument {
    pub name: String,
    #[serde(default, deserialize_with = "lower_bound")]
    pub lb: f64,
    #[serde(default = "unbounded_above", deserialize_with = "upper_bound")]
    pub ub: f64,
    #[serde(default)]
    pub integer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDocument {
    pub name: String,
    #[serde(default)]
    pub lhs: ExprDocument,
    pub cmp: Comparator,
    pub rhs: f64,
}

/// Serialized form of a [`Model`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sense: Sense,
    #[serde(default)]
    pub objective: ExprDocument,
    #[serde(default)]
    pub variables: Vec<VariableDocument>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDocument>,
}

fn unbounded_above() -> f64 {
    f64::INFINITY
}

fn lower_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
}

fn upper_bound<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

impl ModelDocument {
    /// Builds and validates the model.
    pub fn to_model(&self) -> Result<Model, ValidationError> {
        let mut model = Model::new(self.name.clone(), self.sense);
        for v in &self.variables {
            model.add_variable(
                Variable::new(v.name.clone())
                    .with_bounds(v.lb, v.ub)
                    .with_integer(v.integer),
            )?;
        }
        let objective = resolve(&model, &self.objective, "objective")?;
        model.set_objective(objective)?;
        for c in &self.constraints {
            let lhs = resolve(&model, &c.lhs, &format!("constraint `{}`", c.name))?;
            model.add_constraint(c.name.clone(), lhs, c.cmp, c.rhs)?;
        }
        Ok(model)
    }

    /// Document describing `model`.
    pub fn from_model(model: &Model) -> Self {
        let expr_doc = |expr: &LinearExpr| ExprDocument {
            terms: expr
                .terms()
                .iter()
                .map(|&(var, coef)| TermDocument {
                    var: model.variables()[var.index()].name().to_string(),
                    coef,
                })
                .collect(),
            constant: expr.constant_term(),
        };
        Self {
            name: model.name().to_string(),
            sense: model.sense(),
            objective: expr_doc(&model.objective().expr),
            variables: model
                .variables()
                .iter()
                .map(|v| VariableDocument {
                    name: v.name().to_string(),
                    lb: v.lower(),
                    ub: v.upper(),
                    integer: v.is_integer(),
                })
                .collect(),
            constraints: model
                .constraints()
                .iter()
                .map(|c| ConstraintDocument {
                    name: c.name().to_string(),
                    lhs: expr_doc(c.lhs()),
                    cmp: c.comparator(),
                    rhs: c.rhs(),
                })
                .collect(),
        }
    }
}

fn resolve(model: &Model, doc: &ExprDocument, context: &str) -> Result<LinearExpr, ValidationError> {
    let mut expr = LinearExpr::new().constant(doc.constant);
    for term in &doc.terms {
        let id = model.var_id(&term.var).ok_or_else(|| ValidationError::UnknownVariable {
            name: term.var.clone(),
            context: context.to_string(),
        })?;
        expr.add_term(id, term.coef);
    }
    Ok(expr)
}

/// Serialized form of a [`Solution`], or of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionDocument {
    pub status: String,
    pub objective_value: Option<f64>,
    #[serde(default)]
    pub variables: BTreeMap<String, f64>,
    #[serde(default)]
    pub duals: BTreeMap<String, f64>,
    #[serde(default)]
    pub reduced_costs: BTreeMap<String, f64>,
    #[serde(default)]
    pub iterations: usize,
    #[serde(default)]
    pub nodes_explored: usize,
    #[serde(default)]
    pub message: String,
}

impl SolutionDocument {
    pub fn from_solution(solution: &Solution) -> Self {
        Self {
            status: solution.status.as_str().to_string(),
            objective_value: solution.objective_value,
            variables: solution.variables.clone(),
            duals: solution.duals.clone(),
            reduced_costs: solution.reduced_costs.clone(),
            iterations: solution.stats.iterations,
            nodes_explored: solution.stats.nodes_explored,
            message: solution.message.clone(),
        }
    }

    /// Document reporting a failed call under the error's status code.
    pub fn from_error(err: &SolveError) -> Self {
        Self {
            status: err.status_code().to_string(),
            objective_value: None,
            variables: BTreeMap::new(),
            duals: BTreeMap::new(),
            reduced_costs: BTreeMap::new(),
            iterations: 0,
            nodes_explored: 0,
            message: err.to_string(),
        }
    }
}

/// Parses and validates a model document.
pub fn parse_model(input: &str) -> SolveResult<Model> {
    let doc: ModelDocument = serde_json::from_str(input)?;
    Ok(doc.to_model()?)
}

/// Parses, solves and renders a model document.
///
/// Never fails: parse, validation and numerical errors are rendered as a
/// document carrying the error's status code.
pub fn solve_json(input: &str, options: &SolveOptions) -> String {
    let doc = match parse_model(input).and_then(|model| Engine::new().solve(&model, options)) {
        Ok(solution) => SolutionDocument::from_solution(&solution),
        Err(err) => SolutionDocument::from_error(&err),
    };
    serde_json::to_string(&doc).unwrap_or_else(|err| {
        serde_json::json!({ "status": "numerical_error", "message": err.to_string() }).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::SolveStatus;

    const DIET: &str = r#"{
        "name": "diet",
        "sense": "min",
        "objective": {"terms": [{"var": "x", "coef": 3}, {"var": "y", "coef": 2}]},
        "variables": [{"name": "x"}, {"name": "y", "lb": 0, "ub": null}],
        "constraints": [
            {"name": "c1", "lhs": {"terms": [{"var": "x", "coef": 1}, {"var": "y", "coef": 2}]}, "cmp": ">=", "rhs": 8},
            {"name": "c2", "lhs": {"terms": [{"var": "x", "coef": 3}, {"var": "y", "coef": 1}]}, "cmp": ">=", "rhs": 6}
        ]
    }"#;

    #[test]
    fn test_parse_model() {
        let model = parse_model(DIET).unwrap();
        assert_eq!(model.name(), "diet");
        assert_eq!(model.sense(), Sense::Minimize);
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 2);
        assert!(model.variables()[1].upper().is_infinite());
    }

    #[test]
    fn test_bound_defaults() {
        let doc: ModelDocument = serde_json::from_str(
            r#"{"variables": [{"name": "a"}, {"name": "b", "lb": null}, {"name": "c", "lb": -2, "ub": 4, "integer": true}]}"#,
        )
        .unwrap();
        assert_eq!(doc.variables[0].lb, 0.0);
        assert_eq!(doc.variables[0].ub, f64::INFINITY);
        assert_eq!(doc.variables[1].lb, f64::NEG_INFINITY);
        assert_eq!(doc.variables[2].lb, -2.0);
        assert!(doc.variables[2].integer);
        assert_eq!(doc.sense, Sense::Minimize);
    }

    #[test]
    fn test_comparator_aliases() {
        let c: Comparator = serde_json::from_str(r#""==""#).unwrap();
        assert_eq!(c, Comparator::Eq);
        let c: Comparator = serde_json::from_str(r#""<=""#).unwrap();
        assert_eq!(c, Comparator::Le);
        assert!(serde_json::from_str::<Comparator>(r#""<""#).is_err());
    }

    #[test]
    fn test_unknown_variable() {
        let input = r#"{"variables": [{"name": "x"}], "objective": {"terms": [{"var": "z", "coef": 1}]}}"#;
        let err = parse_model(input).unwrap_err();
        assert!(matches!(
            err,
            SolveError::Validation(ValidationError::UnknownVariable { ref name, .. }) if name == "z"
        ));
    }

    #[test]
    fn test_repeated_terms_summed() {
        let input = r#"{"variables": [{"name": "x"}],
            "objective": {"terms": [{"var": "x", "coef": 1}, {"var": "x", "coef": 2}], "constant": 1}}"#;
        let model = parse_model(input).unwrap();
        let x = model.var_id("x").unwrap();
        assert_eq!(model.objective().expr.coefficient(x), 3.0);
        assert_eq!(model.objective().expr.constant_term(), 1.0);
    }

    #[test]
    fn test_solve_json() {
        let output = solve_json(DIET, &SolveOptions::default());
        let doc: SolutionDocument = serde_json::from_str(&output).unwrap();
        assert_eq!(doc.status, "optimal");
        assert!((doc.objective_value.unwrap() - 9.6).abs() < 1e-9);
        assert!((doc.variables["x"] - 0.8).abs() < 1e-9);
        assert!((doc.duals["c1"] - 0.6).abs() < 1e-9);
        assert!(doc.iterations > 0);
        assert_eq!(doc.nodes_explored, 0);
    }

    #[test]
    fn test_solve_json_errors_are_documents() {
        let doc: SolutionDocument = serde_json::from_str(&solve_json("{not json", &SolveOptions::default())).unwrap();
        assert_eq!(doc.status, "validation_error");

        let dup = r#"{"variables": [{"name": "x"}, {"name": "x"}]}"#;
        let doc: SolutionDocument = serde_json::from_str(&solve_json(dup, &SolveOptions::default())).unwrap();
        assert_eq!(doc.status, "validation_error");
        assert!(doc.message.contains("duplicate"));
        assert!(doc.objective_value.is_none());
    }

    #[test]
    fn test_infeasible_document() {
        let input = r#"{"sense": "minimize",
            "objective": {"terms": [{"var": "x", "coef": 1}]},
            "variables": [{"name": "x"}],
            "constraints": [
                {"name": "lo", "lhs": {"terms": [{"var": "x", "coef": 1}]}, "cmp": ">=", "rhs": 5},
                {"name": "hi", "lhs": {"terms": [{"var": "x", "coef": 1}]}, "cmp": "<=", "rhs": 3}
            ]}"#;
        let doc: SolutionDocument = serde_json::from_str(&solve_json(input, &SolveOptions::default())).unwrap();
        assert_eq!(doc.status, SolveStatus::Infeasible.as_str());
        assert!(doc.variables.is_empty());
    }

    #[test]
    fn test_model_document_round_trip() {
        let model = parse_model(DIET).unwrap();
        let json = serde_json::to_string(&ModelDocument::from_model(&model)).unwrap();
        let again = parse_model(&json).unwrap();
        assert_eq!(again.num_constraints(), 2);
        assert!(again.variables()[0].upper().is_infinite());
        assert_eq!(again.constraint(again.constraint_id("c2").unwrap()).unwrap().rhs(), 6.0);
    }
}
