//! End-to-end solves of small textbook models.

use u_linprog::{
    solve, solve_batch, Comparator, Engine, LinearExpr, Model, PivotRule, Sense, SolveOptions, SolveStatus,
    Variable,
};

fn diet() -> Model {
    let mut model = Model::new("diet", Sense::Minimize);
    let x = model.add_variable(Variable::new("x")).unwrap();
    let y = model.add_variable(Variable::new("y")).unwrap();
    model.set_objective(LinearExpr::new().term(x, 3.0).term(y, 2.0)).unwrap();
    model
        .add_constraint("c1", LinearExpr::new().term(x, 1.0).term(y, 2.0), Comparator::Ge, 8.0)
        .unwrap();
    model
        .add_constraint("c2", LinearExpr::new().term(x, 3.0).term(y, 1.0), Comparator::Ge, 6.0)
        .unwrap();
    model
}

/// Beale's instance, which cycles under Dantzig pricing without an
/// anti-cycling rule.
fn beale() -> Model {
    let mut model = Model::new("beale", Sense::Minimize);
    let x4 = model.add_variable(Variable::new("x4")).unwrap();
    let x5 = model.add_variable(Variable::new("x5")).unwrap();
    let x6 = model.add_variable(Variable::new("x6")).unwrap();
    let x7 = model.add_variable(Variable::new("x7")).unwrap();
    model
        .set_objective(
            LinearExpr::new()
                .term(x4, -0.75)
                .term(x5, 150.0)
                .term(x6, -0.02)
                .term(x7, 6.0),
        )
        .unwrap();
    model
        .add_constraint(
            "r1",
            LinearExpr::new().term(x4, 0.25).term(x5, -60.0).term(x6, -0.04).term(x7, 9.0),
            Comparator::Le,
            0.0,
        )
        .unwrap();
    model
        .add_constraint(
            "r2",
            LinearExpr::new().term(x4, 0.5).term(x5, -90.0).term(x6, -0.02).term(x7, 3.0),
            Comparator::Le,
            0.0,
        )
        .unwrap();
    model.add_constraint("r3", LinearExpr::new().term(x6, 1.0), Comparator::Le, 1.0).unwrap();
    model
}

/// Chvátal's degenerate cycling example.
fn chvatal() -> Model {
    let mut model = Model::new("chvatal", Sense::Maximize);
    let x1 = model.add_variable(Variable::new("x1")).unwrap();
    let x2 = model.add_variable(Variable::new("x2")).unwrap();
    let x3 = model.add_variable(Variable::new("x3")).unwrap();
    let x4 = model.add_variable(Variable::new("x4")).unwrap();
    model
        .set_objective(
            LinearExpr::new()
                .term(x1, 10.0)
                .term(x2, -57.0)
                .term(x3, -9.0)
                .term(x4, -24.0),
        )
        .unwrap();
    model
        .add_constraint(
            "r1",
            LinearExpr::new().term(x1, 0.5).term(x2, -5.5).term(x3, -2.5).term(x4, 9.0),
            Comparator::Le,
            0.0,
        )
        .unwrap();
    model
        .add_constraint(
            "r2",
            LinearExpr::new().term(x1, 0.5).term(x2, -1.5).term(x3, -0.5).term(x4, 1.0),
            Comparator::Le,
            0.0,
        )
        .unwrap();
    model.add_constraint("r3", LinearExpr::new().term(x1, 1.0), Comparator::Le, 1.0).unwrap();
    model
}

#[test]
fn test_diet_lp() {
    let solution = solve(&diet(), &SolveOptions::default()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.objective_value.unwrap() - 9.6).abs() < 1e-9);
    assert!((solution.value("x").unwrap() - 0.8).abs() < 1e-9);
    assert!((solution.value("y").unwrap() - 3.6).abs() < 1e-9);
    assert!(solution.dual("c1").unwrap() > 0.0);
    assert!(solution.dual("c2").unwrap() > 0.0);
    assert_eq!(solution.stats.nodes_explored, 0);
}

#[test]
fn test_integer_split() {
    let mut model = Model::new("split", Sense::Maximize);
    let x = model.add_variable(Variable::new("x").integer()).unwrap();
    let y = model.add_variable(Variable::new("y").integer()).unwrap();
    model.set_objective(LinearExpr::new().term(x, 1.0).term(y, 1.0)).unwrap();
    model
        .add_constraint("cap", LinearExpr::new().term(x, 1.0).term(y, 1.0), Comparator::Le, 10.0)
        .unwrap();

    let solution = solve(&model, &SolveOptions::default()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.objective_value.unwrap() - 10.0).abs() < 1e-9);
    let (xv, yv) = (solution.value("x").unwrap(), solution.value("y").unwrap());
    assert_eq!(xv.fract(), 0.0);
    assert_eq!(yv.fract(), 0.0);
    assert!(xv >= 0.0 && yv >= 0.0 && xv + yv <= 10.0 + 1e-9);
    assert!(solution.duals.is_empty());
}

#[test]
fn test_empty_region() {
    let mut model = Model::new("empty", Sense::Minimize);
    let x = model.add_variable(Variable::new("x")).unwrap();
    model.set_objective(LinearExpr::new().term(x, 1.0)).unwrap();
    model.add_constraint("lo", LinearExpr::new().term(x, 1.0), Comparator::Ge, 5.0).unwrap();
    model.add_constraint("hi", LinearExpr::new().term(x, 1.0), Comparator::Le, 3.0).unwrap();

    let solution = solve(&model, &SolveOptions::default()).unwrap();
    assert_eq!(solution.status, SolveStatus::Infeasible);
    assert!(solution.objective_value.is_none());
    assert!(solution.variables.is_empty());
}

#[test]
fn test_unbounded_ray() {
    let mut model = Model::new("ray", Sense::Maximize);
    let x = model.add_variable(Variable::new("x")).unwrap();
    model.set_objective(LinearExpr::new().term(x, 1.0)).unwrap();

    let solution = solve(&model, &SolveOptions::default()).unwrap();
    assert_eq!(solution.status, SolveStatus::Unbounded);
    assert!(solution.objective_value.is_none());
}

#[test]
fn test_beale_terminates() {
    for rule in [PivotRule::Dantzig, PivotRule::Bland] {
        let options = SolveOptions::default().with_pivot_rule(rule);
        let solution = solve(&beale(), &options).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal, "{rule:?}");
        assert!((solution.objective_value.unwrap() + 0.05).abs() < 1e-9, "{rule:?}");
    }
}

#[test]
fn test_chvatal_terminates() {
    for rule in [PivotRule::Dantzig, PivotRule::Bland] {
        let options = SolveOptions::default().with_pivot_rule(rule).with_stall_threshold(1);
        let solution = solve(&chvatal(), &options).unwrap();
        assert_eq!(solution.status, SolveStatus::Optimal, "{rule:?}");
        assert!((solution.objective_value.unwrap() - 1.0).abs() < 1e-9, "{rule:?}");
    }
}

#[test]
fn test_bounded_and_reflected_variables() {
    // min x - y  s.t.  x in [2, 6], y in (-inf, 4], x + y >= 3
    let mut model = Model::new("bounds", Sense::Minimize);
    let x = model.add_variable(Variable::new("x").with_bounds(2.0, 6.0)).unwrap();
    let y = model
        .add_variable(Variable::new("y").with_bounds(f64::NEG_INFINITY, 4.0))
        .unwrap();
    model.set_objective(LinearExpr::new().term(x, 1.0).term(y, -1.0)).unwrap();
    model
        .add_constraint("c", LinearExpr::new().term(x, 1.0).term(y, 1.0), Comparator::Ge, 3.0)
        .unwrap();

    let solution = solve(&model, &SolveOptions::default()).unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.value("x").unwrap() - 2.0).abs() < 1e-9);
    assert!((solution.value("y").unwrap() - 4.0).abs() < 1e-9);
    assert!((solution.objective_value.unwrap() + 2.0).abs() < 1e-9);
}

#[test]
fn test_objective_constant() {
    let mut model = diet();
    let x = model.var_id("x").unwrap();
    let y = model.var_id("y").unwrap();
    model
        .set_objective(LinearExpr::new().term(x, 3.0).term(y, 2.0).constant(100.0))
        .unwrap();
    let solution = solve(&model, &SolveOptions::default()).unwrap();
    assert!((solution.objective_value.unwrap() - 109.6).abs() < 1e-9);
}

#[test]
fn test_batch_of_examples() {
    let models = vec![diet(), beale(), chvatal()];
    let results = solve_batch(&models, &SolveOptions::default());
    let objectives: Vec<f64> = results
        .into_iter()
        .map(|r| r.unwrap().objective_value.unwrap())
        .collect();
    assert!((objectives[0] - 9.6).abs() < 1e-9);
    assert!((objectives[1] + 0.05).abs() < 1e-9);
    assert!((objectives[2] - 1.0).abs() < 1e-9);
}

#[test]
fn test_engine_reuse() {
    let engine = Engine::builtin_only();
    let options = SolveOptions::default();
    for _ in 0..3 {
        let solution = engine.solve(&diet(), &options).unwrap();
        assert!(solution.is_proven_optimal());
    }
}

#[cfg(feature = "serde")]
mod documents {
    use u_linprog::document::{parse_model, solve_json, ModelDocument, SolutionDocument};
    use u_linprog::SolveOptions;

    const KNAPSACK: &str = r#"{
        "name": "knapsack",
        "sense": "maximize",
        "objective": {"terms": [
            {"var": "a", "coef": 5}, {"var": "b", "coef": 4}, {"var": "c", "coef": 3}, {"var": "d", "coef": 6}
        ]},
        "variables": [
            {"name": "a", "ub": 1, "integer": true},
            {"name": "b", "ub": 1, "integer": true},
            {"name": "c", "ub": 1, "integer": true},
            {"name": "d", "ub": 1, "integer": true}
        ],
        "constraints": [
            {"name": "weight", "lhs": {"terms": [
                {"var": "a", "coef": 2}, {"var": "b", "coef": 3}, {"var": "c", "coef": 1}, {"var": "d", "coef": 4}
            ]}, "cmp": "<=", "rhs": 7}
        ]
    }"#;

    #[test]
    fn test_knapsack_document() {
        let output = solve_json(KNAPSACK, &SolveOptions::default());
        let doc: SolutionDocument = serde_json::from_str(&output).unwrap();
        assert_eq!(doc.status, "optimal");
        assert!((doc.objective_value.unwrap() - 14.0).abs() < 1e-9);
        assert_eq!(doc.variables["a"], 1.0);
        assert_eq!(doc.variables["b"], 0.0);
        assert_eq!(doc.variables["c"], 1.0);
        assert_eq!(doc.variables["d"], 1.0);
        assert!(doc.nodes_explored >= 1);
        assert!(doc.duals.is_empty());
    }

    #[test]
    fn test_document_survives_reserialization() {
        let model = parse_model(KNAPSACK).unwrap();
        let json = serde_json::to_string_pretty(&ModelDocument::from_model(&model)).unwrap();
        let first: SolutionDocument = serde_json::from_str(&solve_json(KNAPSACK, &SolveOptions::default())).unwrap();
        let second: SolutionDocument = serde_json::from_str(&solve_json(&json, &SolveOptions::default())).unwrap();
        assert_eq!(first.objective_value, second.objective_value);
        assert_eq!(first.variables, second.variables);
    }

    #[test]
    fn test_invalid_options_document() {
        let options = SolveOptions::default().with_tolerance(-1.0);
        let doc: SolutionDocument = serde_json::from_str(&solve_json(KNAPSACK, &options)).unwrap();
        assert_eq!(doc.status, "invalid_options");
    }
}
