//! A small SAT-backed constraint solver used to realize the seating model.
//!
//! Bounded integers are represented with an order encoding: a variable with
//! domain `[lb, ub]` is backed by `ub - lb` literals, the `i`-th of which
//! means `x <= lb + i`. Boolean decisions are just integers with domain
//! `[0, 1]`. Small-arity linear constraints are compiled by enumerating the
//! joint domain of their variables and forbidding violating assignments with
//! one blocking clause per violation; this is exact but only tractable while
//! the joint domain stays small, so wide sums fall back to a weaker bound
//! propagation pass. Optimization is not native to the underlying SAT solver,
//! so it is approximated with a binary search over the objective value,
//! re-solving from scratch at each step, bounded by a wall-clock deadline.

use std::collections::HashMap;
use std::time::Instant;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

/// Normalized solver outcome, independent of the underlying backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpStatus {
    /// The search completed and the returned solution is provably optimal.
    Optimal,
    /// A solution was found but the time budget expired before optimality
    /// could be proven.
    Feasible,
    /// The model has no satisfying assignment.
    Infeasible,
    /// The model itself could not be constructed (caught before solving).
    Invalid,
    /// The time budget expired before any solution was found.
    Unknown,
}

impl CpStatus {
    /// True when the solution's variable values are safe to read.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }

    /// The normalized status string used in [`crate::types::ScheduleResponse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "OPTIMAL",
            Self::Feasible => "FEASIBLE",
            Self::Infeasible => "INFEASIBLE",
            Self::Invalid => "MODEL_INVALID",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Handle to a variable owned by a [`CpModel`]. Cheap to copy and store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

#[derive(Debug)]
struct IntVar {
    lb: i64,
    ub: i64,
    order_vars: Vec<Var>,
}

#[derive(Debug)]
enum Constraint {
    LinearLe {
        vars: Vec<VarId>,
        coeffs: Vec<i64>,
        rhs: i64,
    },
    LinearGe {
        vars: Vec<VarId>,
        coeffs: Vec<i64>,
        rhs: i64,
    },
    LinearEq {
        vars: Vec<VarId>,
        coeffs: Vec<i64>,
        rhs: i64,
    },
    /// A raw clause over boolean variables, used for the OR/AND equality
    /// gadgets that the seating model builds directly rather than through
    /// a linear relaxation.
    Clause(Vec<Lit>),
}

#[derive(Debug)]
struct Objective {
    vars: Vec<VarId>,
    coeffs: Vec<i64>,
}

/// A solved model's variable assignment and status.
pub struct CpSolution {
    pub status: CpStatus,
    pub objective_value: Option<i64>,
    values: HashMap<VarId, i64>,
    pub wall_time: f64,
}

impl CpSolution {
    /// Returns the solved value of `var`, or `0` if the model has no solution.
    pub fn value(&self, var: VarId) -> i64 {
        self.values.get(&var).copied().unwrap_or(0)
    }

    /// Returns the solved value of a boolean variable as a `bool`.
    pub fn bool_value(&self, var: VarId) -> bool {
        self.value(var) != 0
    }
}

/// A growable constraint satisfaction model compiled down to CNF on solve.
#[derive(Debug)]
pub struct CpModel {
    vars: Vec<IntVar>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    next_var: Var,
    /// Enumeration cutoff for exact linear constraint encoding. Above this
    /// joint-domain size the encoder falls back to bound propagation.
    enumeration_budget: u64,
}

impl Default for CpModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CpModel {
    pub fn new() -> Self {
        Self {
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            next_var: Var::from_index(0),
            enumeration_budget: 10_000,
        }
    }

    fn alloc_var(&mut self) -> Var {
        let v = self.next_var;
        self.next_var = Var::from_index(v.index() + 1);
        v
    }

    /// Adds an integer variable with domain `[lb, ub]`.
    pub fn new_int_var(&mut self, lb: i64, ub: i64) -> VarId {
        assert!(lb <= ub, "empty domain");
        let num_order_vars = (ub - lb) as usize;
        let order_vars: Vec<Var> = (0..num_order_vars).map(|_| self.alloc_var()).collect();
        let id = VarId(self.vars.len());
        self.vars.push(IntVar { lb, ub, order_vars });
        id
    }

    /// Adds a boolean variable (an integer variable with domain `[0, 1]`).
    pub fn new_bool_var(&mut self) -> VarId {
        self.new_int_var(0, 1)
    }

    /// The literal asserting that boolean variable `v` takes `value`.
    fn bool_lit(&self, v: VarId, value: bool) -> Lit {
        let var = &self.vars[v.0];
        debug_assert_eq!((var.lb, var.ub), (0, 1), "bool_lit on a non-boolean variable");
        // order_vars[0] means x <= 0, i.e. x == 0; so asserting x == 1 negates it.
        Lit::from_var(var.order_vars[0], !value)
    }

    /// Fixes a boolean variable to a constant.
    pub fn fix_bool(&mut self, v: VarId, value: bool) {
        self.constraints.push(Constraint::Clause(vec![self.bool_lit(v, value)]));
    }

    /// Encodes `y <=> OR(inputs)` directly as two groups of clauses.
    pub fn add_or_eq(&mut self, y: VarId, inputs: &[VarId]) {
        for &v in inputs {
            self.constraints
                .push(Constraint::Clause(vec![self.bool_lit(v, false), self.bool_lit(y, true)]));
        }
        let mut clause = vec![self.bool_lit(y, false)];
        clause.extend(inputs.iter().map(|&v| self.bool_lit(v, true)));
        self.constraints.push(Constraint::Clause(clause));
    }

    /// Encodes `y <=> AND(inputs)` directly as two groups of clauses.
    pub fn add_and_eq(&mut self, y: VarId, inputs: &[VarId]) {
        for &v in inputs {
            self.constraints
                .push(Constraint::Clause(vec![self.bool_lit(y, false), self.bool_lit(v, true)]));
        }
        let mut clause: Vec<Lit> = inputs.iter().map(|&v| self.bool_lit(v, false)).collect();
        clause.push(self.bool_lit(y, true));
        self.constraints.push(Constraint::Clause(clause));
    }

    pub fn add_linear_le(&mut self, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        assert_eq!(vars.len(), coeffs.len());
        self.constraints.push(Constraint::LinearLe {
            vars: vars.to_vec(),
            coeffs: coeffs.to_vec(),
            rhs,
        });
    }

    pub fn add_linear_ge(&mut self, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        assert_eq!(vars.len(), coeffs.len());
        self.constraints.push(Constraint::LinearGe {
            vars: vars.to_vec(),
            coeffs: coeffs.to_vec(),
            rhs,
        });
    }

    pub fn add_linear_eq(&mut self, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        assert_eq!(vars.len(), coeffs.len());
        self.constraints.push(Constraint::LinearEq {
            vars: vars.to_vec(),
            coeffs: coeffs.to_vec(),
            rhs,
        });
    }

    /// Sets the objective to maximize `sum(coeffs[i] * vars[i])`.
    pub fn maximize(&mut self, vars: &[VarId], coeffs: &[i64]) {
        assert_eq!(vars.len(), coeffs.len());
        self.objective = Some(Objective {
            vars: vars.to_vec(),
            coeffs: coeffs.to_vec(),
        });
    }

    fn build_base_formula(&self) -> CnfFormula {
        let mut formula = CnfFormula::new();
        for var in &self.vars {
            for i in 0..var.order_vars.len().saturating_sub(1) {
                formula.add_clause(&[
                    Lit::from_var(var.order_vars[i], false),
                    Lit::from_var(var.order_vars[i + 1], true),
                ]);
            }
        }
        for constraint in &self.constraints {
            self.encode_constraint(&mut formula, constraint);
        }
        formula
    }

    /// Solves the model, stopping optimization once `deadline` has passed.
    ///
    /// If the deadline is already in the past when called, a single
    /// satisfiability check is still attempted so a trivial model does not
    /// spuriously come back `Unknown`.
    pub fn solve(&self, deadline: Instant) -> CpSolution {
        let start = Instant::now();
        if let Some(obj) = self.objective.as_ref() {
            self.solve_optimization(obj, start, deadline)
        } else {
            let formula = self.build_base_formula();
            self.solve_satisfaction(&formula, start)
        }
    }

    fn solve_satisfaction(&self, formula: &CnfFormula, start: Instant) -> CpSolution {
        let mut solver = Solver::new();
        solver.add_formula(formula);
        match solver.solve() {
            Ok(true) => CpSolution {
                status: CpStatus::Optimal,
                objective_value: None,
                values: self.extract_values(&solver.model().unwrap()),
                wall_time: start.elapsed().as_secs_f64(),
            },
            Ok(false) => CpSolution {
                status: CpStatus::Infeasible,
                objective_value: None,
                values: HashMap::new(),
                wall_time: start.elapsed().as_secs_f64(),
            },
            Err(_) => CpSolution {
                status: CpStatus::Unknown,
                objective_value: None,
                values: HashMap::new(),
                wall_time: start.elapsed().as_secs_f64(),
            },
        }
    }

    fn solve_optimization(&self, obj: &Objective, start: Instant, deadline: Instant) -> CpSolution {
        let (obj_lb, obj_ub) = self.objective_bounds(obj);
        let mut lo = obj_lb;
        let mut hi = obj_ub;
        let mut best_values: Option<HashMap<VarId, i64>> = None;
        let mut best_obj: Option<i64> = None;
        let mut proven_optimal = false;

        while lo <= hi {
            if Instant::now() >= deadline {
                break;
            }
            let mid = hi - (hi - lo) / 2;

            let mut formula = self.build_base_formula();
            self.encode_constraint(
                &mut formula,
                &Constraint::LinearGe {
                    vars: obj.vars.clone(),
                    coeffs: obj.coeffs.clone(),
                    rhs: mid,
                },
            );

            let mut solver = Solver::new();
            solver.add_formula(&formula);
            match solver.solve() {
                Ok(true) => {
                    let values = self.extract_values(&solver.model().unwrap());
                    let actual = self.objective_value(&values, obj);
                    best_values = Some(values);
                    best_obj = Some(actual);
                    lo = actual + 1;
                }
                Ok(false) => {
                    hi = mid - 1;
                }
                Err(_) => break,
            }
        }
        if lo > hi {
            proven_optimal = true;
        }

        match best_values {
            Some(values) => CpSolution {
                status: if proven_optimal { CpStatus::Optimal } else { CpStatus::Feasible },
                objective_value: best_obj,
                values,
                wall_time: start.elapsed().as_secs_f64(),
            },
            None if proven_optimal => CpSolution {
                status: CpStatus::Infeasible,
                objective_value: None,
                values: HashMap::new(),
                wall_time: start.elapsed().as_secs_f64(),
            },
            None => CpSolution {
                status: CpStatus::Unknown,
                objective_value: None,
                values: HashMap::new(),
                wall_time: start.elapsed().as_secs_f64(),
            },
        }
    }

    fn objective_bounds(&self, obj: &Objective) -> (i64, i64) {
        let mut lb = 0i64;
        let mut ub = 0i64;
        for (var_id, coeff) in obj.vars.iter().zip(&obj.coeffs) {
            let var = &self.vars[var_id.0];
            if *coeff >= 0 {
                lb += coeff * var.lb;
                ub += coeff * var.ub;
            } else {
                lb += coeff * var.ub;
                ub += coeff * var.lb;
            }
        }
        (lb, ub)
    }

    fn objective_value(&self, values: &HashMap<VarId, i64>, obj: &Objective) -> i64 {
        obj.vars
            .iter()
            .zip(&obj.coeffs)
            .map(|(v, c)| c * values.get(v).copied().unwrap_or(0))
            .sum()
    }

    fn encode_constraint(&self, formula: &mut CnfFormula, constraint: &Constraint) {
        match constraint {
            Constraint::LinearLe { vars, coeffs, rhs } => self.encode_linear_le(formula, vars, coeffs, *rhs),
            Constraint::LinearGe { vars, coeffs, rhs } => {
                let neg: Vec<i64> = coeffs.iter().map(|c| -c).collect();
                self.encode_linear_le(formula, vars, &neg, -rhs);
            }
            Constraint::LinearEq { vars, coeffs, rhs } => {
                self.encode_linear_le(formula, vars, coeffs, *rhs);
                let neg: Vec<i64> = coeffs.iter().map(|c| -c).collect();
                self.encode_linear_le(formula, vars, &neg, -rhs);
            }
            Constraint::Clause(lits) => formula.add_clause(lits),
        }
    }

    fn encode_linear_le(&self, formula: &mut CnfFormula, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        let total_combinations: u64 = vars
            .iter()
            .map(|v| (self.vars[v.0].ub - self.vars[v.0].lb + 1) as u64)
            .product();
        if total_combinations <= self.enumeration_budget {
            self.encode_linear_le_enumerate(formula, vars, coeffs, rhs);
        } else {
            self.encode_linear_le_bounds(formula, vars, coeffs, rhs);
        }
    }

    fn encode_linear_le_enumerate(&self, formula: &mut CnfFormula, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        let var_data: Vec<_> = vars.iter().map(|v| &self.vars[v.0]).collect();
        if var_data.is_empty() {
            return;
        }
        let mut indices: Vec<i64> = var_data.iter().map(|v| v.lb).collect();
        loop {
            let sum: i64 = indices.iter().zip(coeffs).map(|(val, c)| val * c).sum();
            if sum > rhs {
                let mut clause = Vec::new();
                for (i, val) in indices.iter().enumerate() {
                    let var = var_data[i];
                    if *val > var.lb {
                        let idx = (*val - var.lb - 1) as usize;
                        clause.push(Lit::from_var(var.order_vars[idx], true));
                    }
                    if *val < var.ub {
                        let idx = (*val - var.lb) as usize;
                        clause.push(Lit::from_var(var.order_vars[idx], false));
                    }
                }
                if !clause.is_empty() {
                    formula.add_clause(&clause);
                }
            }
            let mut i = indices.len();
            loop {
                if i == 0 {
                    return;
                }
                i -= 1;
                indices[i] += 1;
                if indices[i] <= var_data[i].ub {
                    break;
                }
                indices[i] = var_data[i].lb;
            }
        }
    }

    /// Weaker than enumeration: derives at most one implied bound literal per
    /// variable from the others' extreme values. Exact only when a single
    /// variable's coefficient dominates; kept only as a fallback for sums
    /// whose joint domain outgrows [`Self::enumeration_budget`].
    fn encode_linear_le_bounds(&self, formula: &mut CnfFormula, vars: &[VarId], coeffs: &[i64], rhs: i64) {
        for (i, (var_id, coeff)) in vars.iter().zip(coeffs).enumerate() {
            if *coeff == 0 {
                continue;
            }
            let var = &self.vars[var_id.0];
            let mut other_min = 0i64;
            for (j, (other_id, other_coeff)) in vars.iter().zip(coeffs).enumerate() {
                if i != j {
                    let other = &self.vars[other_id.0];
                    other_min += if *other_coeff >= 0 {
                        other_coeff * other.lb
                    } else {
                        other_coeff * other.ub
                    };
                }
            }
            let bound = rhs - other_min;
            if *coeff > 0 {
                let max_x = bound / coeff;
                if (var.lb..var.ub).contains(&max_x) {
                    let idx = (max_x - var.lb) as usize;
                    formula.add_clause(&[Lit::from_var(var.order_vars[idx], true)]);
                } else if max_x < var.lb {
                    formula.add_clause(&[]);
                }
            } else {
                // coeff * x <= bound with coeff < 0 means x >= bound / coeff,
                // i.e. x >= ceil((-bound) / (-coeff)) since -coeff > 0.
                let d = -coeff;
                let a = -bound;
                let min_x = if a >= 0 { (a + d - 1) / d } else { a / d };
                if min_x > var.lb && min_x <= var.ub {
                    let idx = (min_x - var.lb - 1) as usize;
                    formula.add_clause(&[Lit::from_var(var.order_vars[idx], false)]);
                } else if min_x > var.ub {
                    formula.add_clause(&[]);
                }
            }
        }
    }

    fn extract_values(&self, model: &[Lit]) -> HashMap<VarId, i64> {
        let model_map: HashMap<Var, bool> = model.iter().map(|lit| (lit.var(), lit.is_positive())).collect();
        let mut values = HashMap::new();
        for (i, var) in self.vars.iter().enumerate() {
            let mut value = var.ub;
            for (k, order_var) in var.order_vars.iter().enumerate() {
                if model_map.get(order_var).copied().unwrap_or(false) {
                    value = var.lb + k as i64;
                    break;
                }
            }
            values.insert(VarId(i), value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_deadline() -> Instant {
        Instant::now() + std::time::Duration::from_secs(30)
    }

    #[test]
    fn satisfies_a_sum_constraint() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 10);
        let y = model.new_int_var(0, 10);
        model.add_linear_eq(&[x, y], &[1, 1], 10);
        let solution = model.solve(far_deadline());
        assert!(solution.status.has_solution());
        assert_eq!(solution.value(x) + solution.value(y), 10);
    }

    #[test]
    fn maximizes_a_linear_objective() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 10);
        let y = model.new_int_var(0, 10);
        model.add_linear_le(&[x, y], &[1, 1], 10);
        model.maximize(&[x, y], &[1, 1]);
        let solution = model.solve(far_deadline());
        assert_eq!(solution.status, CpStatus::Optimal);
        assert_eq!(solution.objective_value, Some(10));
    }

    #[test]
    fn or_eq_is_true_iff_any_input_true() {
        let mut model = CpModel::new();
        let a = model.new_bool_var();
        let b = model.new_bool_var();
        let y = model.new_bool_var();
        model.add_or_eq(y, &[a, b]);
        model.fix_bool(a, false);
        model.fix_bool(b, false);
        let solution = model.solve(far_deadline());
        assert!(solution.status.has_solution());
        assert!(!solution.bool_value(y));
    }

    #[test]
    fn and_eq_requires_all_inputs_true() {
        let mut model = CpModel::new();
        let a = model.new_bool_var();
        let b = model.new_bool_var();
        let y = model.new_bool_var();
        model.add_and_eq(y, &[a, b]);
        model.fix_bool(a, true);
        model.fix_bool(b, false);
        let solution = model.solve(far_deadline());
        assert!(solution.status.has_solution());
        assert!(!solution.bool_value(y));
    }

    #[test]
    fn detects_infeasibility() {
        let mut model = CpModel::new();
        let x = model.new_int_var(0, 5);
        let y = model.new_int_var(0, 5);
        model.add_linear_eq(&[x, y], &[1, 1], 20);
        let solution = model.solve(far_deadline());
        assert_eq!(solution.status, CpStatus::Infeasible);
    }

    /// A sum-equality over 14 booleans and a size variable has a joint
    /// domain of `2^14 * 15`, well past `enumeration_budget`, so this
    /// exercises the bound-propagation fallback rather than enumeration.
    /// The negative-coefficient branch of that fallback must not derive a
    /// spurious `x_i >= n-1` bound from a `size <= sum(x_i)` style
    /// constraint, which would make every boolean infeasible.
    #[test]
    fn bound_propagation_fallback_handles_a_wide_sum_equality() {
        let mut model = CpModel::new();
        let n = 14;
        let flags: Vec<VarId> = (0..n).map(|_| model.new_bool_var()).collect();
        let size = model.new_int_var(0, n as i64);

        let mut vars = flags.clone();
        vars.push(size);
        let mut coeffs = vec![1i64; n];
        coeffs.push(-1);
        model.add_linear_eq(&vars, &coeffs, 0);

        for (i, &flag) in flags.iter().enumerate() {
            model.fix_bool(flag, i < 5);
        }

        let solution = model.solve(far_deadline());
        assert!(solution.status.has_solution(), "expected a solution, got {:?}", solution.status);
        assert_eq!(solution.value(size), 5);
    }
}
