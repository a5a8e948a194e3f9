use crate::cnf::{clauses_to_dimacs, Lit};
use crate::solver::{IncrementalSolver, SolveResult, SolverStats, VarPolarity};

/// Forwards to an inner engine while keeping a copy of every clause and
/// every assumption set it was asked to solve under.
#[derive(Debug, Clone, Default)]
pub struct RecordingSolver<S> {
    inner: S,
    num_vars: u32,
    clauses: Vec<Vec<Lit>>,
    assumption_log: Vec<Vec<Lit>>,
}

impl<S: IncrementalSolver> RecordingSolver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            num_vars: 0,
            clauses: Vec::new(),
            assumption_log: Vec::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Vec<Lit>] {
        &self.clauses
    }

    pub fn assumption_log(&self) -> &[Vec<Lit>] {
        &self.assumption_log
    }

    pub fn to_dimacs(&self) -> String {
        clauses_to_dimacs(self.num_vars, &self.clauses)
    }
}

impl<S: IncrementalSolver> IncrementalSolver for RecordingSolver<S> {
    fn new_var(&mut self, polarity: VarPolarity) -> u32 {
        let v = self.inner.new_var(polarity);
        self.num_vars = self.num_vars.max(v);
        v
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause.clone());
        self.inner.add_clause(clause);
    }

    fn add_empty_clause(&mut self) {
        self.clauses.push(Vec::new());
        self.inner.add_empty_clause();
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.assumption_log.push(assumptions.to_vec());
        self.inner.solve(assumptions)
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        self.inner.model_value(var)
    }

    fn stats(&self) -> SolverStats {
        self.inner.stats()
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
