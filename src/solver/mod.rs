pub mod recording;
pub mod varisat;

use crate::cnf::Lit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    Sat,
    Unsat,
    /// The engine gave no answer (interrupted or failed).
    Unknown,
}

/// Preferences passed along with a fresh engine variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarPolarity {
    /// Preferred phase when the engine decides on the variable.
    pub sign: bool,
    /// Whether the engine may branch on the variable.
    pub decision: bool,
}

impl Default for VarPolarity {
    fn default() -> Self {
        Self {
            sign: true,
            decision: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub vars: usize,
    pub clauses: usize,
    pub solve_calls: usize,
    pub unsat_answers: usize,
}

/// Narrow incremental interface the bridge needs from a satisfiability engine.
pub trait IncrementalSolver {
    fn new_var(&mut self, polarity: VarPolarity) -> u32;
    fn add_clause(&mut self, clause: Vec<Lit>);
    /// Adds the always-false clause; every later solve answers unsat.
    fn add_empty_clause(&mut self);
    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult;
    fn model_value(&self, var: u32) -> Option<bool>;
    fn stats(&self) -> SolverStats;
    fn backend_name(&self) -> &'static str;
}
