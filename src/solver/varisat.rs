use varisat::ExtendFormula;

use crate::cnf::Lit;
use crate::logging::targets;
use crate::solver::{IncrementalSolver, SolveResult, SolverStats, VarPolarity};

/// [`IncrementalSolver`] backed by varisat.
///
/// Varisat picks phases itself and branches on every variable, so the
/// [`VarPolarity`] preferences are recorded but not forwarded.
pub struct VarisatSolver {
    inner: varisat::Solver<'static>,
    vars: Vec<varisat::Var>,
    polarity: Vec<VarPolarity>,
    last_model: Option<Vec<varisat::Lit>>,
    stats: SolverStats,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            inner: varisat::Solver::new(),
            vars: Vec::new(),
            polarity: Vec::new(),
            last_model: None,
            stats: SolverStats::default(),
        }
    }

    /// Preferences recorded for engine variable `var`.
    pub fn polarity(&self, var: u32) -> Option<VarPolarity> {
        let idx = (var as usize).checked_sub(1)?;
        self.polarity.get(idx).copied()
    }

    fn to_var(&self, v: u32) -> Option<varisat::Var> {
        if v == 0 {
            return None;
        }
        self.vars.get(v as usize - 1).copied()
    }

    fn to_lit(&self, lit: Lit) -> Option<varisat::Lit> {
        let var = self.to_var(lit.var)?;
        Some(varisat::Lit::from_var(var, lit.sign))
    }

    /// None when any literal names a variable this engine never created.
    fn to_lits(&self, lits: &[Lit]) -> Option<Vec<varisat::Lit>> {
        lits.iter().map(|&x| self.to_lit(x)).collect()
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalSolver for VarisatSolver {
    fn new_var(&mut self, polarity: VarPolarity) -> u32 {
        let v = self.inner.new_var();
        self.vars.push(v);
        self.polarity.push(polarity);
        self.stats.vars = self.vars.len();
        self.vars.len() as u32
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        let Some(lits) = self.to_lits(&clause) else {
            log::warn!(target: targets::ENGINE, "rejecting clause over unknown vars: {:?}", clause);
            return;
        };
        self.stats.clauses += 1;
        self.inner.add_clause(&lits);
    }

    fn add_empty_clause(&mut self) {
        self.stats.clauses += 1;
        self.inner.add_clause(&[]);
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.stats.solve_calls += 1;
        let Some(assumps) = self.to_lits(assumptions) else {
            log::warn!(target: targets::ENGINE, "assumption over unknown var: {:?}", assumptions);
            self.last_model = None;
            return SolveResult::Unknown;
        };
        self.inner.assume(&assumps);
        match self.inner.solve() {
            Ok(true) => {
                self.last_model = self.inner.model();
                SolveResult::Sat
            }
            Ok(false) => {
                self.last_model = None;
                self.stats.unsat_answers += 1;
                SolveResult::Unsat
            }
            Err(err) => {
                log::warn!(target: targets::ENGINE, "varisat gave no answer: {}", err);
                self.last_model = None;
                SolveResult::Unknown
            }
        }
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        let v = self.to_var(var)?;
        let model = self.last_model.as_ref()?;
        if model.contains(&v.lit(true)) {
            Some(true)
        } else if model.contains(&v.lit(false)) {
            Some(false)
        } else {
            None
        }
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "varisat"
    }
}
