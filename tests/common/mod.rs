#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use satbridge::cnf::Lit;
use satbridge::host::{Search, Store, VarId};
use satbridge::sat::SatPropagator;
use satbridge::solver::recording::RecordingSolver;
use satbridge::solver::varisat::VarisatSolver;
use satbridge::solver::{IncrementalSolver, SolveResult, SolverStats, VarPolarity};

pub type Recorder = Rc<RefCell<RecordingSolver<VarisatSolver>>>;

/// Engine handle that stays inspectable after the propagator is boxed.
pub struct SharedSolver(pub Recorder);

impl IncrementalSolver for SharedSolver {
    fn new_var(&mut self, polarity: VarPolarity) -> u32 {
        self.0.borrow_mut().new_var(polarity)
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        self.0.borrow_mut().add_clause(clause);
    }

    fn add_empty_clause(&mut self) {
        self.0.borrow_mut().add_empty_clause();
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.0.borrow_mut().solve(assumptions)
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        self.0.borrow().model_value(var)
    }

    fn stats(&self) -> SolverStats {
        self.0.borrow().stats()
    }

    fn backend_name(&self) -> &'static str {
        "shared"
    }
}

pub fn recorded(store: &mut Store) -> (SatPropagator<SharedSolver>, Recorder) {
    let rec = Rc::new(RefCell::new(RecordingSolver::new(VarisatSolver::new())));
    let sat = SatPropagator::new(store, SharedSolver(Rc::clone(&rec)));
    (sat, rec)
}

pub fn bool_vars(store: &mut Store, names: &[&str]) -> Vec<VarId> {
    names.iter().map(|n| store.new_bool_var(n)).collect()
}

pub fn bits(mask: usize, n: usize) -> Vec<bool> {
    (0..n).map(|i| (mask >> i) & 1 == 1).collect()
}

/// Assigns `values` one by one; true when every bind went through.
pub fn assign_all(search: &mut Search, vars: &[VarId], values: &[bool]) -> bool {
    vars.iter()
        .zip(values)
        .all(|(&v, &b)| search.assign(v, b as i64).is_ok())
}

pub fn last_assumptions(rec: &Recorder) -> Vec<Lit> {
    rec.borrow()
        .assumption_log()
        .last()
        .cloned()
        .unwrap_or_default()
}
