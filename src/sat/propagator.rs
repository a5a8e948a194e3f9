use crate::cnf::Lit;
use crate::host::{Constraint, Contradiction, Expr, Host, PropId, RevInt, VarId};
use crate::logging::targets;
use crate::sat::registry::LiteralRegistry;
use crate::sat::EncodeError;
use crate::solver::varisat::VarisatSolver;
use crate::solver::{IncrementalSolver, SolveResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unposted,
    Posted,
    Propagating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagatorStats {
    pub bind_events: usize,
    pub checks: usize,
    pub failures: usize,
    pub clauses: usize,
}

/// Keeps the engine's assumption set in step with the host's bound boolean
/// variables and fails the branch as soon as the engine reports unsat.
///
/// The trail of bound literals may hold a stale suffix after the host
/// backtracks; its logical length is the reversible counter `num_bound`.
pub struct SatPropagator<S = VarisatSolver> {
    engine: S,
    registry: LiteralRegistry,
    bound_literals: Vec<Lit>,
    num_bound: RevInt,
    state: Lifecycle,
    stats: PropagatorStats,
}

impl SatPropagator<VarisatSolver> {
    pub fn with_varisat(host: &mut dyn Host) -> Self {
        Self::new(host, VarisatSolver::new())
    }
}

impl<S: IncrementalSolver> SatPropagator<S> {
    /// Creates a propagator whose trail counter lives on `host`.
    pub fn new(host: &mut dyn Host, engine: S) -> Self {
        Self {
            engine,
            registry: LiteralRegistry::new(),
            bound_literals: Vec::new(),
            num_bound: host.new_rev_int(0),
            state: Lifecycle::Unposted,
            stats: PropagatorStats::default(),
        }
    }

    pub fn engine(&self) -> &S {
        &self.engine
    }

    pub fn registry(&self) -> &LiteralRegistry {
        &self.registry
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn stats(&self) -> PropagatorStats {
        self.stats
    }

    /// The live part of the trail, as seen from `host`'s current branch.
    pub fn bound_literals(&self, host: &dyn Host) -> &[Lit] {
        let len = (host.rev_value(self.num_bound) as usize).min(self.bound_literals.len());
        &self.bound_literals[..len]
    }

    pub fn check(&self, host: &dyn Host, expr: &Expr) -> Result<(VarId, bool), EncodeError> {
        self.registry.check(host, expr)
    }

    pub fn check_all(&self, host: &dyn Host, exprs: &[Expr]) -> Result<(), EncodeError> {
        self.registry.check_all(host, exprs)
    }

    /// Checks that every operand can be turned into a literal. New variables
    /// can only be registered before the propagator is posted, since posting
    /// is what subscribes them.
    pub fn validate(&self, host: &dyn Host, exprs: &[&Expr]) -> Result<(), EncodeError> {
        for expr in exprs {
            let (var, _) = self.registry.check(host, expr)?;
            if self.state != Lifecycle::Unposted && self.registry.engine_var(var).is_none() {
                return Err(EncodeError::AlreadyPosted);
            }
        }
        Ok(())
    }

    pub fn literal(&mut self, host: &dyn Host, expr: &Expr) -> Result<Lit, EncodeError> {
        self.validate(host, &[expr])?;
        self.registry.literal(host, &mut self.engine, expr)
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        if clause.is_empty() {
            self.add_empty_clause();
            return;
        }
        log::trace!(
            target: targets::ENCODER,
            "clause {:?}",
            clause.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>()
        );
        self.stats.clauses += 1;
        self.engine.add_clause(clause);
    }

    /// Makes the clause database contradictory.
    pub fn add_empty_clause(&mut self) {
        log::debug!(target: targets::ENCODER, "empty clause");
        self.stats.clauses += 1;
        self.engine.add_empty_clause();
    }

    /// Extends the trail with the literal of the registry entry at `index`
    /// and checks the assumptions with the engine.
    pub fn on_variable_bound(&mut self, host: &mut dyn Host, index: usize) -> Result<(), Contradiction> {
        let Some((var, engine_var)) = self.registry.entry(index) else {
            log::warn!(target: targets::CHECKER, "bind event for unknown entry {}", index);
            return Ok(());
        };
        let Some(value) = host.value(var) else {
            return Ok(());
        };
        self.stats.bind_events += 1;
        let lit = Lit::new(engine_var, value != 0);
        log::trace!(
            target: targets::CHECKER,
            "assign {} = {}, enqueue lit {}",
            host.name(var),
            value,
            lit
        );

        let live = host.rev_value(self.num_bound) as usize;
        self.bound_literals.truncate(live);
        host.incr_rev(self.num_bound);
        self.bound_literals.push(lit);

        let prev = self.state;
        self.state = Lifecycle::Propagating;
        self.stats.checks += 1;
        let answer = self.engine.solve(&self.bound_literals);
        self.state = prev;

        match answer {
            SolveResult::Unsat => {
                self.stats.failures += 1;
                log::debug!(
                    target: targets::CHECKER,
                    "failure detected with {} assumptions",
                    self.bound_literals.len()
                );
                Err(Contradiction)
            }
            SolveResult::Sat | SolveResult::Unknown => Ok(()),
        }
    }
}

impl<S: IncrementalSolver> Constraint for SatPropagator<S> {
    fn name(&self) -> &'static str {
        "SatPropagator"
    }

    fn post(&mut self, host: &mut dyn Host, id: PropId) {
        if self.state != Lifecycle::Unposted {
            log::warn!(target: targets::LIFECYCLE, "post called twice, ignoring");
            return;
        }
        for (index, (var, _)) in self.registry.iter().enumerate() {
            host.when_bound(var, id, index as u32);
        }
        log::debug!(
            target: targets::LIFECYCLE,
            "posted over {} variables, {} clauses",
            self.registry.len(),
            self.stats.clauses
        );
        self.state = Lifecycle::Posted;
    }

    fn initial_propagate(&mut self, host: &mut dyn Host) -> Result<(), Contradiction> {
        let mut replayed = 0usize;
        for index in 0..self.registry.len() {
            let bound = self
                .registry
                .entry(index)
                .is_some_and(|(var, _)| host.is_bound(var));
            if bound {
                self.on_variable_bound(host, index)?;
                replayed += 1;
            }
        }
        if replayed == 0 {
            // clauses alone may already be contradictory
            self.stats.checks += 1;
            if self.engine.solve(&[]) == SolveResult::Unsat {
                self.stats.failures += 1;
                log::debug!(target: targets::LIFECYCLE, "clause database is unsat at the root");
                return Err(Contradiction);
            }
        }
        Ok(())
    }

    fn on_event(&mut self, host: &mut dyn Host, data: u32) -> Result<(), Contradiction> {
        self.on_variable_bound(host, data as usize)
    }
}
