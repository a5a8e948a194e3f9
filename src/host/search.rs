use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::host::store::Store;
use crate::host::{Constraint, Contradiction, Host, PropId, VarId};
use crate::logging::targets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrder {
    #[default]
    Min,
    Max,
    Random {
        seed: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// Stop after this many solutions.
    pub limit: Option<usize>,
    pub order: ValueOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: usize,
    pub failures: usize,
    pub solutions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Values of the branching variables, one vector per solution.
    pub solutions: Vec<Vec<i64>>,
    pub stats: SearchStats,
}

/// Owns the store and the posted constraints and drives event delivery.
pub struct Search {
    store: Store,
    constraints: Vec<Box<dyn Constraint>>,
    root_failed: bool,
    stats: SearchStats,
}

impl Search {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            constraints: Vec::new(),
            root_failed: false,
            stats: SearchStats::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn root_failed(&self) -> bool {
        self.root_failed
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn depth(&self) -> usize {
        self.store.depth()
    }

    /// Attaches `constraint`, runs its initial propagation and drains the
    /// resulting events. A failure here fails the whole search when it
    /// happens at the root.
    pub fn post(&mut self, mut constraint: Box<dyn Constraint>) -> Result<PropId, Contradiction> {
        let id = PropId(self.constraints.len());
        log::debug!(target: targets::SEARCH, "post {} as {:?}", constraint.name(), id);
        constraint.post(&mut self.store, id);
        self.constraints.push(constraint);
        let res = self.constraints[id.0]
            .initial_propagate(&mut self.store)
            .and_then(|()| self.propagate());
        if let Err(err) = res {
            self.store.clear_events();
            if self.store.depth() == 0 {
                self.root_failed = true;
            }
            return Err(err);
        }
        Ok(id)
    }

    pub fn push(&mut self) {
        self.store.push_level();
    }

    pub fn pop(&mut self) -> bool {
        self.store.pop_level()
    }

    /// Binds `var` and propagates to a fixpoint.
    pub fn assign(&mut self, var: VarId, value: i64) -> Result<(), Contradiction> {
        if self.root_failed {
            return Err(Contradiction);
        }
        let res = self.store.bind(var, value).and_then(|()| self.propagate());
        if res.is_err() {
            self.store.clear_events();
            if self.store.depth() == 0 {
                self.root_failed = true;
            }
        }
        res
    }

    fn propagate(&mut self) -> Result<(), Contradiction> {
        while let Some((prop, data)) = self.store.pop_event() {
            let Some(constraint) = self.constraints.get_mut(prop.0) else {
                continue;
            };
            constraint.on_event(&mut self.store, data)?;
        }
        Ok(())
    }

    /// Depth-first enumeration over `vars`. Every branch opened here is
    /// closed again, so the store is left as it was found.
    pub fn solve(&mut self, vars: &[VarId], options: SearchOptions) -> SearchOutcome {
        let mut rng = match options.order {
            ValueOrder::Random { seed } => Some(ChaCha8Rng::seed_from_u64(seed)),
            _ => None,
        };
        let before = self.stats;
        let mut solutions = Vec::new();
        if !self.root_failed {
            self.dfs(vars, options, &mut rng, &mut solutions);
        }
        let stats = SearchStats {
            nodes: self.stats.nodes - before.nodes,
            failures: self.stats.failures - before.failures,
            solutions: solutions.len(),
        };
        self.stats.solutions += solutions.len();
        log::debug!(target: targets::SEARCH, "search done: {:?}", stats);
        SearchOutcome { solutions, stats }
    }

    fn dfs(
        &mut self,
        vars: &[VarId],
        options: SearchOptions,
        rng: &mut Option<ChaCha8Rng>,
        solutions: &mut Vec<Vec<i64>>,
    ) {
        if options.limit.is_some_and(|limit| solutions.len() >= limit) {
            return;
        }
        self.stats.nodes += 1;
        let Some(&var) = vars.iter().find(|&&v| !self.store.is_bound(v)) else {
            solutions.push(
                vars.iter()
                    .map(|&v| self.store.value(v).unwrap_or_default())
                    .collect(),
            );
            return;
        };
        let Ok((min, max)) = self.store.bounds(var) else {
            return;
        };
        let mut values = (min..=max).collect::<Vec<_>>();
        match options.order {
            ValueOrder::Min => {}
            ValueOrder::Max => values.reverse(),
            ValueOrder::Random { .. } => {
                if let Some(rng) = rng.as_mut() {
                    values.shuffle(rng);
                }
            }
        }
        for value in values {
            self.push();
            log::trace!(
                target: targets::SEARCH,
                "depth {}: {} = {}",
                self.depth(),
                self.store.name(var),
                value
            );
            match self.assign(var, value) {
                Ok(()) => self.dfs(vars, options, rng, solutions),
                Err(Contradiction) => self.stats.failures += 1,
            }
            self.pop();
            if options.limit.is_some_and(|limit| solutions.len() >= limit) {
                return;
            }
        }
    }
}
