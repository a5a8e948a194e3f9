//! A small backtracking host: integer variables, reversible cells, bind
//! events and depth-first search. It offers exactly the capabilities the
//! SAT bridge consumes through [`Host`] and [`Constraint`].

pub mod search;
pub mod store;
pub mod trail;

use std::fmt;

pub use search::{Search, SearchOptions, SearchOutcome, SearchStats, ValueOrder};
pub use store::Store;
pub use trail::{RevInt, Trail};

/// Stable handle of a decision variable, assigned when the variable is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle of a posted constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropId(pub usize);

/// Expression handed to the model-building calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(VarId),
    Not(Box<Expr>),
    Const(i64),
}

impl Expr {
    pub fn var(var: VarId) -> Self {
        Expr::Var(var)
    }

    pub fn not(var: VarId) -> Self {
        Expr::Not(Box::new(Expr::Var(var)))
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

impl From<VarId> for Expr {
    fn from(var: VarId) -> Self {
        Expr::Var(var)
    }
}

/// Branch failure: the current partial assignment is infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("contradiction in current branch")]
pub struct Contradiction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("variable '{name}' has empty domain [{min}, {max}]")]
    EmptyDomain { name: String, min: i64, max: i64 },
    #[error("unknown variable {0}")]
    UnknownVar(VarId),
}

/// Capabilities a constraint may use on the host solver.
pub trait Host {
    /// Resolves `expr` to `(var, negated)` when it denotes a two-valued
    /// decision variable, possibly under negation.
    fn boolean_view(&self, expr: &Expr) -> Option<(VarId, bool)>;
    fn is_bound(&self, var: VarId) -> bool;
    fn value(&self, var: VarId) -> Option<i64>;
    /// Subscribes `prop` to the first binding of `var` in each branch;
    /// `data` is handed back with the event.
    fn when_bound(&mut self, var: VarId, prop: PropId, data: u32);
    fn new_rev_int(&mut self, init: i64) -> RevInt;
    fn rev_value(&self, cell: RevInt) -> i64;
    /// Writes `cell`; the previous value comes back when the search
    /// backtracks past the current decision level.
    fn set_rev_value(&mut self, cell: RevInt, value: i64);
    fn name(&self, var: VarId) -> &str;

    fn incr_rev(&mut self, cell: RevInt) {
        let v = self.rev_value(cell);
        self.set_rev_value(cell, v + 1);
    }
}

/// Protocol between the host and an attached constraint.
pub trait Constraint {
    fn name(&self) -> &'static str;
    /// Called once, right after attachment.
    fn post(&mut self, host: &mut dyn Host, id: PropId);
    /// Called once after [`Constraint::post`] to account for variables
    /// already bound at attachment time.
    fn initial_propagate(&mut self, host: &mut dyn Host) -> Result<(), Contradiction>;
    fn on_event(&mut self, host: &mut dyn Host, data: u32) -> Result<(), Contradiction>;
}
