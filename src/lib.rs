//! Incremental bridge between a backtracking constraint-propagation search
//! and a clause-learning satisfiability engine.
//!
//! Boolean relations are encoded once as clauses ([`sat::gates`]); during
//! search every newly bound boolean variable extends the engine's assumption
//! set and the branch fails as soon as those assumptions become unsatisfiable
//! ([`sat::SatPropagator`]).

pub mod cnf;
pub mod host;
pub mod logging;
pub mod model;
pub mod sat;
pub mod solver;
