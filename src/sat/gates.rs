//! Clause encodings of the boolean relations the bridge understands.
//!
//! Every call validates all of its operands first. On failure nothing is
//! registered and no clause is added; the caller is expected to fall back
//! to another way of propagating the relation.

use crate::host::{Expr, Host};
use crate::logging::targets;
use crate::sat::propagator::SatPropagator;
use crate::sat::EncodeError;
use crate::solver::IncrementalSolver;

/// `left == right`
pub fn add_bool_eq<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    left: &Expr,
    right: &Expr,
) -> Result<(), EncodeError> {
    sat.validate(host, &[left, right])?;
    let l = sat.literal(host, left)?;
    let r = sat.literal(host, right)?;
    log::debug!(target: targets::ENCODER, "eq {} {}", l, r);
    sat.add_clause(vec![l.neg(), r]);
    sat.add_clause(vec![l, r.neg()]);
    Ok(())
}

/// `left <= right`, i.e. `left -> right`
pub fn add_bool_le<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    left: &Expr,
    right: &Expr,
) -> Result<(), EncodeError> {
    sat.validate(host, &[left, right])?;
    let l = sat.literal(host, left)?;
    let r = sat.literal(host, right)?;
    log::debug!(target: targets::ENCODER, "le {} {}", l, r);
    sat.add_clause(vec![l.neg(), r]);
    Ok(())
}

/// `right == !left`
pub fn add_bool_not<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    left: &Expr,
    right: &Expr,
) -> Result<(), EncodeError> {
    sat.validate(host, &[left, right])?;
    let l = sat.literal(host, left)?;
    let r = sat.literal(host, right)?;
    log::debug!(target: targets::ENCODER, "not {} {}", l, r);
    sat.add_clause(vec![l.neg(), r.neg()]);
    sat.add_clause(vec![l, r]);
    Ok(())
}

/// `target == left & right`
pub fn add_bool_and_eq_var<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    left: &Expr,
    right: &Expr,
    target: &Expr,
) -> Result<(), EncodeError> {
    sat.validate(host, &[left, right, target])?;
    let a = sat.literal(host, left)?;
    let b = sat.literal(host, right)?;
    let t = sat.literal(host, target)?;
    log::debug!(target: targets::ENCODER, "and {} {} -> {}", a, b, t);
    // a & b -> t
    sat.add_clause(vec![a.neg(), b.neg(), t]);
    // t -> a
    sat.add_clause(vec![a, t.neg()]);
    // t -> b
    sat.add_clause(vec![b, t.neg()]);
    Ok(())
}

/// `target == vars[0] & .. & vars[n-1]`; with no inputs the target is true.
pub fn add_bool_and_array_eq_var<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    vars: &[Expr],
    target: &Expr,
) -> Result<(), EncodeError> {
    let mut operands = vars.iter().collect::<Vec<_>>();
    operands.push(target);
    sat.validate(host, &operands)?;

    let t = sat.literal(host, target)?;
    let mut long = Vec::with_capacity(vars.len() + 1);
    for expr in vars {
        let v = sat.literal(host, expr)?;
        // t -> v
        sat.add_clause(vec![v, t.neg()]);
        long.push(v.neg());
    }
    long.push(t);
    log::debug!(target: targets::ENCODER, "and over {} inputs -> {}", vars.len(), t);
    sat.add_clause(long);
    Ok(())
}

/// At least one of `vars` holds; an empty list is unsatisfiable.
pub fn add_bool_or_array_equal_true<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    vars: &[Expr],
) -> Result<(), EncodeError> {
    sat.validate(host, &vars.iter().collect::<Vec<_>>())?;
    let mut clause = Vec::with_capacity(vars.len());
    for expr in vars {
        clause.push(sat.literal(host, expr)?);
    }
    log::debug!(target: targets::ENCODER, "or over {} inputs is true", vars.len());
    sat.add_clause(clause);
    Ok(())
}

/// At least one of `vars` fails; an empty list is unsatisfiable.
pub fn add_bool_and_array_equal_false<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    vars: &[Expr],
) -> Result<(), EncodeError> {
    sat.validate(host, &vars.iter().collect::<Vec<_>>())?;
    let mut clause = Vec::with_capacity(vars.len());
    for expr in vars {
        clause.push(sat.literal(host, expr)?.neg());
    }
    log::debug!(target: targets::ENCODER, "and over {} inputs is false", vars.len());
    sat.add_clause(clause);
    Ok(())
}
