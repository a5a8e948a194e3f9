//! Line-oriented text models and how they are turned into a search with the
//! SAT bridge attached.

pub mod parse;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;

use crate::host::{Expr, Host, Search, Store, VarId};
use crate::sat::{self, SatPropagator};
use crate::solver::varisat::VarisatSolver;
use crate::solver::IncrementalSolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub name: String,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    Eq { left: Operand, right: Operand },
    Le { left: Operand, right: Operand },
    Not { left: Operand, right: Operand },
    And { inputs: Vec<Operand>, target: Operand },
    OrTrue(Vec<Operand>),
    AndFalse(Vec<Operand>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub relation: Relation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub vars: Vec<VarDecl>,
    pub statements: Vec<Statement>,
    /// `(line, name, value)` bindings made before the bridge is attached.
    pub fixes: Vec<(usize, String, i64)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub vars: usize,
    pub literals: usize,
    pub clauses: usize,
}

pub struct Built {
    pub search: Search,
    pub names: IndexMap<String, VarId>,
    pub summary: BuildSummary,
    /// False when the fixes or the clauses alone are contradictory.
    pub root_consistent: bool,
}

impl Built {
    /// Declared two-valued variables, in declaration order.
    pub fn bool_vars(&self) -> Vec<VarId> {
        self.names
            .values()
            .copied()
            .filter(|&v| self.search.store().is_boolean(v))
            .collect()
    }
}

pub fn build(model: &Model) -> Result<Built> {
    build_with(model, VarisatSolver::new(), |_| {})
}

/// Declares the variables, encodes every statement through the bridge,
/// applies the fixes, and posts the bridge. `before_post` sees the
/// propagator once encoding is complete.
pub fn build_with<S, F>(model: &Model, engine: S, before_post: F) -> Result<Built>
where
    S: IncrementalSolver + 'static,
    F: FnOnce(&SatPropagator<S>),
{
    let mut store = Store::new();
    let mut names = IndexMap::new();
    for decl in &model.vars {
        let var = store.new_var(&decl.name, decl.min, decl.max)?;
        names.insert(decl.name.clone(), var);
    }

    let mut sat = SatPropagator::new(&mut store, engine);
    for stmt in &model.statements {
        encode(&mut sat, &store, &names, &stmt.relation)
            .with_context(|| format!("line {}", stmt.line))?;
    }
    let summary = BuildSummary {
        vars: names.len(),
        literals: sat.registry().len(),
        clauses: sat.stats().clauses,
    };
    before_post(&sat);

    let mut search = Search::new(store);
    let mut root_consistent = true;
    for (line, name, value) in &model.fixes {
        let var = lookup(&names, name).with_context(|| format!("line {}", line))?;
        if search.assign(var, *value).is_err() {
            root_consistent = false;
        }
    }
    if root_consistent {
        root_consistent = search.post(Box::new(sat)).is_ok();
    }

    Ok(Built {
        search,
        names,
        summary,
        root_consistent,
    })
}

fn encode<S: IncrementalSolver>(
    sat: &mut SatPropagator<S>,
    host: &dyn Host,
    names: &IndexMap<String, VarId>,
    relation: &Relation,
) -> Result<()> {
    match relation {
        Relation::Eq { left, right } => {
            sat::add_bool_eq(sat, host, &expr(names, left)?, &expr(names, right)?)?
        }
        Relation::Le { left, right } => {
            sat::add_bool_le(sat, host, &expr(names, left)?, &expr(names, right)?)?
        }
        Relation::Not { left, right } => {
            sat::add_bool_not(sat, host, &expr(names, left)?, &expr(names, right)?)?
        }
        Relation::And { inputs, target } => {
            let target = expr(names, target)?;
            let inputs = exprs(names, inputs)?;
            if let [a, b] = inputs.as_slice() {
                sat::add_bool_and_eq_var(sat, host, a, b, &target)?
            } else {
                sat::add_bool_and_array_eq_var(sat, host, &inputs, &target)?
            }
        }
        Relation::OrTrue(ops) => sat::add_bool_or_array_equal_true(sat, host, &exprs(names, ops)?)?,
        Relation::AndFalse(ops) => {
            sat::add_bool_and_array_equal_false(sat, host, &exprs(names, ops)?)?
        }
    }
    Ok(())
}

fn lookup(names: &IndexMap<String, VarId>, name: &str) -> Result<VarId> {
    match names.get(name) {
        Some(&var) => Ok(var),
        None => bail!("undeclared variable '{}'", name),
    }
}

fn expr(names: &IndexMap<String, VarId>, op: &Operand) -> Result<Expr> {
    let var = Expr::var(lookup(names, &op.name)?);
    Ok(if op.negated { var.negate() } else { var })
}

fn exprs(names: &IndexMap<String, VarId>, ops: &[Operand]) -> Result<Vec<Expr>> {
    ops.iter().map(|op| expr(names, op)).collect()
}
