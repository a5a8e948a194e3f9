use indexmap::IndexMap;

use crate::cnf::Lit;
use crate::host::{Expr, Host, VarId};
use crate::logging::targets;
use crate::sat::EncodeError;
use crate::solver::{IncrementalSolver, VarPolarity};

/// Bijection between boolean decision variables and engine variables.
///
/// Entries are only ever appended. The position of an entry is the
/// subscription tag handed to the host, so it must stay stable.
#[derive(Debug, Clone, Default)]
pub struct LiteralRegistry {
    indices: IndexMap<VarId, u32>,
}

impl LiteralRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Validates `expr` without allocating anything.
    pub fn check(&self, host: &dyn Host, expr: &Expr) -> Result<(VarId, bool), EncodeError> {
        host.boolean_view(expr).ok_or_else(|| EncodeError::NotBoolean {
            operand: describe(host, expr),
        })
    }

    pub fn check_all(&self, host: &dyn Host, exprs: &[Expr]) -> Result<(), EncodeError> {
        for expr in exprs {
            self.check(host, expr)?;
        }
        Ok(())
    }

    /// Literal for `expr`, allocating a fresh engine variable the first time
    /// its decision variable is seen.
    pub fn literal<S: IncrementalSolver + ?Sized>(
        &mut self,
        host: &dyn Host,
        engine: &mut S,
        expr: &Expr,
    ) -> Result<Lit, EncodeError> {
        let (var, negated) = self.check(host, expr)?;
        if let Some(&engine_var) = self.indices.get(&var) {
            return Ok(Lit::new(engine_var, !negated));
        }
        let engine_var = engine.new_var(VarPolarity::default());
        self.indices.insert(var, engine_var);
        let lit = Lit::new(engine_var, !negated);
        log::debug!(
            target: targets::REGISTRY,
            "{} ({}) -> engine var {}, lit {}",
            host.name(var),
            var,
            engine_var,
            lit
        );
        Ok(lit)
    }

    pub fn engine_var(&self, var: VarId) -> Option<u32> {
        self.indices.get(&var).copied()
    }

    /// Entry at subscription tag `index`.
    pub fn entry(&self, index: usize) -> Option<(VarId, u32)> {
        self.indices.get_index(index).map(|(&var, &ev)| (var, ev))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, u32)> + '_ {
        self.indices.iter().map(|(&var, &ev)| (var, ev))
    }
}

fn describe(host: &dyn Host, expr: &Expr) -> String {
    match expr {
        Expr::Var(var) => host.name(*var).to_owned(),
        Expr::Not(inner) => format!("!{}", describe(host, inner)),
        Expr::Const(c) => c.to_string(),
    }
}
