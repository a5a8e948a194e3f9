use std::collections::VecDeque;

use crate::host::trail::{RevInt, Trail};
use crate::host::{Contradiction, Expr, Host, HostError, PropId, VarId};

#[derive(Debug, Clone)]
struct IntVar {
    name: String,
    min: i64,
    max: i64,
    value: Option<i64>,
    watchers: Vec<(PropId, u32)>,
}

impl IntVar {
    fn is_boolean(&self) -> bool {
        self.min >= 0 && self.max <= 1
    }
}

/// Variables, their current bindings, subscriptions and pending events.
#[derive(Debug, Clone, Default)]
pub struct Store {
    vars: Vec<IntVar>,
    trail: Trail,
    events: VecDeque<(PropId, u32)>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_var(&mut self, name: &str, min: i64, max: i64) -> Result<VarId, HostError> {
        if min > max {
            return Err(HostError::EmptyDomain {
                name: name.to_owned(),
                min,
                max,
            });
        }
        let value = if min == max { Some(min) } else { None };
        self.vars.push(IntVar {
            name: name.to_owned(),
            min,
            max,
            value,
            watchers: Vec::new(),
        });
        Ok(VarId(self.vars.len() as u32 - 1))
    }

    pub fn new_bool_var(&mut self, name: &str) -> VarId {
        self.vars.push(IntVar {
            name: name.to_owned(),
            min: 0,
            max: 1,
            value: None,
            watchers: Vec::new(),
        });
        VarId(self.vars.len() as u32 - 1)
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn var_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        (0..self.vars.len()).map(|i| VarId(i as u32))
    }

    pub fn bounds(&self, var: VarId) -> Result<(i64, i64), HostError> {
        let v = self.get(var)?;
        Ok((v.min, v.max))
    }

    pub fn is_boolean(&self, var: VarId) -> bool {
        self.vars.get(var.index()).is_some_and(IntVar::is_boolean)
    }

    /// Fixes `var` to `value` in the current branch. Binding to the value it
    /// already has is a no-op; any other conflicting value fails the branch.
    pub fn bind(&mut self, var: VarId, value: i64) -> Result<(), Contradiction> {
        let slot = self.vars.get_mut(var.index()).ok_or(Contradiction)?;
        if let Some(current) = slot.value {
            return if current == value {
                Ok(())
            } else {
                Err(Contradiction)
            };
        }
        if value < slot.min || value > slot.max {
            return Err(Contradiction);
        }
        slot.value = Some(value);
        self.events.extend(slot.watchers.iter().copied());
        self.trail.record_bind(var);
        Ok(())
    }

    pub fn pop_event(&mut self) -> Option<(PropId, u32)> {
        self.events.pop_front()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn depth(&self) -> usize {
        self.trail.depth()
    }

    pub fn push_level(&mut self) {
        self.trail.push_level();
    }

    pub fn pop_level(&mut self) -> bool {
        self.events.clear();
        let vars = &mut self.vars;
        self.trail.pop_level(|var| {
            if let Some(slot) = vars.get_mut(var.index()) {
                slot.value = None;
            }
        })
    }

    fn get(&self, var: VarId) -> Result<&IntVar, HostError> {
        self.vars.get(var.index()).ok_or(HostError::UnknownVar(var))
    }
}

impl Host for Store {
    fn boolean_view(&self, expr: &Expr) -> Option<(VarId, bool)> {
        match expr {
            Expr::Var(var) => self.is_boolean(*var).then_some((*var, false)),
            Expr::Not(inner) => self
                .boolean_view(inner)
                .map(|(var, negated)| (var, !negated)),
            Expr::Const(_) => None,
        }
    }

    fn is_bound(&self, var: VarId) -> bool {
        self.value(var).is_some()
    }

    fn value(&self, var: VarId) -> Option<i64> {
        self.vars.get(var.index()).and_then(|v| v.value)
    }

    fn when_bound(&mut self, var: VarId, prop: PropId, data: u32) {
        if let Some(slot) = self.vars.get_mut(var.index()) {
            slot.watchers.push((prop, data));
        }
    }

    fn new_rev_int(&mut self, init: i64) -> RevInt {
        self.trail.new_int(init)
    }

    fn rev_value(&self, cell: RevInt) -> i64 {
        self.trail.get(cell)
    }

    fn set_rev_value(&mut self, cell: RevInt, value: i64) {
        self.trail.set(cell, value);
    }

    fn name(&self, var: VarId) -> &str {
        self.vars
            .get(var.index())
            .map(|v| v.name.as_str())
            .unwrap_or("?")
    }
}
