use crate::host::VarId;

/// Handle of a reversible integer cell owned by a [`Trail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevInt(usize);

// epoch of a cell never written inside a level; no live level uses it
const UNLOGGED: u64 = u64::MAX;

#[derive(Debug, Clone, Copy)]
struct Cell {
    value: i64,
    // level epoch of the last logged write
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Undo {
    Cell { cell: usize, prev: i64, prev_epoch: u64 },
    Bind { var: VarId },
}

/// Single undo log for reversible cells and variable bindings.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    cells: Vec<Cell>,
    undo: Vec<Undo>,
    // undo length at each open level
    marks: Vec<usize>,
    // bumped on every push so sibling levels never share an epoch
    epoch: u64,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// New cell holding `init`. The first write at any open level is
    /// logged, including the level the cell was created in.
    pub fn new_int(&mut self, init: i64) -> RevInt {
        self.cells.push(Cell {
            value: init,
            epoch: UNLOGGED,
        });
        RevInt(self.cells.len() - 1)
    }

    /// Current value; 0 for a handle this trail did not issue.
    pub fn get(&self, cell: RevInt) -> i64 {
        self.cells.get(cell.0).map_or(0, |c| c.value)
    }

    /// Writes `value`, ignoring handles this trail did not issue.
    pub fn set(&mut self, cell: RevInt, value: i64) {
        let epoch = self.epoch;
        let at_root = self.marks.is_empty();
        let Some(slot) = self.cells.get_mut(cell.0) else {
            return;
        };
        if !at_root && slot.epoch != epoch {
            self.undo.push(Undo::Cell {
                cell: cell.0,
                prev: slot.value,
                prev_epoch: slot.epoch,
            });
            slot.epoch = epoch;
        }
        slot.value = value;
    }

    pub fn record_bind(&mut self, var: VarId) {
        if !self.marks.is_empty() {
            self.undo.push(Undo::Bind { var });
        }
    }

    pub fn push_level(&mut self) {
        self.marks.push(self.undo.len());
        self.epoch += 1;
    }

    /// Restores every cell written since the matching [`Trail::push_level`]
    /// and hands each binding made since then to `unbind`, newest first.
    /// Returns false at the root.
    pub fn pop_level(&mut self, mut unbind: impl FnMut(VarId)) -> bool {
        let Some(mark) = self.marks.pop() else {
            return false;
        };
        while self.undo.len() > mark {
            match self.undo.pop() {
                Some(Undo::Cell {
                    cell,
                    prev,
                    prev_epoch,
                }) => {
                    if let Some(slot) = self.cells.get_mut(cell) {
                        *slot = Cell {
                            value: prev,
                            epoch: prev_epoch,
                        };
                    }
                }
                Some(Undo::Bind { var }) => unbind(var),
                None => break,
            }
        }
        true
    }
}
