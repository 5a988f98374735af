use ahash::RandomState;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::lpp_value::{Cell, ManagedObject};

/// Symbol interning table.
///
/// Symbols are managed objects: the table keeps only weak references, so a
/// symbol lives exactly as long as some cell holds it. Equal names return the
/// same allocation while any holder is alive.
pub struct SymbolInterner {
    // ahash for speed, same as the string table of the runtime
    map: HashMap<SmolStr, Weak<ManagedObject>, RandomState>,
}

impl Default for SymbolInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolInterner {
    pub fn new() -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(64, RandomState::new()),
        }
    }

    /// Intern `name`, returning a cell that owns one reference to the symbol.
    pub fn intern(&mut self, name: &str) -> Cell {
        if let Some(existing) = self.map.get(name).and_then(Weak::upgrade) {
            return Cell::Managed(existing);
        }

        let name = SmolStr::new(name);
        let symbol = Rc::new(ManagedObject::Symbol(name.clone()));
        self.map.insert(name, Rc::downgrade(&symbol));
        Cell::Managed(symbol)
    }

    /// Drop entries whose symbol has already been freed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.map.len();
        self.map.retain(|_, symbol| symbol.strong_count() > 0);
        before - self.map.len()
    }

    /// Number of entries, dead ones included until `remove_dead` runs.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
