// Heap: the mutator-facing side of the collector.
//
// A `Heap` owns the collector and the symbol table. Values escape it only as
// `Object` handles, each of which holds one root count on its pair, so the
// collector never needs to scan the Rust stack.

mod gc_error;
mod gc_option;
mod object;

pub use gc_error::{GcError, GcResult};
pub use gc_option::GcOption;
pub use object::Object;

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use crate::gc::{Collector, SymbolInterner};
use crate::lpp_value::{Cell, ManagedObject};

pub struct Heap {
    collector: RefCell<Collector>,
    symbols: RefCell<SymbolInterner>,
}

impl Heap {
    pub fn new(option: GcOption) -> GcResult<Self> {
        debug!(
            "creating heap: {} pairs per page, {} gc steps, {} recycle steps",
            option.page_size, option.garbage_steps, option.recycle_steps
        );
        Ok(Self {
            collector: RefCell::new(Collector::new(option)?),
            symbols: RefCell::new(SymbolInterner::new()),
        })
    }

    pub fn nil(&self) -> Object<'_> {
        Object::adopt(self, Cell::Nil)
    }

    pub fn integer(&self, i: i64) -> Object<'_> {
        Object::adopt(self, Cell::Integer(i))
    }

    /// Interned symbol: equal names give identical objects while any holder lives.
    pub fn symbol(&self, name: &str) -> Object<'_> {
        let cell = self.symbols.borrow_mut().intern(name);
        Object::adopt(self, cell)
    }

    pub fn string(&self, text: &str) -> Object<'_> {
        Object::adopt(self, Cell::Managed(Rc::new(ManagedObject::String(text.into()))))
    }

    /// Allocate a pair. The returned object owns the pair's initial root.
    pub fn cons(&self, car: &Object<'_>, cdr: &Object<'_>) -> GcResult<Object<'_>> {
        let (car, cdr) = (car.cell(), cdr.cell());
        let id = self.collector.borrow_mut().make_pair(car, cdr)?;
        Ok(Object::adopt(self, Cell::Pair(id)))
    }

    /// Proper list of `items`, terminated by nil.
    pub fn list(&self, items: &[Object<'_>]) -> GcResult<Object<'_>> {
        let mut list = self.nil();
        for item in items.iter().rev() {
            list = self.cons(item, &list)?;
        }
        Ok(list)
    }

    /// Wrap a raw cell in a handle, rooting (or retaining) its pair.
    ///
    /// # Panics
    /// If the cell names a pair that is not live.
    pub fn object(&self, cell: Cell) -> Object<'_> {
        Object::new(self, cell)
    }

    /// Stop-the-world collection. Returns the number of unreachable pairs found.
    pub fn collect(&self) -> usize {
        let disposed = self.collector.borrow_mut().cycle_garbage_collector();
        let dead_symbols = self.symbols.borrow_mut().remove_dead();
        debug!(
            "collect: {} pairs disposed, {} dead symbols dropped",
            disposed, dead_symbols
        );
        disposed
    }

    /// Read-only access to the collector, for inspection.
    pub fn with_collector<R>(&self, f: impl FnOnce(&Collector) -> R) -> R {
        f(&self.collector.borrow())
    }

    /// Mutable access to the collector. Objects must not be created or dropped
    /// inside `f`.
    pub fn with_collector_mut<R>(&self, f: impl FnOnce(&mut Collector) -> R) -> R {
        f(&mut self.collector.borrow_mut())
    }

    pub(crate) fn collector(&self) -> &RefCell<Collector> {
        &self.collector
    }
}
