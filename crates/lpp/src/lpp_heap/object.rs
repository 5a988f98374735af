use std::fmt;

use crate::gc::PairId;
use crate::lpp_heap::{GcError, GcResult, Heap};
use crate::lpp_value::Cell;

/// Rooted handle to a heap value.
///
/// While an `Object` holding a pair exists, that pair has a root count of at
/// least one and is never collected. Cloning adds a root reference; dropping
/// removes one, and the last drop returns the pair to its bulk generation.
/// Non-pair values are held directly.
pub struct Object<'h> {
    heap: &'h Heap,
    cell: Cell,
}

impl<'h> Object<'h> {
    /// Take a new root reference on `cell`'s pair.
    pub(crate) fn new(heap: &'h Heap, cell: Cell) -> Self {
        if let Some(id) = cell.as_pair() {
            heap.collector().borrow_mut().acquire(id);
        }
        Self { heap, cell }
    }

    /// Wrap a cell whose root reference the caller already owns.
    pub(crate) fn adopt(heap: &'h Heap, cell: Cell) -> Self {
        Self { heap, cell }
    }

    #[inline(always)]
    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    /// Raw cell for storing into a pair or passing to the collector.
    ///
    /// # Panics
    /// If the held pair is not rooted, which means its root count was corrupted.
    pub fn cell(&self) -> Cell {
        if let Some(id) = self.cell.as_pair() {
            let color = self.heap.collector().borrow().color_of(id);
            assert!(
                color.is_root(),
                "object holds pair {} but it is {}",
                id,
                color
            );
        }
        self.cell.clone()
    }

    #[inline(always)]
    pub fn is_pair(&self) -> bool {
        self.cell.is_pair()
    }

    #[inline(always)]
    pub fn pair_id(&self) -> Option<PairId> {
        self.cell.as_pair()
    }

    /// Root count of the held pair; 0 for non-pairs.
    pub fn root_count(&self) -> u32 {
        self.pair_id()
            .map_or(0, |id| self.heap.collector().borrow().root_count(id))
    }

    /// Car of the held pair as a new rooted object. `None` for non-pairs.
    pub fn car(&self) -> Option<Object<'h>> {
        let id = self.pair_id()?;
        let cell = self.heap.collector().borrow().car(id).clone();
        Some(Object::new(self.heap, cell))
    }

    pub fn cdr(&self) -> Option<Object<'h>> {
        let id = self.pair_id()?;
        let cell = self.heap.collector().borrow().cdr(id).clone();
        Some(Object::new(self.heap, cell))
    }

    pub fn set_car(&self, value: &Object<'_>) -> GcResult<()> {
        let id = self.pair_id().ok_or(GcError::NotAPair("set-car! target"))?;
        let value = value.cell();
        self.heap.collector().borrow_mut().set_car(id, value);
        Ok(())
    }

    pub fn set_cdr(&self, value: &Object<'_>) -> GcResult<()> {
        let id = self.pair_id().ok_or(GcError::NotAPair("set-cdr! target"))?;
        let value = value.cell();
        self.heap.collector().borrow_mut().set_cdr(id, value);
        Ok(())
    }

    pub fn unset_car(&self) -> GcResult<()> {
        let id = self.pair_id().ok_or(GcError::NotAPair("set-car! target"))?;
        self.heap.collector().borrow_mut().unset_car(id);
        Ok(())
    }

    pub fn unset_cdr(&self) -> GcResult<()> {
        let id = self.pair_id().ok_or(GcError::NotAPair("set-cdr! target"))?;
        self.heap.collector().borrow_mut().unset_cdr(id);
        Ok(())
    }
}

impl Clone for Object<'_> {
    fn clone(&self) -> Self {
        if let Some(id) = self.cell.as_pair() {
            self.heap.collector().borrow_mut().retain(id);
        }
        Self {
            heap: self.heap,
            cell: self.cell.clone(),
        }
    }
}

impl Drop for Object<'_> {
    fn drop(&mut self) {
        let Some(id) = self.cell.as_pair() else {
            return;
        };
        // a panic may leave the collector borrowed; leak the root instead
        if std::thread::panicking() {
            if let Ok(mut collector) = self.heap.collector().try_borrow_mut() {
                collector.unroot(id);
            }
            return;
        }
        self.heap.collector().borrow_mut().unroot(id);
    }
}

impl PartialEq for Object<'_> {
    /// Identity for pairs and managed objects, value for integers.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.heap, other.heap) && self.cell == other.cell
    }
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("cell", &self.cell)
            .field("root_count", &self.root_count())
            .finish()
    }
}
