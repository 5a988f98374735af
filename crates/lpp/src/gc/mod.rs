// Cons-cell garbage collector
//
// Hybrid root-counted / incremental tricolor collector:
// - Every slot carries one color; live pairs are partitioned into six color
//   classes (three bulk generations and their rooted twins).
// - Roots are counted, not scanned from a stack: a pair held by any external
//   handle lives in a root class until its last handle is dropped.
// - Marking is incremental. Each allocation, root, unroot or write barrier runs
//   a bounded number of steps; a step scans one pair.
// - White and Black alternate as the "from" generation. When nothing is left to
//   scan, the remaining from-bulk pairs are unreachable and are disposed in one
//   move; then the roles flip.
// - Disposed pairs go to the Free class and are returned to the allocator a few
//   at a time (recycling).
// - A stop-the-world cycle computes reachability directly and repartitions the
//   whole heap in one pass.
//
// Invariant kept between calls: no pair colored `to`/`toRoot` has a child
// colored `from`/`fromRoot`. Scanning greys the children of the scanned pair and
// the write barrier greys every from-colored pair that gains an incoming edge.

mod color_class;
mod gc_color;
mod gc_id;
mod gc_pair;
mod page_allocator;
mod reachability;
mod symbol_interner;

pub use color_class::{ColorClass, ColorClasses};
pub use gc_color::{GcColor, Generation};
pub use gc_id::PairId;
pub use gc_pair::GcPair;
pub use page_allocator::PageAllocator;
pub use reachability::PairSet;
pub use symbol_interner::SymbolInterner;

use log::{debug, trace};

use crate::lpp_heap::{GcOption, GcResult};
use crate::lpp_value::Cell;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GcStats {
    pub pages_allocated: usize,
    pub pairs_allocated: usize,
    pub steps: usize,
    pub generation_swaps: usize,
    pub full_cycles: usize,
    /// Pairs found unreachable, by a generation swap or a full cycle.
    pub pairs_disposed: usize,
    /// Pairs returned to the allocator.
    pub pairs_recycled: usize,
}

/// Result of one incremental step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// One pair was scanned: its children were greyed and it moved to a `to` class.
    Scanned(PairId),
    /// Nothing was left to scan; the from generation was disposed and the
    /// White/Black roles flipped.
    Swapped { disposed: usize },
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Car,
    Cdr,
}

/// The collector: owns every page of pairs and every color class.
pub struct Collector {
    pub(crate) pairs: PageAllocator,
    pub(crate) classes: ColorClasses,
    generation: Generation,
    option: GcOption,
    stats: GcStats,
}

impl Collector {
    pub fn new(option: GcOption) -> GcResult<Self> {
        option.validate()?;
        Ok(Self {
            pairs: PageAllocator::new(option.page_size, option.max_pages),
            classes: ColorClasses::new(),
            generation: Generation::default(),
            option,
            stats: GcStats::default(),
        })
    }

    #[inline(always)]
    pub fn option(&self) -> &GcOption {
        &self.option
    }

    #[inline(always)]
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    #[inline(always)]
    pub fn from_color(&self) -> GcColor {
        self.generation.from_color()
    }

    #[inline(always)]
    pub fn to_color(&self) -> GcColor {
        self.generation.to_color()
    }

    #[inline(always)]
    pub fn from_root_color(&self) -> GcColor {
        self.generation.from_root_color()
    }

    #[inline(always)]
    pub fn to_root_color(&self) -> GcColor {
        self.generation.to_root_color()
    }

    /// Slots in all pages, whatever their color.
    #[inline(always)]
    pub fn total_slots(&self) -> usize {
        self.pairs.total_slots()
    }

    #[inline]
    pub fn pair(&self, id: PairId) -> &GcPair {
        self.pairs.get(id)
    }

    #[inline]
    pub fn color_of(&self, id: PairId) -> GcColor {
        self.pairs.get(id).color
    }

    #[inline]
    pub fn root_count(&self, id: PairId) -> u32 {
        self.pairs.get(id).root_count
    }

    #[inline]
    pub fn car(&self, id: PairId) -> &Cell {
        &self.pairs.get(id).car
    }

    #[inline]
    pub fn cdr(&self, id: PairId) -> &Cell {
        &self.pairs.get(id).cdr
    }

    // ============ Allocation ============

    /// Allocate a pair holding `car` and `cdr`.
    ///
    /// The new pair is rooted once (root count 1) in the current from-root
    /// class; the caller owns that root and must `unroot` it eventually. Pair
    /// children must be live. Recycling runs before the slot is taken, marking
    /// after the children are stored.
    pub fn make_pair(&mut self, car: Cell, cdr: Cell) -> GcResult<PairId> {
        self.run_recycle();

        let id = self.pairs.next()?;
        let color = self.generation.from_root_color();
        self.classes.add(&mut self.pairs, id, color);

        let pair = self.pairs.get_mut(id);
        pair.root_count = 1;
        pair.car = car;
        pair.cdr = cdr;
        self.grey_children(id);

        self.stats.pairs_allocated += 1;
        self.stats.pages_allocated = self.pairs.page_count();
        trace!("allocated pair {} as {}", id, color);

        self.run_garbage();
        Ok(id)
    }

    // ============ Root protocol ============

    /// Promote a bulk pair to the rooted twin of its color with root count 1.
    ///
    /// The scan state is preserved (White→WhiteRoot, Grey→GreyRoot,
    /// Black→BlackRoot) so an unscanned pair is still scanned this generation.
    ///
    /// # Panics
    /// If the pair is already rooted or is not live.
    pub fn root(&mut self, id: PairId) {
        let color = self.pairs.get(id).color;
        assert!(color.is_bulk(), "cannot root pair {}: it is {}", id, color);

        self.classes.move_pair(&mut self.pairs, id, color.to_root());
        self.pairs.get_mut(id).root_count = 1;

        self.run_garbage();
        self.run_recycle();
    }

    /// Add one more root reference to an already rooted pair. Color is unchanged.
    ///
    /// # Panics
    /// If the pair is not rooted.
    pub fn retain(&mut self, id: PairId) {
        let pair = self.pairs.get_mut(id);
        assert!(
            pair.color.is_root() && pair.root_count > 0,
            "cannot retain pair {}: it is {} with {} roots",
            id,
            pair.color,
            pair.root_count
        );
        pair.root_count += 1;
    }

    /// Root a bulk pair or retain a rooted one.
    pub fn acquire(&mut self, id: PairId) {
        if self.pairs.get(id).color.is_root() {
            self.retain(id);
        } else {
            self.root(id);
        }
    }

    /// Drop one root reference. At zero the pair moves to the bulk twin of its
    /// color. Returns whether the pair was demoted.
    ///
    /// # Panics
    /// If the pair is not rooted.
    pub fn unroot(&mut self, id: PairId) -> bool {
        let pair = self.pairs.get_mut(id);
        assert!(
            pair.color.is_root() && pair.root_count > 0,
            "cannot unroot pair {}: it is {} with {} roots",
            id,
            pair.color,
            pair.root_count
        );

        pair.root_count -= 1;
        let demoted = pair.root_count == 0;
        if demoted {
            let bulk = pair.color.to_bulk();
            self.classes.move_pair(&mut self.pairs, id, bulk);
        }

        self.run_garbage();
        self.run_recycle();
        demoted
    }

    // ============ Mutators (write barrier) ============

    pub fn set_car(&mut self, id: PairId, value: Cell) {
        self.store(id, Slot::Car, value);
    }

    pub fn set_cdr(&mut self, id: PairId, value: Cell) {
        self.store(id, Slot::Cdr, value);
    }

    pub fn unset_car(&mut self, id: PairId) {
        self.store(id, Slot::Car, Cell::Nil);
    }

    pub fn unset_cdr(&mut self, id: PairId) {
        self.store(id, Slot::Cdr, Cell::Nil);
    }

    /// The only write path into a live pair. A pair value is greyed if it is
    /// from-colored, then bounded marking work runs.
    fn store(&mut self, id: PairId, slot: Slot, value: Cell) {
        let child = value.as_pair();
        let pair = self.pairs.get_mut(id);
        assert!(pair.color.is_live(), "write into {} pair {}", pair.color, id);

        // the old value drops here; a managed target may be freed
        match slot {
            Slot::Car => pair.car = value,
            Slot::Cdr => pair.cdr = value,
        }

        if let Some(child) = child {
            self.grey_child(child);
            self.run_garbage();
        }
    }

    /// Move `child` to Grey/GreyRoot if it is in the from generation.
    fn grey_child(&mut self, child: PairId) {
        let color = self.pairs.get(child).color;
        debug_assert!(color.is_live(), "edge to {} pair {}", color, child);

        if color == self.generation.from_color() {
            self.classes.move_pair(&mut self.pairs, child, GcColor::Grey);
        } else if color == self.generation.from_root_color() {
            self.classes.move_pair(&mut self.pairs, child, GcColor::GreyRoot);
        }
    }

    fn grey_children(&mut self, id: PairId) {
        let pair = self.pairs.get(id);
        let (car, cdr) = (pair.car.as_pair(), pair.cdr.as_pair());
        for child in car.into_iter().chain(cdr) {
            self.grey_child(child);
        }
    }

    // ============ Incremental collection ============

    fn run_garbage(&mut self) {
        for _ in 0..self.option.garbage_steps {
            self.step_garbage_collector();
        }
    }

    fn run_recycle(&mut self) {
        for _ in 0..self.option.recycle_steps {
            if self.step_recycle().is_none() {
                break;
            }
        }
    }

    /// One bounded unit of marking work.
    ///
    /// Priority: unscanned roots, grey roots, grey bulk pairs. When all three are
    /// empty the generation is complete and is swapped.
    pub fn step_garbage_collector(&mut self) -> StepResult {
        self.stats.steps += 1;

        let generation = self.generation;
        let scan_order = [
            (generation.from_root_color(), generation.to_root_color()),
            (GcColor::GreyRoot, generation.to_root_color()),
            (GcColor::Grey, generation.to_color()),
        ];

        for (from, to) in scan_order {
            // recolor before greying so a self-reference is already `to`
            if let Some(id) = self.classes.pop_into(&mut self.pairs, from, to) {
                self.grey_children(id);
                trace!("scanned pair {}: {} -> {}", id, from, to);
                return StepResult::Scanned(id);
            }
        }

        let disposed = self.swap_generation();
        StepResult::Swapped { disposed }
    }

    /// Dispose of the remaining from-bulk pairs and flip White/Black.
    fn swap_generation(&mut self) -> usize {
        let from = self.generation.from_color();
        let disposed = self.classes.move_all(&mut self.pairs, from, GcColor::Free);
        self.generation.flip();

        self.stats.generation_swaps += 1;
        self.stats.pairs_disposed += disposed;
        if disposed > 0 {
            debug!(
                "generation swap: {} pairs disposed, from color is now {}",
                disposed,
                self.generation.from_color()
            );
        }
        disposed
    }

    /// Return one disposed pair to the allocator. `None` if nothing is disposed.
    pub fn step_recycle(&mut self) -> Option<PairId> {
        let id = self.classes.get_mut(GcColor::Free).pop()?;
        self.pairs.recycle(id);
        self.stats.pairs_recycled += 1;
        trace!("recycled pair {}", id);
        Some(id)
    }

    /// Run steps until the current generation swaps. Returns the number of
    /// pairs disposed by that swap.
    pub fn finish_generation(&mut self) -> usize {
        loop {
            if let StepResult::Swapped { disposed } = self.step_garbage_collector() {
                return disposed;
            }
        }
    }

    // ============ Stop-the-world collection ============

    /// Full collection: keep exactly the pairs reachable from roots.
    ///
    /// Unreachable pairs, including those already disposed, go straight back to
    /// the allocator. The generation roles reset to White=from, and every
    /// survivor lands in a `to` class, so the next incremental step starts a
    /// fresh generation. Returns the number of newly found unreachable pairs.
    pub fn cycle_garbage_collector(&mut self) -> usize {
        let reachable = self.reachable_conses();

        let mut members = Vec::with_capacity(self.total_slots() - self.pairs.available());
        for color in GcColor::LIVE.into_iter().chain([GcColor::Free]) {
            members.extend(self.classes.get_mut(color).take_members());
        }

        self.generation = Generation::default();
        let to = self.generation.to_color();
        let to_root = self.generation.to_root_color();

        let mut disposed = 0;
        let mut recycled = 0;
        for id in members {
            let color = self.pairs.get(id).color;
            if reachable.contains(&id) {
                let target = if color.is_root() { to_root } else { to };
                self.classes.add(&mut self.pairs, id, target);
            } else {
                if color != GcColor::Free {
                    disposed += 1;
                }
                self.pairs.recycle(id);
                recycled += 1;
            }
        }

        self.stats.full_cycles += 1;
        self.stats.pairs_disposed += disposed;
        self.stats.pairs_recycled += recycled;
        debug!(
            "full cycle: {} reachable, {} disposed, {} recycled",
            reachable.len(),
            disposed,
            recycled
        );
        disposed
    }
}
