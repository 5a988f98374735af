use crate::gc::GcColor;
use crate::lpp_value::Cell;

/// A cons cell: the unit of garbage collection.
///
/// `color` and `index` locate the pair inside its color-class container and are
/// written only by [`ColorClass`](crate::gc::ColorClass). `root_count` counts
/// the external handles and is meaningful only while the color is a root color.
#[derive(Debug, Default)]
pub struct GcPair {
    pub(crate) car: Cell,
    pub(crate) cdr: Cell,
    pub(crate) color: GcColor,
    pub(crate) root_count: u32,
    pub(crate) index: usize,
}

impl GcPair {
    #[inline(always)]
    pub fn car(&self) -> &Cell {
        &self.car
    }

    #[inline(always)]
    pub fn cdr(&self) -> &Cell {
        &self.cdr
    }

    #[inline(always)]
    pub fn color(&self) -> GcColor {
        self.color
    }

    #[inline(always)]
    pub fn root_count(&self) -> u32 {
        self.root_count
    }

    /// Position inside the container of `color`.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pair children, car first.
    pub fn children(&self) -> impl Iterator<Item = crate::gc::PairId> + '_ {
        self.car.as_pair().into_iter().chain(self.cdr.as_pair())
    }

    /// Blank both slots. Managed children lose a reference; pair children are
    /// only forgotten since their lifetime belongs to the collector.
    pub(crate) fn clear(&mut self) {
        self.car.unset();
        self.cdr.unset();
        self.root_count = 0;
    }
}
