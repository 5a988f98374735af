// ============ Pair IDs ============
// A pair is addressed by its slot number in the paged arena:
// slot = page * page_size + offset

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct PairId(pub u32);

impl PairId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Page holding this slot.
    #[inline(always)]
    pub fn page(self, page_size: usize) -> usize {
        self.index() / page_size
    }

    /// Offset of this slot inside its page.
    #[inline(always)]
    pub fn offset(self, page_size: usize) -> usize {
        self.index() % page_size
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
