// Paged pair allocator
//
// Key design points:
// 1. Pairs live in fixed-size pages; a PairId is a flat slot number
// 2. Recycled slots go on a free list and are reused before carving
// 3. A new page is only requested when the free list and the newest page are exhausted
// 4. Pages are never released one by one; they all go when the allocator drops

use log::{debug, warn};

use crate::gc::{GcColor, GcPair, PairId};
use crate::lpp_heap::{GcError, GcResult};

pub struct PageAllocator {
    pages: Vec<Vec<GcPair>>,
    page_size: usize,
    /// Next uncarved slot of the newest page.
    cursor: usize,
    /// Recycled slots, reused LIFO.
    free_list: Vec<PairId>,
    max_pages: Option<usize>,
}

impl PageAllocator {
    pub fn new(page_size: usize, max_pages: Option<usize>) -> Self {
        debug_assert!(page_size > 0, "page size must be positive");
        Self {
            pages: Vec::new(),
            page_size,
            // no page yet: the first `next` carves a fresh one
            cursor: page_size,
            free_list: Vec::new(),
            max_pages,
        }
    }

    #[inline(always)]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline(always)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Slots owned by all pages, whatever their color.
    #[inline(always)]
    pub fn total_slots(&self) -> usize {
        self.pages.len() * self.page_size
    }

    /// Slots that `next` can hand out without a new page.
    #[inline]
    pub fn available(&self) -> usize {
        self.free_list.len() + (self.page_size - self.cursor)
    }

    /// Hand out an empty slot. The caller must give it a color immediately.
    pub fn next(&mut self) -> GcResult<PairId> {
        if let Some(id) = self.free_list.pop() {
            return Ok(id);
        }

        if self.cursor == self.page_size {
            self.new_page()?;
        }

        let page = self.pages.len() - 1;
        let id = PairId((page * self.page_size + self.cursor) as u32);
        self.cursor += 1;
        Ok(id)
    }

    fn new_page(&mut self) -> GcResult<()> {
        let pages = self.pages.len();
        let out_of_memory = GcError::OutOfMemory {
            pages,
            page_size: self.page_size,
        };

        if self.max_pages.is_some_and(|max| pages >= max) {
            warn!("pair heap exhausted: page limit of {} reached", pages);
            return Err(out_of_memory);
        }
        // slot numbers must stay addressable as u32
        if (pages + 1)
            .checked_mul(self.page_size)
            .is_none_or(|slots| slots > u32::MAX as usize)
        {
            warn!("pair heap exhausted: slot numbers would overflow");
            return Err(out_of_memory);
        }

        let mut page = Vec::new();
        if page.try_reserve_exact(self.page_size).is_err() || self.pages.try_reserve(1).is_err() {
            warn!(
                "pair heap exhausted: could not allocate page {} ({} pairs)",
                pages, self.page_size
            );
            return Err(out_of_memory);
        }
        page.resize_with(self.page_size, GcPair::default);
        self.pages.push(page);
        self.cursor = 0;

        debug!(
            "allocated pair page {} ({} slots total)",
            pages,
            self.total_slots()
        );
        Ok(())
    }

    /// Return a disposed slot to the free list.
    ///
    /// Both cells are blanked: managed children are released, pair children are
    /// left to the collector.
    pub fn recycle(&mut self, id: PairId) {
        let pair = self.get_mut(id);
        pair.clear();
        pair.color = GcColor::Void;
        pair.index = 0;
        self.free_list.push(id);
    }

    #[inline(always)]
    pub fn get(&self, id: PairId) -> &GcPair {
        &self.pages[id.page(self.page_size)][id.offset(self.page_size)]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, id: PairId) -> &mut GcPair {
        &mut self.pages[id.page(self.page_size)][id.offset(self.page_size)]
    }

    /// Whether `id` names a slot inside an allocated page.
    #[inline]
    pub fn contains(&self, id: PairId) -> bool {
        id.index() < self.total_slots()
    }

    /// Every slot that is currently `Void`: recycled first, then uncarved.
    pub fn void_slots(&self) -> Vec<PairId> {
        let mut slots = self.free_list.clone();
        if let Some(page) = self.pages.len().checked_sub(1) {
            let base = page * self.page_size;
            slots.extend((base + self.cursor..base + self.page_size).map(|i| PairId(i as u32)));
        }
        slots
    }
}
