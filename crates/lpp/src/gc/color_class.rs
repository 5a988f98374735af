use crate::gc::{GcColor, PageAllocator, PairId};

/// All pairs of one color.
///
/// Unordered and index-addressable: each member's `GcPair::index` is its
/// position in `members`, so removal is a swap-remove that patches the element
/// moved into the gap.
#[derive(Debug)]
pub struct ColorClass {
    color: GcColor,
    members: Vec<PairId>,
}

impl ColorClass {
    pub fn new(color: GcColor) -> Self {
        Self {
            color,
            members: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn color(&self) -> GcColor {
        self.color
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[PairId] {
        &self.members
    }

    /// Append `id` and stamp it with this color and its position.
    #[inline]
    pub fn add(&mut self, pairs: &mut PageAllocator, id: PairId) {
        let pair = pairs.get_mut(id);
        pair.color = self.color;
        pair.index = self.members.len();
        self.members.push(id);
    }

    /// Swap-remove `id`.
    ///
    /// # Panics
    /// If the pair's stored color or index disagree with this container. That
    /// means the heap bookkeeping is already corrupt.
    #[inline]
    pub fn remove(&mut self, pairs: &mut PageAllocator, id: PairId) {
        let pair = pairs.get(id);
        let index = pair.index;
        assert_eq!(
            pair.color, self.color,
            "pair {} is {}, not in the {} class",
            id, pair.color, self.color
        );
        assert!(
            self.members.get(index) == Some(&id),
            "pair {} claims index {} in the {} class",
            id,
            index,
            self.color
        );

        self.members.swap_remove(index);
        if let Some(&moved) = self.members.get(index) {
            pairs.get_mut(moved).index = index;
        }
    }

    /// Remove and return the most recently added member.
    #[inline]
    pub fn pop(&mut self) -> Option<PairId> {
        // the last element never needs an index patch
        self.members.pop()
    }

    /// Empty the class without touching the members' stamps. The caller must
    /// re-add or recycle every returned pair.
    pub fn take_members(&mut self) -> Vec<PairId> {
        std::mem::take(&mut self.members)
    }

    /// Move every member into `other`, re-stamping each one.
    pub fn drain_into(&mut self, pairs: &mut PageAllocator, other: &mut ColorClass) -> usize {
        let moved = self.members.len();
        for id in self.members.drain(..) {
            let pair = pairs.get_mut(id);
            pair.color = other.color;
            pair.index = other.members.len();
            other.members.push(id);
        }
        moved
    }

    /// Position and color agreement for every member; used by the sanity check.
    pub fn check(&self, pairs: &PageAllocator) {
        for (position, &id) in self.members.iter().enumerate() {
            let pair = pairs.get(id);
            assert_eq!(
                pair.color, self.color,
                "pair {} sits in the {} class but is colored {}",
                id, self.color, pair.color
            );
            assert_eq!(
                pair.index, position,
                "pair {} sits at {} in the {} class but records {}",
                id, position, self.color, pair.index
            );
        }
    }
}

/// One container per non-`Void` color.
pub struct ColorClasses {
    classes: [ColorClass; GcColor::COUNT],
}

impl Default for ColorClasses {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorClasses {
    pub fn new() -> Self {
        Self {
            // Void stays empty: its slots are tracked by the allocator
            classes: GcColor::ALL.map(ColorClass::new),
        }
    }

    #[inline(always)]
    pub fn get(&self, color: GcColor) -> &ColorClass {
        &self.classes[color.index()]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, color: GcColor) -> &mut ColorClass {
        &mut self.classes[color.index()]
    }

    #[inline(always)]
    pub fn len(&self, color: GcColor) -> usize {
        self.get(color).len()
    }

    pub fn add(&mut self, pairs: &mut PageAllocator, id: PairId, color: GcColor) {
        debug_assert!(color != GcColor::Void, "void slots belong to the allocator");
        self.get_mut(color).add(pairs, id);
    }

    pub fn remove(&mut self, pairs: &mut PageAllocator, id: PairId) {
        let color = pairs.get(id).color;
        self.get_mut(color).remove(pairs, id);
    }

    /// Remove `id` from its current class and add it to `to`.
    #[inline]
    pub fn move_pair(&mut self, pairs: &mut PageAllocator, id: PairId, to: GcColor) {
        self.remove(pairs, id);
        self.add(pairs, id, to);
    }

    /// Pop one member of `from` and add it to `to`.
    pub fn pop_into(&mut self, pairs: &mut PageAllocator, from: GcColor, to: GcColor) -> Option<PairId> {
        let id = self.get_mut(from).pop()?;
        self.add(pairs, id, to);
        Some(id)
    }

    /// Move the whole `from` class into `to`.
    pub fn move_all(&mut self, pairs: &mut PageAllocator, from: GcColor, to: GcColor) -> usize {
        debug_assert!(from != to);
        let mut source = std::mem::replace(self.get_mut(from), ColorClass::new(from));
        let moved = source.drain_into(pairs, self.get_mut(to));
        // keep the drained allocation for reuse
        *self.get_mut(from) = source;
        moved
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorClass> {
        self.classes.iter()
    }
}
