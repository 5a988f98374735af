// Heap inspection: color census, reachability and the consistency check.

use ahash::RandomState;
use std::collections::{HashSet, VecDeque};

use crate::gc::{Collector, GcColor, PairId};

pub type PairSet = HashSet<PairId, RandomState>;

impl Collector {
    /// Number of slots currently colored `color`. For `Void` this is the slots
    /// the allocator can hand out without a new page.
    pub fn num_conses(&self, color: GcColor) -> usize {
        match color {
            GcColor::Void => self.pairs.available(),
            color => self.classes.len(color),
        }
    }

    /// Slots currently colored `color`, in container order.
    pub fn conses(&self, color: GcColor) -> Vec<PairId> {
        match color {
            GcColor::Void => self.pairs.void_slots(),
            color => self.classes.get(color).members().to_vec(),
        }
    }

    /// All rooted pairs, whatever their scan state.
    pub fn root_conses(&self) -> Vec<PairId> {
        GcColor::ROOTS
            .iter()
            .flat_map(|&color| self.classes.get(color).members().iter().copied())
            .collect()
    }

    /// Pairs reachable from any root through car/cdr edges.
    pub fn reachable_conses(&self) -> PairSet {
        let mut visited = PairSet::with_capacity_and_hasher(
            self.total_slots() - self.pairs.available(),
            RandomState::new(),
        );
        let mut queue = VecDeque::new();

        for id in self.root_conses() {
            if visited.insert(id) {
                queue.push_back(id);
            }
        }
        while let Some(id) = queue.pop_front() {
            for child in self.pairs.get(id).children() {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        visited
    }

    /// Verify every bookkeeping invariant of the heap.
    ///
    /// # Panics
    /// On the first violation found:
    /// - a container member whose color or index disagrees with its container
    /// - slot counts that do not add up to the slots of all pages
    /// - a root count that disagrees with a root/bulk color
    /// - a live pair with a child that is not live
    /// - a scanned (`to`/`toRoot`) pair with a child in the from generation
    pub fn sanity_check(&self) {
        for class in self.classes.iter() {
            class.check(&self.pairs);
        }
        assert!(
            self.classes.get(GcColor::Void).is_empty(),
            "void slots must stay with the allocator"
        );

        let counted: usize = GcColor::ALL.iter().map(|&c| self.num_conses(c)).sum();
        assert_eq!(
            counted,
            self.total_slots(),
            "colored slots do not add up to the slots of all pages"
        );

        let from = [self.from_color(), self.from_root_color()];
        let to = [self.to_color(), self.to_root_color()];

        for color in GcColor::LIVE {
            for &id in self.classes.get(color).members() {
                let pair = self.pairs.get(id);
                assert_eq!(
                    color.is_root(),
                    pair.root_count > 0,
                    "pair {} is {} with {} roots",
                    id,
                    color,
                    pair.root_count
                );

                for child in pair.children() {
                    let child_color = self.pairs.get(child).color;
                    assert!(
                        child_color.is_live(),
                        "live pair {} points at {} pair {}",
                        id,
                        child_color,
                        child
                    );
                    assert!(
                        !(to.contains(&color) && from.contains(&child_color)),
                        "scanned pair {} ({}) points at unscanned pair {} ({})",
                        id,
                        color,
                        child,
                        child_color
                    );
                }
            }
        }
    }
}
