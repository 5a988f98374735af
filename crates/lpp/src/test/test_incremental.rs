// Tests for the incremental step, generation swap, write barrier and root protocol

#[cfg(test)]
mod tests {
    use crate::gc::{Collector, GcColor, StepResult};
    use crate::lpp_heap::{GcError, GcOption};
    use crate::lpp_value::Cell;

    fn manual(page_size: usize) -> Collector {
        Collector::new(GcOption::manual(page_size)).unwrap()
    }

    #[test]
    fn new_pair_is_rooted_in_from_generation() {
        let mut gc = manual(8);
        let pair = gc.make_pair(Cell::integer(1), Cell::nil()).unwrap();

        assert_eq!(gc.color_of(pair), gc.from_root_color());
        assert_eq!(gc.root_count(pair), 1);
        assert_eq!(gc.car(pair).as_integer(), Some(1));
        assert_eq!(gc.num_conses(GcColor::Void), 7);
        gc.sanity_check();
    }

    #[test]
    fn step_scans_roots_before_grey_pairs() {
        let mut gc = manual(8);
        let leaf = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.unroot(leaf);
        let root = gc.make_pair(Cell::pair(leaf), Cell::integer(1)).unwrap();
        // storing the leaf greyed it
        assert_eq!(gc.color_of(leaf), GcColor::Grey);

        assert_eq!(gc.step_garbage_collector(), StepResult::Scanned(root));
        assert_eq!(gc.color_of(root), GcColor::BlackRoot);
        assert_eq!(gc.step_garbage_collector(), StepResult::Scanned(leaf));
        assert_eq!(gc.color_of(leaf), GcColor::Black);

        assert_eq!(
            gc.step_garbage_collector(),
            StepResult::Swapped { disposed: 0 }
        );
        assert_eq!(gc.from_color(), GcColor::Black);
        assert_eq!(gc.to_color(), GcColor::White);
        gc.sanity_check();
    }

    #[test]
    fn unreachable_pairs_are_disposed_then_recycled() {
        let mut gc = manual(4);
        let garbage = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.unroot(garbage);
        let _kept = gc.make_pair(Cell::integer(1), Cell::nil()).unwrap();

        assert_eq!(gc.finish_generation(), 1);
        assert_eq!(gc.color_of(garbage), GcColor::Free);
        assert_eq!(gc.num_conses(GcColor::Free), 1);
        assert_eq!(gc.num_conses(GcColor::Void), 2);

        assert_eq!(gc.step_recycle(), Some(garbage));
        assert_eq!(gc.color_of(garbage), GcColor::Void);
        assert_eq!(gc.num_conses(GcColor::Void), 3);
        assert_eq!(gc.step_recycle(), None);
        gc.sanity_check();

        assert_eq!(gc.stats().pairs_disposed, 1);
        assert_eq!(gc.stats().pairs_recycled, 1);
    }

    #[test]
    fn write_barrier_greys_from_child() {
        let mut gc = manual(8);
        let holder = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.step_garbage_collector();
        assert_eq!(gc.color_of(holder), gc.to_root_color());

        let fresh = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.unroot(fresh);
        assert_eq!(gc.color_of(fresh), gc.from_color());

        gc.set_car(holder, Cell::pair(fresh));
        assert_eq!(gc.color_of(fresh), GcColor::Grey);
        gc.sanity_check();

        // reachable only through the scanned holder, yet it survives
        assert_eq!(gc.finish_generation(), 0);
        assert_eq!(gc.color_of(fresh), GcColor::Black);
        gc.sanity_check();
    }

    #[test]
    fn barrier_leaves_scanned_child_alone() {
        let mut gc = manual(8);
        let a = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        let b = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.step_garbage_collector();
        gc.step_garbage_collector();
        assert_eq!(gc.color_of(a), GcColor::BlackRoot);

        gc.set_cdr(b, Cell::pair(a));
        assert_eq!(gc.color_of(a), GcColor::BlackRoot);
        gc.unset_cdr(b);
        assert!(gc.cdr(b).is_nil());
        gc.sanity_check();
    }

    #[test]
    fn root_keeps_scan_state() {
        let mut gc = manual(8);
        let a = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.unroot(a);
        gc.root(a);
        assert_eq!(gc.color_of(a), GcColor::WhiteRoot);
        gc.unroot(a);

        let _b = gc.make_pair(Cell::pair(a), Cell::nil()).unwrap();
        assert_eq!(gc.color_of(a), GcColor::Grey);
        gc.root(a);
        assert_eq!(gc.color_of(a), GcColor::GreyRoot);

        gc.retain(a);
        assert_eq!(gc.root_count(a), 2);
        assert!(!gc.unroot(a));
        assert_eq!(gc.color_of(a), GcColor::GreyRoot);
        assert!(gc.unroot(a));
        assert_eq!(gc.color_of(a), GcColor::Grey);
        gc.sanity_check();
    }

    #[test]
    #[should_panic(expected = "cannot unroot")]
    fn unroot_of_bulk_pair_is_fatal() {
        let mut gc = manual(8);
        let a = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.unroot(a);
        gc.unroot(a);
    }

    #[test]
    #[should_panic(expected = "cannot root")]
    fn rooting_twice_is_fatal() {
        let mut gc = manual(8);
        let a = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        gc.root(a);
    }

    #[test]
    fn out_of_memory_is_recoverable() {
        let option = GcOption {
            max_pages: Some(1),
            ..GcOption::manual(2)
        };
        let mut gc = Collector::new(option).unwrap();
        let a = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
        let _b = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();

        assert_eq!(
            gc.make_pair(Cell::nil(), Cell::nil()),
            Err(GcError::OutOfMemory {
                pages: 1,
                page_size: 2
            })
        );
        gc.sanity_check();

        gc.unroot(a);
        assert_eq!(gc.cycle_garbage_collector(), 1);
        assert_eq!(gc.make_pair(Cell::nil(), Cell::nil()), Ok(a));
        gc.sanity_check();
    }

    #[test]
    fn implicit_steps_bound_the_heap() {
        let mut gc = Collector::new(GcOption::default()).unwrap();
        let keep = gc.make_pair(Cell::integer(0), Cell::nil()).unwrap();

        for i in 0..1000 {
            let garbage = gc.make_pair(Cell::integer(i), Cell::pair(keep)).unwrap();
            gc.unroot(garbage);
        }

        assert_eq!(gc.total_slots(), gc.option().page_size);
        assert!(gc.stats().generation_swaps > 0);
        assert!(gc.stats().pairs_recycled > 900);
        assert!(gc.color_of(keep).is_root());
        gc.sanity_check();
    }
}
