// Randomized operation programs checked against the heap invariants

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use std::collections::HashSet;

    use crate::gc::{Collector, GcColor, PairId};
    use crate::lpp_heap::GcOption;
    use crate::lpp_value::Cell;

    #[derive(Debug, Clone)]
    enum Op {
        Alloc { car: usize, cdr: usize },
        Unroot(usize),
        RootCar(usize),
        Retain(usize),
        SetCar(usize, usize),
        SetCdr(usize, usize),
        UnsetCar(usize),
        Step,
        Recycle,
        Cycle,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof! {
            4 => (any::<usize>(), any::<usize>()).prop_map(|(car, cdr)| Op::Alloc { car, cdr }),
            3 => any::<usize>().prop_map(Op::Unroot),
            2 => any::<usize>().prop_map(Op::RootCar),
            1 => any::<usize>().prop_map(Op::Retain),
            2 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::SetCar(a, b)),
            2 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::SetCdr(a, b)),
            1 => any::<usize>().prop_map(Op::UnsetCar),
            2 => Just(Op::Step),
            1 => Just(Op::Recycle),
            1 => Just(Op::Cycle),
        }
    }

    fn arb_option() -> impl Strategy<Value = GcOption> {
        (1usize..8, 0usize..5, 0usize..3).prop_map(|(page_size, garbage_steps, recycle_steps)| {
            GcOption {
                page_size,
                garbage_steps,
                recycle_steps,
                max_pages: None,
            }
        })
    }

    /// Every entry owns one root reference.
    struct Program {
        gc: Collector,
        handles: Vec<PairId>,
    }

    impl Program {
        fn pick(&self, i: usize) -> Option<PairId> {
            (!self.handles.is_empty()).then(|| self.handles[i % self.handles.len()])
        }

        /// A rooted pair, or nil when `i` lands one past the handles.
        fn value(&self, i: usize) -> Cell {
            match i % (self.handles.len() + 1) {
                n if n == self.handles.len() => Cell::nil(),
                n => Cell::pair(self.handles[n]),
            }
        }

        fn run(&mut self, op: &Op) {
            match *op {
                Op::Alloc { car, cdr } => {
                    let id = self.gc.make_pair(self.value(car), self.value(cdr)).unwrap();
                    self.handles.push(id);
                }
                Op::Unroot(i) => {
                    if !self.handles.is_empty() {
                        let id = self.handles.swap_remove(i % self.handles.len());
                        self.gc.unroot(id);
                    }
                }
                Op::RootCar(i) => {
                    if let Some(child) = self.pick(i).and_then(|id| self.gc.car(id).as_pair()) {
                        self.gc.acquire(child);
                        self.handles.push(child);
                    }
                }
                Op::Retain(i) => {
                    if let Some(id) = self.pick(i) {
                        self.gc.retain(id);
                        self.handles.push(id);
                    }
                }
                Op::SetCar(a, b) => {
                    if let Some(id) = self.pick(a) {
                        let value = self.value(b);
                        self.gc.set_car(id, value);
                    }
                }
                Op::SetCdr(a, b) => {
                    if let Some(id) = self.pick(a) {
                        let value = self.value(b);
                        self.gc.set_cdr(id, value);
                    }
                }
                Op::UnsetCar(i) => {
                    if let Some(id) = self.pick(i) {
                        self.gc.unset_car(id);
                    }
                }
                Op::Step => {
                    self.gc.step_garbage_collector();
                }
                Op::Recycle => {
                    self.gc.step_recycle();
                }
                Op::Cycle => {
                    self.gc.cycle_garbage_collector();
                    let live: HashSet<PairId> =
                        GcColor::LIVE.iter().flat_map(|&c| self.gc.conses(c)).collect();
                    let reachable: HashSet<PairId> =
                        self.gc.reachable_conses().into_iter().collect();
                    assert_eq!(live, reachable);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn random_programs_keep_invariants(
            option in arb_option(),
            ops in prop::collection::vec(arb_op(), 0..200),
        ) {
            let mut program = Program {
                gc: Collector::new(option).unwrap(),
                handles: Vec::new(),
            };

            for op in &ops {
                program.run(op);
                program.gc.sanity_check();

                // every handle keeps its pair alive
                for &id in &program.handles {
                    prop_assert!(program.gc.color_of(id).is_root());
                }
            }

            for id in std::mem::take(&mut program.handles) {
                program.gc.unroot(id);
            }
            program.gc.cycle_garbage_collector();
            prop_assert_eq!(program.gc.num_conses(GcColor::Void), program.gc.total_slots());
            program.gc.sanity_check();
        }

        #[test]
        fn unreachable_pairs_are_freed_by_two_swaps(
            chain in 1usize..20,
            page_size in 1usize..8,
        ) {
            let mut gc = Collector::new(GcOption::manual(page_size)).unwrap();
            let mut head = gc.make_pair(Cell::nil(), Cell::nil()).unwrap();
            for _ in 1..chain {
                let next = gc.make_pair(Cell::nil(), Cell::pair(head)).unwrap();
                gc.unroot(head);
                head = next;
            }
            gc.unroot(head);

            let disposed = gc.finish_generation() + gc.finish_generation();
            prop_assert_eq!(disposed, chain);
            prop_assert!(gc.reachable_conses().is_empty());
            gc.sanity_check();
        }
    }
}
