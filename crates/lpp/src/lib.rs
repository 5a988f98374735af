// Lpp runtime core
// Cons-cell heap with a hybrid root-counted / incremental tricolor garbage collector

#[cfg(test)]
mod test;

pub mod gc;
pub mod lpp_heap;
pub mod lpp_value;

pub use gc::{Collector, GcColor, GcStats, PairId, StepResult};
pub use lpp_heap::{GcError, GcOption, GcResult, Heap, Object};
pub use lpp_value::{Cell, CellKind, ManagedObject};
