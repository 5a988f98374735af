// Values stored in pair slots.
// Pairs are referenced by index; everything else is inline or reference counted.
mod cell;
mod managed;

pub use cell::{Cell, CellKind};
pub use managed::ManagedObject;
