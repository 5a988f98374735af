pub mod test_incremental;
pub mod test_invariants;
