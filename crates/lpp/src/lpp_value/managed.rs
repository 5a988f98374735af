use smol_str::SmolStr;

/// Heap objects whose lifetime is plain reference counting.
///
/// Managed objects are leaves of the pair graph: they never hold a pair, so the
/// collector does not need to trace them and an `Rc` is enough to free them.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum ManagedObject {
    /// Interned symbol; equal names share one allocation.
    Symbol(SmolStr),
    /// Immutable string literal, never interned.
    String(SmolStr),
}

impl ManagedObject {
    pub fn as_str(&self) -> &str {
        match self {
            ManagedObject::Symbol(name) | ManagedObject::String(name) => name.as_str(),
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, ManagedObject::Symbol(_))
    }
}
