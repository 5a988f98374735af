use std::fmt;
use std::rc::Rc;

use crate::gc::PairId;
use crate::lpp_value::ManagedObject;

/// Runtime value stored in a pair slot or held by a root handle.
///
/// - `Pair` is a non-owning reference: the pair's lifetime is decided by the
///   collector, never by the cell.
/// - `Managed` owns one strong count of a reference-counted object; dropping
///   the cell releases it.
#[derive(Clone, Default)]
pub enum Cell {
    #[default]
    Nil,
    Integer(i64),
    Pair(PairId),
    Managed(Rc<ManagedObject>),
}

/// Tag of a [`Cell`], for matching without borrowing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Nil,
    Integer,
    Pair,
    Managed,
}

impl Cell {
    #[inline(always)]
    pub fn nil() -> Self {
        Cell::Nil
    }

    #[inline(always)]
    pub fn integer(i: i64) -> Self {
        Cell::Integer(i)
    }

    #[inline(always)]
    pub fn pair(id: PairId) -> Self {
        Cell::Pair(id)
    }

    pub fn managed(object: Rc<ManagedObject>) -> Self {
        Cell::Managed(object)
    }

    #[inline(always)]
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Nil => CellKind::Nil,
            Cell::Integer(_) => CellKind::Integer,
            Cell::Pair(_) => CellKind::Pair,
            Cell::Managed(_) => CellKind::Managed,
        }
    }

    #[inline(always)]
    pub fn is_nil(&self) -> bool {
        matches!(self, Cell::Nil)
    }

    #[inline(always)]
    pub fn is_pair(&self) -> bool {
        matches!(self, Cell::Pair(_))
    }

    #[inline(always)]
    pub fn is_managed(&self) -> bool {
        matches!(self, Cell::Managed(_))
    }

    #[inline(always)]
    pub fn as_pair(&self) -> Option<PairId> {
        match self {
            Cell::Pair(id) => Some(*id),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_managed(&self) -> Option<&Rc<ManagedObject>> {
        match self {
            Cell::Managed(object) => Some(object),
            _ => None,
        }
    }

    /// Symbol name, if this cell holds an interned symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Cell::Managed(object) if object.is_symbol() => Some(object.as_str()),
            _ => None,
        }
    }

    /// Reset to `Nil`.
    ///
    /// A managed target loses one reference and is deleted when that was the
    /// last one. A pair target is only forgotten.
    #[inline]
    pub fn unset(&mut self) {
        *self = Cell::Nil;
    }

    /// Take the value out, leaving `Nil` behind.
    pub fn take(&mut self) -> Cell {
        std::mem::take(self)
    }
}

impl From<PairId> for Cell {
    fn from(id: PairId) -> Self {
        Cell::Pair(id)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Integer(i)
    }
}

impl From<Rc<ManagedObject>> for Cell {
    fn from(object: Rc<ManagedObject>) -> Self {
        Cell::Managed(object)
    }
}

impl PartialEq for Cell {
    /// Identity equality: managed objects compare by allocation.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Nil, Cell::Nil) => true,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Pair(a), Cell::Pair(b)) => a == b,
            (Cell::Managed(a), Cell::Managed(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Nil => write!(f, "nil"),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Pair(id) => write!(f, "pair{}", id),
            Cell::Managed(object) => match object.as_ref() {
                ManagedObject::Symbol(name) => write!(f, "'{}", name),
                ManagedObject::String(s) => write!(f, "{:?}", s.as_str()),
            },
        }
    }
}
