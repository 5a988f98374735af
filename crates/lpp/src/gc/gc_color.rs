/// Color class of a pair slot.
///
/// Every slot of every page carries exactly one color at all times. `Void` is an
/// unallocated (or recycled) slot owned by the allocator, `Free` is a disposed
/// slot waiting to be recycled. The remaining six colors partition the live
/// pairs: three bulk generations and their rooted twins.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GcColor {
    #[default]
    Void = 0,
    White = 1,
    Grey = 2,
    Black = 3,
    WhiteRoot = 4,
    GreyRoot = 5,
    BlackRoot = 6,
    Free = 7,
}

impl GcColor {
    /// Number of colors, `Void` included.
    pub const COUNT: usize = 8;

    pub const ALL: [GcColor; GcColor::COUNT] = [
        GcColor::Void,
        GcColor::White,
        GcColor::Grey,
        GcColor::Black,
        GcColor::WhiteRoot,
        GcColor::GreyRoot,
        GcColor::BlackRoot,
        GcColor::Free,
    ];

    /// Colors a live pair may carry.
    pub const LIVE: [GcColor; 6] = [
        GcColor::White,
        GcColor::Grey,
        GcColor::Black,
        GcColor::WhiteRoot,
        GcColor::GreyRoot,
        GcColor::BlackRoot,
    ];

    pub const ROOTS: [GcColor; 3] = [GcColor::WhiteRoot, GcColor::GreyRoot, GcColor::BlackRoot];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn is_root(self) -> bool {
        matches!(
            self,
            GcColor::WhiteRoot | GcColor::GreyRoot | GcColor::BlackRoot
        )
    }

    #[inline(always)]
    pub fn is_bulk(self) -> bool {
        matches!(self, GcColor::White | GcColor::Grey | GcColor::Black)
    }

    /// Live means owned by one of the six partition containers.
    #[inline(always)]
    pub fn is_live(self) -> bool {
        self.is_root() || self.is_bulk()
    }

    /// Rooted twin of a bulk color. Root colors map to themselves.
    pub fn to_root(self) -> GcColor {
        match self {
            GcColor::White => GcColor::WhiteRoot,
            GcColor::Grey => GcColor::GreyRoot,
            GcColor::Black => GcColor::BlackRoot,
            other => other,
        }
    }

    /// Bulk twin of a root color. Bulk colors map to themselves.
    pub fn to_bulk(self) -> GcColor {
        match self {
            GcColor::WhiteRoot => GcColor::White,
            GcColor::GreyRoot => GcColor::Grey,
            GcColor::BlackRoot => GcColor::Black,
            other => other,
        }
    }

    /// The other half of the White/Black generation pair.
    pub fn opposite(self) -> GcColor {
        match self {
            GcColor::White => GcColor::Black,
            GcColor::Black => GcColor::White,
            GcColor::WhiteRoot => GcColor::BlackRoot,
            GcColor::BlackRoot => GcColor::WhiteRoot,
            other => other,
        }
    }
}

impl std::fmt::Display for GcColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GcColor::Void => "void",
            GcColor::White => "white",
            GcColor::Grey => "grey",
            GcColor::Black => "black",
            GcColor::WhiteRoot => "white-root",
            GcColor::GreyRoot => "grey-root",
            GcColor::BlackRoot => "black-root",
            GcColor::Free => "free",
        };
        f.write_str(name)
    }
}

/// Which of White/Black currently plays the "from" generation.
///
/// `from` pairs are the ones still to be proven reachable; `to` pairs have been
/// scanned (or were created after their children were already protected).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    from: GcColor,
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            from: GcColor::White,
        }
    }
}

impl Generation {
    #[inline(always)]
    pub fn from_color(self) -> GcColor {
        self.from
    }

    #[inline(always)]
    pub fn to_color(self) -> GcColor {
        self.from.opposite()
    }

    #[inline(always)]
    pub fn from_root_color(self) -> GcColor {
        self.from.to_root()
    }

    #[inline(always)]
    pub fn to_root_color(self) -> GcColor {
        self.to_color().to_root()
    }

    /// Swap the roles of White and Black.
    pub fn flip(&mut self) {
        self.from = self.from.opposite();
    }

    pub fn is_from(self, color: GcColor) -> bool {
        color == self.from_color() || color == self.from_root_color()
    }

    pub fn is_to(self, color: GcColor) -> bool {
        color == self.to_color() || color == self.to_root_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_bulk_twins() {
        for color in [GcColor::White, GcColor::Grey, GcColor::Black] {
            assert!(color.is_bulk());
            assert!(color.to_root().is_root());
            assert_eq!(color.to_root().to_bulk(), color);
        }
        assert_eq!(GcColor::Void.to_root(), GcColor::Void);
        assert!(!GcColor::Free.is_live());
    }

    #[test]
    fn generation_flip() {
        let mut generation = Generation::default();
        assert_eq!(generation.from_color(), GcColor::White);
        assert_eq!(generation.to_root_color(), GcColor::BlackRoot);
        generation.flip();
        assert_eq!(generation.from_color(), GcColor::Black);
        assert_eq!(generation.from_root_color(), GcColor::BlackRoot);
        assert_eq!(generation.to_color(), GcColor::White);
        assert!(generation.is_to(GcColor::WhiteRoot));
        assert!(!generation.is_from(GcColor::Grey));
    }
}
