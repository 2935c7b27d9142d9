//! DOM Generation counter
//!
//! The store bumps its generation on every structural or attribute
//! mutation. Callers that memoize derived data can compare generations to
//! know whether the tree changed in between.

/// Generation counter - incremented on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Initial generation (never mutated)
    pub const INITIAL: Self = Generation(0);

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    /// Check if this generation is newer than another
    #[inline]
    pub fn is_newer_than(self, other: Self) -> bool {
        // Handle wraparound
        let diff = self.0.wrapping_sub(other.0);
        diff > 0 && diff < u32::MAX / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_ordering() {
        let g = Generation::INITIAL;
        let g2 = g.next();
        assert!(g2.is_newer_than(g));
        assert!(!g.is_newer_than(g2));
        assert!(!g.is_newer_than(g));
    }

    #[test]
    fn test_generation_wraparound() {
        let g = Generation(u32::MAX);
        let g2 = g.next();
        assert_eq!(g2.value(), 0);
        assert!(g2.is_newer_than(g));
    }
}
