pub use glam::Vec3;

/// Milliseconds on the engine's own clock.
///
/// Nothing in the crate reads a wall clock; callers pass `now` explicitly, so
/// every timed behavior is deterministic under test.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Self = Self(0);

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs.max(0.0) * 1000.0).round() as u64)
    }
}

/// The accent color pair every scene controller is constructed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccentColors {
    pub primary: [u8; 3],
    pub secondary: [u8; 3],
}

impl AccentColors {
    pub const fn new(primary: [u8; 3], secondary: [u8; 3]) -> Self {
        Self { primary, secondary }
    }
}

impl Default for AccentColors {
    fn default() -> Self {
        Self::new([94, 234, 212], [56, 189, 248])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_secs_roundtrip() {
        assert_eq!(Millis(1500).as_secs_f64(), 1.5);
        assert_eq!(Millis::from_secs_f64(1.5), Millis(1500));
        assert_eq!(Millis::from_secs_f64(-2.0), Millis::ZERO);
    }

    #[test]
    fn saturating_ops_do_not_wrap() {
        assert_eq!(Millis(5).saturating_sub(Millis(10)), Millis::ZERO);
        assert_eq!(
            Millis(u64::MAX).saturating_add(Millis(1)),
            Millis(u64::MAX)
        );
    }
}
