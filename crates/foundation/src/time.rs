use std::ops::Add;

/// Virtual clock reading in milliseconds.
///
/// The session never reads wall-clock time; callers pass `Time` in so timed
/// effects stay deterministic and replayable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

/// Span of virtual time in milliseconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);
}

impl Add<Millis> for Time {
    type Output = Time;

    fn add(self, rhs: Millis) -> Time {
        Time(self.0.saturating_add(rhs.0))
    }
}
