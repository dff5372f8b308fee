use foundation::time::Millis;
use serde::{Deserialize, Serialize};

/// Attention animation applied to a freshly shown overlay.
///
/// After `delay_ms` the fill opacity alternates `low`/`high` once per
/// `tick_ms`, for `2 * repeats` ticks, and the last tick leaves it at
/// `settle_opacity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkSpec {
    pub repeats: u32,
    pub settle_opacity: f32,
    pub delay_ms: u64,
    pub tick_ms: u64,
    pub low_opacity: f32,
    pub high_opacity: f32,
}

impl Default for BlinkSpec {
    fn default() -> Self {
        Self {
            repeats: 4,
            settle_opacity: 0.0,
            delay_ms: 400,
            tick_ms: 300,
            low_opacity: 0.05,
            high_opacity: 0.6,
        }
    }
}

impl BlinkSpec {
    pub fn delay(&self) -> Millis {
        Millis(self.delay_ms)
    }

    pub fn tick(&self) -> Millis {
        Millis(self.tick_ms)
    }

    pub fn total_ticks(&self) -> u32 {
        self.repeats.saturating_mul(2).max(1)
    }

    /// Opacity written on 0-based tick `step`.
    pub fn opacity_for_step(&self, step: u32) -> f32 {
        if step % 2 == 0 {
            self.low_opacity
        } else {
            self.high_opacity
        }
    }

    pub fn is_last_step(&self, step: u32) -> bool {
        step + 1 >= self.total_ticks()
    }

    /// Offset from the start of the animation to tick `step`.
    pub fn step_offset(&self, step: u32) -> Millis {
        Millis(self.delay_ms + self.tick_ms * (u64::from(step) + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::BlinkSpec;
    use foundation::time::Millis;

    #[test]
    fn alternates_low_then_high() {
        let spec = BlinkSpec::default();
        let got: Vec<f32> = (0..4).map(|s| spec.opacity_for_step(s)).collect();
        assert_eq!(got, vec![0.05, 0.6, 0.05, 0.6]);
    }

    #[test]
    fn runs_two_ticks_per_repeat() {
        let spec = BlinkSpec::default();
        assert_eq!(spec.total_ticks(), 8);
        assert!(!spec.is_last_step(6));
        assert!(spec.is_last_step(7));
        assert_eq!(spec.step_offset(0), Millis(700));
        assert_eq!(spec.step_offset(7), Millis(2_800));
    }

    #[test]
    fn zero_repeats_still_settles() {
        let spec = BlinkSpec {
            repeats: 0,
            ..BlinkSpec::default()
        };
        assert_eq!(spec.total_ticks(), 1);
        assert!(spec.is_last_step(0));
    }
}
