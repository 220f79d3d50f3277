//! Musical timing for tempo-synced processing.

/// Tempo used when the host reports none.
pub const DEFAULT_BPM: f32 = 120.0;

/// Slowest tempo accepted.
pub const MIN_BPM: f32 = 20.0;

/// Resolve a host tempo: missing, non-finite or non-positive values fall back
/// to [`DEFAULT_BPM`], everything else is floored at [`MIN_BPM`].
///
/// ```rust
/// use howl_core::resolve_bpm;
///
/// assert_eq!(resolve_bpm(None), 120.0);
/// assert_eq!(resolve_bpm(Some(f32::NAN)), 120.0);
/// assert_eq!(resolve_bpm(Some(5.0)), 20.0);
/// assert_eq!(resolve_bpm(Some(140.0)), 140.0);
/// ```
pub fn resolve_bpm(bpm: Option<f32>) -> f32 {
    match bpm {
        Some(b) if b.is_finite() && b > 0.0 => b.max(MIN_BPM),
        _ => DEFAULT_BPM,
    }
}

/// Note lengths the arpeggiator steps at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoteDivision {
    /// One beat.
    #[default]
    Quarter,
    /// Half a beat.
    Eighth,
    /// Quarter of a beat.
    Sixteenth,
    /// Eighth of a beat.
    ThirtySecond,
}

impl NoteDivision {
    /// Length in beats.
    pub fn beats(self) -> f32 {
        match self {
            NoteDivision::Quarter => 1.0,
            NoteDivision::Eighth => 0.5,
            NoteDivision::Sixteenth => 0.25,
            NoteDivision::ThirtySecond => 0.125,
        }
    }

    /// Duration in milliseconds at `bpm`.
    ///
    /// ```rust
    /// use howl_core::NoteDivision;
    ///
    /// assert!((NoteDivision::Quarter.to_ms(120.0) - 500.0).abs() < 1e-3);
    /// ```
    pub fn to_ms(self, bpm: f32) -> f32 {
        self.beats() * 60_000.0 / bpm
    }

    /// Duration in samples at `bpm` and `sample_rate`.
    pub fn to_samples(self, bpm: f32, sample_rate: f32) -> f32 {
        self.to_ms(bpm) * 0.001 * sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_at_120_is_half_second() {
        let samples = NoteDivision::Quarter.to_samples(120.0, 48000.0);
        assert!((samples - 24000.0).abs() < 0.01);
    }

    #[test]
    fn divisions_halve() {
        let bpm = 97.0;
        let q = NoteDivision::Quarter.to_ms(bpm);
        assert!((NoteDivision::Eighth.to_ms(bpm) - q / 2.0).abs() < 1e-3);
        assert!((NoteDivision::Sixteenth.to_ms(bpm) - q / 4.0).abs() < 1e-3);
        assert!((NoteDivision::ThirtySecond.to_ms(bpm) - q / 8.0).abs() < 1e-3);
    }

    #[test]
    fn bpm_fallbacks() {
        assert_eq!(resolve_bpm(Some(f32::INFINITY)), DEFAULT_BPM);
        assert_eq!(resolve_bpm(Some(0.0)), DEFAULT_BPM);
        assert_eq!(resolve_bpm(Some(-10.0)), DEFAULT_BPM);
        assert_eq!(resolve_bpm(Some(19.9)), MIN_BPM);
    }
}
