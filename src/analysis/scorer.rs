//! GI score.
//!
//! `(i · v · r · g) / (e + s) / 10`, rounded to one decimal. The inputs are
//! constants, so every analysis carries the same score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GiInputs {
    pub insight: f64,
    pub vividness: f64,
    pub resonance: f64,
    pub growth: f64,
    pub emotional_noise: f64,
    pub stress: f64,
}

impl GiInputs {
    pub const FIXED: GiInputs = GiInputs {
        insight: 9.0,
        vividness: 8.0,
        resonance: 7.0,
        growth: 8.0,
        emotional_noise: 2.0,
        stress: 2.0,
    };
}

impl Default for GiInputs {
    fn default() -> Self {
        Self::FIXED
    }
}

/// A zero denominator is treated as 1.
pub fn gi_score(inputs: &GiInputs) -> f64 {
    let numerator = inputs.insight * inputs.vividness * inputs.resonance * inputs.growth;
    let mut denominator = inputs.emotional_noise + inputs.stress;
    if denominator == 0.0 {
        denominator = 1.0;
    }
    round1(numerator / denominator / 10.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_inputs() {
        assert_eq!(gi_score(&GiInputs::default()), 100.8);
    }

    #[test]
    fn test_zero_denominator_guard() {
        let inputs = GiInputs {
            emotional_noise: 0.0,
            stress: 0.0,
            ..GiInputs::FIXED
        };
        assert_eq!(gi_score(&inputs), 403.2);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        let inputs = GiInputs {
            insight: 1.0,
            vividness: 1.0,
            resonance: 1.0,
            growth: 1.0,
            emotional_noise: 3.0,
            stress: 0.0,
        };
        // 1/3/10 = 0.0333...
        assert_eq!(gi_score(&inputs), 0.0);
        let inputs = GiInputs {
            growth: 20.0,
            ..inputs
        };
        // 20/3/10 = 0.666...
        assert_eq!(gi_score(&inputs), 0.7);
    }
}
