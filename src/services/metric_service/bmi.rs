use serde::{Deserialize, Serialize};
use std::fmt;

/// WHO adult BMI bands. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `weight / (height/100)^2`, rounded half-up to two decimals.
///
/// Returns `None` when either input is missing, zero, negative or not
/// finite, and when the quotient itself would not be finite.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = weight_kg.filter(|w| w.is_finite() && *w > 0.0)?;
    let height = height_cm.filter(|h| h.is_finite() && *h > 0.0)?;

    let meters = height / 100.0;
    let bmi = weight / (meters * meters);
    if !bmi.is_finite() {
        return None;
    }
    // f64::round is half-away-from-zero, i.e. half-up for positive values.
    let rounded = (bmi * 100.0).round() / 100.0;
    rounded.is_finite().then_some(rounded)
}

pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// BMI together with its band, or `None` when no BMI can be computed.
pub fn assess_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<(f64, BmiCategory)> {
    compute_bmi(weight_kg, height_cm).map(|bmi| (bmi, classify(bmi)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_and_rounds_to_two_decimals() {
        assert_eq!(compute_bmi(Some(70.0), Some(175.0)), Some(22.86));
        assert_eq!(compute_bmi(Some(50.0), Some(180.0)), Some(15.43));
        assert_eq!(compute_bmi(Some(95.0), Some(175.0)), Some(31.02));
    }

    #[test]
    fn rounds_exact_half_up() {
        // 22.125 is exactly representable; at 100 cm BMI equals the weight.
        assert_eq!(compute_bmi(Some(22.125), Some(100.0)), Some(22.13));
    }

    #[test]
    fn missing_zero_or_negative_inputs_yield_nothing() {
        assert_eq!(compute_bmi(Some(0.0), Some(170.0)), None);
        assert_eq!(compute_bmi(Some(70.0), Some(0.0)), None);
        assert_eq!(compute_bmi(Some(-70.0), Some(170.0)), None);
        assert_eq!(compute_bmi(Some(70.0), Some(-170.0)), None);
        assert_eq!(compute_bmi(None, Some(170.0)), None);
        assert_eq!(compute_bmi(Some(70.0), None), None);
        assert_eq!(compute_bmi(Some(f64::NAN), Some(170.0)), None);
        assert_eq!(compute_bmi(Some(f64::INFINITY), Some(170.0)), None);
    }

    #[test]
    fn tiny_height_never_leaks_infinity() {
        assert_eq!(compute_bmi(Some(f64::MAX), Some(1e-300)), None);
    }

    #[test]
    fn valid_pairs_are_deterministic_positive_and_finite() {
        for weight in [0.5, 3.2, 45.0, 70.0, 120.5, 300.0] {
            for height in [30.0, 50.0, 150.0, 175.5, 210.0] {
                let first = compute_bmi(Some(weight), Some(height)).unwrap();
                let second = compute_bmi(Some(weight), Some(height)).unwrap();
                assert_eq!(first, second);
                assert!(first > 0.0 && first.is_finite());
            }
        }
    }

    #[test]
    fn boundaries_fall_into_the_upper_band() {
        assert_eq!(classify(18.49), BmiCategory::Underweight);
        assert_eq!(classify(18.5), BmiCategory::Normal);
        assert_eq!(classify(24.99), BmiCategory::Normal);
        assert_eq!(classify(25.0), BmiCategory::Overweight);
        assert_eq!(classify(29.99), BmiCategory::Overweight);
        assert_eq!(classify(30.0), BmiCategory::Obese);
        assert_eq!(classify(0.0), BmiCategory::Underweight);
    }

    #[test]
    fn classification_is_monotonic() {
        let mut previous = classify(0.0);
        let mut bmi = 0.0;
        while bmi < 60.0 {
            let current = classify(bmi);
            assert!(current >= previous, "{} went from {:?} to {:?}", bmi, previous, current);
            previous = current;
            bmi += 0.01;
        }
    }

    #[test]
    fn assess_pairs_value_and_band() {
        assert_eq!(
            assess_bmi(Some(70.0), Some(175.0)),
            Some((22.86, BmiCategory::Normal))
        );
        assert_eq!(assess_bmi(Some(70.0), Some(0.0)), None);
    }

    #[test]
    fn category_serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&BmiCategory::Overweight).unwrap(),
            "\"Overweight\""
        );
    }
}
