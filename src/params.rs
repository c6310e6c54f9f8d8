//! Mining thresholds and their validation.

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, Result};

/// Thresholds controlling itemset mining and rule filtering.
///
/// Construct through [`MiningParams::builder`], which validates every field
/// before any mining pass runs:
///
/// - `min_support` must be in (0, 1]
/// - `min_confidence` must be in [0, 1]
/// - `min_lift` must be finite and ≥ 0
/// - `min_length` must be ≥ 1
/// - `max_length`, when set, must be ≥ `min_length`
///
/// # Example
///
/// ```rust
/// use basket_miner::MiningParams;
///
/// let params = MiningParams::builder()
///     .min_support(0.003)
///     .min_confidence(0.2)
///     .min_lift(3.0)
///     .min_length(2)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.min_length, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningParams {
    /// Minimum fraction of transactions an itemset must appear in (inclusive).
    pub min_support: f64,
    /// Minimum confidence a rule must reach (inclusive).
    pub min_confidence: f64,
    /// Minimum lift a rule must reach (inclusive).
    pub min_lift: f64,
    /// Minimum total item count of a rule's antecedent plus consequent.
    pub min_length: usize,
    /// Optional cap on mined itemset size; `None` mines until a level is empty.
    pub max_length: Option<usize>,
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: 0.1,
            min_confidence: 0.0,
            min_lift: 0.0,
            min_length: 2,
            max_length: None,
        }
    }
}

impl MiningParams {
    /// Returns a builder initialized with the default thresholds.
    pub fn builder() -> MiningParamsBuilder {
        MiningParamsBuilder {
            params: Self::default(),
        }
    }

    /// Validates all thresholds, failing fast on the first violation.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(MinerError::invalid_parameter(format!(
                "min_support must be in (0, 1], got {}",
                self.min_support
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) || self.min_confidence.is_nan() {
            return Err(MinerError::invalid_parameter(format!(
                "min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        if !self.min_lift.is_finite() || self.min_lift < 0.0 {
            return Err(MinerError::invalid_parameter(format!(
                "min_lift must be finite and >= 0, got {}",
                self.min_lift
            )));
        }
        if self.min_length < 1 {
            return Err(MinerError::invalid_parameter(
                "min_length must be >= 1, got 0",
            ));
        }
        if let Some(max) = self.max_length {
            if max < self.min_length {
                return Err(MinerError::invalid_parameter(format!(
                    "max_length ({max}) must be >= min_length ({})",
                    self.min_length
                )));
            }
        }
        Ok(())
    }

    /// The smallest itemset size eligible to spawn rules.
    ///
    /// A rule needs at least one antecedent and one consequent item, so the
    /// effective floor is 2 regardless of the configured `min_length`.
    pub(crate) fn rule_length_floor(&self) -> usize {
        self.min_length.max(2)
    }
}

/// Builder for [`MiningParams`].
#[derive(Debug, Clone)]
pub struct MiningParamsBuilder {
    params: MiningParams,
}

impl MiningParamsBuilder {
    /// Sets the minimum support fraction, in (0, 1].
    pub fn min_support(mut self, min_support: f64) -> Self {
        self.params.min_support = min_support;
        self
    }

    /// Sets the minimum rule confidence, in [0, 1].
    pub fn min_confidence(mut self, min_confidence: f64) -> Self {
        self.params.min_confidence = min_confidence;
        self
    }

    /// Sets the minimum rule lift, ≥ 0.
    pub fn min_lift(mut self, min_lift: f64) -> Self {
        self.params.min_lift = min_lift;
        self
    }

    /// Sets the minimum combined rule length, ≥ 1.
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.params.min_length = min_length;
        self
    }

    /// Caps the size of mined itemsets.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.params.max_length = Some(max_length);
        self
    }

    /// Validates the accumulated thresholds and returns the parameters.
    pub fn build(self) -> Result<MiningParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(MiningParams::default().validate().is_ok());
    }

    #[test]
    fn builder_sets_all_fields() {
        let params = MiningParams::builder()
            .min_support(0.003)
            .min_confidence(0.2)
            .min_lift(3.0)
            .min_length(2)
            .max_length(4)
            .build()
            .unwrap();

        assert_eq!(params.min_support, 0.003);
        assert_eq!(params.min_confidence, 0.2);
        assert_eq!(params.min_lift, 3.0);
        assert_eq!(params.min_length, 2);
        assert_eq!(params.max_length, Some(4));
    }

    #[test]
    fn rejects_out_of_range_support() {
        assert!(MiningParams::builder().min_support(0.0).build().is_err());
        assert!(MiningParams::builder().min_support(-0.5).build().is_err());
        assert!(MiningParams::builder().min_support(1.5).build().is_err());
        assert!(MiningParams::builder().min_support(f64::NAN).build().is_err());
        assert!(MiningParams::builder().min_support(1.0).build().is_ok());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        assert!(MiningParams::builder().min_confidence(-0.1).build().is_err());
        assert!(MiningParams::builder().min_confidence(1.1).build().is_err());
        assert!(MiningParams::builder()
            .min_confidence(f64::NAN)
            .build()
            .is_err());
        assert!(MiningParams::builder().min_confidence(1.0).build().is_ok());
    }

    #[test]
    fn rejects_invalid_lift() {
        assert!(MiningParams::builder().min_lift(-1.0).build().is_err());
        assert!(MiningParams::builder()
            .min_lift(f64::INFINITY)
            .build()
            .is_err());
        assert!(MiningParams::builder().min_lift(0.0).build().is_ok());
    }

    #[test]
    fn rejects_zero_min_length_and_inverted_max() {
        assert!(MiningParams::builder().min_length(0).build().is_err());
        assert!(MiningParams::builder()
            .min_length(3)
            .max_length(2)
            .build()
            .is_err());
        assert!(MiningParams::builder()
            .min_length(3)
            .max_length(3)
            .build()
            .is_ok());
    }

    #[test]
    fn rule_length_floor_never_below_two() {
        let params = MiningParams::builder().min_length(1).build().unwrap();
        assert_eq!(params.rule_length_floor(), 2);
        let params = MiningParams::builder().min_length(4).build().unwrap();
        assert_eq!(params.rule_length_floor(), 4);
    }

    #[test]
    fn params_round_trip_through_serde() {
        let params = MiningParams::builder()
            .min_support(0.25)
            .max_length(5)
            .build()
            .unwrap();
        let json = serde_json::to_string(&params).unwrap();
        let back: MiningParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
