//! Sizing formulas and configuration for filters derived from capacity
//! and false-positive targets.

use crate::error::{FilterError, Result};
use derive_builder::Builder;

/// Number of bits required to hold `capacity` elements at target false
/// positive rate `fp`: `ceil(-n * ln(fp) / (ln 2)^2)`.
pub fn optimal_bit_count(capacity: usize, fp: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    (-(capacity as f64) * fp.ln() / (ln2 * ln2)).ceil() as usize
}

/// Number of hash digests for a filter of `bits` bits over `capacity`
/// elements: `ceil((m / n) * ln 2)`.
pub fn optimal_hash_count(bits: usize, capacity: usize) -> usize {
    ((bits as f64 / capacity as f64) * std::f64::consts::LN_2).ceil() as usize
}

#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Maximum number of elements
    #[builder(default = "1_000_000")]
    pub capacity: usize,

    /// Target false positive rate (0.0 to 1.0)
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,

    /// Seed handed to the hasher construction helper
    #[builder(default = "0")]
    pub seed: u64,

    /// Request double hashing from the hasher construction helper
    #[builder(default = "false")]
    pub double_hashing: bool,

    /// Give each digest its own disjoint range of the bit array
    #[builder(default = "false")]
    pub partitioned: bool,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(FilterError::InvalidConfig(
                "capacity must be > 0".into(),
            ));
        }
        if self.false_positive_rate <= 0.0 || self.false_positive_rate >= 1.0 {
            return Err(FilterError::InvalidConfig(
                "false positive rate must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_reference_scenario() {
        // fp = 0.01 over 1000 elements needs 9586 bits and 7 digests.
        let bits = optimal_bit_count(1000, 0.01);
        assert_eq!(bits, 9586);
        assert_eq!(optimal_hash_count(bits, 1000), 7);
    }

    #[test]
    fn test_bit_count_grows_with_tighter_targets() {
        assert!(optimal_bit_count(1000, 0.001) > optimal_bit_count(1000, 0.01));
        assert!(optimal_bit_count(2000, 0.01) > optimal_bit_count(1000, 0.01));
    }

    #[test]
    fn test_builder_defaults_validate() {
        let config = FilterConfigBuilder::default().build().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 1_000_000);
        assert!(!config.partitioned);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let zero_capacity =
            FilterConfigBuilder::default().capacity(0).build().unwrap();
        assert!(matches!(
            zero_capacity.validate(),
            Err(FilterError::InvalidConfig(_))
        ));

        for fpr in [0.0, 1.0, -0.5, 1.5] {
            let config = FilterConfigBuilder::default()
                .false_positive_rate(fpr)
                .build()
                .unwrap();
            assert!(matches!(
                config.validate(),
                Err(FilterError::InvalidConfig(_))
            ));
        }
    }
}
