//! Utility functions for the inflation_forecast crate

use crate::error::{InflationError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How rows are held out for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Holdout {
    /// The latest `test_ratio` share of rows, in period order
    Chronological {
        #[serde(default = "default_test_ratio")]
        test_ratio: f64,
    },
    /// The latest `rows` rows
    LastRows { rows: usize },
    /// A seeded random sample; mixes future periods into training
    Random {
        #[serde(default = "default_test_ratio")]
        test_ratio: f64,
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

impl Default for Holdout {
    fn default() -> Self {
        Holdout::Chronological {
            test_ratio: default_test_ratio(),
        }
    }
}

impl Holdout {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        match self {
            Holdout::Chronological { test_ratio } | Holdout::Random { test_ratio, .. } => {
                if !(*test_ratio > 0.0 && *test_ratio < 1.0) {
                    return Err(InflationError::InvalidParameter(format!(
                        "test_ratio must be between 0 and 1, got {}",
                        test_ratio
                    )));
                }
            }
            Holdout::LastRows { rows } => {
                if *rows == 0 {
                    return Err(InflationError::InvalidParameter(
                        "rows must be greater than zero".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Whether training rows can come from after evaluation rows
    pub fn is_chronological(&self) -> bool {
        !matches!(self, Holdout::Random { .. })
    }

    /// Split `n` rows into `(train, test)` index lists.
    ///
    /// Both lists are in ascending row order.
    pub fn split(&self, n: usize) -> Result<(Vec<usize>, Vec<usize>)> {
        self.validate()?;
        let test_size = match self {
            Holdout::Chronological { test_ratio } | Holdout::Random { test_ratio, .. } => {
                (n as f64 * test_ratio).round() as usize
            }
            Holdout::LastRows { rows } => *rows,
        };
        if test_size == 0 || test_size >= n {
            return Err(InflationError::Validation(format!(
                "Cannot hold out {} of {} rows: both splits need at least one row",
                test_size, n
            )));
        }

        match self {
            Holdout::Random { seed, .. } => {
                let mut indices: Vec<usize> = (0..n).collect();
                indices.shuffle(&mut ChaCha8Rng::seed_from_u64(*seed));
                let mut test = indices.split_off(n - test_size);
                indices.sort_unstable();
                test.sort_unstable();
                Ok((indices, test))
            }
            _ => {
                let train_size = n - test_size;
                Ok(((0..train_size).collect(), (train_size..n).collect()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_split() {
        let (train, test) = Holdout::default().split(120).unwrap();
        assert_eq!(train.len(), 96);
        assert_eq!(test.len(), 24);
        assert_eq!(train.last(), Some(&95));
        assert_eq!(test.first(), Some(&96));
    }

    #[test]
    fn test_last_rows_split() {
        let (train, test) = Holdout::LastRows { rows: 5 }.split(12).unwrap();
        assert_eq!(train, (0..7).collect::<Vec<_>>());
        assert_eq!(test, (7..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_split_is_seeded() {
        let holdout = Holdout::Random {
            test_ratio: 0.25,
            seed: 3,
        };
        let a = holdout.split(40).unwrap();
        let b = holdout.split(40).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.1.len(), 10);
        assert!(!holdout.is_chronological());
    }

    #[test]
    fn test_degenerate_split() {
        assert!(Holdout::default().split(1).is_err());
        assert!(Holdout::LastRows { rows: 10 }.split(10).is_err());
        assert!(Holdout::Chronological { test_ratio: 0.0 }.validate().is_err());
    }
}
