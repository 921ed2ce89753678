use std::fmt;

use crate::shared::constants::{
    DEFAULT_TEST_FRACTION, DEFAULT_TRAIN_FRACTION, DEFAULT_VALIDATION_FRACTION,
    SPLIT_SUM_TOLERANCE,
};
use crate::shared::error::DatasetError;

/// Dataset partition a produced frame lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// Directory name under the destination root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "validation",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Train/validation/test fractions, each in `[0, 1]` and summing to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitFractions {
    train: f64,
    validation: f64,
    test: f64,
}

impl SplitFractions {
    pub fn new(train: f64, validation: f64, test: f64) -> Result<Self, DatasetError> {
        let sum = train + validation + test;
        let in_range = [train, validation, test]
            .iter()
            .all(|f| (0.0..=1.0).contains(f));
        if !in_range || (sum - 1.0).abs() > SPLIT_SUM_TOLERANCE {
            return Err(DatasetError::InvalidSplitFractions {
                train,
                validation,
                test,
                sum,
            });
        }
        Ok(Self {
            train,
            validation,
            test,
        })
    }

    pub fn train(&self) -> f64 {
        self.train
    }

    pub fn validation(&self) -> f64 {
        self.validation
    }

    pub fn test(&self) -> f64 {
        self.test
    }

    /// Split owning `position` in `[0, 1)` when the unit interval is cut
    /// into consecutive train, validation and test ranges.
    pub fn partition(&self, position: f64) -> Split {
        if position < self.train {
            Split::Train
        } else if position < self.train + self.validation {
            Split::Validation
        } else {
            Split::Test
        }
    }

    /// Exclusive ends of the train and validation runs for `total` frames:
    /// the first sequence numbers whose position `sequence / total` reaches
    /// `train` and `train + validation`.
    ///
    /// Products within [`SPLIT_SUM_TOLERANCE`] of a whole frame count as
    /// that frame.
    pub fn cut_points(&self, total: usize) -> (usize, usize) {
        let train_end = run_end(self.train, total);
        let validation_end = run_end(self.train + self.validation, total).max(train_end);
        (train_end, validation_end)
    }
}

fn run_end(fraction: f64, total: usize) -> usize {
    let end = (fraction * total as f64 - SPLIT_SUM_TOLERANCE).ceil().max(0.0);
    (end as usize).min(total)
}

impl Default for SplitFractions {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN_FRACTION,
            validation: DEFAULT_VALIDATION_FRACTION,
            test: DEFAULT_TEST_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_dir_names() {
        let names: Vec<&str> = Split::ALL.iter().map(|s| s.dir_name()).collect();
        assert_eq!(names, vec!["train", "validation", "test"]);
        assert_eq!(Split::Validation.to_string(), "validation");
    }

    #[test]
    fn test_default_fractions() {
        let fractions = SplitFractions::default();
        assert_relative_eq!(fractions.train(), 0.7);
        assert_relative_eq!(fractions.validation(), 0.15);
        assert_relative_eq!(fractions.test(), 0.15);
    }

    #[rstest]
    #[case::default(0.7, 0.15, 0.15)]
    #[case::no_test(0.8, 0.2, 0.0)]
    #[case::all_train(1.0, 0.0, 0.0)]
    #[case::float_noise(0.6, 0.3, 0.1)]
    fn test_valid_fractions(#[case] train: f64, #[case] validation: f64, #[case] test: f64) {
        assert!(SplitFractions::new(train, validation, test).is_ok());
    }

    #[rstest]
    #[case::sum_below_one(0.5, 0.2, 0.2)]
    #[case::sum_above_one(0.8, 0.2, 0.2)]
    #[case::negative(1.2, -0.1, -0.1)]
    #[case::nan(f64::NAN, 0.5, 0.5)]
    fn test_invalid_fractions(#[case] train: f64, #[case] validation: f64, #[case] test: f64) {
        assert!(matches!(
            SplitFractions::new(train, validation, test),
            Err(DatasetError::InvalidSplitFractions { .. })
        ));
    }

    #[test]
    fn test_invalid_fractions_report_actual_sum() {
        let err = SplitFractions::new(0.5, 0.2, 0.2).unwrap_err();
        match err {
            DatasetError::InvalidSplitFractions { sum, .. } => assert_relative_eq!(sum, 0.9),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_partition_boundaries() {
        let fractions = SplitFractions::new(0.7, 0.15, 0.15).unwrap();
        assert_eq!(fractions.partition(0.0), Split::Train);
        assert_eq!(fractions.partition(0.69), Split::Train);
        assert_eq!(fractions.partition(0.7), Split::Validation);
        assert_eq!(fractions.partition(0.84), Split::Validation);
        assert_eq!(fractions.partition(0.851), Split::Test);
        assert_eq!(fractions.partition(0.999), Split::Test);
    }

    #[rstest]
    #[case::default_hundred(0.7, 0.15, 0.15, 100, (70, 85))]
    #[case::inexact_sum(0.1, 0.2, 0.7, 10, (1, 3))]
    #[case::fractional_products(0.6, 0.2, 0.2, 3, (2, 3))]
    #[case::odd_total(0.7, 0.15, 0.15, 37, (26, 32))]
    #[case::no_validation(0.5, 0.0, 0.5, 10, (5, 5))]
    #[case::all_test(0.0, 0.0, 1.0, 7, (0, 0))]
    #[case::all_train(1.0, 0.0, 0.0, 7, (7, 7))]
    #[case::empty_group(0.7, 0.15, 0.15, 0, (0, 0))]
    fn test_cut_points(
        #[case] train: f64,
        #[case] validation: f64,
        #[case] test: f64,
        #[case] total: usize,
        #[case] expected: (usize, usize),
    ) {
        let fractions = SplitFractions::new(train, validation, test).unwrap();
        assert_eq!(fractions.cut_points(total), expected);
    }
}
