use std::path::PathBuf;

use thiserror::Error;

/// Every failure a dataset build can hit. All of them abort the run.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("malformed video name '{name}': expected <building><hall>_<direction>[suffix], e.g. B6H3_North1.mp4")]
    Format { name: String },

    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("split fractions must each be within [0, 1] and sum to 1, got {train} + {validation} + {test} = {sum}")]
    InvalidSplitFractions {
        train: f64,
        validation: f64,
        test: f64,
        sum: f64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to open video {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("failed to decode frame {frame} of {path}: {source}")]
    Decode {
        path: PathBuf,
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("refusing to overwrite existing file {0}")]
    WriteCollision(PathBuf),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_names_file() {
        let err = DatasetError::Format {
            name: "holiday.mp4".to_string(),
        };
        assert!(err.to_string().contains("holiday.mp4"));
    }

    #[test]
    fn test_split_error_cites_sum() {
        let err = DatasetError::InvalidSplitFractions {
            train: 0.5,
            validation: 0.5,
            test: 0.5,
            sum: 1.5,
        };
        assert!(err.to_string().contains("= 1.5"));
    }

    #[test]
    fn test_decode_error_keeps_source() {
        use std::error::Error;

        let err = DatasetError::Decode {
            path: PathBuf::from("B1H1_North.mp4"),
            frame: 42,
            source: "truncated".into(),
        };
        assert!(err.to_string().contains("frame 42"));
        assert_eq!(err.source().unwrap().to_string(), "truncated");
    }
}
