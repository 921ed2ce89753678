use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::shared::error::DatasetError;

/// Facing direction recorded in a walkthrough file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::NorthEast => "NorthEast",
            Direction::East => "East",
            Direction::SouthEast => "SouthEast",
            Direction::South => "South",
            Direction::SouthWest => "SouthWest",
            Direction::West => "West",
            Direction::NorthWest => "NorthWest",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "North" => Some(Direction::North),
            "NorthEast" => Some(Direction::NorthEast),
            "East" => Some(Direction::East),
            "SouthEast" => Some(Direction::SouthEast),
            "South" => Some(Direction::South),
            "SouthWest" => Some(Direction::SouthWest),
            "West" => Some(Direction::West),
            "NorthWest" => Some(Direction::NorthWest),
            _ => None,
        }
    }
}

/// A physical location plus facing direction: the unit frames are balanced over.
///
/// Parsed from file stems shaped `<building><hall>_<direction>[suffix]`, e.g.
/// `B6H3_NorthRight2` → `B6H3_North`. The trailing suffix (trial or sample
/// marker) is discarded. After a direction the suffix must not start with a
/// lowercase letter, so `B6H3_Northeast` is rejected instead of silently
/// grouped under `North`. Without a direction the suffix must be empty or
/// start with a digit or a separator.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    building: String,
    hall: String,
    direction: Option<Direction>,
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(B\d+)(H\d+)_(?:(NorthEast|NorthWest|SouthEast|SouthWest|North|South|East|West)(?:[^a-z].*)?|(?:[0-9_\-. ].*)?)$",
        )
        .expect("group key pattern is valid")
    })
}

impl GroupKey {
    /// Parses a file stem (no extension).
    pub fn parse(stem: &str) -> Result<Self, DatasetError> {
        let caps = pattern().captures(stem).ok_or_else(|| DatasetError::Format {
            name: stem.to_string(),
        })?;

        Ok(Self {
            building: caps[1].to_string(),
            hall: caps[2].to_string(),
            direction: caps.get(3).and_then(|m| Direction::from_token(m.as_str())),
        })
    }

    /// Parses a video file name, ignoring its extension.
    pub fn from_file_name(path: &Path) -> Result<Self, DatasetError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DatasetError::Format {
                name: path.display().to_string(),
            })?;
        Self::parse(stem).map_err(|_| DatasetError::Format {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| stem.to_string()),
        })
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn hall(&self) -> &str {
        &self.hall
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}_{}",
            self.building,
            self.hall,
            self.direction.map(|d| d.as_str()).unwrap_or("")
        )
    }
}
