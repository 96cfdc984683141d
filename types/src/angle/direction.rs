use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    consts::{LAT_DEGREE_WIDTH, LON_DEGREE_WIDTH},
    errors::ParseDirectionError,
};

/// Which of the two coordinates an angle measures
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// North-south position
    Latitude,
    /// East-west position
    Longitude,
}

impl Axis {
    /// The direction of the positive decimal values
    pub const fn positive(self) -> Direction {
        match self {
            Self::Latitude => Direction::North,
            Self::Longitude => Direction::East,
        }
    }

    /// The direction of the negative (and zero) decimal values
    pub const fn negative(self) -> Direction {
        match self {
            Self::Latitude => Direction::South,
            Self::Longitude => Direction::West,
        }
    }

    /// Choose the direction by the sign of the decimal degrees.
    ///
    /// Zero is treated as negative (South or West).
    pub fn direction_for(self, value: f64) -> Direction {
        if value > 0.0 {
            self.positive()
        } else {
            self.negative()
        }
    }

    /// How many digits the degrees occupy in the canonical notation
    pub(crate) const fn degree_width(self) -> usize {
        match self {
            Self::Latitude => LAT_DEGREE_WIDTH,
            Self::Longitude => LON_DEGREE_WIDTH,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        };
        write!(f, "{name}")
    }
}

/// Hemisphere of a coordinate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Northern latitude
    North,
    /// Southern latitude
    South,
    /// Eastern longitude
    East,
    /// Western longitude
    West,
}

impl Direction {
    /// The axis the direction is measured along
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }

    /// Do the decimal degrees grow when moving away from zero in this direction?
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::North | Self::East)
    }

    /// The single letter used in the notation
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = ParseDirectionError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'N' => Ok(Self::North),
            'S' => Ok(Self::South),
            'E' => Ok(Self::East),
            'W' => Ok(Self::West),
            _ => Err(ParseDirectionError {
                failed: c.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
