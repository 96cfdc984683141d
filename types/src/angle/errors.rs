use std::{error::Error, fmt, num::ParseIntError};

use crate::enum_trivial_from_impl;

use super::Axis;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Some part of an angle does not fit into its range
pub enum OutOfRange {
    /// min >= 60
    ArcMinutes,
    /// thousandths of a minute >= 1000
    SubMinutes,
    /// the direction does not belong to the requested axis
    Axis(Axis),
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArcMinutes => write!(f, "Angle's arc minute value not in range [0..60)"),
            Self::SubMinutes => {
                write!(f, "Angle's thousandths of a minute value not in range [0..1000)")
            }
            Self::Axis(axis) => write!(f, "Direction does not belong to the {axis} axis"),
        }
    }
}

impl Error for OutOfRange {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Not one of the `N`, `S`, `E`, `W` letters
pub struct ParseDirectionError {
    pub(super) failed: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot parse Direction from {:?}", self.failed)
    }
}

impl Error for ParseDirectionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The text is not a geocaching angle like `S41 16.814` or `E173 14.980`
pub enum ParseAngleError {
    /// The whole string does not match the pattern
    Format(String),
    /// The leading letter is not a direction
    Direction(ParseDirectionError),
    /// The fields matched but one of them is out of its range
    Range(OutOfRange),
    // this variant is practically impossible due to regex digits limitations
    /// Some field is not a number
    Int(ParseIntError),
}

enum_trivial_from_impl!(OutOfRange => ParseAngleError:Range);
enum_trivial_from_impl!(ParseDirectionError => ParseAngleError:Direction);
enum_trivial_from_impl!(ParseIntError => ParseAngleError:Int);

impl fmt::Display for ParseAngleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot parse angle: ")?;
        match self {
            Self::Format(failed) => {
                write!(f, "{failed:?} does not match the `D(D) MM.mmm` notation")
            }
            Self::Direction(inner) => write!(f, "{inner}"),
            Self::Range(inner) => write!(f, "{inner}"),
            Self::Int(inner) => write!(f, "{inner}"),
        }
    }
}

impl Error for ParseAngleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(_) => None,
            Self::Direction(inner) => Some(inner),
            Self::Range(inner) => Some(inner),
            Self::Int(inner) => Some(inner),
        }
    }
}
