use std::{error::Error, fmt};

use crate::{
    angle::{OutOfRange, ParseAngleError},
    enum_trivial_from_impl,
};

pub use self::point::Point;

mod point;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The text is not a geocaching point like `S41 16.814 E173 14.980`
pub enum ParsePointError {
    /// The whole string does not match the latitude-longitude pattern
    Format(String),
    /// One of the angles is malformed
    Angle(ParseAngleError),
    /// The angle does not belong to its axis
    Range(OutOfRange),
}

enum_trivial_from_impl!(ParseAngleError => ParsePointError:Angle);
enum_trivial_from_impl!(OutOfRange => ParsePointError:Range);

impl fmt::Display for ParsePointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate parsing failed: ")?;
        match self {
            Self::Format(failed) => write!(
                f,
                "{failed:?} does not match the `N00 00.000 E000 00.000` notation"
            ),
            Self::Angle(inner) => write!(f, "{inner}"),
            Self::Range(inner) => write!(f, "{inner}"),
        }
    }
}

impl Error for ParsePointError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(_) => None,
            Self::Angle(inner) => Some(inner),
            Self::Range(inner) => Some(inner),
        }
    }
}
