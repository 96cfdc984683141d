use std::{fmt, str::FromStr};

use geo::{Distance, Geodesic};
use lazy_static::lazy_static;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::angle::{Angle, Axis, OutOfRange};

use super::ParsePointError;

lazy_static! {
    static ref RE_POINT: Regex =
        Regex::new(r"^([NS]\d{1,2} \d{2}\.\d{3}) *([EW]\d{1,3} \d{2}\.\d{3})$")
            .expect("Point regex is valid");
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// The point on the surface of the Earth, represented as the pair (latitude, longitude)
/// in the geocaching notation: `S41 16.814 E173 14.980`.
pub struct Point {
    lat: Angle,
    lon: Angle,
}

impl Point {
    /// Construct a point from the given latitude and longitude.
    ///
    /// # Errors
    /// The latitude should be North or South and the longitude East or West.
    pub fn new(lat: Angle, lon: Angle) -> Result<Self, OutOfRange> {
        Ok(Self {
            lat: lat.on_axis(Axis::Latitude)?,
            lon: lon.on_axis(Axis::Longitude)?,
        })
    }

    /// Construct a point from signed decimal degrees,
    /// rounding both to the nearest thousandth of a minute.
    pub fn from_decimal(lat: f64, lon: f64) -> Self {
        Self {
            lat: Angle::from_decimal(lat, Axis::Latitude),
            lon: Angle::from_decimal(lon, Axis::Longitude),
        }
    }

    /// Signed decimal degrees as `(lat, lon)`
    pub fn to_decimal(&self) -> (f64, f64) {
        (self.lat.to_decimal(), self.lon.to_decimal())
    }

    /// North-south coordinate
    pub const fn lat(&self) -> Angle {
        self.lat
    }

    /// East-west coordinate
    pub const fn lon(&self) -> Angle {
        self.lon
    }

    /// Parse the notation like `S41 16.814 E173 14.980`.
    ///
    /// Any number of spaces (including none) may separate the latitude from the longitude.
    ///
    /// # Errors
    /// The string should match the notation and both angles should be valid.
    pub fn parse(s: &str) -> Result<Self, ParsePointError> {
        let caps = RE_POINT
            .captures(s)
            .ok_or_else(|| ParsePointError::Format(s.to_string()))?;

        let lat: Angle = caps[1].parse()?;
        let lon: Angle = caps[2].parse()?;
        Ok(Self::new(lat, lon)?)
    }

    /// The notation without spaces and dots: `S4116814E17314980`
    pub fn to_compact(&self) -> String {
        self.to_string().replace(['.', ' '], "")
    }

    /// Distance to the other point on the WGS84 ellipsoid, in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        Geodesic.distance(self.to_geo(), other.to_geo())
    }

    fn to_geo(self) -> geo::Point<f64> {
        let (lat, lon) = self.to_decimal();
        geo::Point::new(lon, lat)
    }

    /// One step (a thousandth of a minute) to the north.
    ///
    /// Wrong when crossing the equator, see [`Angle::next`].
    #[must_use]
    pub fn neighbor_north(&self) -> Self {
        Self {
            lat: self.lat.next(),
            lon: self.lon,
        }
    }

    /// One step (a thousandth of a minute) to the south.
    ///
    /// Wrong when crossing the equator, see [`Angle::previous`].
    #[must_use]
    pub fn neighbor_south(&self) -> Self {
        Self {
            lat: self.lat.previous(),
            lon: self.lon,
        }
    }

    /// One step (a thousandth of a minute) to the east.
    ///
    /// Wrong when crossing the prime meridian or the antimeridian.
    #[must_use]
    pub fn neighbor_east(&self) -> Self {
        Self {
            lat: self.lat,
            lon: self.lon.next(),
        }
    }

    /// One step (a thousandth of a minute) to the west.
    ///
    /// Wrong when crossing the prime meridian or the antimeridian.
    #[must_use]
    pub fn neighbor_west(&self) -> Self {
        Self {
            lat: self.lat,
            lon: self.lon.previous(),
        }
    }
}

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lat, self.lon)
    }
}
