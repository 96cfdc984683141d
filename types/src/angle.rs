//! One coordinate in the geocaching notation: degrees, minutes and thousandths of a minute

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::utils::{div_mod, zero_pad};

use self::consts::{MINUTES_IN_DEGREE, SUB_MINUTES_IN_DEGREE};

mod consts;
mod direction;
mod errors;

pub use consts::SUB_MINUTES_IN_MINUTE;
pub use direction::{Axis, Direction};
pub use errors::{OutOfRange, ParseAngleError, ParseDirectionError};

lazy_static! {
    static ref RE_ANGLE: Regex =
        Regex::new(r"^([NSEW])(\d{1,3}) (\d{2})\.(\d{3})$").expect("Angle regex is valid");
}

/// Latitude or longitude as written on geocaching listings, e.g. `S41 16.814`.
///
/// The smallest representable difference is one thousandth of an arc minute
/// (about 1.85 m along a meridian). All arithmetic on the angle is done on integers,
/// so stepping back and forth never accumulates an error.
///
/// Two angles are equal when their canonical notations are equal.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Angle {
    direction: Direction,
    // signed only to represent stepping over the equator or the prime meridian
    degrees: i32,
    minutes: u8,
    sub_minutes: u16,
}

impl Angle {
    /// Construct an angle from its parts.
    ///
    /// # Errors
    /// The minutes should be less than 60 and the thousandths of a minute less than 1000.
    pub fn new(
        direction: Direction,
        degrees: u16,
        minutes: u8,
        sub_minutes: u16,
    ) -> Result<Self, OutOfRange> {
        if minutes >= MINUTES_IN_DEGREE {
            return Err(OutOfRange::ArcMinutes);
        }
        if sub_minutes >= SUB_MINUTES_IN_MINUTE {
            return Err(OutOfRange::SubMinutes);
        }

        Ok(Self {
            direction,
            degrees: i32::from(degrees),
            minutes,
            sub_minutes,
        })
    }

    /// Convert the decimal degrees into the angle along the given axis.
    ///
    /// The sign selects the direction (zero goes to South or West).
    /// The magnitude is rounded to the nearest thousandth of a minute,
    /// halves away from zero (see [`f64::round`]). A value rounding up to
    /// a full minute carries over into the minutes and degrees.
    pub fn from_decimal(value: f64, axis: Axis) -> Self {
        let direction = axis.direction_for(value);

        // float to int conversion saturates, so any input gives some angle
        let total = (value.abs() * SUB_MINUTES_IN_DEGREE as f64).round() as u64;
        let (degrees, rest) = div_mod(total, SUB_MINUTES_IN_DEGREE);
        let (minutes, sub_minutes) = div_mod(rest, u64::from(SUB_MINUTES_IN_MINUTE));

        Self {
            direction,
            degrees: degrees.try_into().unwrap_or(i32::MAX),
            minutes: minutes.try_into().expect("Less than 60 minutes"),
            sub_minutes: sub_minutes.try_into().expect("Less than 1000 sub-minutes"),
        }
    }

    /// Signed decimal degrees (negative for South and West)
    pub fn to_decimal(self) -> f64 {
        let magnitude = f64::from(self.degrees)
            + f64::from(self.minutes) / f64::from(MINUTES_IN_DEGREE)
            + f64::from(self.sub_minutes) / SUB_MINUTES_IN_DEGREE as f64;

        if self.direction.is_positive() {
            magnitude
        } else {
            -magnitude
        }
    }

    /// The hemisphere
    pub const fn direction(self) -> Direction {
        self.direction
    }

    /// Latitude or longitude
    pub const fn axis(self) -> Axis {
        self.direction.axis()
    }

    /// Whole degrees.
    ///
    /// Only negative after stepping across zero degrees, see [`Angle::previous`].
    pub const fn degrees(self) -> i32 {
        self.degrees
    }

    /// Whole arc minutes (0..60)
    pub const fn minutes(self) -> u8 {
        self.minutes
    }

    /// Thousandths of an arc minute (0..1000)
    pub const fn sub_minutes(self) -> u16 {
        self.sub_minutes
    }

    /// The angle one thousandth of a minute bigger by magnitude
    #[must_use]
    pub fn step_increment(self) -> Self {
        let Self {
            direction,
            mut degrees,
            mut minutes,
            mut sub_minutes,
        } = self;

        sub_minutes += 1;
        if sub_minutes == SUB_MINUTES_IN_MINUTE {
            sub_minutes = 0;
            minutes += 1;
            if minutes == MINUTES_IN_DEGREE {
                minutes = 0;
                degrees += 1;
            }
        }

        Self {
            direction,
            degrees,
            minutes,
            sub_minutes,
        }
    }

    /// The angle one thousandth of a minute smaller by magnitude
    #[must_use]
    pub fn step_decrement(self) -> Self {
        let Self {
            direction,
            mut degrees,
            mut minutes,
            mut sub_minutes,
        } = self;

        if sub_minutes == 0 {
            sub_minutes = SUB_MINUTES_IN_MINUTE - 1;
            if minutes == 0 {
                minutes = MINUTES_IN_DEGREE - 1;
                degrees -= 1;
            } else {
                minutes -= 1;
            }
        } else {
            sub_minutes -= 1;
        }

        Self {
            direction,
            degrees,
            minutes,
            sub_minutes,
        }
    }

    /// The neighbor further north (for latitude) or further east (for longitude).
    ///
    /// The direction is never changed: stepping across the equator,
    /// the prime meridian or the antimeridian gives a wrong position
    /// (the degrees go negative or beyond 90/180).
    #[must_use]
    pub fn next(self) -> Self {
        if self.direction.is_positive() {
            self.step_increment()
        } else {
            self.step_decrement()
        }
    }

    /// The neighbor further south (for latitude) or further west (for longitude).
    ///
    /// Has the same limitation near zero degrees as the [`Angle::next`].
    #[must_use]
    pub fn previous(self) -> Self {
        if self.direction.is_positive() {
            self.step_decrement()
        } else {
            self.step_increment()
        }
    }

    /// Parse the notation like `N52 01.234` or `W004 56.789`.
    ///
    /// # Errors
    /// The string should match `<N|S|E|W><1-3 digits> <2 digits>.<3 digits>`
    /// with the minutes less than 60.
    pub fn parse(s: &str) -> Result<Self, ParseAngleError> {
        let caps = RE_ANGLE
            .captures(s)
            .ok_or_else(|| ParseAngleError::Format(s.to_string()))?;

        let letter = caps[1].chars().next().expect("Regex matched one letter");
        let direction = Direction::try_from(letter)?;
        let degrees = caps[2].parse()?;
        let minutes = caps[3].parse()?;
        let sub_minutes = caps[4].parse()?;

        Ok(Self::new(direction, degrees, minutes, sub_minutes)?)
    }

    /// Make sure the angle measures the given axis
    pub(crate) fn on_axis(self, axis: Axis) -> Result<Self, OutOfRange> {
        if self.axis() == axis {
            Ok(self)
        } else {
            Err(OutOfRange::Axis(axis))
        }
    }
}

impl FromStr for Angle {
    type Err = ParseAngleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:02}.{:03}",
            self.direction,
            zero_pad(i64::from(self.degrees), self.axis().degree_width()),
            self.minutes,
            self.sub_minutes
        )
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Angle {}

impl Hash for Angle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle(s: &str) -> Angle {
        s.parse().unwrap()
    }

    #[test]
    fn parse_latitude() {
        let a = angle("S41 16.814");
        assert_eq!(a.direction(), Direction::South);
        assert_eq!(a.axis(), Axis::Latitude);
        assert_eq!(a.degrees(), 41);
        assert_eq!(a.minutes(), 16);
        assert_eq!(a.sub_minutes(), 814);
    }

    #[test]
    fn parse_longitude() {
        let a = angle("E173 14.980");
        assert_eq!(a.direction(), Direction::East);
        assert_eq!(a.degrees(), 173);
        assert_eq!(a.minutes(), 14);
        assert_eq!(a.sub_minutes(), 980);
    }

    #[test]
    fn render_pads_by_axis() {
        assert_eq!(angle("N1 02.003").to_string(), "N01 02.003");
        assert_eq!(angle("E1 02.003").to_string(), "E001 02.003");
        assert_eq!(angle("W45 00.000").to_string(), "W045 00.000");
    }

    #[test]
    fn parse_failures() {
        for bad in [
            "",
            "41 16.814",
            "X41 16.814",
            "S41 16.81",
            "S41 6.814",
            "S4141 16.814",
            "S41  16.814",
            "S41 16,814",
            " S41 16.814",
            "S41 16.814 ",
        ] {
            assert!(
                matches!(Angle::parse(bad), Err(ParseAngleError::Format(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn parse_minutes_out_of_range() {
        assert_eq!(
            Angle::parse("N41 60.000"),
            Err(ParseAngleError::Range(OutOfRange::ArcMinutes))
        );
    }

    #[test]
    fn new_validates_parts() {
        assert_eq!(
            Angle::new(Direction::North, 1, 60, 0),
            Err(OutOfRange::ArcMinutes)
        );
        assert_eq!(
            Angle::new(Direction::North, 1, 0, 1000),
            Err(OutOfRange::SubMinutes)
        );
        assert!(Angle::new(Direction::West, 179, 59, 999).is_ok());
    }

    #[test]
    fn from_decimal_southern() {
        let a = Angle::from_decimal(-41.280_233, Axis::Latitude);
        assert_eq!(a.to_string(), "S41 16.814");
    }

    #[test]
    fn from_decimal_eastern() {
        let a = Angle::from_decimal(173.249_667, Axis::Longitude);
        assert_eq!(a.to_string(), "E173 14.980");
    }

    #[test]
    fn from_decimal_zero_is_south_or_west() {
        assert_eq!(
            Angle::from_decimal(0.0, Axis::Latitude).to_string(),
            "S00 00.000"
        );
        assert_eq!(
            Angle::from_decimal(0.0, Axis::Longitude).to_string(),
            "W000 00.000"
        );
    }

    #[test]
    fn from_decimal_rounding_carries_into_degrees() {
        // 0.9999999 deg is 59.999994 minutes, rounds to a whole degree
        let a = Angle::from_decimal(12.999_999_9, Axis::Latitude);
        assert_eq!(a.to_string(), "N13 00.000");
    }

    #[test]
    fn to_decimal_sign() {
        let north = angle("N10 30.000");
        let south = angle("S10 30.000");
        assert!((north.to_decimal() - 10.5).abs() < 1e-12);
        assert!((south.to_decimal() + 10.5).abs() < 1e-12);
    }

    #[test]
    fn decimal_round_trip_within_quantization() {
        let half_step = 0.5 / SUB_MINUTES_IN_DEGREE as f64;
        for value in [-89.999, -41.280_233, -0.000_01, 0.5, 13.371_337, 52.1] {
            let a = Angle::from_decimal(value, Axis::Latitude);
            let back = angle(&a.to_string()).to_decimal();
            assert!((back - value).abs() <= half_step + 1e-12, "{value} -> {back}");
        }
        for value in [-179.999_9, -73.985_6, 2.294_5, 173.249_667] {
            let a = Angle::from_decimal(value, Axis::Longitude);
            let back = angle(&a.to_string()).to_decimal();
            assert!((back - value).abs() <= half_step + 1e-12, "{value} -> {back}");
        }
    }

    #[test]
    fn increment_carries() {
        assert_eq!(angle("N41 16.814").step_increment(), angle("N41 16.815"));
        assert_eq!(angle("N41 16.999").step_increment(), angle("N41 17.000"));
        assert_eq!(angle("N41 59.999").step_increment(), angle("N42 00.000"));
    }

    #[test]
    fn decrement_borrows() {
        assert_eq!(angle("E173 14.980").step_decrement(), angle("E173 14.979"));
        assert_eq!(angle("E173 14.000").step_decrement(), angle("E173 13.999"));
        assert_eq!(angle("E173 00.000").step_decrement(), angle("E172 59.999"));
    }

    #[test]
    fn increment_then_decrement_is_identity() {
        for s in [
            "N00 00.000",
            "S41 16.814",
            "N41 16.999",
            "S12 59.999",
            "E173 14.980",
            "W000 59.999",
            "E179 59.999",
        ] {
            let a = angle(s);
            assert_eq!(a.step_increment().step_decrement(), a);
            assert_eq!(a.step_increment().step_decrement().to_string(), s);
        }
    }

    #[test]
    fn next_is_north_or_east() {
        assert_eq!(angle("N10 00.000").next(), angle("N10 00.001"));
        assert_eq!(angle("S10 00.000").next(), angle("S09 59.999"));
        assert_eq!(angle("E010 00.000").next(), angle("E010 00.001"));
        assert_eq!(angle("W010 00.000").next(), angle("W009 59.999"));
    }

    #[test]
    fn previous_is_south_or_west() {
        assert_eq!(angle("N10 00.000").previous(), angle("N09 59.999"));
        assert_eq!(angle("S10 00.000").previous(), angle("S10 00.001"));
        assert_eq!(angle("E010 00.000").previous(), angle("E009 59.999"));
        assert_eq!(angle("W010 00.000").previous(), angle("W010 00.001"));
    }

    #[test]
    fn crossing_the_equator_keeps_direction() {
        let south_of_equator = angle("N00 00.000").previous();
        assert_eq!(south_of_equator.direction(), Direction::North);
        assert_eq!(south_of_equator.degrees(), -1);
        assert_eq!(south_of_equator.to_string(), "N-1 59.999");

        let west_of_greenwich = angle("E000 00.000").previous();
        assert_eq!(west_of_greenwich.to_string(), "E-01 59.999");
    }

    #[test]
    fn equality_by_notation() {
        let parsed = angle("S41 16.814");
        let built = Angle::new(Direction::South, 41, 16, 814).unwrap();
        let from_decimal = Angle::from_decimal(parsed.to_decimal(), Axis::Latitude);
        assert_eq!(parsed, built);
        assert_eq!(parsed, from_decimal);
        assert_ne!(parsed, angle("N41 16.814"));

        let mut set = std::collections::HashSet::new();
        assert!(set.insert(parsed));
        assert!(!set.insert(built));
    }
}
