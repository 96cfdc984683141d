pub(crate) const MINUTES_IN_DEGREE: u8 = 60;
/// One unit step is one thousandth of an arc minute
pub const SUB_MINUTES_IN_MINUTE: u16 = 1000;

pub(crate) const SUB_MINUTES_IN_DEGREE: u64 =
    MINUTES_IN_DEGREE as u64 * SUB_MINUTES_IN_MINUTE as u64;

pub(crate) const LAT_DEGREE_WIDTH: usize = 2;
pub(crate) const LON_DEGREE_WIDTH: usize = 3;
