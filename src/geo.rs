use crate::error::ConversionError;
use lazy_static::lazy_static;
use regex::Regex;

const EARTH_RADIUS_NM: f64 = 3440.065;
const MILLIS_PER_DEGREE: f64 = 3_600_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon(f64, f64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon(lat, lon)
    }

    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }

    //Ex: S031.23.11.000 E151.24.44.640
    pub fn from_sct(lat: &str, lon: &str) -> Result<Self, ConversionError> {
        Ok(LatLon(parse_latitude(lat)?, parse_longitude(lon)?))
    }

    /// Signed decimal degrees, as found in traffic feeds.
    pub fn from_decimal(lat: &str, lon: &str) -> Result<Self, ConversionError> {
        fn degrees(raw: &str, axis: Axis) -> Result<f64, ConversionError> {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.abs() <= axis.limit())
                .ok_or_else(|| ConversionError::Coordinate {
                    token: raw.to_owned(),
                })
        }

        Ok(LatLon(
            degrees(lat, Axis::Latitude)?,
            degrees(lon, Axis::Longitude)?,
        ))
    }

    /// Great circle distance in nautical miles.
    pub fn distance_nm(self, other: LatLon) -> f64 {
        let (lat1, lat2) = (self.0.to_radians(), other.0.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.1 - self.1).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
    }

    pub fn to_sct(self) -> String {
        format!("{} {}", format_latitude(self.0), format_longitude(self.1))
    }
}

pub fn parse_latitude(token: &str) -> Result<f64, ConversionError> {
    parse_dms(token, Axis::Latitude)
}

pub fn parse_longitude(token: &str) -> Result<f64, ConversionError> {
    parse_dms(token, Axis::Longitude)
}

fn parse_dms(token: &str, axis: Axis) -> Result<f64, ConversionError> {
    lazy_static! {
        static ref DMS_REGEX: Regex =
            Regex::new(r"^([NSEWnsew])(\d{1,3})\.(\d{1,2})\.(\d{1,2}(?:\.\d*)?)$").unwrap();
    }

    let fail = || ConversionError::Coordinate {
        token: token.to_owned(),
    };

    let cap = DMS_REGEX.captures(token.trim()).ok_or_else(fail)?;
    let hemisphere = cap[1].to_ascii_uppercase();
    let negative = match (axis, &*hemisphere) {
        (Axis::Latitude, "N") | (Axis::Longitude, "E") => false,
        (Axis::Latitude, "S") | (Axis::Longitude, "W") => true,
        _ => return Err(fail()),
    };

    let d: f64 = cap[2].parse().map_err(|_| fail())?;
    let m: f64 = cap[3].parse().map_err(|_| fail())?;
    let s: f64 = cap[4].parse().map_err(|_| fail())?;
    if m >= 60.0 || s >= 60.0 {
        return Err(fail());
    }

    let dd = d + m / 60.0 + s / 3600.0;
    if dd > axis.limit() {
        return Err(fail());
    }

    Ok(if negative { -dd } else { dd })
}

pub fn format_latitude(dd: f64) -> String {
    format_dms(dd, if dd.is_sign_negative() { 'S' } else { 'N' })
}

pub fn format_longitude(dd: f64) -> String {
    format_dms(dd, if dd.is_sign_negative() { 'W' } else { 'E' })
}

fn format_dms(dd: f64, hemisphere: char) -> String {
    // Work in whole milliseconds of arc so rounding never yields 60 seconds.
    let total = (dd.abs() * MILLIS_PER_DEGREE).round() as u64;
    let d = total / 3_600_000;
    let m = (total / 60_000) % 60;
    let s = (total / 1000) % 60;
    let ms = total % 1000;
    format!("{}{:03}.{:02}.{:02}.{:03}", hemisphere, d, m, s, ms)
}
