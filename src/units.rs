//! Frequencies, altitudes and the small numeric helpers shared by the parsers.

use crate::error::ConversionError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

const FEET_PER_METRE: f64 = 3.28084;

/// Radio frequency in kHz (VHF values are written in MHz with three decimals).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Frequency(u32);

impl Frequency {
    pub fn from_khz(khz: u32) -> Self {
        Frequency(khz)
    }

    pub fn khz(self) -> u32 {
        self.0
    }

    pub fn mhz(self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl FromStr for Frequency {
    type Err = ConversionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref FREQUENCY_REGEX: Regex = Regex::new(r"^(\d{1,6})(?:\.(\d{1,3}))?$").unwrap();
        }

        let fail = || ConversionError::Frequency {
            raw: raw.to_owned(),
        };
        let cap = FREQUENCY_REGEX.captures(raw.trim()).ok_or_else(fail)?;
        let whole: u32 = cap[1].parse().map_err(|_| fail())?;

        let khz = match cap.get(2) {
            Some(fraction) => {
                let digits = format!("{:0<3}", fraction.as_str());
                whole * 1000 + digits.parse::<u32>().map_err(|_| fail())?
            }
            None if whole >= 1000 => whole,
            None => whole * 1000,
        };
        Ok(Frequency(khz))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

/// Altitude in feet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Altitude(i32);

impl Altitude {
    pub fn from_feet(feet: i32) -> Self {
        Altitude(feet)
    }

    pub fn feet(self) -> i32 {
        self.0
    }

    /// Flight level, rounded down.
    pub fn flight_level(self) -> i32 {
        self.0 / 100
    }

    /// A missing value is reported as `null`.
    pub fn from_optional(raw: Option<&str>) -> Result<Self, ConversionError> {
        match raw {
            Some(raw) => raw.parse(),
            None => Err(ConversionError::Altitude {
                raw: "null".to_owned(),
            }),
        }
    }
}

impl FromStr for Altitude {
    type Err = ConversionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            // FL350, F350, A045, S1130
            static ref LEVEL_REGEX: Regex = Regex::new(r"^(FL|F|A|S)(\d{1,4})$").unwrap();
            // 35000, -50, 1500FT, 900M
            static ref PLAIN_REGEX: Regex = Regex::new(r"^(-?\d{1,6})\s*(FT|M)?$").unwrap();
        }

        let fail = || ConversionError::Altitude {
            raw: raw.to_owned(),
        };
        let upper = raw.trim().to_ascii_uppercase();

        let feet = if let Some(cap) = LEVEL_REGEX.captures(&upper) {
            let value: i32 = cap[2].parse().map_err(|_| fail())?;
            match &cap[1] {
                "S" if cap[2].len() == 4 => metres_to_feet(value * 10),
                "S" => return Err(fail()),
                _ if cap[2].len() > 3 => return Err(fail()),
                _ => value * 100,
            }
        } else if let Some(cap) = PLAIN_REGEX.captures(&upper) {
            let value: i32 = cap[1].parse().map_err(|_| fail())?;
            match cap.get(2).map(|m| m.as_str()) {
                Some("M") => metres_to_feet(value),
                _ => value,
            }
        } else {
            return Err(fail());
        };
        Ok(Altitude(feet))
    }
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn metres_to_feet(metres: i32) -> i32 {
    (f64::from(metres) * FEET_PER_METRE).round() as i32
}

/// Parses a plain number field, naming the field on failure.
pub fn number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ConversionError> {
    raw.trim().parse().map_err(|_| ConversionError::Number {
        field,
        raw: raw.to_owned(),
    })
}

/// Runway or aircraft heading in whole degrees, 0 to 360.
pub fn heading(raw: &str) -> Result<u16, ConversionError> {
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|h| *h <= 360)
        .ok_or_else(|| ConversionError::Heading {
            raw: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("118.700", 118_700)]
    #[case("121.5", 121_500)]
    #[case("000.000", 0)]
    #[case("379.000", 379_000)]
    #[case("118700", 118_700)]
    #[case("122", 122_000)]
    fn parses_frequencies(#[case] raw: &str, #[case] khz: u32) {
        assert_eq!(raw.parse::<Frequency>(), Ok(Frequency::from_khz(khz)));
    }

    #[rstest]
    #[case("")]
    #[case("118.7001")]
    #[case("118,700")]
    #[case("abc")]
    fn rejects_malformed_frequencies(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<Frequency>(),
            Err(ConversionError::Frequency {
                raw: raw.to_owned()
            })
        );
    }

    #[test]
    fn frequency_displays_in_mhz() {
        assert_eq!(Frequency::from_khz(118_050).to_string(), "118.050");
        assert!((Frequency::from_khz(118_050).mhz() - 118.05).abs() < 1e-9);
    }

    #[rstest]
    #[case("35000", 35_000)]
    #[case("FL350", 35_000)]
    #[case("f245", 24_500)]
    #[case("A045", 4_500)]
    #[case("1500ft", 1_500)]
    #[case("-50", -50)]
    #[case("900M", 2_953)]
    #[case("S1130", 37_073)]
    fn parses_altitudes(#[case] raw: &str, #[case] feet: i32) {
        assert_eq!(raw.parse::<Altitude>(), Ok(Altitude::from_feet(feet)));
    }

    #[rstest]
    #[case("")]
    #[case("FL")]
    #[case("FL3500")]
    #[case("S113")]
    #[case("VFR")]
    fn rejects_malformed_altitudes(#[case] raw: &str) {
        assert_eq!(
            raw.parse::<Altitude>(),
            Err(ConversionError::Altitude {
                raw: raw.to_owned()
            })
        );
    }

    #[test]
    fn missing_altitude_is_reported_as_null() {
        let err = Altitude::from_optional(None).unwrap_err();
        assert_eq!(err.to_string(), "invalid altitude 'null'");
    }

    #[test]
    fn headings_are_bounded() {
        assert_eq!(heading("070"), Ok(70));
        assert_eq!(heading("360"), Ok(360));
        assert!(heading("361").is_err());
        assert!(heading("-10").is_err());
    }
}
