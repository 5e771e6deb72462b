//! Traffic status feeds ("whazzup"): one connected client, server or setting
//! per line, discriminated by the first colon field.
//!
//! ```text
//! !CLIENTS
//! PILOT:QFA1:1234567:Jane Doe:-33.9461:151.1772:35000:480:270:2000:AUSTRALIA
//! ATC:SY_TWR:7654321:John Doe:120.500:TWR:3:-33.9461:151.1772:20:AUSTRALIA:Sydney Tower^§Information A
//! ```

use crate::error::{ConversionError, ParseError};
use crate::geo::LatLon;
use crate::result::ParseOutcome;
use crate::squawk::SquawkCode;
use crate::units::{Altitude, Frequency};
use derive_builder::Builder;
use std::fmt;
use std::str::FromStr;

mod parse;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrafficFeed {
    pub general: Vec<FeedSetting>,
    pub pilots: Vec<Pilot>,
    pub controllers: Vec<AirTrafficController>,
    pub notifications: Vec<FlightNotification>,
    pub servers: Vec<Server>,
    pub errors: Vec<ParseError>,
}

impl TrafficFeed {
    pub fn parse(text: &str) -> TrafficFeed {
        parse::parse(text)
    }

    pub fn pilot(&self, callsign: &str) -> Option<&Pilot> {
        self.pilots.iter().find(|p| p.callsign == callsign)
    }

    pub fn controller(&self, callsign: &str) -> Option<&AirTrafficController> {
        self.controllers.iter().find(|c| c.callsign == callsign)
    }

    /// Value of a general setting; keys compare case-insensitively.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.general
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
            .map(|s| s.value.as_str())
    }
}

impl ParseOutcome for TrafficFeed {
    fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record_count(&self) -> usize {
        self.general.len()
            + self.pilots.len()
            + self.controllers.len()
            + self.notifications.len()
            + self.servers.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlightRules {
    Ifr,
    Vfr,
    /// IFR first, changing to VFR.
    IfrThenVfr,
    /// VFR first, changing to IFR.
    VfrThenIfr,
}

impl FlightRules {
    pub fn from_letter(raw: &str) -> Option<FlightRules> {
        Some(match &*raw.to_ascii_uppercase() {
            "I" => FlightRules::Ifr,
            "V" => FlightRules::Vfr,
            "Y" => FlightRules::IfrThenVfr,
            "Z" => FlightRules::VfrThenIfr,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Facility {
    Observer,
    FlightService,
    Delivery,
    Ground,
    Tower,
    Approach,
    Centre,
}

impl FromStr for Facility {
    type Err = ConversionError;

    /// Numeric network codes 0 to 6, or the short names.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match &*raw.trim().to_ascii_uppercase() {
            "0" | "OBS" => Facility::Observer,
            "1" | "FSS" => Facility::FlightService,
            "2" | "DEL" => Facility::Delivery,
            "3" | "GND" => Facility::Ground,
            "4" | "TWR" => Facility::Tower,
            "5" | "APP" => Facility::Approach,
            "6" | "CTR" => Facility::Centre,
            _ => {
                return Err(ConversionError::Facility {
                    raw: raw.to_owned(),
                })
            }
        })
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Facility::Observer => "OBS",
            Facility::FlightService => "FSS",
            Facility::Delivery => "DEL",
            Facility::Ground => "GND",
            Facility::Tower => "TWR",
            Facility::Approach => "APP",
            Facility::Centre => "CTR",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into))]
pub struct FlightPlan {
    #[builder(default)]
    pub aircraft: String,
    #[builder(default)]
    pub true_airspeed: Option<u32>,
    pub departure: String,
    #[builder(default)]
    pub cruise_altitude: Option<Altitude>,
    pub destination: String,
    #[builder(default)]
    pub rules: Option<FlightRules>,
    /// `HHMM`, as filed.
    #[builder(default)]
    pub departure_time: String,
    #[builder(default)]
    pub enroute_time: String,
    #[builder(default)]
    pub alternate: String,
    #[builder(default)]
    pub remarks: String,
    #[builder(default)]
    pub route: String,
}

#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into))]
pub struct Pilot {
    pub callsign: String,
    pub cid: String,
    #[builder(default)]
    pub name: String,
    pub position: LatLon,
    pub altitude: Altitude,
    pub groundspeed: u32,
    pub heading: u16,
    #[builder(default)]
    pub squawk: Option<SquawkCode>,
    #[builder(default)]
    pub server: String,
    #[builder(default)]
    pub flight_plan: Option<FlightPlan>,
}

#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into))]
pub struct AirTrafficController {
    pub callsign: String,
    pub cid: String,
    #[builder(default)]
    pub name: String,
    pub frequency: Frequency,
    pub facility: Facility,
    pub rating: u8,
    pub position: LatLon,
    /// Nautical miles.
    pub visual_range: u32,
    #[builder(default)]
    pub server: String,
    #[builder(default)]
    pub atis: Vec<String>,
}

/// A flight plan filed before the pilot connects.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightNotification {
    pub callsign: String,
    pub cid: String,
    pub name: String,
    pub flight_plan: FlightPlan,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Server {
    pub ident: String,
    pub hostname: String,
    pub location: String,
    pub name: String,
    pub clients_allowed: bool,
}

/// `KEY = VALUE` line from the general part of the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedSetting {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Facility::Observer)]
    #[case("twr", Facility::Tower)]
    #[case("6", Facility::Centre)]
    #[case(" APP ", Facility::Approach)]
    fn reads_facilities(#[case] raw: &str, #[case] facility: Facility) {
        assert_eq!(raw.parse(), Ok(facility));
    }

    #[test]
    fn rejects_unknown_facility() {
        assert_eq!(
            "7".parse::<Facility>(),
            Err(ConversionError::Facility { raw: "7".to_owned() })
        );
        assert!("RAMP".parse::<Facility>().is_err());
    }

    #[test]
    fn plan_builder_requires_both_airports() {
        let err = FlightPlanBuilder::default()
            .departure("YSSY")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("destination"));
    }
}
