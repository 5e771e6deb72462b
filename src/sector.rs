use crate::error::ParseError;
use crate::geo::LatLon;
use crate::result::ParseOutcome;
use crate::units::Frequency;
use derive_builder::Builder;
use std::fmt;

mod parse;
pub mod write;

/// Parsing knobs for sector files.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(default)]
pub struct SectorOptions {
    /// Runways without an airport code on their line are attached to the
    /// nearest airport within this many nautical miles of either threshold.
    pub runway_association_radius_nm: f64,
}

impl Default for SectorOptions {
    fn default() -> Self {
        SectorOptions {
            runway_association_radius_nm: 5.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorFile {
    pub info: SectorInfo,
    pub colors: Vec<ColorDefinition>,
    pub navaids: Vec<Navaid>,
    pub airports: Vec<Airport>,
    pub runways: Vec<Runway>,
    pub fixes: Vec<Fix>,
    pub airways: Vec<AirwaySegment>,
    pub terminal_routes: Vec<TerminalRoute>,
    pub boundaries: Vec<BoundarySegment>,
    pub geo: Vec<GeoSegment>,
    pub regions: Vec<Region>,
    pub labels: Vec<Label>,
    pub errors: Vec<ParseError>,
    /// `REGIONNAME` lines read, including names never followed by a polygon.
    region_names: usize,
}

impl SectorFile {
    pub fn parse(text: &str) -> SectorFile {
        Self::parse_with(text, &SectorOptions::default())
    }

    pub fn parse_with(text: &str, options: &SectorOptions) -> SectorFile {
        parse::parse(text, options)
    }

    pub fn vors(&self) -> impl Iterator<Item = &Navaid> {
        self.navaids.iter().filter(|n| n.kind == NavaidKind::Vor)
    }

    pub fn ndbs(&self) -> impl Iterator<Item = &Navaid> {
        self.navaids.iter().filter(|n| n.kind == NavaidKind::Ndb)
    }

    pub fn airport(&self, identifier: &str) -> Option<&Airport> {
        self.airports.iter().find(|a| a.identifier == identifier)
    }

    pub fn runways_of<'a>(&'a self, airport: &'a str) -> impl Iterator<Item = &'a Runway> + 'a {
        self.runways
            .iter()
            .filter(move |r| r.airport.as_ref().map(String::as_str) == Some(airport))
    }
}

impl ParseOutcome for SectorFile {
    fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record_count(&self) -> usize {
        self.info.len()
            + self.colors.len()
            + self.navaids.len()
            + self.airports.len()
            + self.runways.len() / 2
            + self.fixes.len()
            + self.airways.len()
            + self.terminal_routes.len()
            + self.boundaries.len()
            + self.geo.len()
            + self.regions.iter().map(|r| r.points.len()).sum::<usize>()
            + self.region_names
            + self.labels.len()
    }
}

/// The positional values of the `[INFO]` section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectorInfo {
    pub name: Option<String>,
    pub default_callsign: Option<String>,
    pub default_airport: Option<String>,
    pub centre_lat: Option<f64>,
    pub centre_lon: Option<f64>,
    pub nm_per_deg_lat: Option<f64>,
    pub nm_per_deg_lon: Option<f64>,
    pub magnetic_variation: Option<f64>,
    pub scale: Option<f64>,
}

impl SectorInfo {
    pub const FIELDS: usize = 9;

    /// Number of values that were set.
    pub fn len(&self) -> usize {
        let text = [&self.name, &self.default_callsign, &self.default_airport];
        let numbers = [
            self.centre_lat,
            self.centre_lon,
            self.nm_per_deg_lat,
            self.nm_per_deg_lon,
            self.magnetic_variation,
            self.scale,
        ];
        text.iter().filter(|v| v.is_some()).count() + numbers.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn centre(&self) -> Option<LatLon> {
        Some(LatLon::new(self.centre_lat?, self.centre_lon?))
    }
}

/// `#define NAME VALUE`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorDefinition {
    pub name: String,
    pub value: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavaidKind {
    Vor,
    Ndb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Navaid {
    pub identifier: String,
    pub kind: NavaidKind,
    pub frequency: Frequency,
    pub position: LatLon,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AirspaceClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl AirspaceClass {
    pub fn from_letter(raw: &str) -> Option<AirspaceClass> {
        Some(match &*raw.to_ascii_uppercase() {
            "A" => AirspaceClass::A,
            "B" => AirspaceClass::B,
            "C" => AirspaceClass::C,
            "D" => AirspaceClass::D,
            "E" => AirspaceClass::E,
            "F" => AirspaceClass::F,
            "G" => AirspaceClass::G,
            _ => return None,
        })
    }
}

impl From<AirspaceClass> for &str {
    fn from(x: AirspaceClass) -> &'static str {
        match x {
            AirspaceClass::A => "A",
            AirspaceClass::B => "B",
            AirspaceClass::C => "C",
            AirspaceClass::D => "D",
            AirspaceClass::E => "E",
            AirspaceClass::F => "F",
            AirspaceClass::G => "G",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
    pub identifier: String,
    pub frequency: Frequency,
    pub position: LatLon,
    pub class: Option<AirspaceClass>,
}

/// One direction of a runway strip. Every `[RUNWAY]` line yields two of
/// these, one per end, each pointing at the other through `opposite`.
#[derive(Clone, Debug, PartialEq)]
pub struct Runway {
    pub identifier: String,
    pub opposite: String,
    pub heading: u16,
    pub threshold: LatLon,
    pub end: LatLon,
    /// ICAO code of the owning airport.
    pub airport: Option<String>,
    pub airport_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    pub name: String,
    pub position: LatLon,
}

/// A line endpoint: either a literal position or a fix/navaid name that the
/// file repeats in both coordinate columns.
#[derive(Clone, Debug, PartialEq)]
pub enum Waypoint {
    Coordinate(LatLon),
    Named(String),
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waypoint::Coordinate(pos) => f.write_str(&pos.to_sct()),
            Waypoint::Named(name) => write!(f, "{} {}", name, name),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AirwayLevel {
    High,
    Low,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AirwaySegment {
    pub name: String,
    pub level: AirwayLevel,
    pub start: Waypoint,
    pub end: Waypoint,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Sid,
    Star,
}

/// One drawn segment of a SID or STAR diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct TerminalRoute {
    pub kind: RouteKind,
    pub name: String,
    pub start: Waypoint,
    pub end: Waypoint,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoundaryLevel {
    Artcc,
    High,
    Low,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundarySegment {
    pub name: String,
    pub level: BoundaryLevel,
    pub start: Waypoint,
    pub end: Waypoint,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeoSegment {
    pub start: Waypoint,
    pub end: Waypoint,
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Set by a preceding `REGIONNAME` line.
    pub name: Option<String>,
    pub color: String,
    pub points: Vec<LatLon>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: LatLon,
    pub color: Option<String>,
}
