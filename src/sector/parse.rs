use super::*;
use crate::error::{ConversionError, LineError};
use crate::geo;
use crate::result;
use crate::scan::{header_name, Fields};
use crate::units;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    /// Before the first header; only `#define` lines live here.
    Preamble,
    /// Index of the next `[INFO]` value.
    Info(usize),
    Vor,
    Ndb,
    Airport,
    Runway,
    Fixes,
    Airway(AirwayLevel),
    Route(RouteKind),
    Boundary(BoundaryLevel),
    Geo,
    Regions,
    Labels,
    Unsupported,
}

impl Section {
    fn from_header(name: &str) -> Option<Section> {
        Some(match name {
            "INFO" => Section::Info(0),
            "VOR" => Section::Vor,
            "NDB" => Section::Ndb,
            "AIRPORT" => Section::Airport,
            "RUNWAY" => Section::Runway,
            "FIXES" => Section::Fixes,
            "HIGH AIRWAY" => Section::Airway(AirwayLevel::High),
            "LOW AIRWAY" => Section::Airway(AirwayLevel::Low),
            "SID" => Section::Route(RouteKind::Sid),
            "STAR" => Section::Route(RouteKind::Star),
            "ARTCC" => Section::Boundary(BoundaryLevel::Artcc),
            "ARTCC HIGH" => Section::Boundary(BoundaryLevel::High),
            "ARTCC LOW" => Section::Boundary(BoundaryLevel::Low),
            "GEO" => Section::Geo,
            "REGIONS" => Section::Regions,
            "LABELS" => Section::Labels,
            _ => return None,
        })
    }
}

struct SectorParser {
    section: Section,
    route_name: Option<String>,
    region_name: Option<String>,
    region_open: bool,
    file: SectorFile,
}

pub(super) fn parse(text: &str, options: &SectorOptions) -> SectorFile {
    let mut parser = SectorParser {
        section: Section::Preamble,
        route_name: None,
        region_name: None,
        region_open: false,
        file: SectorFile::default(),
    };

    let errors = result::drive(text, |line| parser.line(line));
    let mut file = parser.file;
    file.errors = errors;
    associate_runways(&mut file, options.runway_association_radius_nm);

    debug!(
        records = file.record_count(),
        errors = file.errors.len(),
        "parsed sector file"
    );
    file
}

impl SectorParser {
    fn line(&mut self, line: &str) -> Result<(), LineError> {
        if let Some(name) = header_name(line) {
            return self.enter(name);
        }

        match self.section {
            Section::Preamble => {
                let color = define(line)?;
                self.file.colors.push(color);
            }
            Section::Info(index) => {
                self.section = Section::Info(index + 1);
                self.info(index, line)?;
            }
            Section::Vor => self.file.navaids.push(navaid(line, NavaidKind::Vor)?),
            Section::Ndb => self.file.navaids.push(navaid(line, NavaidKind::Ndb)?),
            Section::Airport => self.file.airports.push(airport(line)?),
            Section::Runway => {
                let (first, second) = runway_pair(line)?;
                self.file.runways.push(first);
                self.file.runways.push(second);
            }
            Section::Fixes => self.file.fixes.push(fix(line)?),
            Section::Airway(level) => {
                let (name, start, end) = named_segment(line)?;
                self.file.airways.push(AirwaySegment {
                    name,
                    level,
                    start,
                    end,
                });
            }
            Section::Route(kind) => self.route(kind, line)?,
            Section::Boundary(level) => {
                let (name, start, end) = named_segment(line)?;
                self.file.boundaries.push(BoundarySegment {
                    name,
                    level,
                    start,
                    end,
                });
            }
            Section::Geo => self.file.geo.push(geo_segment(line)?),
            Section::Regions => self.region(line)?,
            Section::Labels => self.file.labels.push(label(line)?),
            Section::Unsupported => return Err(LineError::OutsideSection),
        }
        Ok(())
    }

    fn enter(&mut self, name: String) -> Result<(), LineError> {
        self.route_name = None;
        if let Some(region) = self.region_name.take() {
            debug!(%region, "region name without a polygon");
        }
        self.region_open = false;
        match Section::from_header(&name) {
            Some(section) => {
                debug!(section = %name, "entering section");
                self.section = section;
                Ok(())
            }
            None => {
                debug!(section = %name, "skipping unknown section");
                self.section = Section::Unsupported;
                Ok(())
            }
        }
    }

    fn info(&mut self, index: usize, value: &str) -> Result<(), LineError> {
        let info = &mut self.file.info;
        match index {
            0 => info.name = Some(value.to_owned()),
            1 => info.default_callsign = Some(value.to_owned()),
            2 => info.default_airport = Some(value.to_owned()),
            3 => info.centre_lat = Some(geo::parse_latitude(value)?),
            4 => info.centre_lon = Some(geo::parse_longitude(value)?),
            5 => info.nm_per_deg_lat = Some(units::number("nm per degree latitude", value)?),
            6 => info.nm_per_deg_lon = Some(units::number("nm per degree longitude", value)?),
            7 => info.magnetic_variation = Some(units::number("magnetic variation", value)?),
            8 => info.scale = Some(units::number("scale", value)?),
            _ => {
                return Err(LineError::UnsupportedEntry {
                    entry: value.to_owned(),
                })
            }
        }
        Ok(())
    }

    fn route(&mut self, kind: RouteKind, line: &str) -> Result<(), LineError> {
        let tokens = Fields::whitespace(line);
        let (name, start, end) = segment(&tokens)?;
        let name = if name.is_empty() {
            // Continuation of the diagram above.
            self.route_name.clone().ok_or(LineError::FieldCount {
                expected: 5,
                actual: tokens.len(),
            })?
        } else {
            self.route_name = Some(name.clone());
            name
        };

        self.file.terminal_routes.push(TerminalRoute {
            kind,
            name,
            start,
            end,
        });
        Ok(())
    }

    fn region(&mut self, line: &str) -> Result<(), LineError> {
        let fields = Fields::whitespace(line);
        if fields.len() >= 2 && fields[0].eq_ignore_ascii_case("REGIONNAME") {
            if let Some(region) = self.region_name.replace(fields.rest(1, " ")) {
                debug!(%region, "region name without a polygon");
            }
            self.file.region_names += 1;
            self.region_open = false;
            return Ok(());
        }

        match fields.len() {
            2 if self.region_open => {
                let point = LatLon::from_sct(fields[0], fields[1])?;
                if let Some(region) = self.file.regions.last_mut() {
                    region.points.push(point);
                }
                Ok(())
            }
            2 => Err(LineError::OutsideSection),
            _ => {
                let fields = fields.require(3)?;
                let point = LatLon::from_sct(fields[1], fields[2])?;
                self.file.regions.push(Region {
                    name: self.region_name.take(),
                    color: fields[0].to_owned(),
                    points: vec![point],
                });
                self.region_open = true;
                Ok(())
            }
        }
    }
}

fn define(line: &str) -> Result<ColorDefinition, LineError> {
    let fields = Fields::whitespace(line);
    if !fields[0].eq_ignore_ascii_case("#define") {
        return Err(LineError::OutsideSection);
    }
    let fields = fields.require(3)?;
    Ok(ColorDefinition {
        name: fields[1].to_owned(),
        value: units::number("color value", fields[2])?,
    })
}

fn navaid(line: &str, kind: NavaidKind) -> Result<Navaid, LineError> {
    let fields = Fields::whitespace(line).require(4)?;
    Ok(Navaid {
        identifier: fields[0].to_owned(),
        kind,
        frequency: fields[1].parse()?,
        position: LatLon::from_sct(fields[2], fields[3])?,
    })
}

fn airport(line: &str) -> Result<Airport, LineError> {
    let fields = Fields::whitespace(line).require(4)?;
    let class = match fields.get(4) {
        Some(raw) => Some(AirspaceClass::from_letter(raw).ok_or_else(|| {
            LineError::InvalidValue {
                field: "airspace class",
                raw: raw.to_owned(),
            }
        })?),
        None => None,
    };

    Ok(Airport {
        identifier: fields[0].to_owned(),
        frequency: fields[1].parse()?,
        position: LatLon::from_sct(fields[2], fields[3])?,
        class,
    })
}

// 16L 34R 164 344 S033.56.44.000 E151.10.34.000 S033.58.01.000 E151.11.10.000 YSSY Sydney
fn runway_pair(line: &str) -> Result<(Runway, Runway), LineError> {
    let fields = Fields::whitespace(line).require(8)?;
    let first_heading = units::heading(fields[2])?;
    let second_heading = units::heading(fields[3])?;
    let first_threshold = LatLon::from_sct(fields[4], fields[5])?;
    let second_threshold = LatLon::from_sct(fields[6], fields[7])?;
    let airport = fields.get(8).map(str::to_owned);
    let airport_name = Some(fields.rest(9, " ")).filter(|n| !n.is_empty());

    let first = Runway {
        identifier: fields[0].to_owned(),
        opposite: fields[1].to_owned(),
        heading: first_heading,
        threshold: first_threshold,
        end: second_threshold,
        airport: airport.clone(),
        airport_name: airport_name.clone(),
    };
    let second = Runway {
        identifier: fields[1].to_owned(),
        opposite: fields[0].to_owned(),
        heading: second_heading,
        threshold: second_threshold,
        end: first_threshold,
        airport,
        airport_name,
    };
    Ok((first, second))
}

fn fix(line: &str) -> Result<Fix, LineError> {
    let fields = Fields::whitespace(line).require(3)?;
    Ok(Fix {
        name: fields[0].to_owned(),
        position: LatLon::from_sct(fields[1], fields[2])?,
    })
}

fn waypoint(lat: &str, lon: &str) -> Result<Waypoint, ConversionError> {
    match LatLon::from_sct(lat, lon) {
        Ok(pos) => Ok(Waypoint::Coordinate(pos)),
        Err(_) if lat == lon => Ok(Waypoint::Named(lat.to_owned())),
        Err(e) => Err(e),
    }
}

fn endpoints(tokens: &[&str]) -> Result<(Waypoint, Waypoint), ConversionError> {
    Ok((waypoint(tokens[0], tokens[1])?, waypoint(tokens[2], tokens[3])?))
}

/// Splits `NAME... A_LAT A_LON B_LAT B_LON [COLOR]` into its name (possibly
/// empty), the two endpoints and the optional trailing color.
fn segment_with_color(
    tokens: &Fields<'_>,
) -> Result<(String, Waypoint, Waypoint, Option<String>), LineError> {
    let len = tokens.len();
    if len < 4 {
        return Err(LineError::FieldCount {
            expected: 4,
            actual: len,
        });
    }

    match endpoints(tokens.slice(len - 4, len)) {
        Ok((start, end)) => Ok((tokens.slice(0, len - 4).join(" "), start, end, None)),
        Err(e) if len >= 5 => match endpoints(tokens.slice(len - 5, len - 1)) {
            Ok((start, end)) => Ok((
                tokens.slice(0, len - 5).join(" "),
                start,
                end,
                Some(tokens[len - 1].to_owned()),
            )),
            Err(_) => Err(e.into()),
        },
        Err(e) => Err(e.into()),
    }
}

fn segment(tokens: &Fields<'_>) -> Result<(String, Waypoint, Waypoint), LineError> {
    segment_with_color(tokens).map(|(name, start, end, _)| (name, start, end))
}

fn named_segment(line: &str) -> Result<(String, Waypoint, Waypoint), LineError> {
    let tokens = Fields::whitespace(line);
    let (name, start, end) = segment(&tokens)?;
    if name.is_empty() {
        return Err(LineError::FieldCount {
            expected: 5,
            actual: tokens.len(),
        });
    }
    Ok((name, start, end))
}

fn geo_segment(line: &str) -> Result<GeoSegment, LineError> {
    let (name, start, end, color) = segment_with_color(&Fields::whitespace(line))?;
    if !name.is_empty() {
        return Err(LineError::InvalidValue {
            field: "geo line",
            raw: line.to_owned(),
        });
    }
    Ok(GeoSegment { start, end, color })
}

// "Sydney Tower" S033.56.44.000 E151.10.34.000 white
fn label(line: &str) -> Result<Label, LineError> {
    let invalid = || LineError::InvalidValue {
        field: "label",
        raw: line.to_owned(),
    };
    if !line.starts_with('"') {
        return Err(invalid());
    }
    let close = line[1..].find('"').ok_or_else(invalid)? + 1;
    let fields = Fields::whitespace(&line[close + 1..]).require(2)?;

    Ok(Label {
        text: line[1..close].to_owned(),
        position: LatLon::from_sct(fields[0], fields[1])?,
        color: fields.get(2).map(str::to_owned),
    })
}

/// Both ends of a strip go to the airport nearest to either threshold.
fn associate_runways(file: &mut SectorFile, radius_nm: f64) {
    let airports = &file.airports;
    for pair in file.runways.chunks_mut(2) {
        if pair.iter().any(|r| r.airport.is_some()) {
            continue;
        }
        let nearest = airports
            .iter()
            .map(|a| {
                let d = pair
                    .iter()
                    .map(|r| a.position.distance_nm(r.threshold))
                    .fold(f64::INFINITY, f64::min);
                (a, d)
            })
            .filter(|(_, d)| *d <= radius_nm)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .map(|(a, _)| a.identifier.clone());
        for runway in pair {
            runway.airport = nearest.clone();
        }
    }
}
