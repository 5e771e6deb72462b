use super::*;
use crate::error::LineError;
use crate::result;
use crate::scan::{header_name, Fields};
use crate::units;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Positions,
    SidsStars,
    Airspace,
    FreeText,
    Unsupported,
}

impl Section {
    fn from_header(name: &str) -> Option<Section> {
        Some(match name {
            "POSITIONS" => Section::Positions,
            "SIDSSTARS" => Section::SidsStars,
            "AIRSPACE" => Section::Airspace,
            "FREETEXT" => Section::FreeText,
            _ => return None,
        })
    }
}

struct EseParser {
    section: Section,
    current_line: Option<usize>,
    current_sector: Option<usize>,
    file: EuroScopeFile,
}

pub(super) fn parse(text: &str) -> EuroScopeFile {
    let mut parser = EseParser {
        section: Section::Preamble,
        current_line: None,
        current_sector: None,
        file: EuroScopeFile::default(),
    };

    let errors = result::drive(text, |line| parser.line(line));
    let mut file = parser.file;
    file.errors = errors;

    debug!(
        records = file.record_count(),
        errors = file.errors.len(),
        "parsed euroscope extension file"
    );
    file
}

impl EseParser {
    fn line(&mut self, line: &str) -> Result<(), LineError> {
        if let Some(name) = header_name(line) {
            return self.enter(name);
        }

        match self.section {
            Section::Positions => {
                let position = ControllerPosition::from_fields(&Fields::colon(line))?;
                self.file.positions.push(position);
            }
            Section::SidsStars => self.file.procedures.push(procedure(line)?),
            Section::Airspace => self.airspace(line)?,
            Section::FreeText => self.file.free_text.push(free_text(line)?),
            Section::Preamble | Section::Unsupported => return Err(LineError::OutsideSection),
        }
        Ok(())
    }

    fn enter(&mut self, name: String) -> Result<(), LineError> {
        self.current_line = None;
        self.current_sector = None;
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

    fn open_line(&mut self) -> Result<&mut SectorLine, LineError> {
        match self.current_line {
            Some(i) => Ok(&mut self.file.sector_lines[i]),
            None => Err(LineError::OutsideSection),
        }
    }

    fn open_sector(&mut self) -> Result<&mut Sector, LineError> {
        match self.current_sector {
            Some(i) => Ok(&mut self.file.sectors[i]),
            None => Err(LineError::OutsideSection),
        }
    }

    fn start_line(&mut self, id: &str, shape: LineShape) {
        self.file.sector_lines.push(SectorLine {
            id: id.to_owned(),
            shape,
            points: Vec::new(),
            display: Vec::new(),
        });
        self.current_line = Some(self.file.sector_lines.len() - 1);
        self.current_sector = None;
    }

    fn airspace(&mut self, line: &str) -> Result<(), LineError> {
        let fields = Fields::colon(line);
        let key = fields[0].to_ascii_uppercase();

        match &*key {
            "SECTORLINE" => {
                let fields = fields.require(2)?;
                self.start_line(fields[1], LineShape::Polyline);
            }
            "CIRCLE_SECTORLINE" => {
                let fields = fields.require(4)?;
                let (centre, radius) = if fields.len() == 4 {
                    (Waypoint::Named(fields[2].to_owned()), fields[3])
                } else {
                    (Waypoint::Coordinate(LatLon::from_sct(fields[2], fields[3])?), fields[4])
                };
                let radius_nm: f64 = units::number("circle radius", radius)?;
                self.start_line(fields[1], LineShape::Circle { centre, radius_nm });
            }
            "COORD" => {
                let fields = fields.require(3)?;
                let point = LatLon::from_sct(fields[1], fields[2])?;
                self.open_line()?.points.push(point);
                self.file.attached += 1;
            }
            "DISPLAY" => {
                let fields = fields.require(4)?;
                let rule = DisplayRule {
                    owner: fields[1].to_owned(),
                    left: fields[2].to_owned(),
                    right: fields[3].to_owned(),
                };
                self.open_line()?.display.push(rule);
                self.file.attached += 1;
            }
            "SECTOR" => {
                let fields = fields.require(4)?;
                self.file.sectors.push(Sector {
                    name: fields[1].to_owned(),
                    floor: fields[2].parse()?,
                    ceiling: fields[3].parse()?,
                    owners: Vec::new(),
                    borders: Vec::new(),
                    active: Vec::new(),
                    departure_airports: Vec::new(),
                    arrival_airports: Vec::new(),
                });
                self.current_sector = Some(self.file.sectors.len() - 1);
                self.current_line = None;
            }
            "OWNER" => {
                let fields = fields.require(2)?;
                let positions = list(&fields, 1);
                let sector = self.open_sector()?;
                sector.owners = positions.clone();
                let name = sector.name.clone();
                self.file.priorities.push(ControllerPriority {
                    sector: name,
                    alternate: None,
                    positions,
                });
            }
            "ALTOWNER" => {
                let fields = fields.require(3)?;
                let positions = list(&fields, 2);
                let name = self.open_sector()?.name.clone();
                self.file.priorities.push(ControllerPriority {
                    sector: name,
                    alternate: Some(fields[1].to_owned()),
                    positions,
                });
            }
            "BORDER" => {
                let fields = fields.require(2)?;
                self.open_sector()?.borders.extend(list(&fields, 1));
                self.file.attached += 1;
            }
            "ACTIVE" => {
                let fields = fields.require(3)?;
                let active = ActiveRunway {
                    airport: fields[1].to_owned(),
                    runway: fields[2].to_owned(),
                };
                self.open_sector()?.active.push(active);
                self.file.attached += 1;
            }
            "DEPAPT" => {
                let fields = fields.require(2)?;
                self.open_sector()?.departure_airports.extend(list(&fields, 1));
                self.file.attached += 1;
            }
            "ARRAPT" => {
                let fields = fields.require(2)?;
                self.open_sector()?.arrival_airports.extend(list(&fields, 1));
                self.file.attached += 1;
            }
            "COPX" | "FIR_COPX" => {
                let kind = if key == "COPX" {
                    CoordinationKind::Copx
                } else {
                    CoordinationKind::FirCopx
                };
                let point = coordination_point(kind, fields.require(11)?)?;
                self.file.coordination_points.push(point);
            }
            _ => {
                return Err(LineError::UnsupportedEntry {
                    entry: fields[0].to_owned(),
                })
            }
        }
        Ok(())
    }
}

/// Non-empty fields from `from` on.
fn list(fields: &Fields<'_>, from: usize) -> Vec<String> {
    fields
        .slice(from, fields.len())
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.to_string())
        .collect()
}

fn procedure(line: &str) -> Result<Procedure, LineError> {
    let fields = Fields::colon(line).require(5)?;
    let kind = match &*fields[0].to_ascii_uppercase() {
        "SID" => RouteKind::Sid,
        "STAR" => RouteKind::Star,
        _ => {
            return Err(LineError::InvalidValue {
                field: "procedure type",
                raw: fields[0].to_owned(),
            })
        }
    };

    Ok(Procedure {
        kind,
        airport: fields[1].to_owned(),
        runway: fields[2].to_owned(),
        name: fields[3].to_owned(),
        route: fields
            .rest(4, " ")
            .split_whitespace()
            .map(str::to_owned)
            .collect(),
    })
}

fn level(raw: &str) -> Result<Option<Altitude>, LineError> {
    match raw {
        "" | "*" => Ok(None),
        raw => Ok(Some(raw.parse()?)),
    }
}

// COPX:*:*:RUDNO:BEGEN:*:EDMM_ALB_CTR:EDMM_WLD_CTR:*:25000:RUDNO
fn coordination_point(kind: CoordinationKind, fields: Fields<'_>) -> Result<CoordinationPoint, LineError> {
    Ok(CoordinationPoint {
        kind,
        previous_fix: fields[1].to_owned(),
        departure_runway: fields[2].to_owned(),
        fix: fields[3].to_owned(),
        next_fix: fields[4].to_owned(),
        arrival_runway: fields[5].to_owned(),
        from_sector: fields[6].to_owned(),
        to_sector: fields[7].to_owned(),
        climb_level: level(fields[8])?,
        descent_level: level(fields[9])?,
        description: fields.rest(10, ":"),
    })
}

fn free_text(line: &str) -> Result<FreeText, LineError> {
    let fields = Fields::colon(line).require(4)?;
    Ok(FreeText {
        position: LatLon::from_sct(fields[0], fields[1])?,
        group: fields[2].to_owned(),
        text: fields.rest(3, ":"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRSPACE: &str = "\
[AIRSPACE]
SECTORLINE:101
DISPLAY:EDMM_ALB:EDMM_ALB:EDMM_WLD
COORD:N048.00.00.000:E011.00.00.000
COORD:N048.30.00.000:E011.30.00.000
CIRCLE_SECTORLINE:EDDM_CTR:EDDM:10
SECTOR:EDMM_ALB:0:24500
OWNER:ALB:WLD:MMC
ALTOWNER:Night:MMC
BORDER:101:102
ACTIVE:EDDM:26L
DEPAPT:EDDM:EDMO
ARRAPT:EDDM
COPX:*:*:RUDNO:BEGEN:*:EDMM_ALB:EDMM_WLD:*:FL250:RUDNO
";

    #[test]
    fn builds_sector_lines_and_sectors() {
        let file = EuroScopeFile::parse(AIRSPACE);
        assert!(file.errors.is_empty(), "{:?}", file.errors);

        let line = file.sector_line("101").unwrap();
        assert_eq!(line.points.len(), 2);
        assert_eq!(line.display.len(), 1);
        assert_eq!(
            file.sector_line("EDDM_CTR").unwrap().shape,
            LineShape::Circle {
                centre: Waypoint::Named("EDDM".to_owned()),
                radius_nm: 10.0
            }
        );

        let sector = file.sector("EDMM_ALB").unwrap();
        assert_eq!(sector.ceiling, Altitude::from_feet(24_500));
        assert_eq!(sector.owners, vec!["ALB", "WLD", "MMC"]);
        assert_eq!(sector.borders, vec!["101", "102"]);
        assert_eq!(sector.departure_airports, vec!["EDDM", "EDMO"]);
        assert_eq!(
            sector.active,
            vec![ActiveRunway {
                airport: "EDDM".to_owned(),
                runway: "26L".to_owned()
            }]
        );

        assert_eq!(file.priorities.len(), 2);
        assert_eq!(file.priorities[1].alternate.as_deref(), Some("Night"));
        assert_eq!(file.priorities[1].sector, "EDMM_ALB");

        let copx = &file.coordination_points[0];
        assert_eq!(copx.climb_level, None);
        assert_eq!(copx.descent_level, Some(Altitude::from_feet(25_000)));
        assert_eq!(copx.description, "RUDNO");
    }

    #[test]
    fn every_airspace_line_is_accounted_for() {
        let file = EuroScopeFile::parse(AIRSPACE);
        assert_eq!(file.record_count(), 13);
    }

    #[test]
    fn attribute_lines_need_an_open_owner() {
        let file = EuroScopeFile::parse("[AIRSPACE]\nCOORD:N048.00.00.000:E011.00.00.000\nOWNER:ALB\nMSAW:x\n");
        assert_eq!(file.errors.len(), 3);
        assert_eq!(file.errors[0].kind(), &LineError::OutsideSection);
        assert_eq!(file.errors[1].kind(), &LineError::OutsideSection);
        assert_eq!(
            file.errors[2].kind(),
            &LineError::UnsupportedEntry {
                entry: "MSAW".to_owned()
            }
        );
    }

    #[test]
    fn sector_closes_the_open_sector_line() {
        let file = EuroScopeFile::parse(
            "[AIRSPACE]\nSECTORLINE:1\nSECTOR:A:0:100\nCOORD:N048.00.00.000:E011.00.00.000\n",
        );
        assert_eq!(file.errors.len(), 1);
        assert!(file.sector_lines[0].points.is_empty());
    }

    #[test]
    fn reads_procedures_and_free_text() {
        let text = "\
[SIDSSTARS]
SID:EDDM:26L:ANKI1S:DM060 ANKIL
STAR:EDDM:08R:BETO1A:BETOS ROKIL
APP:EDDM:08R:X:Y
[FREETEXT]
N048.21.13.000:E011.47.09.000:Gates:A: Terminal 1
";
        let file = EuroScopeFile::parse(text);
        assert_eq!(file.procedures.len(), 2);
        assert_eq!(file.procedures[0].route, vec!["DM060", "ANKIL"]);
        assert_eq!(file.procedures[1].kind, RouteKind::Star);
        assert_eq!(file.procedures_for("EDDM").count(), 2);
        assert_eq!(file.free_text[0].group, "Gates");
        assert_eq!(file.free_text[0].text, "A:Terminal 1");
        assert_eq!(file.errors.len(), 1);
    }
}
