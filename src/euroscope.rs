use crate::error::ParseError;
use crate::geo::LatLon;
use crate::position::ControllerPosition;
use crate::result::ParseOutcome;
use crate::sector::{RouteKind, Waypoint};
use crate::units::Altitude;

mod parse;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EuroScopeFile {
    pub positions: Vec<ControllerPosition>,
    pub procedures: Vec<Procedure>,
    pub sector_lines: Vec<SectorLine>,
    pub sectors: Vec<Sector>,
    pub priorities: Vec<ControllerPriority>,
    pub coordination_points: Vec<CoordinationPoint>,
    pub free_text: Vec<FreeText>,
    pub errors: Vec<ParseError>,
    /// Lines folded into an enclosing sector or sector line.
    attached: usize,
}

impl EuroScopeFile {
    pub fn parse(text: &str) -> EuroScopeFile {
        parse::parse(text)
    }

    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.name == name)
    }

    pub fn sector_line(&self, id: &str) -> Option<&SectorLine> {
        self.sector_lines.iter().find(|l| l.id == id)
    }

    /// Procedures filed for one airport, in file order.
    pub fn procedures_for<'a>(&'a self, airport: &'a str) -> impl Iterator<Item = &'a Procedure> + 'a {
        self.procedures.iter().filter(move |p| p.airport == airport)
    }
}

impl ParseOutcome for EuroScopeFile {
    fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record_count(&self) -> usize {
        self.positions.len()
            + self.procedures.len()
            + self.sector_lines.len()
            + self.sectors.len()
            + self.priorities.len()
            + self.coordination_points.len()
            + self.free_text.len()
            + self.attached
    }
}

/// `SID:EDDM:26L:ANKI1S:DM060 ANKIL`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Procedure {
    pub kind: RouteKind,
    pub airport: String,
    pub runway: String,
    pub name: String,
    pub route: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LineShape {
    Polyline,
    Circle { centre: Waypoint, radius_nm: f64 },
}

/// Draw the line while `owner` is controlled and it separates `left` from `right`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRule {
    pub owner: String,
    pub left: String,
    pub right: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectorLine {
    pub id: String,
    pub shape: LineShape,
    pub points: Vec<LatLon>,
    pub display: Vec<DisplayRule>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveRunway {
    pub airport: String,
    pub runway: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub name: String,
    pub floor: Altitude,
    pub ceiling: Altitude,
    /// Position ids in order of priority, from the `OWNER` line.
    pub owners: Vec<String>,
    /// Sector line ids enclosing this sector.
    pub borders: Vec<String>,
    pub active: Vec<ActiveRunway>,
    pub departure_airports: Vec<String>,
    pub arrival_airports: Vec<String>,
}

/// Which positions take over a sector, first one online wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerPriority {
    pub sector: String,
    /// Name of the alternate ownership set, `None` for the primary `OWNER`.
    pub alternate: Option<String>,
    pub positions: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordinationKind {
    Copx,
    FirCopx,
}

/// `*` fields match anything and are kept verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinationPoint {
    pub kind: CoordinationKind,
    pub previous_fix: String,
    pub departure_runway: String,
    pub fix: String,
    pub next_fix: String,
    pub arrival_runway: String,
    pub from_sector: String,
    pub to_sector: String,
    pub climb_level: Option<Altitude>,
    pub descent_level: Option<Altitude>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FreeText {
    pub position: LatLon,
    pub group: String,
    pub text: String,
}
