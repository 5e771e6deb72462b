//! Readers for the plain-text data files of ATC simulation networks: sector
//! files, controller position lists, EuroScope extension files and traffic
//! status feeds.
//!
//! Every parser takes the whole text and never fails as a whole. Lines it
//! cannot use end up in the result's `errors`, next to the records it could.
//!
//! ```
//! use netdata::{ParseOutcome, SectorFile};
//!
//! let file = SectorFile::parse("[FIXES]\nSANAD S031.23.11.000 E151.24.44.640\n");
//! assert_eq!(file.fixes[0].name, "SANAD");
//! assert!(file.is_clean());
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod archive;
pub mod error;
pub mod euroscope;
pub mod geo;
pub mod position;
pub mod result;
pub mod scan;
pub mod sector;
pub mod squawk;
pub mod traffic;
pub mod units;

pub use crate::error::{ConversionError, Error, LineError, ParseError, SquawkError};
pub use crate::euroscope::EuroScopeFile;
pub use crate::geo::LatLon;
pub use crate::position::{ControllerPosition, PositionFile};
pub use crate::result::ParseOutcome;
pub use crate::sector::{SectorFile, SectorOptions, SectorOptionsBuilder};
pub use crate::squawk::SquawkCode;
pub use crate::traffic::TrafficFeed;
pub use crate::units::{Altitude, Frequency};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Sector,
    Position,
    EuroScope,
    Traffic,
}

impl FileKind {
    /// Guesses the kind from a file name: `.sct`, `.sct2`, `.pos` and `.ese`
    /// extensions, or `whazzup` anywhere in the name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<FileKind> {
        let path = path.as_ref();
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.contains("whazzup") {
            return Some(FileKind::Traffic);
        }

        let extension = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match &*extension {
            "sct" | "sct2" => Some(FileKind::Sector),
            "pos" => Some(FileKind::Position),
            "ese" => Some(FileKind::EuroScope),
            _ => None,
        }
    }

    pub fn parse(self, text: &str) -> ParsedFile {
        self.parse_with(text, &SectorOptions::default())
    }

    pub fn parse_with(self, text: &str, options: &SectorOptions) -> ParsedFile {
        match self {
            FileKind::Sector => ParsedFile::Sector(SectorFile::parse_with(text, options)),
            FileKind::Position => ParsedFile::Position(PositionFile::parse(text)),
            FileKind::EuroScope => ParsedFile::EuroScope(EuroScopeFile::parse(text)),
            FileKind::Traffic => ParsedFile::Traffic(TrafficFeed::parse(text)),
        }
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.trim().to_ascii_lowercase() {
            "sct" | "sector" => Ok(FileKind::Sector),
            "pos" | "position" => Ok(FileKind::Position),
            "ese" | "euroscope" => Ok(FileKind::EuroScope),
            "whazzup" | "traffic" => Ok(FileKind::Traffic),
            _ => Err(Error::UnknownFileKind { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileKind::Sector => "sector",
            FileKind::Position => "position",
            FileKind::EuroScope => "euroscope",
            FileKind::Traffic => "traffic",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParsedFile {
    Sector(SectorFile),
    Position(PositionFile),
    EuroScope(EuroScopeFile),
    Traffic(TrafficFeed),
}

impl ParsedFile {
    pub fn kind(&self) -> FileKind {
        match self {
            ParsedFile::Sector(_) => FileKind::Sector,
            ParsedFile::Position(_) => FileKind::Position,
            ParsedFile::EuroScope(_) => FileKind::EuroScope,
            ParsedFile::Traffic(_) => FileKind::Traffic,
        }
    }

    fn outcome(&self) -> &dyn ParseOutcome {
        match self {
            ParsedFile::Sector(file) => file,
            ParsedFile::Position(file) => file,
            ParsedFile::EuroScope(file) => file,
            ParsedFile::Traffic(feed) => feed,
        }
    }
}

impl ParseOutcome for ParsedFile {
    fn errors(&self) -> &[ParseError] {
        self.outcome().errors()
    }

    fn record_count(&self) -> usize {
        self.outcome().record_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("YSSY.sct2", Some(FileKind::Sector))]
    #[case("maps/Sydney.SCT", Some(FileKind::Sector))]
    #[case("EDMM.ese", Some(FileKind::EuroScope))]
    #[case("positions.pos", Some(FileKind::Position))]
    #[case("vatsim-whazzup.txt", Some(FileKind::Traffic))]
    #[case("README.md", None)]
    #[case("Makefile", None)]
    fn infers_kind_from_path(#[case] path: &str, #[case] kind: Option<FileKind>) {
        assert_eq!(FileKind::from_path(path), kind);
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in &[FileKind::Sector, FileKind::Position, FileKind::EuroScope, FileKind::Traffic] {
            assert_eq!(kind.to_string().parse::<FileKind>().unwrap(), *kind);
        }
        assert!(matches!(
            "kml".parse::<FileKind>(),
            Err(Error::UnknownFileKind { .. })
        ));
    }

    #[test]
    fn dispatches_on_kind() {
        let parsed = FileKind::Position.parse("EDDM_TWR:Muenchen Tower:118.700:MT:-:EDDM:TWR\nbroken");
        assert_eq!(parsed.kind(), FileKind::Position);
        assert_eq!(parsed.record_count(), 1);
        assert_eq!(parsed.errors().len(), 1);
    }
}
