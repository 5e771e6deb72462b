//! Controller position lists: one colon separated position per line.
//!
//! ```text
//! EDDM_TWR:Muenchen Tower:118.700:MT:-:EDDM:TWR:-:-:2001:2077:N048.21.13.000:E011.47.09.000
//! ```

use crate::error::{LineError, ParseError};
use crate::geo::LatLon;
use crate::result::{self, ParseOutcome};
use crate::scan::Fields;
use crate::squawk::SquawkCode;
use crate::units::Frequency;
use itertools::Itertools;
use tracing::debug;

pub const MIN_FIELDS: usize = 7;

const SQUAWK_START: usize = 9;
const SQUAWK_END: usize = 10;
const VISIBILITY_POINTS: usize = 11;

#[derive(Clone, Debug, PartialEq)]
pub struct ControllerPosition {
    pub name: String,
    pub radio_callsign: String,
    pub frequency: Frequency,
    pub sector_id: String,
    pub callsign_middle: String,
    pub callsign_prefix: String,
    pub callsign_suffix: String,
    /// Inclusive range of codes this position hands out.
    pub squawk_range: Option<(SquawkCode, SquawkCode)>,
    pub visibility_points: Vec<LatLon>,
}

impl ControllerPosition {
    pub fn from_line(line: &str) -> Result<Self, LineError> {
        Self::from_fields(&Fields::colon(line))
    }

    /// Columns are taken literally: 3 is the sector id, 4 the middle part,
    /// 5 the prefix and 6 the suffix of the login callsign.
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Result<Self, LineError> {
        if fields.len() < MIN_FIELDS {
            return Err(LineError::FieldCount {
                expected: MIN_FIELDS,
                actual: fields.len(),
            });
        }

        Ok(ControllerPosition {
            name: fields[0].to_owned(),
            radio_callsign: fields[1].to_owned(),
            frequency: fields[2].parse()?,
            sector_id: fields[3].to_owned(),
            callsign_middle: fields[4].to_owned(),
            callsign_prefix: fields[5].to_owned(),
            callsign_suffix: fields[6].to_owned(),
            squawk_range: squawk_range(fields)?,
            visibility_points: visibility_points(fields)?,
        })
    }

    /// `EDDM_TWR`, or `EDDM_N_TWR` when a middle part is set.
    pub fn callsign(&self) -> String {
        match &*self.callsign_middle {
            "" | "-" => format!("{}_{}", self.callsign_prefix, self.callsign_suffix),
            middle => format!(
                "{}_{}_{}",
                self.callsign_prefix, middle, self.callsign_suffix
            ),
        }
    }
}

fn squawk_range(fields: &Fields<'_>) -> Result<Option<(SquawkCode, SquawkCode)>, LineError> {
    match (fields.optional(SQUAWK_START), fields.optional(SQUAWK_END)) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => Ok(Some((start.parse()?, end.parse()?))),
        (Some(raw), None) | (None, Some(raw)) => Err(LineError::InvalidValue {
            field: "squawk range",
            raw: raw.to_owned(),
        }),
    }
}

fn visibility_points(fields: &Fields<'_>) -> Result<Vec<LatLon>, LineError> {
    let raw = fields.slice(VISIBILITY_POINTS, fields.len());
    let raw: Vec<&str> = raw.iter().cloned().filter(|f| !f.is_empty()).collect();
    if raw.len() % 2 != 0 {
        return Err(LineError::InvalidValue {
            field: "visibility point",
            raw: raw.join(":"),
        });
    }

    raw.into_iter()
        .tuples::<(_, _)>()
        .map(|(lat, lon)| LatLon::from_sct(lat, lon).map_err(LineError::from))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionFile {
    pub positions: Vec<ControllerPosition>,
    pub errors: Vec<ParseError>,
}

impl PositionFile {
    pub fn parse(text: &str) -> PositionFile {
        let mut positions = Vec::new();
        let errors = result::drive(text, |line| {
            positions.push(ControllerPosition::from_line(line)?);
            Ok(())
        });

        debug!(
            records = positions.len(),
            errors = errors.len(),
            "parsed position file"
        );
        PositionFile { positions, errors }
    }

    pub fn position(&self, callsign: &str) -> Option<&ControllerPosition> {
        self.positions.iter().find(|p| p.callsign() == callsign)
    }
}

impl ParseOutcome for PositionFile {
    fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn record_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConversionError, SquawkError};

    #[test]
    fn maps_columns_literally() {
        let position =
            ControllerPosition::from_line("Sydney Tower:Sydney Tower:120.500:SY:N:YSSY:TWR").unwrap();
        assert_eq!(position.name, "Sydney Tower");
        assert_eq!(position.frequency, Frequency::from_khz(120_500));
        assert_eq!(position.sector_id, "SY");
        assert_eq!(position.callsign_middle, "N");
        assert_eq!(position.callsign_prefix, "YSSY");
        assert_eq!(position.callsign_suffix, "TWR");
        assert_eq!(position.callsign(), "YSSY_N_TWR");
        assert_eq!(position.squawk_range, None);
    }

    #[test]
    fn reads_squawk_range_and_visibility() {
        let position = ControllerPosition::from_line(
            "EDDM_TWR:Muenchen Tower:118.700:MT:-:EDDM:TWR:-:-:2001:2077:N048.21.13.000:E011.47.09.000",
        )
        .unwrap();
        assert_eq!(position.callsign(), "EDDM_TWR");
        let (start, end) = position.squawk_range.unwrap();
        assert_eq!((start.to_string(), end.to_string()), ("2001".to_owned(), "2077".to_owned()));
        assert_eq!(position.visibility_points.len(), 1);
    }

    #[test]
    fn rejects_bad_squawk_range() {
        let err = ControllerPosition::from_line("A:B:118.700:C:-:EDDM:TWR:-:-:2001:2089").unwrap_err();
        assert_eq!(
            err,
            LineError::Squawk {
                source: SquawkError::DigitRange {
                    code: "2089".to_owned(),
                    digit: '8'
                }
            }
        );
    }

    #[test]
    fn rejects_bad_frequency() {
        let err = ControllerPosition::from_line("A:B:one:C:-:EDDM:TWR").unwrap_err();
        assert_eq!(
            err,
            LineError::Conversion {
                source: ConversionError::Frequency {
                    raw: "one".to_owned()
                }
            }
        );
    }

    #[test]
    fn short_line_becomes_an_error() {
        let line = "EDDM_TWR:Muenchen Tower:118.700:MT:-";
        let file = PositionFile::parse(line);
        assert!(file.positions.is_empty());
        assert_eq!(file.errors.len(), 1);
        assert_eq!(file.errors[0].message(), "expected at least 7 fields, found 5");
        assert_eq!(file.errors[0].line_content(), line);
    }
}
