use custom_error::custom_error;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error: {source}",
    Zip{source: zip::result::ZipError} = "archive error: {source}",
    UnknownFileKind{name: String} = "cannot determine the file kind of '{name}'",
    MissingMember{name: String} = "archive has no member '{name}'"
}

custom_error! {#[derive(Clone, PartialEq, Eq)] pub ConversionError
    Coordinate{token: String} = "invalid coordinate '{token}'",
    Frequency{raw: String} = "invalid frequency '{raw}'",
    Altitude{raw: String} = "invalid altitude '{raw}'",
    Heading{raw: String} = "invalid heading '{raw}'",
    Number{field: &'static str, raw: String} = "invalid {field} '{raw}'",
    Facility{raw: String} = "invalid facility '{raw}'"
}

custom_error! {#[derive(Clone, PartialEq, Eq)] pub SquawkError
    Empty = "squawk code is empty",
    Length{code: String, length: usize} = "squawk code '{code}' must have exactly 4 digits, found {length}",
    DigitRange{code: String, digit: char} = "squawk code '{code}' contains '{digit}', digits must be 0-7"
}

// One per rejected line; the driver in `result` wraps it into a `ParseError`.
custom_error! {#[derive(Clone, PartialEq, Eq)] pub LineError
    FieldCount{expected: usize, actual: usize} = "expected at least {expected} fields, found {actual}",
    Conversion{source: ConversionError} = "{source}",
    Squawk{source: SquawkError} = "{source}",
    InvalidClientType{client_type: String} = "invalid client type '{client_type}'",
    OutsideSection = "data line outside of a supported section",
    UnsupportedEntry{entry: String} = "unsupported entry '{entry}'",
    InvalidValue{field: &'static str, raw: String} = "invalid {field} '{raw}'",
    Incomplete{record: &'static str, detail: String} = "incomplete {record}: {detail}"
}

/// A rejected line: where it was, what it said and why it was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    line_number: usize,
    line_content: String,
    message: String,
    kind: LineError,
}

impl ParseError {
    pub(crate) fn new(line_number: usize, line_content: &str, kind: LineError) -> Self {
        ParseError {
            line_number,
            line_content: line_content.to_owned(),
            message: kind.to_string(),
            kind,
        }
    }

    /// 1-based line number in the source text.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The source line verbatim, without its terminator.
    pub fn line_content(&self) -> &str {
        &self.line_content
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &LineError {
        &self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_count_message_names_both_counts() {
        let err = LineError::FieldCount {
            expected: 7,
            actual: 5,
        };
        assert_eq!(err.to_string(), "expected at least 7 fields, found 5");
    }

    #[test]
    fn conversion_errors_convert_into_line_errors() {
        let err: LineError = ConversionError::Altitude {
            raw: "null".to_owned(),
        }
        .into();
        assert_eq!(err.to_string(), "invalid altitude 'null'");
    }

    #[test]
    fn parse_error_keeps_line_verbatim() {
        let err = ParseError::new(3, "  EDDM_TWR:x", LineError::OutsideSection);
        assert_eq!(err.line_number(), 3);
        assert_eq!(err.line_content(), "  EDDM_TWR:x");
        assert_eq!(err.message(), "data line outside of a supported section");
        assert_eq!(err.to_string(), "line 3: data line outside of a supported section");
    }
}
