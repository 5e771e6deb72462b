use crate::error::SquawkError;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Four octal transponder digits. `"0056"` and `56` are the same code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquawkCode([u8; 4]);

impl SquawkCode {
    pub fn digits(self) -> [u8; 4] {
        self.0
    }

    pub fn from_optional(raw: Option<&str>) -> Result<Self, SquawkError> {
        raw.ok_or(SquawkError::Empty)?.parse()
    }

    pub fn is_emergency(self) -> bool {
        matches!(self.0, [7, 5, 0, 0] | [7, 6, 0, 0] | [7, 7, 0, 0])
    }
}

impl FromStr for SquawkCode {
    type Err = SquawkError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(SquawkError::Empty);
        }

        let length = code.chars().count();
        if length != 4 {
            return Err(SquawkError::Length {
                code: code.to_owned(),
                length,
            });
        }

        let mut digits = [0u8; 4];
        for (slot, c) in digits.iter_mut().zip(code.chars()) {
            match c.to_digit(8) {
                Some(d) => *slot = d as u8,
                None => {
                    return Err(SquawkError::DigitRange {
                        code: code.to_owned(),
                        digit: c,
                    })
                }
            }
        }
        Ok(SquawkCode(digits))
    }
}

impl TryFrom<u16> for SquawkCode {
    type Error = SquawkError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value > 9999 {
            let code = value.to_string();
            return Err(SquawkError::Length {
                length: code.len(),
                code,
            });
        }
        format!("{:04}", value).parse()
    }
}

impl From<SquawkCode> for u16 {
    fn from(code: SquawkCode) -> u16 {
        code.0.iter().fold(0, |acc, d| acc * 10 + u16::from(*d))
    }
}

impl fmt::Display for SquawkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}{}{}{}", a, b, c, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn keeps_leading_zeros() {
        let code: SquawkCode = "0056".parse().unwrap();
        assert_eq!(u16::from(code), 56);
        assert_eq!(SquawkCode::try_from(56u16).unwrap().to_string(), "0056");
    }

    #[test]
    fn every_octal_code_round_trips() {
        for (a, b, c, d) in iproduct!(0..8u16, 0..8u16, 0..8u16, 0..8u16) {
            let n = a * 1000 + b * 100 + c * 10 + d;
            let code = SquawkCode::try_from(n).unwrap();
            assert_eq!(code.to_string().parse::<SquawkCode>(), Ok(code));
            assert_eq!(u16::from(code), n);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            "12345".parse::<SquawkCode>(),
            Err(SquawkError::Length {
                code: "12345".to_owned(),
                length: 5
            })
        );
        assert!(matches!(
            SquawkCode::try_from(12345u16),
            Err(SquawkError::Length { length: 5, .. })
        ));
    }

    #[test]
    fn rejects_non_octal_digits() {
        assert_eq!(
            "5678".parse::<SquawkCode>(),
            Err(SquawkError::DigitRange {
                code: "5678".to_owned(),
                digit: '8'
            })
        );
        assert!(matches!(
            "12A4".parse::<SquawkCode>(),
            Err(SquawkError::DigitRange { digit: 'A', .. })
        ));
        assert!(SquawkCode::try_from(19u16).is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!("".parse::<SquawkCode>(), Err(SquawkError::Empty));
        assert_eq!(SquawkCode::from_optional(None), Err(SquawkError::Empty));
    }

    #[test]
    fn flags_emergency_codes() {
        assert!("7700".parse::<SquawkCode>().unwrap().is_emergency());
        assert!(!"1200".parse::<SquawkCode>().unwrap().is_emergency());
    }
}
