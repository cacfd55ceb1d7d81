use std::str;

use lazy_static::lazy_static;
use log::debug;
use regex::bytes::Regex;

use crate::error::{AcquisitionError, Result};
use super::AcquisitionSetup;

pub const PREAMBLE_FIELDS:usize = 10;

lazy_static! {
    static ref INT_RE: Regex   = Regex::new(r"^[ \t\n\x0B\x0C\r]*([+-]?[0-9]+)").unwrap();
    static ref FLOAT_RE: Regex = Regex::new(r"^[ \t\n\x0B\x0C\r]*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap();
}

// Field order on the wire: format, type, points, count, then the six scale/offset floats
fn is_integer_field(idx:usize) -> bool { idx < 4 }

fn assign(setup:&mut AcquisitionSetup, idx:usize, token:&str) -> bool {
    match idx {
        0 => token.parse().map(|v| setup.format = v).is_ok(),
        1 => token.parse().map(|v| setup.kind = v).is_ok(),
        2 => token.parse().map(|v| setup.points = v).is_ok(),
        3 => token.parse().map(|v| setup.count = v).is_ok(),
        4 => token.parse().map(|v| setup.x_increment = v).is_ok(),
        5 => token.parse().map(|v| setup.x_origin = v).is_ok(),
        6 => token.parse().map(|v| setup.x_reference = v).is_ok(),
        7 => token.parse().map(|v| setup.y_increment = v).is_ok(),
        8 => token.parse().map(|v| setup.y_origin = v).is_ok(),
        9 => token.parse().map(|v| setup.y_reference = v).is_ok(),
        _ => false,
    }
}

/// Scans the ten comma separated preamble fields left to right.
///
/// Stops at the first field that doesn't have the expected numeric shape (or isn't followed by a comma)
/// and returns how many fields made it into the setup. Anything short of `PREAMBLE_FIELDS` leaves the
/// remaining fields at their defaults.
pub fn parse_preamble(line:&[u8]) -> (AcquisitionSetup, usize) {
    let mut setup = AcquisitionSetup::default();
    let mut rest:&[u8] = line;

    for idx in 0..PREAMBLE_FIELDS {
        if idx > 0 {
            match rest.split_first() {
                Some((b',', tail)) => rest = tail,
                _ => return (setup, idx),
            }
        }

        let re:&Regex = if is_integer_field(idx) { &INT_RE } else { &FLOAT_RE };
        let (token, end) = match re.captures(rest).and_then(|c| Some((c.get(1)?, c.get(0)?.end()))) {
            Some((m, end)) => (m.as_bytes(), end),
            None => return (setup, idx),
        };

        let ok = str::from_utf8(token).map(|t| assign(&mut setup, idx, t)).unwrap_or(false);
        if !ok { return (setup, idx); }

        rest = &rest[end..];
    }

    (setup, PREAMBLE_FIELDS)
}

impl AcquisitionSetup {

    /// Parse a preamble line, refusing anything that doesn't supply all ten fields.
    pub fn from_preamble(line:&[u8]) -> Result<Self> {
        let (setup, fields) = parse_preamble(line);
        debug!("preamble parsed {} fields: {:?}", fields, setup);

        if fields != PREAMBLE_FIELDS {
            return Err(AcquisitionError::IncompletePreamble { fields });
        }

        Ok(setup)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_preamble_is_taken_literally() {
        let (s, n) = parse_preamble(b"1,2,500,1,4E-9,-1E-6,0,1.5E-3,0,127\n");
        assert_eq!(n, 10);
        assert_eq!(s.format, 1);
        assert_eq!(s.kind, 2);
        assert_eq!(s.points, 500);
        assert_eq!(s.count, 1);
        assert_eq!(s.x_increment, 4e-9);
        assert_eq!(s.x_origin, -1e-6);
        assert_eq!(s.x_reference, 0.0);
        assert_eq!(s.y_increment, 1.5e-3);
        assert_eq!(s.y_origin, 0.0);
        assert_eq!(s.y_reference, 127.0);
    }

    #[test]
    fn accepts_plain_decimals_and_leading_whitespace() {
        let (s, n) = parse_preamble(b" 0, 0,1200,1, .002,-0.5e+1,600., 3.125e-2,+1.5,128");
        assert_eq!(n, 10);
        assert_eq!(s.x_increment, 0.002);
        assert_eq!(s.x_origin, -5.0);
        assert_eq!(s.x_reference, 600.0);
        assert_eq!(s.y_increment, 0.03125);
        assert_eq!(s.y_origin, 1.5);
    }

    #[test]
    fn stops_at_first_malformed_field() {
        let (s, n) = parse_preamble(b"1,2,500,1,4E-9,abc,0,1,0,127\n");
        assert_eq!(n, 5);
        assert_eq!(s.points, 500);
        assert_eq!(s.x_increment, 4e-9);
        assert_eq!(s.x_origin, 0.0);
    }

    #[test]
    fn fractional_integer_field_stops_at_the_dot() {
        let (s, n) = parse_preamble(b"1,2,500.5,1,4E-9,0,0,1,0,127");
        assert_eq!(n, 3);
        assert_eq!(s.points, 500);
    }

    #[test]
    fn negative_point_count_is_rejected() {
        assert_eq!(parse_preamble(b"1,2,-500,1,1,0,0,1,0,0").1, 2);
    }

    #[test]
    fn short_lines_report_fewer_fields() {
        assert_eq!(parse_preamble(b"").1, 0);
        assert_eq!(parse_preamble(b"\n").1, 0);
        assert_eq!(parse_preamble(b"1,2,500,1\n").1, 4);
        assert_eq!(parse_preamble(b"1,2,500,1,4E-9,-1E-6,0,1.5E-3,0").1, 9);
        assert_eq!(parse_preamble(b"1;2;500").1, 1);
    }

    #[test]
    fn from_preamble_requires_all_fields() {
        match AcquisitionSetup::from_preamble(b"1,2,500,1,4E-9\n") {
            Err(AcquisitionError::IncompletePreamble { fields }) => assert_eq!(fields, 5),
            other => panic!("expected incomplete preamble, got {:?}", other),
        }
        assert!(AcquisitionSetup::from_preamble(b"1,2,500,1,4E-9,-1E-6,0,1.5E-3,0,127\n").is_ok());
    }
}
