use std::fmt;

/// One decoded tilt reading: X and Y acceleration in m/s².
///
/// The sensor also sends a Z field on every line; it is validated but never
/// displayed, so it is dropped here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
}

/// Why a serial line was dropped. Garbled lines are routine on a noisy
/// transport, so these never propagate as errors; the caller skips the line
/// and keeps its previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The bytes were not valid UTF-8.
    Encoding,
    /// The line did not split into exactly three comma-separated fields.
    FieldCount(usize),
    /// A field was not a parseable floating-point literal.
    Number,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding => write!(f, "invalid utf-8"),
            Self::FieldCount(n) => write!(f, "expected 3 fields, got {n}"),
            Self::Number => write!(f, "non-numeric field"),
        }
    }
}

/// Parses one raw serial line of the form `x,y,z` into a [`TiltSample`].
///
/// All three fields must be numeric even though only the first two are
/// returned. Surrounding whitespace and the line terminator are tolerated.
pub fn decode_line(raw: &[u8]) -> Result<TiltSample, IgnoreReason> {
    let text = str::from_utf8(raw).map_err(|_| IgnoreReason::Encoding)?;

    let fields: Vec<&str> = text.trim().split(',').collect();
    if fields.len() != 3 {
        return Err(IgnoreReason::FieldCount(fields.len()));
    }

    let x = parse_field(fields[0])?;
    let y = parse_field(fields[1])?;
    let _z = parse_field(fields[2])?;

    Ok(TiltSample { x, y })
}

fn parse_field(field: &str) -> Result<f32, IgnoreReason> {
    field.trim().parse().map_err(|_| IgnoreReason::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_line_returns_first_two_fields() {
        let sample = decode_line(b"1.25,-3.5,9.81\n").unwrap();
        assert_eq!(sample, TiltSample { x: 1.25, y: -3.5 });
    }

    #[test]
    fn third_field_is_dropped_but_validated() {
        assert!(decode_line(b"1.0,2.0,3.0").is_ok());
        assert_eq!(decode_line(b"1.0,2.0,zzz"), Err(IgnoreReason::Number));
    }

    #[test]
    fn crlf_and_field_whitespace_are_tolerated() {
        let sample = decode_line(b" 0.10, -0.20 ,9.80\r\n").unwrap();
        assert_eq!(sample, TiltSample { x: 0.1, y: -0.2 });
    }

    #[test]
    fn two_fields_are_ignored() {
        assert_eq!(decode_line(b"1.0,2.0"), Err(IgnoreReason::FieldCount(2)));
    }

    #[test]
    fn four_fields_are_ignored() {
        assert_eq!(
            decode_line(b"1.0,2.0,3.0,4.0"),
            Err(IgnoreReason::FieldCount(4))
        );
    }

    #[test]
    fn non_numeric_first_field_is_ignored() {
        assert_eq!(decode_line(b"a,2.0,3.0"), Err(IgnoreReason::Number));
    }

    #[test]
    fn empty_line_is_ignored() {
        assert_eq!(decode_line(b"\n"), Err(IgnoreReason::FieldCount(1)));
    }

    #[test]
    fn invalid_utf8_is_ignored() {
        assert_eq!(
            decode_line(&[0xff, 0xfe, b',', b'1', b',', b'2']),
            Err(IgnoreReason::Encoding)
        );
    }
}
