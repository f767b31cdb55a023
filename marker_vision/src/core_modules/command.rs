// THEORY:
// The command encoder is the last pure stage before the transport. It turns a
// normalized vector into the receiver's wire format: two fixed-point integers,
// comma separated, newline terminated (`"25,-40\n"`).
//
// Scaling truncates toward zero. Existing receiver firmware was built against
// truncation, so 0.999 * 100 must become 99, never 100.

use crate::core_modules::vector::NormalizedVector;
use crate::error::CommandParseError;
use std::fmt;
use std::str::FromStr;

/// Default fixed-point scale applied to each normalized component.
pub const DEFAULT_SCALE: f64 = 100.0;

/// A wire-ready, fixed-point representation of a normalized vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    pub x: i32,
    pub y: i32,
}

impl Command {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The literal wire payload, `"<x>,<y>\n"`.
    pub fn to_wire(&self) -> String {
        format!("{self}\n")
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_wire().into_bytes()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    /// Parses one wire line. The trailing newline (and a preceding `\r`) is optional.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(',').collect();
        let [x, y] = fields.as_slice() else {
            return Err(CommandParseError::FieldCount(fields.len()));
        };
        let parse = |field: &str| {
            field
                .parse::<i32>()
                .map_err(|_| CommandParseError::InvalidComponent(field.to_string()))
        };
        Ok(Command::new(parse(*x)?, parse(*y)?))
    }
}

/// Encodes with the default scale of 100.
pub fn encode(vector: NormalizedVector) -> Command {
    encode_with_scale(vector, DEFAULT_SCALE)
}

/// Multiplies each component by `scale` and truncates toward zero.
pub fn encode_with_scale(vector: NormalizedVector, scale: f64) -> Command {
    Command {
        x: truncate(vector.x * scale),
        y: truncate(vector.y * scale),
    }
}

#[inline]
fn truncate(value: f64) -> i32 {
    // `as` already truncates toward zero and saturates; NaN maps to 0.
    value.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> NormalizedVector {
        NormalizedVector { x, y }
    }

    #[test]
    fn quarter_vector_on_the_wire() {
        let command = encode(v(0.25, 0.25));
        assert_eq!(command, Command::new(25, 25));
        assert_eq!(command.to_wire(), "25,25\n");
        assert_eq!(command.to_bytes(), b"25,25\n".to_vec());
    }

    #[test]
    fn saturated_component_is_one_hundred() {
        assert_eq!(encode(v(1.0, -1.0)).to_wire(), "100,-100\n");
    }

    #[test]
    fn scaling_truncates_toward_zero() {
        assert_eq!(encode(v(0.999, -0.999)), Command::new(99, -99));
        assert_eq!(encode(v(0.019, -0.019)), Command::new(1, -1));
        assert_eq!(encode(v(0.009, -0.009)), Command::new(0, 0));
        assert_eq!(encode(v(-0.5, 0.505)), Command::new(-50, 50));
    }

    #[test]
    fn custom_scale() {
        assert_eq!(encode_with_scale(v(0.5, -0.25), 1000.0), Command::new(500, -250));
        assert_eq!(encode_with_scale(v(0.5, -0.25), 1.0), Command::new(0, 0));
    }

    #[test]
    fn wire_lines_parse_back() {
        assert_eq!("25,25\n".parse::<Command>(), Ok(Command::new(25, 25)));
        assert_eq!("-100,7".parse::<Command>(), Ok(Command::new(-100, 7)));
        assert_eq!("3,-4\r\n".parse::<Command>(), Ok(Command::new(3, -4)));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert_eq!("25\n".parse::<Command>(), Err(CommandParseError::FieldCount(1)));
        assert_eq!("1,2,3\n".parse::<Command>(), Err(CommandParseError::FieldCount(3)));
        assert_eq!(
            "1.5,2\n".parse::<Command>(),
            Err(CommandParseError::InvalidComponent("1.5".to_string()))
        );
    }
}
