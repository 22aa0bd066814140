use serde::{Deserialize, Serialize};

/// Errors from parsing color strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("expected 3 or 6 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b, 1.0])
    }

    /// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb`. Alpha is always 1.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Digit(s.to_string()));
        }
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(ColorError::Length(s.to_string())),
        };
        let channel = |i: usize| -> Result<f32, ColorError> {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorError::Digit(s.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?, 1.0]))
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", c(self.0[0]), c(self.0[1]), c(self.0[2]))
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [c(self.0[0]), c(self.0[1]), c(self.0[2])]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = Rgba::from_hex("#488ba8").unwrap();
        assert_eq!(c.to_rgb8(), [0x48, 0x8b, 0xa8]);
        assert_eq!(c.0[3], 1.0);
    }

    #[test]
    fn parses_short_hex_without_hash() {
        let c = Rgba::from_hex("fff").unwrap();
        assert_eq!(c, Rgba::WHITE);
    }

    #[test]
    fn hex_round_trip_is_lowercase() {
        assert_eq!(Rgba::from_hex("#488BA8").unwrap().to_hex(), "#488ba8");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(Rgba::from_hex("#12345"), Err(ColorError::Length(_))));
        assert!(matches!(Rgba::from_hex("#zzzzzz"), Err(ColorError::Digit(_))));
        assert!(matches!(Rgba::from_hex(""), Err(ColorError::Length(_))));
    }
}
