//! Color interpolation capability
//!
//! Animated color properties are interpolated through [`ColorMixer`]. The
//! engine ships [`RgbaMixer`], which understands hex, `rgb()`, `rgba()` and
//! `transparent`; hosts with a full color library can supply their own.

use crate::error::{AnimationError, AnimationResult};

/// Mixes color strings
pub trait ColorMixer {
    /// Color `fraction` of the way from `from` to `to`
    fn mix(&self, from: &str, to: &str, fraction: f64) -> AnimationResult<String>;

    /// `color` with its alpha set to `alpha`
    fn alpha(&self, color: &str, alpha: f64) -> AnimationResult<String>;
}

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in [0, 1]
    pub a: f64,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)` or `transparent`
    pub fn parse(text: &str) -> AnimationResult<Self> {
        let trimmed = text.trim();
        let invalid = || AnimationError::InvalidColor(text.to_string());

        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::from_hex(hex).ok_or_else(invalid);
        }

        let lower = trimmed.to_ascii_lowercase();
        let inner = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid());
        }

        let channel = |part: &str| -> AnimationResult<u8> {
            let value: f64 = part.parse().map_err(|_| invalid())?;
            Ok(value.round().clamp(0.0, 255.0) as u8)
        };
        let a = match parts.get(3) {
            Some(part) => part.parse::<f64>().map_err(|_| invalid())?.clamp(0.0, 1.0),
            None => 1.0,
        };
        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                a: byte(6)? as f64 / 255.0,
                ..Self::rgb(byte(0)?, byte(2)?, byte(4)?)
            }),
            _ => None,
        }
    }

    /// Channel-wise linear interpolation
    pub fn mix(&self, to: &Rgba, fraction: f64) -> Rgba {
        let fraction = fraction.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;
        Rgba {
            r: lerp(self.r, to.r),
            g: lerp(self.g, to.g),
            b: lerp(self.b, to.b),
            a: self.a + (to.a - self.a) * fraction,
        }
    }

    /// Convert to CSS color string
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = (self.a * 1000.0).round() / 1000.0;
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

/// [`ColorMixer`] over [`Rgba`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbaMixer;

impl ColorMixer for RgbaMixer {
    fn mix(&self, from: &str, to: &str, fraction: f64) -> AnimationResult<String> {
        let from = Rgba::parse(from)?;
        let to = Rgba::parse(to)?;
        Ok(from.mix(&to, fraction).to_css())
    }

    fn alpha(&self, color: &str, alpha: f64) -> AnimationResult<String> {
        let color = Rgba::parse(color)?;
        Ok(Rgba {
            a: alpha.clamp(0.0, 1.0),
            ..color
        }
        .to_css())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(Rgba::parse("#ff0000").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::parse("#0f0").unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!(Rgba::parse("rgb(1, 2, 3)").unwrap(), Rgba::rgb(1, 2, 3));
        assert_eq!(Rgba::parse("rgba(1,2,3,0.5)").unwrap().a, 0.5);
        assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);
        assert_eq!(Rgba::parse("#00000080").unwrap().a, 128.0 / 255.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgba::parse("not-a-color").is_err());
        assert!(Rgba::parse("#12").is_err());
        assert!(Rgba::parse("rgb(1, 2)").is_err());
        assert!(Rgba::parse("rgb(a, b, c)").is_err());
    }

    #[test]
    fn test_mix_midpoint() {
        let mixer = RgbaMixer;
        assert_eq!(mixer.mix("#000000", "#ffffff", 0.5).unwrap(), "rgb(128, 128, 128)");
        assert!(mixer.mix("red", "blue", 0.5).is_err());
    }

    #[test]
    fn test_mix_from_transparent() {
        let mixer = RgbaMixer;
        assert_eq!(mixer.mix("transparent", "rgb(200, 100, 0)", 0.5).unwrap(), "rgba(100, 50, 0, 0.5)");
    }

    #[test]
    fn test_alpha() {
        assert_eq!(RgbaMixer.alpha("#ff0000", 0.25).unwrap(), "rgba(255, 0, 0, 0.25)");
    }
}
