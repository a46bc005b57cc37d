//! CSS color parsing and the WCAG luminance/contrast math built on it.

mod named;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// WCAG AA minimum for normal-size text.
pub const WCAG_AA_NORMAL_TEXT: f64 = 4.5;
/// WCAG AA minimum for large or de-emphasized text.
pub const WCAG_AA_LARGE_TEXT: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex length {0}; expected 3, 4, 6 or 8 digits")]
    InvalidHexLength(usize),
    #[error("invalid hex digits")]
    InvalidHex,
    #[error("invalid rgb()/rgba() function")]
    InvalidFunction,
    #[error("unknown color name: {0}")]
    UnknownName(String),
}

/// An 8-bit sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Composite this color over an opaque backdrop.
    pub fn flatten_over(self, backdrop: Rgba) -> Rgba {
        if self.is_opaque() {
            return self;
        }
        let alpha = f64::from(self.a) / 255.0;
        let mix = |fg: u8, bg: u8| -> u8 {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    /// WCAG 2.x relative luminance in `[0, 1]`. Alpha is ignored; flatten first.
    pub fn relative_luminance(self) -> f64 {
        0.2126 * srgb_to_linear(self.r)
            + 0.7152 * srgb_to_linear(self.g)
            + 0.0722 * srgb_to_linear(self.b)
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// `rgba(r, g, b, a)` with the alpha scaled to `[0, 1]`.
    pub fn to_css_rgba(self, alpha: f64) -> String {
        let alpha = alpha.clamp(0.0, 1.0);
        format!("rgba({}, {}, {}, {alpha:.2})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_css_color(value)
    }
}

pub fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Contrast ratio between two colors, `1.0..=21.0`. Translucent colors are
/// flattened over white first.
pub fn contrast_ratio(fg: Rgba, bg: Rgba) -> f64 {
    let lum_fg = fg.flatten_over(Rgba::WHITE).relative_luminance();
    let lum_bg = bg.flatten_over(Rgba::WHITE).relative_luminance();
    let lighter = lum_fg.max(lum_bg);
    let darker = lum_fg.min(lum_bg);
    (lighter + 0.05) / (darker + 0.05)
}

pub fn meets_contrast(fg: Rgba, bg: Rgba, minimum: f64) -> bool {
    contrast_ratio(fg, bg) >= minimum
}

/// Parse a CSS color: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, `rgb()`/`rgba()`,
/// `hsl()`/`hsla()` and `hwb()` in comma or space syntax, or a named color
/// (including `transparent`).
pub fn parse_css_color(value: &str) -> Result<Rgba, ColorParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ColorParseError::Empty);
    }
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("rgb") {
        return parse_rgb_function(&lower);
    }
    if lower.starts_with("hsl") {
        return parse_hsl_function(&lower);
    }
    if lower.starts_with("hwb") {
        return parse_hwb_function(&lower);
    }
    if lower == "transparent" {
        return Ok(Rgba::TRANSPARENT);
    }
    named::lookup(&lower)
        .map(Rgba::from_u32)
        .ok_or(ColorParseError::UnknownName(lower))
}

pub fn is_valid_css_color(value: &str) -> bool {
    parse_css_color(value).is_ok()
}

fn parse_hex(hex: &str) -> Result<Rgba, ColorParseError> {
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidHex);
    }
    let nibble = |index: usize| -> Result<u8, ColorParseError> {
        u8::from_str_radix(&hex[index..=index], 16).map_err(|_| ColorParseError::InvalidHex)
    };
    let pair = |index: usize| -> Result<u8, ColorParseError> {
        u8::from_str_radix(&hex[index..index + 2], 16).map_err(|_| ColorParseError::InvalidHex)
    };

    match hex.len() {
        3 => Ok(Rgba::rgb(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        4 => Ok(Rgba::new(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            nibble(3)? * 17,
        )),
        6 => Ok(Rgba::rgb(pair(0)?, pair(2)?, pair(4)?)),
        8 => Ok(Rgba::new(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        other => Err(ColorParseError::InvalidHexLength(other)),
    }
}

/// Arguments of `name(...)` or `namea(...)`, split on commas, slashes and
/// whitespace. Only 3 or 4 arguments are accepted.
fn function_args<'a>(lower: &'a str, name: &str) -> Result<Vec<&'a str>, ColorParseError> {
    let rest = lower
        .strip_prefix(name)
        .ok_or(ColorParseError::InvalidFunction)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let body = rest
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(ColorParseError::InvalidFunction)?;

    let parts: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ColorParseError::InvalidFunction);
    }
    Ok(parts)
}

fn optional_alpha(parts: &[&str]) -> Result<u8, ColorParseError> {
    match parts.get(3) {
        Some(raw) => parse_alpha(raw),
        None => Ok(0xFF),
    }
}

fn parse_rgb_function(lower: &str) -> Result<Rgba, ColorParseError> {
    let parts = function_args(lower, "rgb")?;
    let r = parse_channel(parts[0])?;
    let g = parse_channel(parts[1])?;
    let b = parse_channel(parts[2])?;
    Ok(Rgba::new(r, g, b, optional_alpha(&parts)?))
}

fn parse_hsl_function(lower: &str) -> Result<Rgba, ColorParseError> {
    let parts = function_args(lower, "hsl")?;
    let hue = parse_hue(parts[0])?;
    let saturation = parse_unit_percent(parts[1])?;
    let lightness = parse_unit_percent(parts[2])?;
    let [r, g, b] = hsl_to_rgb(hue, saturation, lightness);
    Ok(Rgba::new(
        unit_to_channel(r),
        unit_to_channel(g),
        unit_to_channel(b),
        optional_alpha(&parts)?,
    ))
}

fn parse_hwb_function(lower: &str) -> Result<Rgba, ColorParseError> {
    let parts = function_args(lower, "hwb")?;
    let hue = parse_hue(parts[0])?;
    let whiteness = parse_unit_percent(parts[1])?;
    let blackness = parse_unit_percent(parts[2])?;
    let channels = if whiteness + blackness >= 1.0 {
        let gray = whiteness / (whiteness + blackness);
        [gray; 3]
    } else {
        hsl_to_rgb(hue, 1.0, 0.5).map(|c| c * (1.0 - whiteness - blackness) + whiteness)
    };
    let [r, g, b] = channels;
    Ok(Rgba::new(
        unit_to_channel(r),
        unit_to_channel(g),
        unit_to_channel(b),
        optional_alpha(&parts)?,
    ))
}

/// Hue in degrees; accepts bare numbers and `deg`, `grad`, `rad`, `turn` units.
fn parse_hue(raw: &str) -> Result<f64, ColorParseError> {
    let degrees = if let Some(value) = raw.strip_suffix("deg") {
        parse_number(value)?
    } else if let Some(value) = raw.strip_suffix("grad") {
        parse_number(value)? * 0.9
    } else if let Some(value) = raw.strip_suffix("rad") {
        parse_number(value)?.to_degrees()
    } else if let Some(value) = raw.strip_suffix("turn") {
        parse_number(value)? * 360.0
    } else {
        parse_number(raw)?
    };
    Ok(degrees.rem_euclid(360.0))
}

/// `50%` or `50` as `0.5`, clamped to `[0, 1]`.
fn parse_unit_percent(raw: &str) -> Result<f64, ColorParseError> {
    let value = parse_number(raw.strip_suffix('%').unwrap_or(raw))?;
    Ok((value / 100.0).clamp(0.0, 1.0))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let a = saturation * lightness.min(1.0 - lightness);
    let channel = |n: f64| {
        let k = (n + hue / 30.0) % 12.0;
        lightness - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
    };
    [channel(0.0), channel(8.0), channel(4.0)]
}

fn unit_to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_number(raw: &str) -> Result<f64, ColorParseError> {
    let value: f64 = raw.parse().map_err(|_| ColorParseError::InvalidFunction)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ColorParseError::InvalidFunction)
    }
}

fn parse_channel(raw: &str) -> Result<u8, ColorParseError> {
    let value = match raw.strip_suffix('%') {
        Some(percent) => parse_number(percent)? / 100.0 * 255.0,
        None => parse_number(raw)?,
    };
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(raw: &str) -> Result<u8, ColorParseError> {
    let unit = match raw.strip_suffix('%') {
        Some(percent) => parse_number(percent)? / 100.0,
        None => parse_number(raw)?,
    };
    Ok((unit.clamp(0.0, 1.0) * 255.0).round() as u8)
}
