pub mod editor;
pub mod presets;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use editor::{AppearanceEdit, AppearanceEditor};
pub use presets::{preset_by_id, ThemePreset, THEME_PRESETS};

pub const DEFAULT_BUTTON_COLOR: &str = "#6366F1";
pub const DEFAULT_SHADOW_COLOR: &str = "#000000";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_THEME_ID: &str = "default";
pub const DEFAULT_CORNER_RADIUS: u32 = 12;
pub const MAX_WALLPAPER_OPACITY: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Solid,
    Glass,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShadowStyle {
    None,
    #[default]
    Subtle,
    Strong,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderStyle {
    #[default]
    Simple,
    Banner,
    AvatarTop,
    Minimal,
    HeroPhoto,
}

/// How the banner/header color is chosen when `header_style` shows one.
///
/// With `derived_from_wallpaper == false` the banner paints `custom_color`,
/// falling back to the top-level `header_color` for older documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerSettings {
    #[serde(default = "default_true")]
    pub derived_from_wallpaper: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            derived_from_wallpaper: true,
            custom_color: None,
        }
    }
}

/// Persisted configuration controlling a profile page's visual theme.
///
/// Deserialization never fails on a single bad field. A null, mistyped or
/// unknown value keeps that field's built-in default and numbers are clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    pub button_style: ButtonStyle,
    pub corner_radius: u32,
    pub shadow_style: ShadowStyle,
    pub button_color: String,
    pub shadow_color: String,
    pub text_color: String,
    pub background_color: String,
    pub font_family: String,
    pub header_style: HeaderStyle,
    pub header_color: String,
    pub wallpaper: String,
    pub wallpaper_opacity: u8,
    pub footer_text: String,
    pub show_powered_by: bool,
    pub theme_id: String,
    pub banner: BannerSettings,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            button_style: ButtonStyle::Solid,
            corner_radius: DEFAULT_CORNER_RADIUS,
            shadow_style: ShadowStyle::Subtle,
            button_color: DEFAULT_BUTTON_COLOR.to_string(),
            shadow_color: DEFAULT_SHADOW_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            header_style: HeaderStyle::Simple,
            header_color: String::new(),
            wallpaper: String::new(),
            wallpaper_opacity: MAX_WALLPAPER_OPACITY,
            footer_text: String::new(),
            show_powered_by: true,
            theme_id: DEFAULT_THEME_ID.to_string(),
            banner: BannerSettings::default(),
        }
    }
}

impl AppearanceSettings {
    /// Copy with the numeric invariants re-established and string fields trimmed.
    pub fn normalized(&self) -> Self {
        let mut settings = self.clone();
        settings.wallpaper_opacity = settings.wallpaper_opacity.min(MAX_WALLPAPER_OPACITY);
        if let Some(custom) = settings.banner.custom_color.take() {
            let trimmed = custom.trim();
            settings.banner.custom_color = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        for field in [
            &mut settings.button_color,
            &mut settings.shadow_color,
            &mut settings.text_color,
            &mut settings.background_color,
            &mut settings.header_color,
            &mut settings.wallpaper,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
        settings
    }

    pub fn has_wallpaper(&self) -> bool {
        !self.wallpaper.trim().is_empty()
    }

    /// Wallpaper opacity as a CSS `opacity` value in `[0, 1]`.
    pub fn wallpaper_alpha(&self) -> f64 {
        f64::from(self.wallpaper_opacity.min(MAX_WALLPAPER_OPACITY)) / 100.0
    }
}

pub fn clamp_wallpaper_opacity(value: i64) -> u8 {
    value.clamp(0, i64::from(MAX_WALLPAPER_OPACITY)) as u8
}

pub fn clamp_corner_radius(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

fn default_true() -> bool {
    true
}

impl<'de> Deserialize<'de> for AppearanceSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let mut settings = Self::default();
        for (key, value) in &fields {
            match key.as_str() {
                "buttonStyle" => assign(&mut settings.button_style, key, value),
                "cornerRadius" => match lenient_number(value) {
                    Some(radius) => settings.corner_radius = clamp_corner_radius(radius),
                    None => skipped(key, value),
                },
                "shadowStyle" => assign(&mut settings.shadow_style, key, value),
                "buttonColor" => assign(&mut settings.button_color, key, value),
                "shadowColor" => assign(&mut settings.shadow_color, key, value),
                "textColor" => assign(&mut settings.text_color, key, value),
                "backgroundColor" => assign(&mut settings.background_color, key, value),
                "fontFamily" => assign(&mut settings.font_family, key, value),
                "headerStyle" => assign(&mut settings.header_style, key, value),
                "headerColor" => assign(&mut settings.header_color, key, value),
                "wallpaper" => assign(&mut settings.wallpaper, key, value),
                "wallpaperOpacity" => match lenient_number(value) {
                    Some(opacity) => settings.wallpaper_opacity = clamp_wallpaper_opacity(opacity),
                    None => skipped(key, value),
                },
                "footerText" => assign(&mut settings.footer_text, key, value),
                "showPoweredBy" => assign(&mut settings.show_powered_by, key, value),
                "themeId" => assign(&mut settings.theme_id, key, value),
                "banner" => assign(&mut settings.banner, key, value),
                _ => tracing::debug!(field = %key, "ignoring unknown appearance field"),
            }
        }
        Ok(settings)
    }
}

/// Overwrite `slot` only when `value` has the field's type; the default stays otherwise.
fn assign<T>(slot: &mut T, field: &str, value: &Value)
where
    T: for<'a> Deserialize<'a>,
{
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(_) => skipped(field, value),
    }
}

fn skipped(field: &str, value: &Value) {
    if !value.is_null() {
        tracing::warn!(field, value = %value, "invalid appearance field; keeping default");
    }
}

fn lenient_number(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.round() as i64)),
        Value::String(text) => text.trim().parse::<f64>().ok().map(|v| v.round() as i64),
        _ => None,
    }
}
