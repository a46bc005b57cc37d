//! Appearance resolution: maps [`AppearanceSettings`] plus the host's dark-mode
//! signal to the colors every renderer paints with.
//!
//! Every function here is total. Malformed colors, gradients without color
//! stops and unknown wallpaper syntax degrade to fixed fallbacks; nothing
//! returns an error and nothing panics. Editor preview, mobile preview and the
//! public page all call [`resolve_colors`], so they agree on every output.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

use crate::appearance::{AppearanceSettings, DEFAULT_BACKGROUND_COLOR, DEFAULT_BUTTON_COLOR};
use crate::color::{
    contrast_ratio, parse_css_color, Rgba, WCAG_AA_LARGE_TEXT, WCAG_AA_NORMAL_TEXT,
};

/// Relative luminance at or below which a background counts as dark.
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.179;
/// Base color assumed for image wallpapers; pixels are never sampled.
pub const IMAGE_WALLPAPER_BASE: &str = "#F3F4F6";
/// Used when a gradient has no extractable stop and the button color is unusable.
pub const NEUTRAL_GRADIENT_FALLBACK: &str = "#9CA3AF";

const DARK_NAME_COLOR: &str = "#FFFFFF";
const DARK_BIO_COLOR: &str = "#E5E7EB";
const LIGHT_NAME_COLOR: &str = "#111827";
const LIGHT_BIO_COLOR: &str = "#4B5563";
const MAX_CONTRAST_NAME_COLOR: &str = "#000000";

static HEX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{4}|[0-9a-fA-F]{3})\b")
        .expect("hex token pattern")
});
static RGB_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rgba?\([^)]*\)").expect("rgb token pattern"));
static GRADIENT_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:repeating-)?(?:linear|radial|conic)-gradient\(")
        .expect("gradient function pattern")
});

/// Syntactic class of a wallpaper string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallpaperKind {
    Empty,
    Color,
    Gradient,
    Image,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BackgroundPaint {
    SolidColor {
        color: String,
    },
    Gradient {
        css: String,
        base: String,
    },
    ImageLayer {
        source: String,
        opacity: u8,
        fallback: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColors {
    pub name_color: &'static str,
    pub bio_color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColors {
    pub background_paint: BackgroundPaint,
    pub base_color: String,
    pub name_color: String,
    pub bio_color: String,
    pub is_dark_background: bool,
    pub banner_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BaseColor {
    css: String,
    rgba: Rgba,
}

impl BaseColor {
    fn constant(css: &'static str, fallback: Rgba) -> Self {
        Self {
            css: css.to_string(),
            rgba: parse_css_color(css).unwrap_or(fallback),
        }
    }

    fn parsed(css: &str) -> Option<Self> {
        let css = css.trim();
        parse_css_color(css).ok().map(|rgba| Self {
            css: css.to_string(),
            rgba,
        })
    }
}

pub fn classify_wallpaper(wallpaper: &str) -> WallpaperKind {
    let trimmed = wallpaper.trim();
    if trimmed.is_empty() {
        return WallpaperKind::Empty;
    }
    let lower = trimmed.to_ascii_lowercase();
    if is_image_source(&lower) {
        WallpaperKind::Image
    } else if lower.starts_with('#') || lower.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        WallpaperKind::Color
    } else if lower.contains("gradient") {
        WallpaperKind::Gradient
    } else {
        WallpaperKind::Other
    }
}

fn is_image_source(lower: &str) -> bool {
    ["http://", "https://", "url(", "data:image", "blob:", "/"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// The single color text contrast is computed against.
pub fn resolve_background_base_color(settings: &AppearanceSettings) -> String {
    resolve_base(settings).css
}

fn resolve_base(settings: &AppearanceSettings) -> BaseColor {
    let wallpaper = settings.wallpaper.trim();
    match classify_wallpaper(wallpaper) {
        WallpaperKind::Empty => background_or_default(settings),
        WallpaperKind::Color | WallpaperKind::Other => {
            BaseColor::parsed(wallpaper).unwrap_or_else(|| {
                tracing::debug!(wallpaper, "wallpaper is not a valid color; using background color");
                background_or_default(settings)
            })
        }
        WallpaperKind::Gradient => extract_gradient_color(wallpaper).unwrap_or_else(|| {
            tracing::debug!(wallpaper, "gradient has no extractable color stop");
            button_or_neutral(settings)
        }),
        WallpaperKind::Image => BaseColor::constant(IMAGE_WALLPAPER_BASE, Rgba::WHITE),
    }
}

fn background_or_default(settings: &AppearanceSettings) -> BaseColor {
    BaseColor::parsed(&settings.background_color)
        .unwrap_or_else(|| BaseColor::constant(DEFAULT_BACKGROUND_COLOR, Rgba::WHITE))
}

fn button_or_neutral(settings: &AppearanceSettings) -> BaseColor {
    BaseColor::parsed(&settings.button_color)
        .unwrap_or_else(|| BaseColor::constant(NEUTRAL_GRADIENT_FALLBACK, Rgba::WHITE))
}

/// First hex color stop of a gradient expression, else its first parseable
/// `rgb()`/`rgba()` stop.
pub fn extract_gradient_color_stop(gradient: &str) -> Option<String> {
    extract_gradient_color(gradient).map(|base| base.css)
}

fn extract_gradient_color(gradient: &str) -> Option<BaseColor> {
    if let Some(token) = HEX_TOKEN.find(gradient) {
        if let Some(base) = BaseColor::parsed(token.as_str()) {
            return Some(base);
        }
    }
    RGB_TOKEN
        .find_iter(gradient)
        .find_map(|token| BaseColor::parsed(token.as_str()))
}

/// True when `css` is a single CSS gradient function that can be pasted into a
/// declaration as-is: a known gradient name, balanced parentheses closing at
/// the final character, and no characters that end a declaration or rule.
pub fn is_well_formed_gradient(css: &str) -> bool {
    let css = css.trim();
    if !GRADIENT_FUNCTION.is_match(css) || !css.ends_with(')') {
        return false;
    }
    if css.chars().any(|c| {
        c.is_control() || matches!(c, ';' | '{' | '}' | '<' | '>' | '\\' | '"' | '\'' | '@')
    }) {
        return false;
    }
    let lower = css.to_ascii_lowercase();
    if lower.contains("url(") || lower.contains("expression(") || lower.contains("/*") {
        return false;
    }

    let last = css.len() - 1;
    let mut depth = 0usize;
    for (index, byte) in css.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                let Some(next) = depth.checked_sub(1) else {
                    return false;
                };
                depth = next;
                if depth == 0 && index != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Color a wallpaper contributes on its own; `None` for empty and image
/// wallpapers and for gradients without a usable stop.
fn wallpaper_color(settings: &AppearanceSettings) -> Option<BaseColor> {
    let wallpaper = settings.wallpaper.trim();
    match classify_wallpaper(wallpaper) {
        WallpaperKind::Color | WallpaperKind::Other => BaseColor::parsed(wallpaper),
        WallpaperKind::Gradient => extract_gradient_color(wallpaper),
        WallpaperKind::Empty | WallpaperKind::Image => None,
    }
}

/// Dark iff WCAG relative luminance is at most [`DARK_LUMINANCE_THRESHOLD`].
/// Unparseable input counts as light.
pub fn is_background_dark(base_color: &str) -> bool {
    match parse_css_color(base_color) {
        Ok(rgba) => is_dark_rgba(rgba),
        Err(err) => {
            tracing::debug!(base_color, %err, "unparseable base color; treating as light");
            false
        }
    }
}

fn is_dark_rgba(rgba: Rgba) -> bool {
    rgba.flatten_over(Rgba::WHITE).relative_luminance() <= DARK_LUMINANCE_THRESHOLD
}

/// Name and bio colors for `base_color`.
///
/// `dark_mode_hint = Some(dark)` means the host theme decides (the wallpaper is
/// empty) and the fixed pair for that mode is returned as-is. With `None` the
/// base is classified, and a fixed color that misses its WCAG floor (4.5:1 for
/// the name, 3:1 for the bio) is replaced by a stronger one.
pub fn pick_text_colors(base_color: &str, dark_mode_hint: Option<bool>) -> TextColors {
    let base = parse_css_color(base_color).unwrap_or(Rgba::WHITE);
    text_colors_for(base, dark_mode_hint)
}

fn text_colors_for(base: Rgba, dark_mode_hint: Option<bool>) -> TextColors {
    if let Some(dark) = dark_mode_hint {
        return fixed_pair(dark);
    }

    let dark = is_dark_rgba(base);
    let mut colors = fixed_pair(dark);
    let strongest = if dark {
        DARK_NAME_COLOR
    } else {
        MAX_CONTRAST_NAME_COLOR
    };
    let passes = |css: &str, floor: f64| {
        parse_css_color(css).is_ok_and(|fg| contrast_ratio(fg, base) >= floor)
    };

    if !passes(colors.name_color, WCAG_AA_NORMAL_TEXT) {
        colors.name_color = strongest;
    }
    if !passes(colors.bio_color, WCAG_AA_LARGE_TEXT) {
        let primary = fixed_pair(dark).name_color;
        colors.bio_color = if passes(primary, WCAG_AA_LARGE_TEXT) {
            primary
        } else {
            strongest
        };
    }
    colors
}

const fn fixed_pair(dark: bool) -> TextColors {
    if dark {
        TextColors {
            name_color: DARK_NAME_COLOR,
            bio_color: DARK_BIO_COLOR,
        }
    } else {
        TextColors {
            name_color: LIGHT_NAME_COLOR,
            bio_color: LIGHT_BIO_COLOR,
        }
    }
}

/// Banner/header color. When the banner is not derived from the wallpaper,
/// `banner.custom_color` wins, then `header_color`. Otherwise (or when neither
/// is a valid color) the wallpaper's color, then the button color. Never empty.
pub fn resolve_banner_color(settings: &AppearanceSettings) -> String {
    if !settings.banner.derived_from_wallpaper {
        let candidates = [
            settings.banner.custom_color.as_deref().unwrap_or_default(),
            settings.header_color.as_str(),
        ];
        for custom in candidates.map(str::trim).into_iter().filter(|c| !c.is_empty()) {
            if parse_css_color(custom).is_ok() {
                return custom.to_string();
            }
            tracing::debug!(custom_color = custom, "invalid custom banner color; skipping");
        }
    }

    if let Some(base) = wallpaper_color(settings) {
        return base.css;
    }
    BaseColor::parsed(&settings.button_color)
        .map(|base| base.css)
        .unwrap_or_else(|| DEFAULT_BUTTON_COLOR.to_string())
}

/// Resolve everything a renderer needs from one settings value.
pub fn resolve_colors(settings: &AppearanceSettings, is_dark_mode_hint: bool) -> ResolvedColors {
    let settings = settings.normalized();
    let wallpaper = settings.wallpaper.as_str();
    let kind = classify_wallpaper(wallpaper);
    let base = resolve_base(&settings);

    let hint = (kind == WallpaperKind::Empty).then_some(is_dark_mode_hint);
    let text = text_colors_for(base.rgba, hint);
    let is_dark_background = hint.unwrap_or_else(|| is_dark_rgba(base.rgba));

    let background_paint = match kind {
        WallpaperKind::Gradient if is_well_formed_gradient(wallpaper) => {
            BackgroundPaint::Gradient {
                css: wallpaper.to_string(),
                base: base.css.clone(),
            }
        }
        WallpaperKind::Gradient => {
            tracing::warn!(wallpaper, "malformed gradient wallpaper; painting its base color");
            BackgroundPaint::SolidColor {
                color: base.css.clone(),
            }
        }
        WallpaperKind::Image => BackgroundPaint::ImageLayer {
            source: wallpaper.to_string(),
            opacity: settings.wallpaper_opacity,
            fallback: base.css.clone(),
        },
        WallpaperKind::Empty | WallpaperKind::Color | WallpaperKind::Other => {
            BackgroundPaint::SolidColor {
                color: base.css.clone(),
            }
        }
    };

    ResolvedColors {
        background_paint,
        name_color: text.name_color.to_string(),
        bio_color: text.bio_color.to_string(),
        is_dark_background,
        banner_color: resolve_banner_color(&settings),
        base_color: base.css,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::BannerSettings;

    fn with_wallpaper(wallpaper: &str) -> AppearanceSettings {
        AppearanceSettings {
            wallpaper: wallpaper.to_string(),
            ..AppearanceSettings::default()
        }
    }

    fn ratio(fg: &str, bg: &str) -> f64 {
        contrast_ratio(
            parse_css_color(fg).unwrap(),
            parse_css_color(bg).unwrap(),
        )
    }

    #[test]
    fn classify_wallpaper_covers_each_form() {
        assert_eq!(classify_wallpaper("  "), WallpaperKind::Empty);
        assert_eq!(classify_wallpaper("#112233"), WallpaperKind::Color);
        assert_eq!(classify_wallpaper("navy"), WallpaperKind::Color);
        assert_eq!(
            classify_wallpaper("radial-gradient(circle, #fff, #000)"),
            WallpaperKind::Gradient
        );
        assert_eq!(
            classify_wallpaper("https://cdn.example/gradient.png"),
            WallpaperKind::Image
        );
        assert_eq!(classify_wallpaper("url('/bg.jpg')"), WallpaperKind::Image);
        assert_eq!(classify_wallpaper("rgb(1, 2, 3)"), WallpaperKind::Other);
    }

    #[test]
    fn empty_wallpaper_uses_background_color() {
        let settings = AppearanceSettings {
            background_color: "#0F172A".to_string(),
            ..AppearanceSettings::default()
        };
        assert_eq!(resolve_background_base_color(&settings), "#0F172A");

        let broken = AppearanceSettings {
            background_color: "not a color".to_string(),
            ..AppearanceSettings::default()
        };
        assert_eq!(resolve_background_base_color(&broken), "#FFFFFF");
    }

    #[test]
    fn color_wallpaper_is_returned_directly() {
        assert_eq!(resolve_background_base_color(&with_wallpaper("#abc")), "#abc");
        assert_eq!(resolve_background_base_color(&with_wallpaper("teal")), "teal");
        assert_eq!(
            resolve_background_base_color(&with_wallpaper("#nothex")),
            "#FFFFFF"
        );
    }

    #[test]
    fn invalid_color_wallpaper_falls_back_to_background_color() {
        let settings = AppearanceSettings {
            background_color: "#0F172A".to_string(),
            ..with_wallpaper("#nothex")
        };
        assert_eq!(resolve_background_base_color(&settings), "#0F172A");
        let resolved = resolve_colors(&settings, false);
        assert!(resolved.is_dark_background);
        assert_eq!(
            resolved.background_paint,
            BackgroundPaint::SolidColor {
                color: "#0F172A".to_string()
            }
        );
    }

    #[test]
    fn hsl_wallpaper_is_used_literally() {
        let settings = AppearanceSettings {
            background_color: "#FFFFFF".to_string(),
            ..with_wallpaper("hsl(220, 60%, 10%)")
        };
        assert_eq!(resolve_background_base_color(&settings), "hsl(220, 60%, 10%)");
        let resolved = resolve_colors(&settings, false);
        assert!(resolved.is_dark_background);
        assert_eq!(resolved.name_color, "#FFFFFF");
        assert_eq!(
            resolved.background_paint,
            BackgroundPaint::SolidColor {
                color: "hsl(220, 60%, 10%)".to_string()
            }
        );
        assert_eq!(resolve_banner_color(&settings), "hsl(220, 60%, 10%)");
    }

    #[test]
    fn gradient_extraction_returns_first_hex_stop() {
        let settings = with_wallpaper("linear-gradient(135deg, #667eea 0%, #764ba2 100%)");
        assert_eq!(resolve_background_base_color(&settings), "#667eea");
    }

    #[test]
    fn gradient_extraction_accepts_short_and_alpha_hex_stops() {
        assert_eq!(
            extract_gradient_color_stop("linear-gradient(#f0a8, #000)").as_deref(),
            Some("#f0a8")
        );
        assert_eq!(
            extract_gradient_color_stop("linear-gradient(#12345678, #000)").as_deref(),
            Some("#12345678")
        );
        assert_eq!(
            extract_gradient_color_stop("linear-gradient(#12345, rgb(1,2,3))").as_deref(),
            Some("rgb(1,2,3)")
        );
    }

    #[test]
    fn gradient_extraction_falls_back_to_rgb_then_button_then_gray() {
        let rgb = with_wallpaper("linear-gradient(rgba(255, 0, 0, 0.5), rgb(0, 0, 255))");
        assert_eq!(resolve_background_base_color(&rgb), "rgba(255, 0, 0, 0.5)");

        let no_stops = with_wallpaper("linear-gradient(to right, red, blue)");
        assert_eq!(resolve_background_base_color(&no_stops), "#6366F1");

        let no_button = AppearanceSettings {
            button_color: "???".to_string(),
            ..with_wallpaper("conic-gradient(from 0deg)")
        };
        assert_eq!(resolve_background_base_color(&no_button), "#9CA3AF");
    }

    #[test]
    fn image_wallpaper_uses_neutral_base() {
        for wallpaper in ["https://img.example/a.jpg", "url(bg.png)", "/uploads/x.webp"] {
            assert_eq!(
                resolve_background_base_color(&with_wallpaper(wallpaper)),
                IMAGE_WALLPAPER_BASE
            );
        }
    }

    #[test]
    fn base_color_resolution_is_total() {
        let inputs = [
            "",
            "#",
            "##",
            "gradient",
            "linear-gradient(",
            "linear-gradient(rgb(,,), #)",
            "rgb(",
            "url(",
            "🎨🎨🎨",
            "\u{0}\u{7f}",
            "#ééé",
            "javascript:alert(1)",
            "a b c",
            "lİnear-gradİent(#fff)",
        ];
        for input in inputs {
            let base = resolve_background_base_color(&with_wallpaper(input));
            assert!(
                parse_css_color(&base).is_ok(),
                "input {input:?} produced invalid base {base:?}"
            );
            let resolved = resolve_colors(&with_wallpaper(input), false);
            assert!(!resolved.banner_color.is_empty());
        }
    }

    #[test]
    fn dark_classification_boundary() {
        assert!(is_background_dark("#000000"));
        assert!(!is_background_dark("#FFFFFF"));
        // #767676 sits at L ~= 0.1812, just above the cutoff; #757575 at ~0.1779.
        let mid = parse_css_color("#767676").unwrap().relative_luminance();
        assert!(mid > DARK_LUMINANCE_THRESHOLD);
        assert!(!is_background_dark("#767676"));
        let below = parse_css_color("#757575").unwrap().relative_luminance();
        assert!(below <= DARK_LUMINANCE_THRESHOLD);
        assert!(is_background_dark("#757575"));
        assert!(!is_background_dark("garbage"));
    }

    #[test]
    fn pick_text_colors_uses_fixed_pairs() {
        let dark = pick_text_colors("#111827", None);
        assert_eq!(dark.name_color, "#FFFFFF");
        assert_eq!(dark.bio_color, "#E5E7EB");

        let light = pick_text_colors("#FFFFFF", None);
        assert_eq!(light.name_color, "#111827");
        assert_eq!(light.bio_color, "#4B5563");
    }

    #[test]
    fn pick_text_colors_trusts_hint_when_given() {
        let colors = pick_text_colors("#FFFFFF", Some(true));
        assert_eq!(colors.name_color, "#FFFFFF");
        assert_eq!(colors.bio_color, "#E5E7EB");
    }

    #[test]
    fn pick_text_colors_escalates_near_the_threshold() {
        let colors = pick_text_colors("#767676", None);
        assert_eq!(colors.name_color, "#000000");
        assert_eq!(colors.bio_color, "#111827");
    }

    #[test]
    fn contrast_floors_hold_across_lightness_sweep() {
        let mut samples: Vec<Rgba> = (0..=255u8).map(|v| Rgba::rgb(v, v, v)).collect();
        for step in (0..=255u16).step_by(17) {
            let v = step as u8;
            samples.push(Rgba::rgb(v, 0, 0));
            samples.push(Rgba::rgb(0, v, 0));
            samples.push(Rgba::rgb(0, 0, v));
            samples.push(Rgba::rgb(v, v / 2, 255 - v));
            samples.push(Rgba::rgb(255, v, 255 - v));
        }
        for base in samples {
            let css = base.to_hex();
            let colors = pick_text_colors(&css, None);
            let name = ratio(colors.name_color, &css);
            let bio = ratio(colors.bio_color, &css);
            assert!(name >= 4.5, "name contrast {name:.3} on {css}");
            assert!(bio >= 3.0, "bio contrast {bio:.3} on {css}");
        }
    }

    #[test]
    fn banner_prefers_custom_color_when_not_derived() {
        let settings = AppearanceSettings {
            header_color: "#FF0066".to_string(),
            banner: BannerSettings {
                derived_from_wallpaper: false,
                custom_color: None,
            },
            ..with_wallpaper("#112233")
        };
        assert_eq!(resolve_banner_color(&settings), "#FF0066");

        let derived = AppearanceSettings {
            banner: BannerSettings {
                derived_from_wallpaper: true,
                custom_color: Some("#00AA00".to_string()),
            },
            ..settings.clone()
        };
        assert_eq!(resolve_banner_color(&derived), "#112233");
    }

    #[test]
    fn banner_custom_color_beats_header_color() {
        let settings = AppearanceSettings {
            header_color: "#FF0066".to_string(),
            banner: BannerSettings {
                derived_from_wallpaper: false,
                custom_color: Some("#00AA00".to_string()),
            },
            ..with_wallpaper("#112233")
        };
        assert_eq!(resolve_banner_color(&settings), "#00AA00");

        let invalid_custom = AppearanceSettings {
            banner: BannerSettings {
                derived_from_wallpaper: false,
                custom_color: Some("not-a-color".to_string()),
            },
            ..settings.clone()
        };
        assert_eq!(resolve_banner_color(&invalid_custom), "#FF0066");

        let custom_only = AppearanceSettings {
            header_color: String::new(),
            ..settings
        };
        assert_eq!(resolve_banner_color(&custom_only), "#00AA00");
    }

    #[test]
    fn banner_falls_back_to_button_color() {
        let image = with_wallpaper("https://img.example/a.jpg");
        assert_eq!(resolve_banner_color(&image), "#6366F1");

        let gradient = with_wallpaper("linear-gradient(135deg, #667eea 0%, #764ba2 100%)");
        assert_eq!(resolve_banner_color(&gradient), "#667eea");

        let nothing = AppearanceSettings {
            button_color: String::new(),
            header_color: "bogus".to_string(),
            banner: BannerSettings {
                derived_from_wallpaper: false,
                custom_color: None,
            },
            ..AppearanceSettings::default()
        };
        assert_eq!(resolve_banner_color(&nothing), DEFAULT_BUTTON_COLOR);
    }

    #[test]
    fn empty_wallpaper_trusts_dark_mode_hint() {
        let settings = AppearanceSettings {
            background_color: "#111827".to_string(),
            ..AppearanceSettings::default()
        };
        let resolved = resolve_colors(&settings, true);
        assert_eq!(resolved.name_color, "#FFFFFF");
        assert_eq!(resolved.bio_color, "#E5E7EB");
        assert!(resolved.is_dark_background);

        let resolved = resolve_colors(&settings, false);
        assert_eq!(resolved.name_color, "#111827");
        assert!(!resolved.is_dark_background);
    }

    #[test]
    fn hint_is_ignored_when_wallpaper_is_set() {
        let settings = with_wallpaper("#FFFFFF");
        let resolved = resolve_colors(&settings, true);
        assert_eq!(resolved.name_color, "#111827");
        assert!(!resolved.is_dark_background);
    }

    #[test]
    fn resolve_colors_builds_matching_background_paint() {
        let gradient = "linear-gradient(135deg, #667eea 0%, #764ba2 100%)";
        let resolved = resolve_colors(&with_wallpaper(gradient), false);
        assert_eq!(
            resolved.background_paint,
            BackgroundPaint::Gradient {
                css: gradient.to_string(),
                base: "#667eea".to_string(),
            }
        );
        assert!(!resolved.is_dark_background);

        let image = AppearanceSettings {
            wallpaper_opacity: 40,
            ..with_wallpaper("https://img.example/a.jpg")
        };
        let resolved = resolve_colors(&image, true);
        assert_eq!(
            resolved.background_paint,
            BackgroundPaint::ImageLayer {
                source: "https://img.example/a.jpg".to_string(),
                opacity: 40,
                fallback: IMAGE_WALLPAPER_BASE.to_string(),
            }
        );
        assert_eq!(resolved.name_color, "#111827");
    }

    #[test]
    fn gradient_well_formedness() {
        assert!(is_well_formed_gradient(
            "linear-gradient(135deg, #667eea 0%, #764ba2 100%)"
        ));
        assert!(is_well_formed_gradient(
            "radial-gradient(circle, rgba(0, 0, 0, 0.5), rgb(255 255 255))"
        ));
        assert!(is_well_formed_gradient("Repeating-Conic-Gradient(from 0deg, red, blue)"));

        for bad in [
            "linear-gradient(#fff,#000); } body { display: none } .x {",
            "linear-gradient(#fff, #000)) , url(x)",
            "linear-gradient(#fff, url(https://t.example/x.png))",
            "linear-gradient(#fff, #000",
            "linear-gradient(#fff, #000) red",
            r"linear-gradient(#fff, #000)<\/style>",
            "gradient(#fff)",
            "my-gradient-image",
            "linear-gradient(#fff /* x */, #000)",
            "linear-gradient(#fff, #000), radial-gradient(#000, #fff)",
        ] {
            assert!(!is_well_formed_gradient(bad), "{bad:?}");
        }
    }

    #[test]
    fn malformed_gradient_paints_a_solid_base() {
        let wallpaper = "linear-gradient(#fff,#000); } body { display: none } .x {";
        let resolved = resolve_colors(&with_wallpaper(wallpaper), false);
        assert_eq!(
            resolved.background_paint,
            BackgroundPaint::SolidColor {
                color: "#fff".to_string()
            }
        );
        assert_eq!(resolved.base_color, "#fff");
    }

    #[test]
    fn resolve_colors_is_idempotent() {
        let settings = AppearanceSettings {
            header_color: "#00FF00".to_string(),
            ..with_wallpaper("radial-gradient(circle, rgb(20, 20, 20), #fff)")
        };
        let first = resolve_colors(&settings, true);
        let second = resolve_colors(&settings, true);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn resolved_colors_serialize_with_tagged_paint() {
        let resolved = resolve_colors(&with_wallpaper("#0F172A"), false);
        let value = serde_json::to_value(&resolved).unwrap();
        assert_eq!(value["backgroundPaint"]["kind"], "solidColor");
        assert_eq!(value["backgroundPaint"]["color"], "#0F172A");
        assert_eq!(value["isDarkBackground"], true);
        assert_eq!(value["nameColor"], "#FFFFFF");
    }
}
