//! CSS derivation from appearance settings and resolved colors.

use serde::Serialize;

use crate::appearance::{
    AppearanceSettings, ButtonStyle, HeaderStyle, ShadowStyle, DEFAULT_BUTTON_COLOR,
    DEFAULT_FONT_FAMILY, DEFAULT_SHADOW_COLOR,
};
use crate::color::{contrast_ratio, parse_css_color, Rgba, WCAG_AA_LARGE_TEXT};
use crate::resolver::{is_well_formed_gradient, BackgroundPaint, ResolvedColors};

const ROOT_CLASS: &str = "linkfolio-profile";
const BUTTON_TEXT_CANDIDATES: [&str; 2] = ["#FFFFFF", "#111827"];
const GLASS_BLUR: &str = "blur(12px)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonCss {
    pub background: String,
    pub color: String,
    pub border: String,
    pub border_radius: String,
    pub box_shadow: String,
    pub backdrop_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarPlacement {
    Centered,
    OverlapBanner,
    Top,
    Inline,
    Hero,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayout {
    pub style: HeaderStyle,
    pub show_banner: bool,
    pub banner_color: Option<String>,
    pub avatar: AvatarPlacement,
    pub avatar_size: u16,
}

fn color_or(value: &str, fallback: &'static str) -> Rgba {
    parse_css_color(value)
        .or_else(|_| parse_css_color(fallback))
        .unwrap_or(Rgba::BLACK)
}

/// `box-shadow` value for a shadow style.
pub fn shadow_css(style: ShadowStyle, shadow_color: &str) -> String {
    let shadow = color_or(shadow_color, DEFAULT_SHADOW_COLOR);
    match style {
        ShadowStyle::None => "none".to_string(),
        ShadowStyle::Subtle => format!("0 1px 3px {}", shadow.to_css_rgba(0.12)),
        ShadowStyle::Strong => format!("0 8px 24px {}", shadow.to_css_rgba(0.25)),
        ShadowStyle::Hard => format!("4px 4px 0 {}", shadow.with_alpha(0xFF).to_hex()),
    }
}

/// Readable label color on a filled button.
fn best_text_on(fill: Rgba) -> &'static str {
    let mut best = BUTTON_TEXT_CANDIDATES[0];
    let mut best_ratio = 0.0;
    for candidate in BUTTON_TEXT_CANDIDATES {
        let ratio = parse_css_color(candidate)
            .map(|fg| contrast_ratio(fg, fill))
            .unwrap_or(0.0);
        if ratio > best_ratio {
            best = candidate;
            best_ratio = ratio;
        }
    }
    best
}

pub fn button_css(settings: &AppearanceSettings, resolved: &ResolvedColors) -> ButtonCss {
    let button = color_or(&settings.button_color, DEFAULT_BUTTON_COLOR);
    let page = color_or(&resolved.base_color, "#FFFFFF");
    let border_radius = format!("{}px", settings.corner_radius);
    let box_shadow = shadow_css(settings.shadow_style, &settings.shadow_color);

    match settings.button_style {
        ButtonStyle::Solid => ButtonCss {
            background: button.to_hex(),
            color: best_text_on(button.flatten_over(page)).to_string(),
            border: "none".to_string(),
            border_radius,
            box_shadow,
            backdrop_filter: None,
        },
        ButtonStyle::Glass => {
            let (fill, edge) = if resolved.is_dark_background {
                (Rgba::WHITE.to_css_rgba(0.15), Rgba::WHITE.to_css_rgba(0.25))
            } else {
                let ink = Rgba::rgb(0x11, 0x18, 0x27);
                (ink.to_css_rgba(0.06), ink.to_css_rgba(0.12))
            };
            ButtonCss {
                background: fill,
                color: resolved.name_color.clone(),
                border: format!("1px solid {edge}"),
                border_radius,
                box_shadow,
                backdrop_filter: Some(GLASS_BLUR.to_string()),
            }
        }
        ButtonStyle::Outline => {
            let label = if contrast_ratio(button, page) >= WCAG_AA_LARGE_TEXT {
                button.to_hex()
            } else {
                resolved.name_color.clone()
            };
            ButtonCss {
                background: "transparent".to_string(),
                color: label,
                border: format!("2px solid {}", button.to_hex()),
                border_radius,
                box_shadow,
                backdrop_filter: None,
            }
        }
    }
}

pub fn header_layout(settings: &AppearanceSettings, resolved: &ResolvedColors) -> HeaderLayout {
    let (show_banner, avatar, avatar_size) = match settings.header_style {
        HeaderStyle::Simple => (false, AvatarPlacement::Centered, 96),
        HeaderStyle::Banner => (true, AvatarPlacement::OverlapBanner, 96),
        HeaderStyle::AvatarTop => (false, AvatarPlacement::Top, 128),
        HeaderStyle::Minimal => (false, AvatarPlacement::Inline, 56),
        HeaderStyle::HeroPhoto => (true, AvatarPlacement::Hero, 0),
    };
    HeaderLayout {
        style: settings.header_style,
        show_banner,
        banner_color: show_banner.then(|| resolved.banner_color.clone()),
        avatar,
        avatar_size,
    }
}

/// Footer text color: the user's `text_color` when it reads on the page base
/// at 3:1 or better, else the resolved bio color.
pub fn footer_color(settings: &AppearanceSettings, resolved: &ResolvedColors) -> String {
    let text = settings.text_color.trim();
    let page = color_or(&resolved.base_color, "#FFFFFF").flatten_over(Rgba::WHITE);
    match parse_css_color(text) {
        Ok(fg) if contrast_ratio(fg.flatten_over(page), page) >= WCAG_AA_LARGE_TEXT => {
            text.to_string()
        }
        _ => resolved.bio_color.clone(),
    }
}

/// CSS `font-family` list with the user's family first.
pub fn font_stack(font_family: &str) -> String {
    let family: String = font_family
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let family = family.trim();
    let family = if family.is_empty() {
        DEFAULT_FONT_FAMILY
    } else {
        family
    };
    format!("\"{family}\", system-ui, -apple-system, sans-serif")
}

/// `url("...")` for an image source. A source already wrapped in `url(...)`
/// is unwrapped and re-quoted, so the result is always one quoted string.
pub fn css_url(source: &str) -> String {
    let inner = unwrap_css_url(source.trim());
    let mut escaped = String::with_capacity(inner.len() + 2);
    for c in inner.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '<' => escaped.push_str("\\3c "),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    format!("url(\"{escaped}\")")
}

fn unwrap_css_url(source: &str) -> &str {
    let wrapped = source
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("url("))
        && source.ends_with(')');
    if !wrapped {
        return source;
    }
    let inner = source[4..source.len() - 1].trim();
    for quote in ['"', '\''] {
        if let Some(unquoted) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return unquoted;
        }
    }
    inner
}

fn background_rules(paint: &BackgroundPaint) -> (String, Option<String>) {
    match paint {
        BackgroundPaint::SolidColor { color } => (format!("background-color: {color};"), None),
        BackgroundPaint::Gradient { css, base } if is_well_formed_gradient(css) => (
            format!("background-color: {base};\n  background-image: {css};"),
            None,
        ),
        BackgroundPaint::Gradient { base, .. } => (format!("background-color: {base};"), None),
        BackgroundPaint::ImageLayer {
            source,
            opacity,
            fallback,
        } => {
            let layer = format!(
                ".{ROOT_CLASS}::before {{
  content: \"\";
  position: absolute;
  inset: 0;
  z-index: 0;
  background-image: {url};
  background-size: cover;
  background-position: center;
  opacity: {alpha:.2};
  pointer-events: none;
}}
",
                url = css_url(source),
                alpha = f64::from(*opacity) / 100.0,
            );
            (
                format!("background-color: {fallback};\n  position: relative;"),
                Some(layer),
            )
        }
    }
}

/// Stylesheet for the profile root and its link buttons.
pub fn render_stylesheet(settings: &AppearanceSettings, resolved: &ResolvedColors) -> String {
    let button = button_css(settings, resolved);
    let header = header_layout(settings, resolved);
    let (background, image_layer) = background_rules(&resolved.background_paint);
    let backdrop = button
        .backdrop_filter
        .as_deref()
        .map(|filter| format!("\n  backdrop-filter: {filter};\n  -webkit-backdrop-filter: {filter};"))
        .unwrap_or_default();
    let banner = header
        .banner_color
        .as_deref()
        .map(|color| {
            format!(
                ".{ROOT_CLASS} .profile-banner {{
  background: {color};
}}
"
            )
        })
        .unwrap_or_default();

    format!(
        ".{ROOT_CLASS} {{
  {background}
  color: {name_color};
  font-family: {font_stack};
  --lf-name-color: {name_color};
  --lf-bio-color: {bio_color};
  --lf-footer-color: {footer_color};
  --lf-avatar-size: {avatar_size}px;
}}
{image_layer}{banner}.{ROOT_CLASS} .profile-bio {{
  color: {bio_color};
}}
.{ROOT_CLASS} .profile-footer {{
  color: {footer_color};
}}
.{ROOT_CLASS} .profile-link {{
  background: {button_background};
  color: {button_color};
  border: {button_border};
  border-radius: {button_radius};
  box-shadow: {button_shadow};{backdrop}
}}
",
        name_color = resolved.name_color,
        bio_color = resolved.bio_color,
        footer_color = footer_color(settings, resolved),
        font_stack = font_stack(&settings.font_family),
        avatar_size = header.avatar_size,
        image_layer = image_layer.unwrap_or_default(),
        button_background = button.background,
        button_color = button.color,
        button_border = button.border,
        button_radius = button.border_radius,
        button_shadow = button.box_shadow,
    )
}
