//! The model each presentation surface renders from.

use serde::Serialize;

use crate::platform::PlatformCategory;
use crate::profile::Profile;
use crate::resolver::{resolve_colors, ResolvedColors};
use crate::style::{
    button_css, footer_color, header_layout, render_stylesheet, ButtonCss, HeaderLayout,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderSurface {
    EditorPreview,
    MobilePreview,
    PublicPage,
}

impl RenderSurface {
    pub const ALL: [RenderSurface; 3] = [
        RenderSurface::EditorPreview,
        RenderSurface::MobilePreview,
        RenderSurface::PublicPage,
    ];

    /// Previews show inactive links (dimmed); the public page drops them.
    pub const fn shows_inactive_links(self) -> bool {
        !matches!(self, RenderSurface::PublicPage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLink {
    pub title: String,
    pub url: String,
    pub platform: Option<&'static str>,
    pub logo_path: Option<&'static str>,
    pub category: Option<PlatformCategory>,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterModel {
    pub text: Option<String>,
    pub color: String,
    pub show_powered_by: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub surface: RenderSurface,
    pub colors: ResolvedColors,
    pub button: ButtonCss,
    pub header: HeaderLayout,
    pub stylesheet: String,
    pub links: Vec<RenderedLink>,
    pub footer: FooterModel,
}

impl RenderModel {
    /// Build the model for one surface. The dark-mode hint is sampled by the
    /// host once per render and passed in.
    pub fn build(surface: RenderSurface, profile: &Profile, is_dark_mode_hint: bool) -> Self {
        let settings = profile.appearance.normalized();
        let colors = resolve_colors(&settings, is_dark_mode_hint);
        let button = button_css(&settings, &colors);
        let header = header_layout(&settings, &colors);
        let stylesheet = render_stylesheet(&settings, &colors);

        let links = profile
            .ordered_links()
            .into_iter()
            .filter(|link| link.active || surface.shows_inactive_links())
            .map(|link| {
                let platform = link.platform();
                RenderedLink {
                    title: link.title.clone(),
                    url: link.url.clone(),
                    platform: platform.map(|p| p.name),
                    logo_path: platform.map(|p| p.logo_path),
                    category: platform.map(|p| p.category),
                    dimmed: !link.active,
                }
            })
            .collect();

        let footer_text = settings.footer_text.trim();
        let footer = FooterModel {
            text: (!footer_text.is_empty()).then(|| footer_text.to_string()),
            color: footer_color(&settings, &colors),
            show_powered_by: settings.show_powered_by,
        };

        tracing::trace!(surface = ?surface, dark = colors.is_dark_background, "built render model");
        Self {
            surface,
            colors,
            button,
            header,
            stylesheet,
            links,
            footer,
        }
    }
}
