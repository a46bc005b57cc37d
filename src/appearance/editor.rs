use super::{
    clamp_corner_radius, clamp_wallpaper_opacity, preset_by_id, AppearanceSettings, ButtonStyle,
    HeaderStyle, ShadowStyle,
};
use crate::storage::{AppearanceStore, StoreResult};

/// A single user interaction in the appearance editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearanceEdit {
    ButtonStyle(ButtonStyle),
    CornerRadius(i64),
    ShadowStyle(ShadowStyle),
    ButtonColor(String),
    ShadowColor(String),
    TextColor(String),
    BackgroundColor(String),
    FontFamily(String),
    HeaderStyle(HeaderStyle),
    HeaderColor(String),
    BannerDerivedFromWallpaper(bool),
    BannerCustomColor(Option<String>),
    Wallpaper(String),
    WallpaperOpacity(i64),
    FooterText(String),
    ShowPoweredBy(bool),
    ApplyTheme(String),
    Reset,
}

/// Editor-side owner of a profile's settings. Each edit is normalized before
/// it lands, so readers never observe an out-of-range value.
#[derive(Debug)]
pub struct AppearanceEditor {
    profile_id: String,
    settings: AppearanceSettings,
    applied_edits: usize,
    dirty: bool,
}

impl AppearanceEditor {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self::with_settings(profile_id, AppearanceSettings::default())
    }

    pub fn with_settings(profile_id: impl Into<String>, settings: AppearanceSettings) -> Self {
        Self {
            profile_id: profile_id.into(),
            settings: settings.normalized(),
            applied_edits: 0,
            dirty: false,
        }
    }

    /// Load the persisted settings for `profile_id`, or defaults when none exist.
    pub fn load(profile_id: impl Into<String>, store: &dyn AppearanceStore) -> StoreResult<Self> {
        let profile_id = profile_id.into();
        let settings = store.load(&profile_id)?.unwrap_or_default();
        tracing::debug!(profile_id = %profile_id, theme_id = %settings.theme_id, "loaded appearance");
        Ok(Self::with_settings(profile_id, settings))
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn settings(&self) -> &AppearanceSettings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn applied_edits(&self) -> usize {
        self.applied_edits
    }

    /// Apply an edit. Returns `false` when the edit left the settings unchanged
    /// (including unknown theme ids).
    pub fn apply(&mut self, edit: AppearanceEdit) -> bool {
        let mut next = self.settings.clone();
        match edit.clone() {
            AppearanceEdit::ButtonStyle(style) => next.button_style = style,
            AppearanceEdit::CornerRadius(radius) => next.corner_radius = clamp_corner_radius(radius),
            AppearanceEdit::ShadowStyle(style) => next.shadow_style = style,
            AppearanceEdit::ButtonColor(color) => next.button_color = color,
            AppearanceEdit::ShadowColor(color) => next.shadow_color = color,
            AppearanceEdit::TextColor(color) => next.text_color = color,
            AppearanceEdit::BackgroundColor(color) => next.background_color = color,
            AppearanceEdit::FontFamily(family) => next.font_family = family,
            AppearanceEdit::HeaderStyle(style) => next.header_style = style,
            AppearanceEdit::HeaderColor(color) => next.header_color = color,
            AppearanceEdit::BannerDerivedFromWallpaper(derived) => {
                next.banner.derived_from_wallpaper = derived;
            }
            AppearanceEdit::BannerCustomColor(color) => next.banner.custom_color = color,
            AppearanceEdit::Wallpaper(wallpaper) => next.wallpaper = wallpaper,
            AppearanceEdit::WallpaperOpacity(opacity) => {
                next.wallpaper_opacity = clamp_wallpaper_opacity(opacity);
            }
            AppearanceEdit::FooterText(text) => next.footer_text = text,
            AppearanceEdit::ShowPoweredBy(show) => next.show_powered_by = show,
            AppearanceEdit::ApplyTheme(theme_id) => match preset_by_id(&theme_id) {
                Some(preset) => preset.apply_to(&mut next),
                None => {
                    tracing::warn!(theme_id = %theme_id, "unknown theme preset; ignoring");
                    return false;
                }
            },
            AppearanceEdit::Reset => next = AppearanceSettings::default(),
        }

        let next = next.normalized();
        if next == self.settings {
            return false;
        }
        tracing::debug!(profile_id = %self.profile_id, edit = ?edit, "applied appearance edit");
        self.settings = next;
        self.applied_edits += 1;
        self.dirty = true;
        true
    }

    /// Apply an edit and persist immediately when it changed anything.
    pub fn apply_and_save(
        &mut self,
        edit: AppearanceEdit,
        store: &dyn AppearanceStore,
    ) -> StoreResult<bool> {
        if !self.apply(edit) {
            return Ok(false);
        }
        self.save(store)?;
        Ok(true)
    }

    pub fn save(&mut self, store: &dyn AppearanceStore) -> StoreResult<()> {
        store.save(&self.profile_id, &self.settings)?;
        self.dirty = false;
        Ok(())
    }
}
