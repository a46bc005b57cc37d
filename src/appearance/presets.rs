use super::{AppearanceSettings, ButtonStyle, ShadowStyle};

/// A named starting point the editor can apply in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreset {
    pub id: &'static str,
    pub label: &'static str,
    pub button_style: ButtonStyle,
    pub shadow_style: ShadowStyle,
    pub corner_radius: u32,
    pub button_color: &'static str,
    pub text_color: &'static str,
    pub background_color: &'static str,
    pub wallpaper: &'static str,
}

pub const THEME_PRESETS: &[ThemePreset] = &[
    ThemePreset {
        id: "default",
        label: "Default",
        button_style: ButtonStyle::Solid,
        shadow_style: ShadowStyle::Subtle,
        corner_radius: 12,
        button_color: "#6366F1",
        text_color: "#111827",
        background_color: "#FFFFFF",
        wallpaper: "",
    },
    ThemePreset {
        id: "midnight",
        label: "Midnight",
        button_style: ButtonStyle::Glass,
        shadow_style: ShadowStyle::None,
        corner_radius: 16,
        button_color: "#818CF8",
        text_color: "#F9FAFB",
        background_color: "#0F172A",
        wallpaper: "#0F172A",
    },
    ThemePreset {
        id: "sunset",
        label: "Sunset",
        button_style: ButtonStyle::Solid,
        shadow_style: ShadowStyle::Strong,
        corner_radius: 999,
        button_color: "#F97316",
        text_color: "#FFFFFF",
        background_color: "#7C2D12",
        wallpaper: "linear-gradient(160deg, #f97316 0%, #db2777 100%)",
    },
    ThemePreset {
        id: "ocean",
        label: "Ocean",
        button_style: ButtonStyle::Glass,
        shadow_style: ShadowStyle::Subtle,
        corner_radius: 14,
        button_color: "#0EA5E9",
        text_color: "#FFFFFF",
        background_color: "#0C4A6E",
        wallpaper: "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
    },
    ThemePreset {
        id: "brutal",
        label: "Brutal",
        button_style: ButtonStyle::Outline,
        shadow_style: ShadowStyle::Hard,
        corner_radius: 0,
        button_color: "#000000",
        text_color: "#000000",
        background_color: "#FDE047",
        wallpaper: "#FDE047",
    },
];

pub fn preset_by_id(id: &str) -> Option<&'static ThemePreset> {
    THEME_PRESETS.iter().find(|preset| preset.id == id)
}

impl ThemePreset {
    /// Apply the preset's look, keeping per-profile fields (font, header, footer).
    pub fn apply_to(&self, settings: &mut AppearanceSettings) {
        settings.button_style = self.button_style;
        settings.shadow_style = self.shadow_style;
        settings.corner_radius = self.corner_radius;
        settings.button_color = self.button_color.to_string();
        settings.text_color = self.text_color.to_string();
        settings.background_color = self.background_color.to_string();
        settings.wallpaper = self.wallpaper.to_string();
        settings.theme_id = self.id.to_string();
    }
}
