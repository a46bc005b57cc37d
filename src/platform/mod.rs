use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformCategory {
    Social,
    Video,
    Music,
    Professional,
    Messaging,
    Commerce,
    Writing,
    Design,
}

/// One row of the detection table. A platform may own several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub name: &'static str,
    pub pattern: &'static str,
    pub logo_path: &'static str,
    pub category: PlatformCategory,
}

const fn platform(
    name: &'static str,
    pattern: &'static str,
    logo_path: &'static str,
    category: PlatformCategory,
) -> Platform {
    Platform {
        name,
        pattern,
        logo_path,
        category,
    }
}

/// Matching is first-match-wins in this order, so a pattern that is a
/// substring of another platform's host must come after it.
pub const PLATFORMS: &[Platform] = &[
    platform("YouTube Music", "music.youtube.com", "/logos/youtube-music.svg", PlatformCategory::Music),
    platform("YouTube", "youtube.com", "/logos/youtube.svg", PlatformCategory::Video),
    platform("YouTube", "youtu.be", "/logos/youtube.svg", PlatformCategory::Video),
    platform("Apple Music", "music.apple.com", "/logos/apple-music.svg", PlatformCategory::Music),
    platform("Apple Podcasts", "podcasts.apple.com", "/logos/apple-podcasts.svg", PlatformCategory::Music),
    platform("X", "twitter.com", "/logos/x.svg", PlatformCategory::Social),
    platform("X", "://x.com", "/logos/x.svg", PlatformCategory::Social),
    platform("X", "www.x.com", "/logos/x.svg", PlatformCategory::Social),
    platform("Instagram", "instagram.com", "/logos/instagram.svg", PlatformCategory::Social),
    platform("Threads", "threads.net", "/logos/threads.svg", PlatformCategory::Social),
    platform("Facebook", "facebook.com", "/logos/facebook.svg", PlatformCategory::Social),
    platform("TikTok", "tiktok.com", "/logos/tiktok.svg", PlatformCategory::Social),
    platform("Snapchat", "snapchat.com", "/logos/snapchat.svg", PlatformCategory::Social),
    platform("Pinterest", "pinterest.com", "/logos/pinterest.svg", PlatformCategory::Social),
    platform("Reddit", "reddit.com", "/logos/reddit.svg", PlatformCategory::Social),
    platform("Bluesky", "bsky.app", "/logos/bluesky.svg", PlatformCategory::Social),
    platform("Mastodon", "mastodon.", "/logos/mastodon.svg", PlatformCategory::Social),
    platform("LinkedIn", "linkedin.com", "/logos/linkedin.svg", PlatformCategory::Professional),
    platform("GitHub", "github.com", "/logos/github.svg", PlatformCategory::Professional),
    platform("GitLab", "gitlab.com", "/logos/gitlab.svg", PlatformCategory::Professional),
    platform("Spotify", "spotify.com", "/logos/spotify.svg", PlatformCategory::Music),
    platform("SoundCloud", "soundcloud.com", "/logos/soundcloud.svg", PlatformCategory::Music),
    platform("Twitch", "twitch.tv", "/logos/twitch.svg", PlatformCategory::Video),
    platform("Vimeo", "vimeo.com", "/logos/vimeo.svg", PlatformCategory::Video),
    platform("Discord", "discord.gg", "/logos/discord.svg", PlatformCategory::Messaging),
    platform("Discord", "discord.com", "/logos/discord.svg", PlatformCategory::Messaging),
    platform("Telegram", "t.me/", "/logos/telegram.svg", PlatformCategory::Messaging),
    platform("WhatsApp", "wa.me/", "/logos/whatsapp.svg", PlatformCategory::Messaging),
    platform("WhatsApp", "whatsapp.com", "/logos/whatsapp.svg", PlatformCategory::Messaging),
    platform("Medium", "medium.com", "/logos/medium.svg", PlatformCategory::Writing),
    platform("Substack", "substack.com", "/logos/substack.svg", PlatformCategory::Writing),
    platform("Behance", "behance.net", "/logos/behance.svg", PlatformCategory::Design),
    platform("Dribbble", "dribbble.com", "/logos/dribbble.svg", PlatformCategory::Design),
    platform("Patreon", "patreon.com", "/logos/patreon.svg", PlatformCategory::Commerce),
    platform("Ko-fi", "ko-fi.com", "/logos/ko-fi.svg", PlatformCategory::Commerce),
    platform("Buy Me a Coffee", "buymeacoffee.com", "/logos/buymeacoffee.svg", PlatformCategory::Commerce),
    platform("Etsy", "etsy.com", "/logos/etsy.svg", PlatformCategory::Commerce),
];

/// Classify `url` against [`PLATFORMS`]: the first row whose pattern is a
/// substring of the lower-cased URL. `None` when nothing matches.
pub fn detect_platform_from_url(url: &str) -> Option<&'static Platform> {
    let lower = url.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    PLATFORMS.iter().find(|entry| lower.contains(entry.pattern))
}

/// First table row for a display name, case-insensitive.
pub fn platform_by_name(name: &str) -> Option<&'static Platform> {
    let name = name.trim();
    PLATFORMS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
}
