//! SEO and social-card metadata for a published profile page.

use serde::Serialize;

use crate::profile::Profile;
use crate::resolver::resolve_background_base_color;

const BLOCK_START: &str = "<!-- linkfolio:seo:start -->";
const BLOCK_END: &str = "<!-- linkfolio:seo:end -->";
const MAX_DESCRIPTION_CHARS: usize = 160;
const SITE_NAME: &str = "linkfolio";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub image: Option<String>,
    pub username: String,
    pub theme_color: String,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

/// Collapse whitespace and cut to 160 chars, ending in `…` when cut.
pub fn summarize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_DESCRIPTION_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
    let trimmed_len = cut.trim_end().len();
    cut.truncate(trimmed_len);
    cut.push('…');
    cut
}

impl SeoMetadata {
    pub fn for_profile(profile: &Profile, base_url: &str) -> Self {
        let base = base_url.trim().trim_end_matches('/');
        let username = profile.username.trim();
        let name = profile.display_name_or_username();

        let title = if profile.display_name.trim().is_empty() {
            format!("@{username}")
        } else {
            format!("{name} (@{username})")
        };
        let description = match summarize(&profile.bio) {
            bio if bio.is_empty() => format!("Check out {name}'s links on {SITE_NAME}."),
            bio => bio,
        };

        let avatar = profile.avatar_url.trim();
        let image = if avatar.starts_with("https://") || avatar.starts_with("http://") {
            Some(avatar.to_string())
        } else if avatar.starts_with('/') {
            Some(format!("{base}{avatar}"))
        } else {
            None
        };

        Self {
            title,
            description,
            canonical_url: format!("{base}/{}", encode_path_segment(username)),
            image,
            username: username.to_string(),
            theme_color: resolve_background_base_color(&profile.appearance.normalized()),
        }
    }

    /// The marked `<head>` block.
    pub fn render_tags(&self) -> String {
        let title = escape_html(&self.title);
        let description = escape_html(&self.description);
        let url = escape_html(&self.canonical_url);
        let mut tags = vec![
            BLOCK_START.to_string(),
            format!("<title>{title}</title>"),
            format!("<meta name=\"description\" content=\"{description}\">"),
            format!("<link rel=\"canonical\" href=\"{url}\">"),
            format!("<meta name=\"theme-color\" content=\"{}\">", escape_html(&self.theme_color)),
            "<meta property=\"og:type\" content=\"profile\">".to_string(),
            format!("<meta property=\"og:site_name\" content=\"{SITE_NAME}\">"),
            format!("<meta property=\"og:title\" content=\"{title}\">"),
            format!("<meta property=\"og:description\" content=\"{description}\">"),
            format!("<meta property=\"og:url\" content=\"{url}\">"),
            format!(
                "<meta property=\"profile:username\" content=\"{}\">",
                escape_html(&self.username)
            ),
        ];
        let card = if self.image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };
        tags.push(format!("<meta name=\"twitter:card\" content=\"{card}\">"));
        tags.push(format!("<meta name=\"twitter:title\" content=\"{title}\">"));
        tags.push(format!(
            "<meta name=\"twitter:description\" content=\"{description}\">"
        ));
        if let Some(image) = &self.image {
            let image = escape_html(image);
            tags.push(format!("<meta property=\"og:image\" content=\"{image}\">"));
            tags.push(format!("<meta name=\"twitter:image\" content=\"{image}\">"));
        }
        tags.push(BLOCK_END.to_string());
        tags.join("\n")
    }

    /// Insert the tags before `</head>`, replacing a block from an earlier
    /// injection and the template's own `<title>`. Without a head, the block is
    /// prepended.
    pub fn inject_into(&self, html: &str) -> String {
        let mut page = strip_marked_block(html);
        page = strip_first_title(&page);
        let block = self.render_tags();

        match find_ignore_ascii_case(&page, "</head>") {
            Some(index) => {
                let mut out = String::with_capacity(page.len() + block.len() + 1);
                out.push_str(&page[..index]);
                out.push_str(&block);
                out.push('\n');
                out.push_str(&page[index..]);
                out
            }
            None => format!("{block}\n{page}"),
        }
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(&needle.to_ascii_lowercase())
}

fn strip_marked_block(html: &str) -> String {
    let Some(start) = html.find(BLOCK_START) else {
        return html.to_string();
    };
    let Some(end_offset) = html[start..].find(BLOCK_END) else {
        return html.to_string();
    };
    let mut end = start + end_offset + BLOCK_END.len();
    if html[end..].starts_with('\n') {
        end += 1;
    }
    format!("{}{}", &html[..start], &html[end..])
}

fn strip_first_title(html: &str) -> String {
    let head_end = find_ignore_ascii_case(html, "</head>").unwrap_or(html.len());
    let Some(start) = find_ignore_ascii_case(&html[..head_end], "<title") else {
        return html.to_string();
    };
    let Some(close) = find_ignore_ascii_case(&html[start..head_end], "</title>") else {
        return html.to_string();
    };
    let end = start + close + "</title>".len();
    format!("{}{}", &html[..start], &html[end..])
}
