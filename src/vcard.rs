//! vCard 3.0 export for a profile (RFC 2426 text, RFC 6350 folding rules).

use crate::profile::Profile;

const MAX_LINE_OCTETS: usize = 75;
const FALLBACK_FILE_STEM: &str = "contact";

/// Escape a text value: backslash, comma, semicolon and newlines.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Fold a content line to at most 75 octets per physical line, splitting on
/// char boundaries. Continuation lines start with one space.
pub fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current = 0usize;
    for c in line.chars() {
        let width = c.len_utf8();
        if current + width > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            current = 1;
        }
        folded.push(c);
        current += width;
    }
    folded
}

fn split_name(display_name: &str) -> (String, String) {
    let mut parts: Vec<&str> = display_name.split_whitespace().collect();
    match parts.len() {
        0 => (String::new(), String::new()),
        1 => (String::new(), parts[0].to_string()),
        _ => {
            let family = parts.pop().unwrap_or_default().to_string();
            (family, parts.join(" "))
        }
    }
}

struct CardWriter {
    out: String,
}

impl CardWriter {
    fn line(&mut self, content: &str) {
        self.out.push_str(&fold_line(content));
        self.out.push_str("\r\n");
    }

    fn text(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.line(&format!("{property}:{}", escape_text(value)));
    }
}

/// Render `profile` as a vCard. `profile_url` is added as an extra URL when
/// given.
pub fn render_vcard(profile: &Profile, profile_url: Option<&str>) -> String {
    let mut card = CardWriter { out: String::new() };
    let display_name = profile.display_name_or_username();
    let (family, given) = split_name(&profile.display_name);

    card.line("BEGIN:VCARD");
    card.line("VERSION:3.0");
    card.line(&format!("FN:{}", escape_text(display_name)));
    card.line(&format!(
        "N:{};{};;;",
        escape_text(&family),
        escape_text(&given)
    ));
    card.text("NICKNAME", &profile.username);
    card.text("ORG", &profile.company);
    card.text("TITLE", &profile.job_title);
    card.text("EMAIL;TYPE=INTERNET", &profile.email);
    card.text("TEL;TYPE=CELL", &profile.phone);
    card.text("URL", &profile.website);
    if let Some(url) = profile_url {
        card.text("URL", url);
    }
    let location = profile.location.trim();
    if !location.is_empty() {
        card.line(&format!("ADR;TYPE=HOME:;;;{};;;", escape_text(location)));
    }
    card.text("NOTE", &profile.bio);
    card.text("PHOTO;VALUE=URI", &profile.avatar_url);
    for link in profile.ordered_links() {
        if !link.active {
            continue;
        }
        if let Some(platform) = link.platform() {
            let kind: String = platform
                .name
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            card.text(&format!("X-SOCIALPROFILE;TYPE={kind}"), &link.url);
        }
    }
    card.line("END:VCARD");
    card.out
}

/// Download file name: `<username>.vcf`, restricted to a safe character set.
pub fn vcard_file_name(profile: &Profile) -> String {
    let stem: String = profile
        .username
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem
    };
    format!("{stem}.vcf")
}
