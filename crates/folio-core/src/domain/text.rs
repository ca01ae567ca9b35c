//! Text helpers for posts: slugs, reading time, tags and cover image paths.

/// Average reading speed used for `read_time_minutes`.
const WORDS_PER_MINUTE: usize = 200;

/// Public path prefix for locally stored cover images.
const COVER_IMAGE_DIR: &str = "/images/covers";

/// Build a URL-safe slug from a title.
///
/// Lowercases, folds common Latin and Turkish letters to ASCII, drops
/// apostrophes and collapses every other run of non-alphanumerics into a
/// single `-`. Leading and trailing separators never appear.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    let mut buf = [0u8; 4];

    for ch in title.chars().flat_map(char::to_lowercase) {
        // combining marks, e.g. the dot left over from lowercasing 'İ'
        if ('\u{300}'..='\u{36f}').contains(&ch) || matches!(ch, '\'' | '’') {
            continue;
        }

        let piece: &str = if ch.is_ascii_alphanumeric() {
            ch.encode_utf8(&mut buf)
        } else if let Some(folded) = fold_latin(ch) {
            folded
        } else {
            pending_separator = !slug.is_empty();
            continue;
        };

        if pending_separator {
            slug.push('-');
            pending_separator = false;
        }
        slug.push_str(piece);
    }

    slug
}

fn fold_latin(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ı' | 'ī' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Estimated reading time in whole minutes, never less than one.
pub fn read_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Case-insensitive tag equality over full Unicode, not just ASCII.
pub(crate) fn same_tag(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Trim tags, drop empty ones and remove case-insensitive duplicates,
/// keeping the first spelling and the original order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || out.iter().any(|t| same_tag(t, tag)) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

/// Normalize a cover image reference.
///
/// Data URIs and remote URLs pass through untouched; anything else is treated
/// as a local file and mapped under the public covers directory.
/// Returns `None` for an empty reference.
pub fn normalize_cover_image(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("data:") || raw.starts_with("http") {
        return Some(raw.to_string());
    }

    let file_name = raw.rsplit('/').next().unwrap_or_default();
    if file_name.is_empty() {
        return None;
    }
    Some(format!("{COVER_IMAGE_DIR}/{file_name}"))
}
