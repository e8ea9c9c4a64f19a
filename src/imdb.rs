use once_cell::sync::Lazy;
use regex::Regex;

static CANONICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^tt\d+$").unwrap());

/// Tried in order, strictest first: a domain-qualified title path, any title
/// path, then a bare id anywhere in the string.
static PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)imdb\.com/title/(tt\d+)").unwrap(),
        Regex::new(r"(?i)/title/(tt\d+)").unwrap(),
        Regex::new(r"(?i)(tt\d+)").unwrap(),
    ]
});

/// Pull a canonical IMDb id (`tt` + digits) out of a pasted link, a bare id,
/// or anything in between. Returns `None` when no id can be found; callers
/// treat that as a user input error.
pub fn extract_imdb_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if CANONICAL.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    for pattern in PATTERNS.iter() {
        if let Some(capture) = pattern.captures(trimmed).and_then(|caps| caps.get(1)) {
            return Some(capture.as_str().to_lowercase());
        }
    }

    None
}
