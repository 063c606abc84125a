use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    static ref DISALLOWED_REGEX: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
    static ref DASHES_REGEX: Regex = Regex::new(r"-+").unwrap();
}

/// Maps the accented letters used in Italian (and a few neighbours) to their
/// plain ASCII vowel or consonant.
fn fold_char(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => ch,
    }
}

/// Lowercases and strips accents, leaving everything else in place.
pub fn fold(text: &str) -> String {
    text.to_lowercase().chars().map(fold_char).collect()
}

/// Turns an article title into a URL-safe slug.
///
/// `"Benvenuti su Inter Leges - La Rivista è in Fase di Lancio"` becomes
/// `"benvenuti-su-inter-leges-la-rivista-e-in-fase-di-lancio"`.
pub fn generate_slug(title: &str) -> String {
    let folded = fold(title);
    let cleaned = DISALLOWED_REGEX.replace_all(&folded, "");
    let dashed = WHITESPACE_REGEX.replace_all(cleaned.trim(), "-");
    let collapsed = DASHES_REGEX.replace_all(&dashed, "-");

    collapsed.trim_matches('-').to_owned()
}

pub fn validate_slug(slug: &str) -> anyhow::Result<()> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if is_valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("slug `{}` must be lowercase kebab-case", slug))
    }
}
