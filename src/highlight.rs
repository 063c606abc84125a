use build_html::escape_html;
use fancy_regex::Regex;

/// Wraps every case-insensitive occurrence of `term` in `<mark>`, escaping the
/// rest of `text` for HTML.
pub fn highlight(text: &str, term: &str) -> String {
    if term.trim().is_empty() {
        return escape_html(text);
    }

    let pattern = match Regex::new(&format!("(?i){}", fancy_regex::escape(term))) {
        Ok(pattern) => pattern,
        Err(err) => {
            log::warn!("Cannot highlight `{}`: {}", term, err);
            return escape_html(text);
        }
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for found in pattern.find_iter(text) {
        let found = match found {
            Ok(found) => found,
            Err(err) => {
                log::warn!("Highlighting stopped early: {}", err);
                break;
            }
        };

        out.push_str(&escape_html(&text[last..found.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</mark>");
        last = found.end();
    }

    out.push_str(&escape_html(&text[last..]));
    out
}

#[cfg(test)]
mod test {
    use super::highlight;

    #[test]
    fn marks_every_match() {
        assert_eq!(
            highlight("Diritto civile e diritto penale", "DIRITTO"),
            "<mark>Diritto</mark> civile e <mark>diritto</mark> penale"
        );
    }

    #[test]
    fn escapes_text_and_term() {
        assert_eq!(highlight("a < b (c)", "(c)"), "a &lt; b <mark>(c)</mark>");
        assert_eq!(highlight("Tom & Jerry", ""), "Tom &amp; Jerry");
    }

    #[test]
    fn keeps_spaces_in_term() {
        assert_eq!(
            highlight("Il contratto, Ilcontratto", " contratto"),
            "Il<mark> contratto</mark>, Ilcontratto"
        );
        assert_eq!(highlight("Il contratto", "  "), "Il contratto");
    }

    #[test]
    fn no_match() {
        assert_eq!(highlight("Contratti", "reati"), "Contratti");
    }
}
