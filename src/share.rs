use build_html::{Container, ContainerType, Html, HtmlContainer};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub facebook: String,
    pub twitter: String,
    pub linkedin: String,
    pub whatsapp: String,
}

impl ShareLinks {
    pub fn new(title: &str, url: &str, handle: &str) -> Self {
        let text = format!("{} - Via {}", title, handle);

        Self {
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", encode(url)),
            twitter: format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode(&text),
                encode(url)
            ),
            linkedin: format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                encode(url)
            ),
            whatsapp: format!("https://wa.me/?text={}", encode(&format!("{} {}", text, url))),
        }
    }

    /// The "Condividi:" row shown above and below an article.
    pub fn to_html(&self) -> String {
        let links = [
            (&self.facebook, "Facebook"),
            (&self.twitter, "Twitter"),
            (&self.linkedin, "LinkedIn"),
            (&self.whatsapp, "WhatsApp"),
        ];

        links
            .iter()
            .fold(
                Container::new(ContainerType::Div)
                    .with_attributes(vec![("class", "share")])
                    .with_raw("<span>Condividi:</span>"),
                |row, (href, network)| {
                    let title = format!("Condividi su {}", network);
                    row.with_link_attr(
                        href.replace('&', "&amp;"),
                        *network,
                        [
                            ("target", "_blank"),
                            ("rel", "noopener"),
                            ("title", title.as_str()),
                        ],
                    )
                },
            )
            .to_html_string()
    }
}

#[cfg(test)]
mod test {
    use super::ShareLinks;

    #[test]
    fn links_are_component_encoded() {
        let links = ShareLinks::new(
            "Diritto & società",
            "https://interleges.it/articoli/0/",
            "@InterLeges",
        );

        assert_eq!(
            links.facebook,
            "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Finterleges.it%2Farticoli%2F0%2F"
        );
        assert_eq!(
            links.twitter,
            "https://twitter.com/intent/tweet?text=Diritto%20%26%20societ%C3%A0%20-%20Via%20%40InterLeges&url=https%3A%2F%2Finterleges.it%2Farticoli%2F0%2F"
        );
        assert!(links.whatsapp.starts_with("https://wa.me/?text=Diritto%20%26"));
    }

    #[test]
    fn html_row() {
        let html = ShareLinks::new("Titolo", "https://interleges.it/", "@InterLeges").to_html();

        assert!(html.starts_with("<div"));
        assert!(html.contains("Condividi:"));
        assert!(html.contains("https://www.linkedin.com/sharing/share-offsite/?url="));
        assert!(html.contains("WhatsApp"));
    }
}
