// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::{article::Article, config::Config};

/// What goes into a page's `<head>`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub open_graph: Option<OpenGraph>,
    pub twitter: Option<TwitterCard>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub published_time: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub site_name: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub creator: String,
}

impl PageMetadata {
    pub fn page(config: &Config, title: Option<&str>, description: &str, path: &str) -> Self {
        Self {
            title: match title {
                Some(title) => format!("{} - {}", title, config.site_name),
                None => config.site_name.clone(),
            },
            description: description.to_owned(),
            canonical_url: config.url(path),
            open_graph: None,
            twitter: None,
        }
    }

    pub fn article(config: &Config, article: &Article, path: &str) -> Self {
        Self {
            title: format!("{} - {}", article.title, config.site_name),
            description: article.excerpt.clone(),
            canonical_url: config.url(path),
            open_graph: Some(OpenGraph {
                title: article.title.clone(),
                description: article.excerpt.clone(),
                kind: "article".into(),
                url: config.url(path),
                published_time: article.date.day().format("%Y-%m-%d").to_string(),
                authors: vec![article.author.clone()],
                tags: article.tags.clone(),
                site_name: config.site_name.clone(),
            }),
            twitter: Some(TwitterCard {
                card: "summary_large_image".into(),
                title: article.title.clone(),
                description: article.excerpt.clone(),
                creator: config.social_handle.clone(),
            }),
        }
    }

    pub fn not_found(config: &Config) -> Self {
        Self::page(
            config,
            Some("Articolo non trovato"),
            "L'articolo che stai cercando non esiste o è stato rimosso.",
            "/404.html",
        )
    }
}

#[cfg(test)]
mod test {
    use crate::{catalog::test::article, config::Config};

    use super::PageMetadata;

    #[test]
    fn article_head() {
        let config = Config::from_yaml("site_url: https://interleges.it").unwrap();
        let article = article(3, "Diritto Penale", "10 Gennaio 2024", &["GDPR"]);
        let meta = PageMetadata::article(&config, &article, "/articoli/3/");

        assert_eq!(meta.title, "Articolo 3 - Inter Leges");
        assert_eq!(meta.description, "Estratto 3");

        let og = meta.open_graph.unwrap();
        assert_eq!(og.kind, "article");
        assert_eq!(og.published_time, "2024-01-10");
        assert_eq!(og.url, "https://interleges.it/articoli/3/");
        assert_eq!(og.tags, vec!["GDPR".to_owned()]);
        assert_eq!(meta.twitter.unwrap().creator, "@InterLeges");
    }

    #[test]
    fn missing_article_head() {
        let config = Config::from_yaml("site_url: https://interleges.it").unwrap();

        assert_eq!(
            PageMetadata::not_found(&config).title,
            "Articolo non trovato - Inter Leges"
        );
    }
}
