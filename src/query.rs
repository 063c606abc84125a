use std::{fmt, str::FromStr};

use crate::{article::Article, catalog::Catalog, slug::fold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
    Author,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::Title,
        SortOrder::Author,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Title => "title",
            Self::Author => "author",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Più recenti",
            Self::Oldest => "Più vecchi",
            Self::Title => "Titolo A-Z",
            Self::Author => "Autore A-Z",
        }
    }

    /// Directory under `articoli/` holding the list in this order. The
    /// default order lives at the list root.
    pub fn path_segment(&self) -> Option<&'static str> {
        match self {
            Self::Newest => None,
            Self::Oldest => Some("meno-recenti"),
            Self::Title => Some("titolo"),
            Self::Author => Some("autore"),
        }
    }

    /// Stable sort.
    pub fn sort(&self, articles: &mut [&Article]) {
        match self {
            Self::Newest => articles.sort_by(|a, b| b.date.day().cmp(&a.date.day())),
            Self::Oldest => articles.sort_by(|a, b| a.date.day().cmp(&b.date.day())),
            Self::Title => articles.sort_by_cached_key(|article| fold(&article.title)),
            Self::Author => articles.sort_by_cached_key(|article| fold(&article.author)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|order| order.key() == s)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("unknown sort order `{}`", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// A category filter key such as `civile` or `annunci`.
    Key(String),
}

impl From<Option<String>> for CategoryFilter {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(key) if key != "all" => Self::Key(key),
            _ => Self::All,
        }
    }
}

/// Search term, category filter and sort order of the article list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleQuery {
    pub term: String,
    pub category: CategoryFilter,
    pub sort: SortOrder,
}

impl ArticleQuery {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_owned(),
            ..Default::default()
        }
    }

    pub fn in_category(mut self, key: &str) -> Self {
        self.category = CategoryFilter::Key(key.to_owned());
        self
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Searches, then filters by category, then sorts. A filter key that names
    /// no category matches nothing.
    pub fn run<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Article> {
        let mut found = catalog.search(&self.term);

        if let CategoryFilter::Key(key) = &self.category {
            match catalog.categories().by_filter_key(key) {
                Some(def) => found.retain(|article| article.category == def.name),
                None => {
                    log::debug!("No category with filter key `{}`", key);
                    found.clear();
                }
            }
        }

        self.sort.sort(&mut found);
        found
    }
}
