//! The article catalog: a fixed list of articles and the read-only queries
//! the site is built from.
//!
//! Every query is a projection over the list handed to [`Catalog::new`];
//! nothing here reads the clock or mutates state.

use std::{collections::HashSet, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    article::{Article, ArticleRecord},
    category::{Categories, CategoryCount},
};

pub const DEFAULT_FEATURED_LIMIT: usize = 4;
pub const DEFAULT_RELATED_LIMIT: usize = 3;

#[derive(Deserialize, Debug)]
struct ArticlesFile {
    articles: Vec<ArticleRecord>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    articles: Vec<Article>,
    categories: Categories,
}

impl Catalog {
    /// Builds a catalog, checking that ids are unique, that every article is
    /// filed under a known category and that slugs are well formed.
    pub fn new(articles: Vec<Article>, categories: Categories) -> anyhow::Result<Self> {
        categories.validate()?;

        let mut seen = HashSet::new();
        for article in &articles {
            if !seen.insert(article.id) {
                anyhow::bail!("article id {} is used more than once", article.id);
            }
            if !categories.contains(&article.category) {
                anyhow::bail!(
                    "article {} has unknown category `{}`",
                    article.id,
                    article.category
                );
            }
            crate::slug::validate_slug(&article.slug)
                .with_context(|| format!("article {} has an invalid slug", article.id))?;
        }

        Ok(Self {
            articles,
            categories,
        })
    }

    pub fn from_records(
        records: Vec<ArticleRecord>,
        categories: Categories,
    ) -> anyhow::Result<Self> {
        Self::new(records.into_iter().map(Article::from).collect(), categories)
    }

    /// Parses a YAML document with a top-level `articles:` list.
    pub fn from_yaml(yaml: &str, categories: Categories) -> anyhow::Result<Self> {
        let file: ArticlesFile = serde_yaml::from_str(yaml)?;
        Self::from_records(file.articles, categories)
    }

    pub fn load(path: &Path, categories: Categories) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading articles from {:?}", path))?;
        let catalog = Self::from_yaml(&yaml, categories)
            .with_context(|| format!("loading articles from {:?}", path))?;

        log::info!("Loaded {} articles from {:?}", catalog.len(), path);

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Articles in the order they were supplied.
    pub fn in_catalog_order(&self) -> Vec<&Article> {
        self.articles.iter().collect()
    }

    /// Most recent first. Articles sharing a date keep their catalog order.
    pub fn list_all(&self) -> Vec<&Article> {
        let mut sorted = self.in_catalog_order();
        sorted.sort_by(|a, b| b.date.day().cmp(&a.date.day()));
        sorted
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    pub fn list_by_category(&self, category: &str) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|article| article.category == category)
            .collect()
    }

    /// Case-insensitive substring search over title, author, excerpt, content
    /// and tags. A blank term matches everything; any other term is matched
    /// as given, surrounding spaces included.
    pub fn search(&self, term: &str) -> Vec<&Article> {
        if term.trim().is_empty() {
            return self.in_catalog_order();
        }
        let needle = term.to_lowercase();

        self.articles
            .iter()
            .filter(|article| article.matches_lowercase(&needle))
            .collect()
    }

    pub fn related(&self, id: u32, limit: usize) -> Vec<&Article> {
        let Some(current) = self.get_by_id(id) else {
            return vec![];
        };

        self.articles
            .iter()
            .filter(|article| {
                article.id != id
                    && (article.category == current.category || article.shares_tag_with(current))
            })
            .take(limit)
            .collect()
    }

    /// The next older article.
    pub fn previous(&self, id: u32) -> Option<&Article> {
        let sorted = self.list_all();
        let idx = sorted.iter().position(|article| article.id == id)?;

        sorted.get(idx + 1).copied()
    }

    /// The next newer article.
    pub fn next(&self, id: u32) -> Option<&Article> {
        let sorted = self.list_all();
        let idx = sorted.iter().position(|article| article.id == id)?;

        idx.checked_sub(1).map(|newer| sorted[newer])
    }

    pub fn categories_with_counts(&self) -> Vec<CategoryCount> {
        self.categories
            .iter()
            .map(|def| CategoryCount {
                name: def.name.clone(),
                slug: def.slug.clone(),
                description: def.description.clone(),
                count: self
                    .articles
                    .iter()
                    .filter(|article| article.category == def.name)
                    .count(),
            })
            .collect()
    }

    pub fn featured(&self, limit: usize) -> Vec<&Article> {
        let mut sorted = self.list_all();
        sorted.truncate(limit);
        sorted
    }
}

#[cfg(test)]
pub(crate) mod test {
    use crate::{
        article::{Article, ArticleDate},
        category::Categories,
    };

    use super::Catalog;

    pub(crate) fn article(id: u32, category: &str, date: &str, tags: &[&str]) -> Article {
        Article {
            id,
            title: format!("Articolo {}", id),
            author: "Redazione".into(),
            category: category.into(),
            date: ArticleDate::parse(date).unwrap(),
            read_time: "5 min".into(),
            excerpt: format!("Estratto {}", id),
            content: format!("<p>Contenuto {}</p>", id),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            slug: format!("articolo-{}", id),
        }
    }

    pub(crate) fn fixture() -> Catalog {
        Catalog::new(
            vec![
                article(0, "Annunci", "21 Settembre 2024", &["lancio"]),
                article(1, "Diritto Civile", "15 Gennaio 2024", &["contratti", "giurisprudenza"]),
                article(2, "Diritto Amministrativo", "12 Gennaio 2024", &["cittadini"]),
                article(3, "Diritto Penale", "10 Gennaio 2024", &["GDPR", "privacy"]),
                article(4, "Diritto Civile", "15 Gennaio 2024", &[]),
                article(5, "Diritto Penale", "2 Marzo 2024", &["giurisprudenza"]),
            ],
            Categories::default(),
        )
        .unwrap()
    }

    fn ids(articles: Vec<&Article>) -> Vec<u32> {
        articles.iter().map(|article| article.id).collect()
    }

    #[test]
    fn single_article_catalog() {
        let catalog = Catalog::new(
            vec![article(0, "Annunci", "21 Settembre 2024", &[])],
            Categories::default(),
        )
        .unwrap();

        assert_eq!(ids(catalog.list_all()), vec![0]);
        assert_eq!(catalog.get_by_id(0).map(|a| a.id), Some(0));
        assert!(catalog.get_by_id(99).is_none());

        for count in catalog.categories_with_counts() {
            let expected = if count.name == "Annunci" { 1 } else { 0 };
            assert_eq!(count.count, expected, "{}", count.name);
        }
    }

    #[test]
    fn list_all_is_newest_first_and_stable() {
        let catalog = fixture();
        let sorted = catalog.list_all();

        assert_eq!(ids(sorted.clone()), vec![0, 5, 1, 4, 2, 3]);
        for pair in sorted.windows(2) {
            assert!(pair[0].date.day() >= pair[1].date.day());
        }
    }

    #[test]
    fn get_by_id_finds_every_article() {
        let catalog = fixture();

        for article in catalog.in_catalog_order() {
            assert_eq!(catalog.get_by_id(article.id), Some(article));
        }
        assert_eq!(catalog.get_by_id(42), None);
    }

    #[test]
    fn by_category_keeps_catalog_order() {
        let catalog = fixture();

        assert_eq!(ids(catalog.list_by_category("Diritto Civile")), vec![1, 4]);
        assert_eq!(ids(catalog.list_by_category("Diritto Penale")), vec![3, 5]);
        assert!(catalog.list_by_category("diritto civile").is_empty());
    }

    #[test]
    fn search_fields() {
        let catalog = fixture();

        assert_eq!(ids(catalog.search("gdpr")), vec![3]);
        assert_eq!(ids(catalog.search("ARTICOLO 2")), vec![2]);
        assert_eq!(ids(catalog.search("contenuto 4")), vec![4]);
        assert_eq!(ids(catalog.search("redazione")).len(), 6);
        assert!(catalog.search("costituzione").is_empty());
    }

    #[test]
    fn empty_search_returns_everything() {
        let catalog = fixture();

        assert_eq!(ids(catalog.search("")), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ids(catalog.search("   ")).len(), 6);
    }

    #[test]
    fn spaces_in_term_are_kept() {
        let mut joined = article(1, "Diritto Civile", "15 Gennaio 2024", &[]);
        joined.title = "Ilcontratto".into();
        let mut spaced = article(0, "Diritto Civile", "15 Gennaio 2024", &[]);
        spaced.title = "Il contratto".into();
        let catalog = Catalog::new(vec![spaced, joined], Categories::default()).unwrap();

        assert_eq!(ids(catalog.search(" contratto")), vec![0]);
        assert_eq!(ids(catalog.search("contratto")), vec![0, 1]);
    }

    #[test]
    fn related_by_category_or_tag() {
        let catalog = fixture();

        // 4 shares the category, 5 shares a tag.
        assert_eq!(ids(catalog.related(1, 3)), vec![4, 5]);
        assert_eq!(ids(catalog.related(1, 1)), vec![4]);
        assert_eq!(ids(catalog.related(0, 3)), Vec::<u32>::new());
        assert!(catalog.related(99, 3).is_empty());

        for article in catalog.in_catalog_order() {
            let related = catalog.related(article.id, 2);
            assert!(related.len() <= 2);
            assert!(related.iter().all(|it| it.id != article.id));
        }
    }

    #[test]
    fn previous_and_next() {
        let catalog = fixture();

        assert_eq!(catalog.next(0), None);
        assert_eq!(catalog.previous(0).map(|a| a.id), Some(5));
        assert_eq!(catalog.previous(3), None);
        assert_eq!(catalog.next(3).map(|a| a.id), Some(2));
        assert_eq!(catalog.previous(99), None);
        assert_eq!(catalog.next(99), None);

        let sorted = catalog.list_all();
        for pair in sorted.windows(2) {
            assert_eq!(catalog.previous(pair[0].id), Some(pair[1]));
            assert_eq!(catalog.next(pair[1].id), Some(pair[0]));
        }
    }

    #[test]
    fn counts_sum_to_total() {
        let catalog = fixture();
        let counts = catalog.categories_with_counts();

        assert_eq!(counts.len(), 8);
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), catalog.len());
        assert_eq!(
            counts.iter().find(|c| c.slug == "diritto-civile").map(|c| c.count),
            Some(2)
        );
    }

    #[test]
    fn featured_truncates_list_all() {
        let catalog = fixture();

        assert_eq!(ids(catalog.featured(3)), vec![0, 5, 1]);
        assert_eq!(catalog.featured(100).len(), 6);
        assert!(catalog.featured(0).is_empty());
    }

    #[test]
    fn invariants_are_checked() {
        let duplicate = Catalog::new(
            vec![
                article(1, "Annunci", "1 Marzo 2024", &[]),
                article(1, "Annunci", "2 Marzo 2024", &[]),
            ],
            Categories::default(),
        );
        assert!(duplicate.is_err());

        let unknown = Catalog::new(
            vec![article(1, "Diritto Spaziale", "1 Marzo 2024", &[])],
            Categories::default(),
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn yaml_source() {
        let catalog = Catalog::from_yaml(
            r#"
articles:
  - id: 0
    title: "Benvenuti su Inter Leges - La Rivista è in Fase di Lancio"
    author: Redazione Inter Leges
    category: Annunci
    date: 21 Settembre 2024
    read_time: 2 min
    excerpt: Siamo lieti di presentarvi Inter Leges.
    content: "<h2>Benvenuti su Inter Leges</h2>"
    tags: [lancio, benvenuto]
"#,
            Categories::default(),
        )
        .unwrap();

        let article = catalog.get_by_id(0).unwrap();
        assert_eq!(article.slug, "benvenuti-su-inter-leges-la-rivista-e-in-fase-di-lancio");
        assert_eq!(article.read_time, "2 min");

        assert!(Catalog::from_yaml(
            "articles:\n  - {id: 1, title: x, author: y, category: Annunci, date: ieri, excerpt: e, content: c}\n",
            Categories::default(),
        )
        .is_err());
    }

    #[test]
    fn derived_slugs_never_fail_the_load() {
        let catalog = Catalog::from_yaml(
            r#"
articles:
  - {id: 3, title: "«»", author: y, category: Annunci, date: 1 Marzo 2024, excerpt: e, content: c}
"#,
            Categories::default(),
        )
        .unwrap();
        assert_eq!(catalog.get_by_id(3).map(|a| a.slug.as_str()), Some("articolo-3"));

        assert!(Catalog::from_yaml(
            r#"
articles:
  - {id: 4, title: Titolo, author: y, category: Annunci, date: 1 Marzo 2024, excerpt: e, content: c, slug: "Non Valido"}
"#,
            Categories::default(),
        )
        .is_err());
    }
}
