//! One function per page of the magazine. Each gathers what its template
//! needs from the catalog and renders it.

use anyhow::Context as _;
use relative_path::RelativePathBuf;
use serde::Serialize;
use tera::Context;

use crate::{
    article::Article,
    catalog::Catalog,
    category::CategoryDef,
    config::Config,
    donation::{Amount, DonationTier, PaymentOrder},
    highlight::highlight,
    metadata::PageMetadata,
    query::{ArticleQuery, CategoryFilter, SortOrder},
    share::ShareLinks,
    template::Templates,
};

pub fn article_url(id: u32) -> String {
    format!("/articoli/{}/", id)
}

pub fn category_url(slug: &str) -> String {
    format!("/categorie/{}/", slug)
}

pub fn list_url(sort: SortOrder) -> String {
    match sort.path_segment() {
        Some(segment) => format!("/articoli/{}/", segment),
        None => "/articoli/".into(),
    }
}

/// Output file for a site URL: `/articoli/3/` lands in `articoli/3/index.html`.
pub fn output_path(url: &str) -> RelativePathBuf {
    let trimmed = url.trim_matches('/');
    if url.ends_with(".html") {
        RelativePathBuf::from(trimmed)
    } else if trimmed.is_empty() {
        RelativePathBuf::from("index.html")
    } else {
        RelativePathBuf::from(trimmed).join("index.html")
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: String,
    pub path: RelativePathBuf,
    pub html: String,
    pub metadata: PageMetadata,
}

#[derive(Serialize, Debug)]
struct Site<'a> {
    name: &'a str,
    url: &'a str,
    description: &'a str,
    social_handle: &'a str,
}

/// An article as shown in lists. The `*_html` fields are escaped, with search
/// matches wrapped in `<mark>`.
#[derive(Serialize, Debug)]
struct ArticleCard<'a> {
    id: u32,
    url: String,
    title: &'a str,
    title_html: String,
    excerpt_html: String,
    author_html: String,
    date: &'a str,
    read_time: &'a str,
    category: &'a str,
    category_url: Option<String>,
}

#[derive(Serialize, Debug)]
struct SortLink {
    key: &'static str,
    label: &'static str,
    url: String,
    active: bool,
}

#[derive(Serialize, Debug)]
struct FilterOption<'a> {
    label: &'a str,
    url: String,
    active: bool,
}

pub struct PageContext<'a> {
    pub config: &'a Config,
    pub catalog: &'a Catalog,
    pub templates: &'a Templates,
}

impl<'a> PageContext<'a> {
    pub fn new(config: &'a Config, catalog: &'a Catalog, templates: &'a Templates) -> Self {
        Self {
            config,
            catalog,
            templates,
        }
    }

    fn base_context(&self, metadata: &PageMetadata) -> Context {
        let mut context = Context::new();

        context.insert(
            "site",
            &Site {
                name: &self.config.site_name,
                url: &self.config.site_url,
                description: &self.config.description,
                social_handle: &self.config.social_handle,
            },
        );
        context.insert(
            "nav_categories",
            &self
                .catalog
                .categories()
                .iter()
                .map(|def| (def.name.as_str(), category_url(&def.slug)))
                .collect::<Vec<_>>(),
        );
        context.insert("page", metadata);

        context
    }

    fn card(&self, article: &'a Article, term: &str) -> ArticleCard<'a> {
        ArticleCard {
            id: article.id,
            url: article_url(article.id),
            title: &article.title,
            title_html: highlight(&article.title, term),
            excerpt_html: highlight(&article.excerpt, term),
            author_html: highlight(&article.author, term),
            date: article.date.as_str(),
            read_time: &article.read_time,
            category: &article.category,
            category_url: self
                .catalog
                .categories()
                .slug_for(&article.category)
                .map(category_url),
        }
    }

    fn cards(&self, articles: Vec<&'a Article>, term: &str) -> Vec<ArticleCard<'a>> {
        articles
            .into_iter()
            .map(|article| self.card(article, term))
            .collect()
    }

    fn render(
        &self,
        template: &str,
        url: &str,
        metadata: PageMetadata,
        context: Context,
    ) -> anyhow::Result<RenderedPage> {
        let html = self
            .templates
            .render(template, &context)
            .with_context(|| format!("rendering {} with {}", url, template))?;

        Ok(RenderedPage {
            url: url.to_owned(),
            path: output_path(url),
            html,
            metadata,
        })
    }

    pub fn home(&self) -> anyhow::Result<RenderedPage> {
        let metadata = PageMetadata::page(self.config, None, &self.config.description, "/");
        let mut context = self.base_context(&metadata);

        context.insert(
            "featured",
            &self.cards(self.catalog.featured(self.config.listing.featured_limit), ""),
        );
        context.insert("categories", &self.category_counts());
        context.insert("total_articles", &self.catalog.len());

        self.render("index.html", "/", metadata, context)
    }

    /// The article list for a query. Only the sort order decides where the
    /// page lives; search terms and filters are for previews and the CLI.
    pub fn article_list(&self, query: &ArticleQuery) -> anyhow::Result<RenderedPage> {
        let url = list_url(query.sort);
        let metadata = PageMetadata::page(
            self.config,
            Some("Tutti gli Articoli"),
            "Esplora la nostra collezione completa di articoli giuridici di qualità accademica",
            &url,
        );
        let mut context = self.base_context(&metadata);
        let found = query.run(self.catalog);

        context.insert("result_count", &found.len());
        context.insert("articles", &self.cards(found, &query.term));
        context.insert("term", &query.term);
        context.insert(
            "sort_links",
            &SortOrder::ALL
                .iter()
                .map(|sort| SortLink {
                    key: sort.key(),
                    label: sort.label(),
                    url: list_url(*sort),
                    active: *sort == query.sort,
                })
                .collect::<Vec<_>>(),
        );

        let mut filters = vec![FilterOption {
            label: "Tutte le categorie",
            url: list_url(query.sort),
            active: query.category == CategoryFilter::All,
        }];
        filters.extend(self.catalog.categories().iter().map(|def| FilterOption {
            label: &def.name,
            url: category_url(&def.slug),
            active: query.category == CategoryFilter::Key(def.filter_key.clone()),
        }));
        context.insert("filters", &filters);

        self.render("articles.html", &url, metadata, context)
    }

    pub fn article(&self, article: &Article) -> anyhow::Result<RenderedPage> {
        let url = article_url(article.id);
        let metadata = PageMetadata::article(self.config, article, &url);
        let mut context = self.base_context(&metadata);

        context.insert("article", article);
        context.insert(
            "category_url",
            &self
                .catalog
                .categories()
                .slug_for(&article.category)
                .map(category_url),
        );
        context.insert(
            "share_html",
            &ShareLinks::new(&article.title, &self.config.url(&url), &self.config.social_handle)
                .to_html(),
        );
        context.insert(
            "previous",
            &self.catalog.previous(article.id).map(|it| self.card(it, "")),
        );
        context.insert("next", &self.catalog.next(article.id).map(|it| self.card(it, "")));
        context.insert(
            "related",
            &self.cards(
                self.catalog
                    .related(article.id, self.config.listing.related_limit),
                "",
            ),
        );
        context.insert("categories", &self.category_counts());

        self.render("article.html", &url, metadata, context)
    }

    /// The article page, or the not-found page when no article has `id`.
    pub fn article_by_id(&self, id: u32) -> anyhow::Result<RenderedPage> {
        match self.catalog.get_by_id(id) {
            Some(article) => self.article(article),
            None => self.not_found(
                "Articolo non trovato",
                "L'articolo che stai cercando non esiste o è stato rimosso.",
            ),
        }
    }

    pub fn categories(&self) -> anyhow::Result<RenderedPage> {
        let url = "/categorie/";
        let metadata = PageMetadata::page(
            self.config,
            Some("Categorie Giuridiche"),
            "Esplora i nostri articoli organizzati per area del diritto",
            url,
        );
        let mut context = self.base_context(&metadata);

        context.insert("categories", &self.category_counts());
        context.insert("total_articles", &self.catalog.len());

        self.render("categories.html", url, metadata, context)
    }

    pub fn category(&self, def: &CategoryDef) -> anyhow::Result<RenderedPage> {
        let url = category_url(&def.slug);
        let metadata = PageMetadata::page(self.config, Some(&def.name), &def.description, &url);
        let mut context = self.base_context(&metadata);
        let articles = self.catalog.list_by_category(&def.name);

        context.insert("category", def);
        context.insert("article_count", &articles.len());
        context.insert("articles", &self.cards(articles, ""));
        context.insert(
            "other_categories",
            &self
                .category_counts()
                .into_iter()
                .filter(|other| other.slug != def.slug)
                .take(self.config.listing.other_categories)
                .collect::<Vec<_>>(),
        );

        self.render("category.html", &url, metadata, context)
    }

    pub fn category_by_slug(&self, slug: &str) -> anyhow::Result<RenderedPage> {
        match self.catalog.categories().by_slug(slug) {
            Some(def) => self.category(def),
            None => self.not_found(
                "Categoria non trovata",
                "La categoria che stai cercando non esiste.",
            ),
        }
    }

    pub fn contact(&self) -> anyhow::Result<RenderedPage> {
        let url = "/contatti/";
        let metadata = PageMetadata::page(
            self.config,
            Some("Contatti"),
            "Entra in contatto con la nostra redazione o scopri come contribuire alla rivista",
            url,
        );
        let mut context = self.base_context(&metadata);

        let contact = &self.config.contact;
        context.insert(
            "email_service",
            &EmailService {
                service_id: contact.service_id.as_deref().unwrap_or_default(),
                template_id: contact.template_id.as_deref().unwrap_or_default(),
                public_key: contact.public_key.as_deref().unwrap_or_default(),
            },
        );
        context.insert("form_url", &self.config.url(url));

        self.render("contact.html", url, metadata, context)
    }

    pub fn donate(&self) -> anyhow::Result<RenderedPage> {
        let url = "/sostienici/";
        let metadata = PageMetadata::page(
            self.config,
            Some("Sostieni il Progetto"),
            "Aiutaci a mantenere la rivista giuridica gratuita e di qualità per tutti",
            url,
        );
        let mut context = self.base_context(&metadata);
        let donation = &self.config.donation;

        let tiers = donation
            .tiers
            .iter()
            .map(|tier| {
                Amount::from_euros(tier.amount)
                    .map(|amount| TierWithOrder {
                        tier,
                        order: PaymentOrder::new(amount, &donation.currency, &self.config.site_name),
                    })
                    .with_context(|| format!("donation tier `{}`", tier.name))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let default_amount = Amount::from_euros(donation.default_amount)
            .context("default donation amount")?;

        context.insert("tiers", &tiers);
        context.insert("default_amount", &default_amount.to_string());
        context.insert("currency", &donation.currency);
        context.insert(
            "client_id",
            donation.client_id.as_deref().unwrap_or_default(),
        );

        self.render("donate.html", url, metadata, context)
    }

    pub fn not_found(&self, heading: &str, message: &str) -> anyhow::Result<RenderedPage> {
        let metadata = PageMetadata::page(self.config, Some(heading), message, "/404.html");
        let mut context = self.base_context(&metadata);

        context.insert("heading", heading);
        context.insert("message", message);

        self.render("not_found.html", "/404.html", metadata, context)
    }

    fn category_counts(&self) -> Vec<CategoryWithUrl> {
        self.catalog
            .categories_with_counts()
            .into_iter()
            .map(|count| CategoryWithUrl {
                url: category_url(&count.slug),
                name: count.name,
                slug: count.slug,
                description: count.description,
                count: count.count,
            })
            .collect()
    }
}

#[derive(Serialize, Debug)]
struct TierWithOrder<'a> {
    #[serde(flatten)]
    tier: &'a DonationTier,
    order: PaymentOrder,
}

/// Identifiers the contact form passes to the external email service.
#[derive(Serialize, Debug)]
struct EmailService<'a> {
    service_id: &'a str,
    template_id: &'a str,
    public_key: &'a str,
}

#[derive(Serialize, Debug)]
struct CategoryWithUrl {
    name: String,
    slug: String,
    url: String,
    description: String,
    count: usize,
}

#[cfg(test)]
mod test {
    use crate::{
        catalog::test::fixture,
        config::Config,
        query::{ArticleQuery, SortOrder},
        template::Templates,
    };

    use super::{output_path, PageContext};

    fn config() -> Config {
        Config::from_yaml("site_url: https://interleges.it").unwrap()
    }

    #[test]
    fn output_paths() {
        assert_eq!(output_path("/").as_str(), "index.html");
        assert_eq!(output_path("/articoli/3/").as_str(), "articoli/3/index.html");
        assert_eq!(output_path("/404.html").as_str(), "404.html");
    }

    #[test]
    fn article_page() {
        let (config, catalog) = (config(), fixture());
        let templates = Templates::new(None).unwrap();
        let pages = PageContext::new(&config, &catalog, &templates);

        let page = pages.article_by_id(1).unwrap();

        assert_eq!(page.path.as_str(), "articoli/1/index.html");
        assert!(page.html.contains("<p>Contenuto 1</p>"));
        assert!(page.html.contains("Articolo 1 - Inter Leges"));
        // Previous is the older 4, next the newer 5; related are 4 and 5.
        assert!(page.html.contains("href=\"/articoli/4/\""));
        assert!(page.html.contains("href=\"/articoli/5/\""));
        assert!(page.html.contains("href=\"/categorie/diritto-civile/\""));
    }

    #[test]
    fn unknown_ids_and_slugs() {
        let (config, catalog) = (config(), fixture());
        let templates = Templates::new(None).unwrap();
        let pages = PageContext::new(&config, &catalog, &templates);

        let missing = pages.article_by_id(99).unwrap();
        assert_eq!(missing.path.as_str(), "404.html");
        assert!(missing.html.contains("Articolo non trovato"));

        let missing = pages.category_by_slug("diritto-spaziale").unwrap();
        assert!(missing.html.contains("Categoria non trovata"));
    }

    #[test]
    fn search_results_are_highlighted() {
        let (config, catalog) = (config(), fixture());
        let templates = Templates::new(None).unwrap();
        let pages = PageContext::new(&config, &catalog, &templates);

        let page = pages
            .article_list(&ArticleQuery::new("estratto 3").sorted_by(SortOrder::Title))
            .unwrap();

        assert_eq!(page.path.as_str(), "articoli/titolo/index.html");
        assert!(page.html.contains("<mark>Estratto 3</mark>"));
        assert!(page.html.contains("1 articoli trovati"));
    }

    #[test]
    fn list_filters_link_to_category_pages() {
        let (config, catalog) = (config(), fixture());
        let templates = Templates::new(None).unwrap();
        let pages = PageContext::new(&config, &catalog, &templates);

        let page = pages.article_list(&ArticleQuery::default()).unwrap();

        assert!(!page.html.contains("<form"));
        assert!(page.html.contains("href=\"/categorie/diritto-penale/\""));
        assert!(page.html.contains("href=\"/articoli/\" class=\"active\">Tutte le categorie</a>"));
    }

    #[test]
    fn donation_page_lists_orders() {
        let (config, catalog) = (config(), fixture());
        let templates = Templates::new(None).unwrap();
        let pages = PageContext::new(&config, &catalog, &templates);

        let page = pages.donate().unwrap();

        assert!(page.html.contains("Donazione a Inter Leges - €25"));
        assert!(page.html.contains("Patrono"));
    }
}
