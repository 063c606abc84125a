use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{DEFAULT_FEATURED_LIMIT, DEFAULT_RELATED_LIMIT},
    category::{default_categories, Categories, CategoryDef},
    donation::{default_tiers, DonationTier},
};

pub const SITE_URL_VAR: &str = "INTERLEGES_SITE_URL";

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Config {
    pub site_url: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default = "default_handle")]
    pub social_handle: String,
    #[serde(default = "default_articles")]
    pub articles: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub categories: Option<Vec<CategoryDef>>,
    #[serde(default)]
    pub listing: ListingConfig,
    pub rss: Option<RSSConfig>,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub donation: DonationConfig,
}

fn default_site_name() -> String {
    "Inter Leges".into()
}

fn default_description() -> String {
    "Rivista giuridica online: analisi, commenti e approfondimenti sul diritto contemporaneo".into()
}

fn default_handle() -> String {
    "@InterLeges".into()
}

fn default_articles() -> PathBuf {
    "articles.yml".into()
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct ListingConfig {
    pub featured_limit: usize,
    pub related_limit: usize,
    /// How many other categories a category page links to.
    pub other_categories: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            featured_limit: DEFAULT_FEATURED_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
            other_categories: 5,
        }
    }
}

/// Identifiers of the external email service used by the contact form.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct ContactConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub outbox_dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct DonationConfig {
    pub client_id: Option<String>,
    pub currency: String,
    pub default_amount: u32,
    pub tiers: Vec<DonationTier>,
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            currency: "EUR".into(),
            default_amount: 10,
            tiers: default_tiers(),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RSSConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub managing_editor: Option<String>,
    pub webmaster: Option<String>,
    pub categories: Option<Vec<Category>>,
    pub ttl: Option<u32>,
    pub image: Option<Image>,
    pub rating: Option<String>,
    pub text_input: Option<TextInput>,
    pub skip_hours: Option<Vec<String>>,
    pub skip_days: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Category {
    pub name: String,
    pub domain: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Image {
    pub url: String,
    pub title: String,
    pub link: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct TextInput {
    pub title: String,
    pub description: String,
    pub name: String,
    pub link: String,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let mut config: Config = serde_yaml::from_str(yaml)?;
        config.site_url = config.site_url.trim_end_matches('/').to_owned();
        Ok(config)
    }

    /// Reads the configuration file. Relative paths inside it are resolved
    /// against the file's directory, and `INTERLEGES_SITE_URL` wins over
    /// `site_url`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {:?}", path))?;
        let mut config =
            Self::from_yaml(&yaml).with_context(|| format!("parsing configuration {:?}", path))?;

        if let Ok(url) = std::env::var(SITE_URL_VAR) {
            log::info!("Using site URL `{}` from {}", url, SITE_URL_VAR);
            config.site_url = url.trim_end_matches('/').to_owned();
        }

        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));

        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.articles);
        self.templates_dir.iter_mut().for_each(resolve);
        self.static_dir.iter_mut().for_each(resolve);
        self.contact.outbox_dir.iter_mut().for_each(resolve);
    }

    pub fn categories(&self) -> Categories {
        Categories::new(self.categories.clone().unwrap_or_else(default_categories))
    }

    /// Absolute URL of a site path such as `/articoli/0/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url, path.trim_start_matches('/'))
    }

    pub fn outbox_dir(&self) -> PathBuf {
        self.contact
            .outbox_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("outbox"))
    }
}
