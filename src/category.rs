use serde::{Deserialize, Serialize};

/// One entry of the fixed category table.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct CategoryDef {
    pub name: String,
    pub slug: String,
    /// Short key used by the article list filter (`civile`, `penale`, ...).
    pub filter_key: String,
    pub description: String,
}

impl CategoryDef {
    fn new(name: &str, slug: &str, filter_key: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            filter_key: filter_key.into(),
            description: description.into(),
        }
    }
}

/// A category together with the number of articles currently filed under it.
#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct CategoryCount {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: usize,
}

pub fn default_categories() -> Vec<CategoryDef> {
    vec![
        CategoryDef::new(
            "Diritto Civile",
            "diritto-civile",
            "civile",
            "Contratti, responsabilità civile, diritti reali e rapporti patrimoniali tra privati",
        ),
        CategoryDef::new(
            "Diritto Penale",
            "diritto-penale",
            "penale",
            "Reati, procedura penale, giustizia penale e tutela dei diritti dell'imputato",
        ),
        CategoryDef::new(
            "Diritto Amministrativo",
            "diritto-amministrativo",
            "amministrativo",
            "Pubblica amministrazione, procedimenti amministrativi e rapporti con i cittadini",
        ),
        CategoryDef::new(
            "Diritto Costituzionale",
            "diritto-costituzionale",
            "costituzionale",
            "Diritti fondamentali, organizzazione costituzionale e giustizia costituzionale",
        ),
        CategoryDef::new(
            "Diritto del Lavoro",
            "diritto-del-lavoro",
            "lavoro",
            "Rapporti di lavoro, sindacati, previdenza sociale e tutela dei lavoratori",
        ),
        CategoryDef::new(
            "Diritto Commerciale",
            "diritto-commerciale",
            "commerciale",
            "Società, contratti commerciali, diritto dell'impresa e mercati finanziari",
        ),
        CategoryDef::new(
            "Altri",
            "altri",
            "altri",
            "Articoli su tematiche giuridiche trasversali e argomenti specialistici",
        ),
        CategoryDef::new(
            "Annunci",
            "annunci",
            "annunci",
            "Comunicazioni ufficiali, novità e aggiornamenti della rivista",
        ),
    ]
}

/// Lookup table between display names, URL slugs and filter keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categories {
    defs: Vec<CategoryDef>,
}

impl Default for Categories {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl Categories {
    pub fn new(defs: Vec<CategoryDef>) -> Self {
        Self { defs }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&CategoryDef> {
        self.defs.iter().find(|def| def.name == name)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&CategoryDef> {
        self.defs.iter().find(|def| def.slug == slug)
    }

    pub fn by_filter_key(&self, key: &str) -> Option<&CategoryDef> {
        self.defs.iter().find(|def| def.filter_key == key)
    }

    pub fn slug_for(&self, name: &str) -> Option<&str> {
        self.by_name(name).map(|def| def.slug.as_str())
    }

    pub fn name_for(&self, slug: &str) -> Option<&str> {
        self.by_slug(slug).map(|def| def.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name(name).is_some()
    }

    /// Checks that names, slugs and filter keys are each unique and that every
    /// slug is well formed.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (idx, def) in self.defs.iter().enumerate() {
            crate::slug::validate_slug(&def.slug)?;

            let rest = &self.defs[idx + 1..];
            if rest.iter().any(|other| other.name == def.name) {
                anyhow::bail!("category `{}` is defined twice", def.name);
            }
            if rest.iter().any(|other| other.slug == def.slug) {
                anyhow::bail!("category slug `{}` is used twice", def.slug);
            }
            if rest.iter().any(|other| other.filter_key == def.filter_key) {
                anyhow::bail!("category filter key `{}` is used twice", def.filter_key);
            }
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = &'a CategoryDef;
    type IntoIter = std::slice::Iter<'a, CategoryDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.defs.iter()
    }
}
