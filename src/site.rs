use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use sitemap_rs::url::ChangeFrequency;

use crate::{
    catalog::Catalog,
    config::Config,
    feed,
    pages::{PageContext, RenderedPage},
    query::{ArticleQuery, SortOrder},
    sitemap::{self, SitemapEntry},
    template::Templates,
};

fn filter_file(file: &Path) -> bool {
    let Some(filename) = file.file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    let is_backup = filename.ends_with('~');
    let is_buffer = filename.ends_with('#') && filename.starts_with('#');

    file.is_file() && !is_buffer && !is_backup
}

fn file_changed(old: &Path, new: &Path) -> std::io::Result<bool> {
    Ok(!new.exists() || new.metadata()?.modified()? < old.metadata()?.modified()?)
}

fn writeable(path: &Path) -> std::io::Result<std::fs::File> {
    use std::fs::{create_dir_all, File};

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    File::create(path)
}

fn write_file(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    writeable(path)
        .and_then(|mut file| file.write_all(contents))
        .with_context(|| format!("writing {:?}", path))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub assets_copied: usize,
    pub assets_skipped: usize,
}

pub struct SiteBuilder<'a> {
    config: &'a Config,
    catalog: &'a Catalog,
    pages: PageContext<'a>,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a Config, catalog: &'a Catalog, templates: &'a Templates) -> Self {
        Self {
            config,
            catalog,
            pages: PageContext::new(config, catalog, templates),
        }
    }

    /// Every HTML page of the site, 404 page last.
    pub fn render_pages(&self) -> anyhow::Result<Vec<RenderedPage>> {
        let mut rendered = vec![self.pages.home()?];

        for sort in SortOrder::ALL {
            rendered.push(self.pages.article_list(&ArticleQuery::default().sorted_by(sort))?);
        }
        for article in self.catalog.list_all() {
            log::debug!("Rendering article {} ({})", article.id, article.slug);
            rendered.push(self.pages.article(article)?);
        }

        rendered.push(self.pages.categories()?);
        for def in self.catalog.categories() {
            rendered.push(self.pages.category(def)?);
        }

        rendered.push(self.pages.contact()?);
        rendered.push(self.pages.donate()?);
        rendered.push(self.pages.not_found(
            "Pagina non trovata",
            "La pagina che stai cercando non esiste o è stata spostata.",
        )?);

        Ok(rendered)
    }

    fn sitemap_entries(&self, pages: &[RenderedPage]) -> Vec<SitemapEntry> {
        let mut entries = vec![];

        for page in pages {
            if page.url.ends_with(".html") {
                continue;
            }

            let location = self.config.url(&page.url);
            let entry = if page.url == "/" {
                SitemapEntry::new(location, ChangeFrequency::Daily, 1.0)
            } else if page.url.starts_with("/articoli/") {
                let id = page
                    .url
                    .trim_start_matches("/articoli/")
                    .trim_end_matches('/')
                    .parse::<u32>()
                    .ok();

                match id.and_then(|id| self.catalog.get_by_id(id)) {
                    Some(article) => {
                        SitemapEntry::new(location, ChangeFrequency::Monthly, 0.8)
                            .modified(feed::published_at(article))
                    }
                    None => SitemapEntry::new(location, ChangeFrequency::Daily, 0.9),
                }
            } else if page.url.starts_with("/categorie/") {
                SitemapEntry::new(location, ChangeFrequency::Weekly, 0.7)
            } else {
                SitemapEntry::new(location, ChangeFrequency::Yearly, 0.5)
            };

            entries.push(entry);
        }

        entries
    }

    /// Copies static assets, skipping editor leftovers and up-to-date copies.
    fn copy_static(&self, dir: &Path, dest: &Path, report: &mut BuildReport) -> anyhow::Result<()> {
        let root = dir
            .canonicalize()
            .with_context(|| format!("static directory {:?}", dir))?;

        for entry in walkdir::WalkDir::new(&root) {
            let entry = entry.with_context(|| format!("walking {:?}", root))?;
            let file = entry.path();
            if !filter_file(file) {
                continue;
            }

            let relative = file.strip_prefix(&root)?;
            let target: PathBuf = dest.join(relative);

            if !file_changed(file, &target)? {
                log::debug!("{:?} is up to date", target);
                report.assets_skipped += 1;
                continue;
            }

            log::info!("Copying {:?}", relative);
            write_file(&target, &std::fs::read(file)?)?;
            report.assets_copied += 1;
        }

        Ok(())
    }

    pub fn build(&self, dest: &Path) -> anyhow::Result<BuildReport> {
        let mut report = BuildReport::default();
        let pages = self.render_pages()?;

        for page in &pages {
            log::info!("Writing {}", page.path);
            write_file(&page.path.to_path(dest), page.html.as_bytes())?;
        }
        report.pages = pages.len();

        write_file(
            &dest.join("feed.xml"),
            feed::channel(self.config, self.catalog).to_string().as_bytes(),
        )?;
        write_file(
            &dest.join("sitemap.xml"),
            &sitemap::render(self.sitemap_entries(&pages))?,
        )?;

        match &self.config.static_dir {
            Some(dir) => self.copy_static(dir, dest, &mut report)?,
            None => log::debug!("No static directory configured"),
        }

        Ok(report)
    }
}

/// Loads the catalog and templates named by `config` and builds the site into
/// `dest`.
pub fn build_site(config: &Config, dest: &Path) -> anyhow::Result<BuildReport> {
    let catalog = Catalog::load(&config.articles, config.categories())?;
    let templates = Templates::new(config.templates_dir.as_deref())
        .context("loading templates")?;

    SiteBuilder::new(config, &catalog, &templates).build(dest)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::filter_file;

    #[test]
    fn skips_editor_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["style.css", "style.css~", "#style.css#"] {
            std::fs::write(dir.path().join(name), "body {}").unwrap();
        }

        assert!(filter_file(&dir.path().join("style.css")));
        assert!(!filter_file(&dir.path().join("style.css~")));
        assert!(!filter_file(&dir.path().join("#style.css#")));
        assert!(!filter_file(dir.path()));
        assert!(!filter_file(Path::new("/")));
    }
}
