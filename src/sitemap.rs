use chrono::{DateTime, FixedOffset};
use sitemap_rs::{
    url::{ChangeFrequency, Url},
    url_set::UrlSet,
};

/// One page to list in the sitemap.
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(location: String, change_frequency: ChangeFrequency, priority: f32) -> Self {
        Self {
            location,
            last_modified: None,
            change_frequency,
            priority,
        }
    }

    pub fn modified(mut self, at: DateTime<FixedOffset>) -> Self {
        self.last_modified = Some(at);
        self
    }
}

pub fn render(entries: Vec<SitemapEntry>) -> anyhow::Result<Vec<u8>> {
    let mut urls: Vec<Url> = vec![];

    for entry in entries {
        let location = entry.location.clone();
        let url = match entry.last_modified {
            Some(at) => Url::builder(entry.location)
                .last_modified(at)
                .change_frequency(entry.change_frequency)
                .priority(entry.priority)
                .build(),
            None => Url::builder(entry.location)
                .change_frequency(entry.change_frequency)
                .priority(entry.priority)
                .build(),
        };

        urls.push(url.map_err(|err| anyhow::anyhow!("sitemap entry {}: {:?}", location, err))?);
    }

    let url_set = UrlSet::new(urls).map_err(|err| anyhow::anyhow!("sitemap: {:?}", err))?;
    let mut buf = Vec::<u8>::new();
    url_set
        .write(&mut buf)
        .map_err(|err| anyhow::anyhow!("writing sitemap: {:?}", err))?;

    Ok(buf)
}
