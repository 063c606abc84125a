use chrono::{DateTime, FixedOffset, NaiveTime};
use rss::{
    CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, ImageBuilder, Item, ItemBuilder,
    TextInputBuilder,
};

use crate::{article::Article, catalog::Catalog, config::Config, pages::article_url};

/// Midnight UTC of the article's date.
pub fn published_at(article: &Article) -> DateTime<FixedOffset> {
    article
        .date
        .day()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .fixed_offset()
}

fn item(config: &Config, article: &Article) -> Item {
    let link = config.url(&article_url(article.id));

    let mut categories = vec![CategoryBuilder::default()
        .name(article.category.clone())
        .build()];
    categories.extend(
        article
            .tags
            .iter()
            .map(|tag| CategoryBuilder::default().name(tag.clone()).build()),
    );

    ItemBuilder::default()
        .title(Some(article.title.clone()))
        .link(Some(link.clone()))
        .description(Some(article.excerpt.clone()))
        .author(Some(article.author.clone()))
        .categories(categories)
        .guid(Some(GuidBuilder::default().value(link).permalink(true).build()))
        .pub_date(Some(published_at(article).to_rfc2822()))
        .build()
}

/// Builds the RSS channel, newest articles first. Without an `rss` section
/// the channel describes the site itself.
pub fn channel(config: &Config, catalog: &Catalog) -> Channel {
    let items: Vec<Item> = catalog
        .list_all()
        .into_iter()
        .map(|article| item(config, article))
        .collect();

    let mut builder = ChannelBuilder::default();
    builder.items(items);

    match &config.rss {
        None => {
            builder
                .title(config.site_name.clone())
                .link(config.url("/"))
                .description(config.description.clone())
                .language(Some("it-IT".to_owned()));
        }
        Some(rss) => {
            builder
                .title(rss.title.clone())
                .link(rss.link.clone())
                .description(rss.description.clone())
                .language(rss.language.clone())
                .copyright(rss.copyright.clone())
                .managing_editor(rss.managing_editor.clone())
                .webmaster(rss.webmaster.clone())
                .ttl(rss.ttl.map(|ttl| ttl.to_string()))
                .rating(rss.rating.clone())
                .skip_hours(rss.skip_hours.clone().unwrap_or_default())
                .skip_days(rss.skip_days.clone().unwrap_or_default())
                .categories(
                    rss.categories
                        .iter()
                        .flatten()
                        .map(|category| {
                            CategoryBuilder::default()
                                .name(category.name.clone())
                                .domain(category.domain.clone())
                                .build()
                        })
                        .collect::<Vec<_>>(),
                )
                .image(rss.image.as_ref().map(|image| {
                    ImageBuilder::default()
                        .url(image.url.clone())
                        .title(image.title.clone())
                        .link(image.link.clone())
                        .width(image.width.clone())
                        .height(image.height.clone())
                        .description(image.description.clone())
                        .build()
                }))
                .text_input(rss.text_input.as_ref().map(|input| {
                    TextInputBuilder::default()
                        .title(input.title.clone())
                        .description(input.description.clone())
                        .name(input.name.clone())
                        .link(input.link.clone())
                        .build()
                }));
        }
    }

    builder.build()
}

#[cfg(test)]
mod test {
    use crate::{catalog::test::fixture, config::Config};

    use super::channel;

    #[test]
    fn newest_first() {
        let config = Config::from_yaml("site_url: https://interleges.it").unwrap();
        let channel = channel(&config, &fixture());

        assert_eq!(channel.title(), "Inter Leges");
        assert_eq!(channel.items().len(), 6);

        let first = &channel.items()[0];
        assert_eq!(first.link(), Some("https://interleges.it/articoli/0/"));
        assert_eq!(first.pub_date(), Some("Sat, 21 Sep 2024 00:00:00 +0000"));
        assert_eq!(first.categories()[0].name(), "Annunci");
        assert_eq!(first.categories()[1].name(), "lancio");
    }

    #[test]
    fn configured_channel() {
        let config = Config::from_yaml(
            r#"
site_url: https://interleges.it
rss:
  title: Inter Leges - Feed
  link: https://interleges.it
  description: Gli ultimi articoli
  ttl: 60
"#,
        )
        .unwrap();
        let channel = channel(&config, &fixture());

        assert_eq!(channel.title(), "Inter Leges - Feed");
        assert_eq!(channel.ttl(), Some("60"));
        assert!(channel.to_string().contains("<title>Inter Leges - Feed</title>"));
    }
}
