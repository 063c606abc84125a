use std::fmt;

use chrono::NaiveDate;
use fancy_regex::Regex;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

const WORDS_PER_MINUTE: usize = 200;

const MONTHS: [(&str, &str); 12] = [
    ("gennaio", "january"),
    ("febbraio", "february"),
    ("marzo", "march"),
    ("aprile", "april"),
    ("maggio", "may"),
    ("giugno", "june"),
    ("luglio", "july"),
    ("agosto", "august"),
    ("settembre", "september"),
    ("ottobre", "october"),
    ("novembre", "november"),
    ("dicembre", "december"),
];

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// A publication date as written by the editors, plus the calendar day it
/// stands for.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleDate {
    display: String,
    day: NaiveDate,
}

impl ArticleDate {
    /// Accepts `21 Settembre 2024`, `21 September 2024` and `2024-09-21`.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let trimmed = text.trim();

        Ok(Self {
            display: trimmed.to_owned(),
            day: Self::parse_day(trimmed)
                .ok_or_else(|| anyhow::anyhow!("unrecognised article date `{}`", text))?,
        })
    }

    fn parse_day(text: &str) -> Option<NaiveDate> {
        if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(day);
        }

        let mut parts = text.split_whitespace();
        let day: u32 = parts.next()?.trim_end_matches(['°', '.']).parse().ok()?;
        let month_name = parts.next()?.to_lowercase();
        let year: i32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }

        let month = MONTHS
            .iter()
            .position(|(it, en)| *it == month_name || *en == month_name)?;

        NaiveDate::from_ymd_opt(year, month as u32 + 1, day)
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }
}

impl TryFrom<String> for ArticleDate {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArticleDate> for String {
    fn from(value: ArticleDate) -> Self {
        value.display
    }
}

impl fmt::Display for ArticleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// An article as it appears in the data file. `read_time` and `slug` may be
/// left out and are derived when the catalog is built.
#[derive(Deserialize, Debug, Clone)]
pub struct ArticleRecord {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub date: ArticleDate,
    pub read_time: Option<String>,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub slug: Option<String>,
}

#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub category: String,
    pub date: ArticleDate,
    pub read_time: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub slug: String,
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        let read_time = record
            .read_time
            .unwrap_or_else(|| estimate_read_time(&record.content));
        // Titles without any latin letter or digit fall back to the id.
        let slug = record.slug.unwrap_or_else(|| {
            let generated = crate::slug::generate_slug(&record.title);
            if generated.is_empty() {
                format!("articolo-{}", record.id)
            } else {
                generated
            }
        });

        Self {
            id: record.id,
            title: record.title,
            author: record.author,
            category: record.category,
            date: record.date,
            read_time,
            excerpt: record.excerpt,
            content: record.content,
            tags: record.tags,
            slug,
        }
    }
}

impl Article {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|it| it == tag)
    }

    pub fn shares_tag_with(&self, other: &Article) -> bool {
        self.tags.iter().any(|tag| other.has_tag(tag))
    }

    /// Case-insensitive substring match over title, author, excerpt, content
    /// and tags. `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.title, &self.author, &self.excerpt, &self.content]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// Removes markup tags, keeping only the text between them.
pub fn strip_markup(content: &str) -> String {
    TAG_REGEX.replace_all(content, " ").into_owned()
}

pub fn estimate_read_time(content: &str) -> String {
    let words = strip_markup(content).unicode_words().count();
    let minutes = ((words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE).max(1);

    format!("{} min", minutes)
}
