use chrono::{DateTime, NaiveDate};
use rss::{ChannelBuilder, EnclosureBuilder, GuidBuilder, Item, ItemBuilder};

use crate::domain::{ParsedDocument, ParsedEntry};
use crate::errors::{ScrapeError, ScrapeResult};

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Serializes a fixed document as RSS 2.0.
#[derive(Debug, Default)]
pub struct BuildService;

impl BuildService {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, document: &ParsedDocument) -> ScrapeResult<String> {
        let items: Vec<Item> = document.entries.iter().map(Self::item).collect();

        let mut channel = ChannelBuilder::default()
            .title(document.title.clone().unwrap_or_default())
            .link(document.link.clone())
            .description(document.description.clone().unwrap_or_default())
            .generator(Some(GENERATOR.to_string()))
            .items(items)
            .build();
        channel
            .namespaces
            .insert("content".to_string(), CONTENT_NAMESPACE.to_string());

        let buffer = channel
            .pretty_write_to(Vec::new(), b' ', 2)
            .map_err(|e| ScrapeError::Build(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| ScrapeError::Build(e.to_string()))
    }

    fn item(entry: &ParsedEntry) -> Item {
        let guid = GuidBuilder::default()
            .value(entry.link.clone())
            .permalink(true)
            .build();

        let enclosure = entry.image.as_ref().map(|image| {
            EnclosureBuilder::default()
                .url(image.clone())
                .length("0".to_string())
                .mime_type("image".to_string())
                .build()
        });

        ItemBuilder::default()
            .guid(Some(guid))
            .link(Some(entry.link.clone()))
            .title(entry.title.clone())
            .description(entry.content.clone())
            .content(entry.content.clone())
            .enclosure(enclosure)
            .pub_date(entry.date.as_deref().map(normalize_date))
            .build()
    }
}

/// RFC 2822 when the date is recognizable, the raw text otherwise.
fn normalize_date(raw: &str) -> String {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return date.to_rfc2822();
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return date.to_rfc2822();
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc().to_rfc2822();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rss::Channel;

    fn document() -> ParsedDocument {
        ParsedDocument {
            link: "https://example.com/news/".to_string(),
            title: Some("Example".to_string()),
            description: Some("Example stories".to_string()),
            entries: vec![
                ParsedEntry::new("https://example.com/news/1")
                    .with_title(Some("First & foremost".to_string()))
                    .with_content(Some("Paragraph one.\nParagraph two.".to_string()))
                    .with_image(Some("https://example.com/img/1.jpg".to_string()))
                    .with_date(Some("2024-05-01".to_string())),
                ParsedEntry::new("https://example.com/news/2"),
            ],
        }
    }

    #[test]
    fn test_build_channel_and_items() {
        let xml = BuildService::new().build(&document()).unwrap();
        let channel = Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "Example");
        assert_eq!(channel.link(), "https://example.com/news/");
        assert_eq!(channel.description(), "Example stories");
        assert_eq!(channel.items().len(), 2);

        let first = &channel.items()[0];
        assert_eq!(first.title(), Some("First & foremost"));
        assert_eq!(first.link(), Some("https://example.com/news/1"));
        assert_eq!(first.guid().map(|g| g.value()), Some("https://example.com/news/1"));
        assert_eq!(first.content(), Some("Paragraph one.\nParagraph two."));

        let enclosure = first.enclosure().unwrap();
        assert_eq!(enclosure.url(), "https://example.com/img/1.jpg");
        assert_eq!(enclosure.length(), "0");
        assert_eq!(enclosure.mime_type(), "image");

        let second = &channel.items()[1];
        assert_eq!(second.title(), None);
        assert!(second.enclosure().is_none());
        assert!(second.pub_date().is_none());
    }

    #[test]
    fn test_output_is_rss_2() {
        let xml = BuildService::new().build(&document()).unwrap();

        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains(CONTENT_NAMESPACE));
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(
            normalize_date("2024-05-01T10:30:00+02:00"),
            "Wed, 1 May 2024 10:30:00 +0200"
        );
        assert_eq!(normalize_date("2024-05-01"), "Wed, 1 May 2024 00:00:00 +0000");
        assert_eq!(normalize_date("yesterday evening"), "yesterday evening");
    }
}
