//! RSS 2.0 rendering.

use chrono::NaiveDate;
use ef_core::{ArticleRecord, Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Channel-level metadata for the rendered feed.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// Renders an RSS 2.0 document with one `<item>` per record.
pub fn render(channel: &ChannelInfo, records: &[ArticleRecord]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(feed_error)?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer
        .write_event(Event::Start(rss_start))
        .map_err(feed_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(feed_error)?;
    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;

    for record in records {
        writer
            .write_event(Event::Start(BytesStart::new("item")))
            .map_err(feed_error)?;
        write_text_element(&mut writer, "title", &record.title)?;
        write_text_element(&mut writer, "link", &record.url)?;
        write_text_element(&mut writer, "description", &record.content)?;
        if !record.date.is_empty() {
            write_text_element(&mut writer, "pubDate", &format_pub_date(&record.date))?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("item")))
            .map_err(feed_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(feed_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(feed_error)?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Feed(e.to_string()))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(feed_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(feed_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(feed_error)?;
    Ok(())
}

/// Record dates are free text. Emit RFC 2822 when the value happens to be a
/// calendar date, the raw text otherwise; readers cope with either better
/// than with a missing element.
fn format_pub_date(date: &str) -> String {
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        if let Some(midnight) = parsed.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().to_rfc2822();
        }
    }
    date.to_string()
}

fn feed_error(e: quick_xml::Error) -> Error {
    Error::Feed(e.to_string())
}
