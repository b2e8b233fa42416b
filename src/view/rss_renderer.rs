use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::SiteMetadata;
use crate::post::BlogPostMeta;
use crate::text_utils::format_utc_string;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const LANGUAGE: &str = "en-us";

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Jessica Phan - Blog</title>
    <link>https://jessicaphan.com/blog</link>
    <description>Designer and developer</description>
    <language>en-us</language>
    <lastBuildDate>Mon, 20 Jan 2025 09:00:00 GMT</lastBuildDate>
    <atom:link href="https://jessicaphan.com/feed.xml" rel="self" type="application/rss+xml"/>
    <item>
      <title><![CDATA[Designing with Constraints]]></title>
      <link>https://jessicaphan.com/blog/designing-with-constraints</link>
      <guid isPermaLink="true">https://jessicaphan.com/blog/designing-with-constraints</guid>
      <description><![CDATA[Why limits make better work]]></description>
      <pubDate>Mon, 20 Jan 2025 00:00:00 GMT</pubDate>
      <category>design</category>
    </item>
  </channel>
</rss>
*/

pub struct RssChannel {
    pub ch_title: String,
    pub ch_link: String,
    pub ch_desc: String,
    pub self_link: String,
    pub site_url: String,
    pub build_date: DateTime<Utc>,
}

/// Renders the blog feed. Posts are written in the order given.
pub fn render_feed(posts: &[BlogPostMeta], site: &SiteMetadata) -> quick_xml::Result<Vec<u8>> {
    RssChannel::new(site, Utc::now()).render(posts)
}

impl RssChannel {
    pub fn new(site: &SiteMetadata, build_date: DateTime<Utc>) -> Self {
        let site_url = site.site_url();
        RssChannel {
            ch_title: format!("{} - Blog", site.name),
            ch_link: format!("{}/blog", site_url),
            ch_desc: site.tagline.clone(),
            self_link: format!("{}/feed.xml", site_url),
            site_url,
            build_date,
        }
    }

    pub fn render(&self, posts: &[BlogPostMeta]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        // <?xml version="1.0" encoding="UTF-8"?>
        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        // <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        writer.write_event(Event::Start(rss))?;

        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", &self.ch_title)?;
        push_text(&mut writer, "link", &self.ch_link)?;
        push_text(&mut writer, "description", &self.ch_desc)?;
        push_text(&mut writer, "language", LANGUAGE)?;
        push_text(&mut writer, "lastBuildDate", &format_utc_string(&self.build_date))?;

        // <atom:link href="https://jessicaphan.com/feed.xml" rel="self" type="application/rss+xml"/>
        let mut atom_link = BytesStart::new("atom:link");
        atom_link.push_attribute(("href", self.self_link.as_str()));
        atom_link.push_attribute(("rel", "self"));
        atom_link.push_attribute(("type", "application/rss+xml"));
        writer.write_event(Event::Empty(atom_link))?;

        for post in posts {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_cdata(&mut writer, "title", &post.title)?;

            let link = post_link(&self.site_url, &post.slug);
            push_text(&mut writer, "link", &link)?;

            // <guid isPermaLink="true">https://jessicaphan.com/blog/designing-with-constraints</guid>
            let mut guid_elem = BytesStart::new("guid");
            guid_elem.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid_elem))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            push_cdata(&mut writer, "description", &post.description)?;
            push_text(&mut writer, "pubDate", &format_utc_string(&post.date))?;

            for tag in &post.tags {
                push_text(&mut writer, "category", tag)?;
            }

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(writer.into_inner().into_inner())
    }
}

fn post_link(site_url: &str, slug: &str) -> String {
    format!("{}/blog/{}", site_url, slug)
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Text goes out as-is inside CDATA. A literal `]]>` cannot live in one section, so the
/// text is split there into adjacent sections that read back as the original.
fn push_cdata(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    let pieces: Vec<&str> = text.split("]]>").collect();
    let last = pieces.len() - 1;
    for (i, piece) in pieces.iter().enumerate() {
        let mut section = String::with_capacity(piece.len() + 3);
        if i > 0 {
            section.push('>');
        }
        section.push_str(piece);
        if i < last {
            section.push_str("]]");
        }
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
