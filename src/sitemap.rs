use std::io::Cursor;

use chrono::NaiveDate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::util::date::format_date;

/* Example
<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://dane.computer/</loc>
  </url>
  <url>
    <loc>https://dane.computer/blog/hello-world/</loc>
    <lastmod>2021-06-01</lastmod>
  </url>
</urlset>
*/

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapUrl {
    pub path: String,
    pub lastmod: Option<NaiveDate>,
}

pub struct Sitemap<'a> {
    pub site_url: &'a str,
}

impl<'a> Sitemap<'a> {
    pub fn render(&self, urls: &[SitemapUrl]) -> quick_xml::Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let decl = Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None));
        writer.write_event(decl)?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NS));
        writer.write_event(Event::Start(urlset))?;

        for url in urls {
            writer.write_event(Event::Start(BytesStart::new("url")))?;

            let loc = full_link(self.site_url, &url.path);
            push_text(&mut writer, "loc", &loc)?;

            if let Some(ref lastmod) = url.lastmod {
                push_text(&mut writer, "lastmod", &format_date(lastmod))?;
            }

            writer.write_event(Event::End(BytesEnd::new("url")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        Ok(writer.into_inner().into_inner())
    }
}

/// Joins the site url and a path, both ending up with exactly one `/` between
/// them and a trailing `/`.
pub fn full_link(base_url: &str, path: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let path = path.trim_matches('/');

    if path.is_empty() {
        format!("{}/", base_url)
    } else {
        format!("{}/{}/", base_url, path)
    }
}

fn push_text(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str;

    use super::*;

    #[test]
    fn test_full_link() {
        assert_eq!(full_link("https://dane.computer", ""), "https://dane.computer/");
        assert_eq!(full_link("https://dane.computer/", "/blog/hello/"), "https://dane.computer/blog/hello/");
        assert_eq!(full_link("https://dane.computer", "blog/hello"), "https://dane.computer/blog/hello/");
    }

    #[test]
    fn render_xml() {
        let urls = vec![
            SitemapUrl { path: "".to_string(), lastmod: None },
            SitemapUrl {
                path: "blog/hello-world".to_string(),
                lastmod: NaiveDate::from_ymd_opt(2021, 6, 1),
            },
        ];
        let sitemap = Sitemap { site_url: "https://dane.computer" };
        let xml = sitemap.render(&urls).unwrap();
        assert_eq!(str::from_utf8(&xml).unwrap(), EXPECTED);
    }

    const EXPECTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>https://dane.computer/</loc></url><url><loc>https://dane.computer/blog/hello-world/</loc><lastmod>2021-06-01</lastmod></url></urlset>"##;
}
