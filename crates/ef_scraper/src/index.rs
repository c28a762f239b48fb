use ef_core::ArticleRef;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Bullet icons on the index page are at most this many pixels per side.
/// Larger images are banners and navigation graphics.
const BULLET_MAX_DIM: u32 = 15;

/// Extracts every essay entry from the index page, in document order.
///
/// The index lays entries out as cells of tables nested inside the outer
/// layout table. A cell counts as an entry when it holds a small bullet
/// image next to an anchor inside a `<font>` wrapper; cells without the
/// bullet are navigation and are skipped, as are cells with a bullet but no
/// font/anchor pair. A missing or unparseable width or height attribute
/// counts as zero, so unmeasured images pass the size filter.
pub fn extract_article_refs(html: &str, base: &Url) -> Vec<ArticleRef> {
    let document = Html::parse_document(html);
    let cell_selector = Selector::parse("table table td").unwrap();
    let img_selector = Selector::parse("img").unwrap();
    let link_selector = Selector::parse("font a").unwrap();

    let mut refs = Vec::new();
    for cell in document.select(&cell_selector) {
        let img = match cell.select(&img_selector).next() {
            Some(img) => img,
            None => continue,
        };
        if dimension(img, "width") > BULLET_MAX_DIM || dimension(img, "height") > BULLET_MAX_DIM {
            continue;
        }
        let anchor = match cell.select(&link_selector).next() {
            Some(anchor) => anchor,
            None => continue,
        };
        let href = match anchor.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let url = match base.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        refs.push(ArticleRef {
            title: anchor.text().collect::<String>(),
            url: url.to_string(),
        });
    }
    refs
}

fn dimension(img: ElementRef, attr: &str) -> u32 {
    img.value()
        .attr(attr)
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
