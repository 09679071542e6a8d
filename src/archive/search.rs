use tracing::debug;

use super::{Card, Listing};
use crate::dom::{Node, Page, eager_image, first_attr, select_text};
use crate::models::{SearchPage, SearchResult};

const ARTICLE: &str = "div#archive-content article";
const ARTICLE_TITLE: &str = "h3, .entry-title";
const NEXT_PAGE: &str = ".pagination .next";

pub fn parse_search(markup: &str, query: &str, page: u32) -> SearchPage {
    let document = Page::parse(markup);
    let search = extract_search(&document.root(), page);

    debug!(
        query,
        page,
        results = search.results.len(),
        has_next_page = search.has_next_page,
        "Parsed search page"
    );

    search
}

pub fn extract_search<N: Node>(root: &N, page: u32) -> SearchPage {
    let results = root.select(ARTICLE).iter().filter_map(result).collect();
    let has_next_page = root.first(NEXT_PAGE).is_some();

    SearchPage {
        results,
        page,
        has_next_page,
    }
}

fn result<N: Node>(article: &N) -> Option<SearchResult> {
    let Listing {
        id,
        title,
        url,
        poster,
    } = Card::new(
        select_text(article, ARTICLE_TITLE),
        first_attr(article, "a", "href"),
        eager_image(article),
    )
    .with_segment_fallback()
    .into_listing()?;

    Some(SearchResult {
        id,
        title,
        poster,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"
    <html><body>
        <div id="archive-content">
            <article>
                <a href="https://www.desidubanime.me/anime/naruto-shippuden/">
                    <img src="https://cdn/shippuden.jpg" data-src="https://cdn/lazy.jpg">
                </a>
                <h3>Naruto Shippuden</h3>
            </article>
            <article>
                <a href="https://www.desidubanime.me/naruto-the-movie/"><img data-src="https://cdn/movie.jpg"></a>
                <div class="entry-title">Naruto the Movie</div>
            </article>
            <article>
                <h3>No link here</h3>
            </article>
            <article>
                <a href="https://www.desidubanime.me/anime/boruto/"></a>
            </article>
        </div>
        <article><a href="https://www.desidubanime.me/anime/outside/"></a><h3>Outside</h3></article>
        <div class="pagination"><a class="next" href="/page/2/?s=naruto">Next</a></div>
    </body></html>"#;

    #[test]
    fn test_parse_search() {
        let search = parse_search(SEARCH, "naruto", 1);

        assert_eq!(search.page, 1);
        assert!(search.has_next_page);
        assert_eq!(
            search.results,
            vec![
                SearchResult {
                    id: "naruto-shippuden".into(),
                    title: "Naruto Shippuden".into(),
                    poster: Some("https://cdn/shippuden.jpg".into()),
                    url: "https://www.desidubanime.me/anime/naruto-shippuden/".into(),
                },
                SearchResult {
                    id: "naruto-the-movie".into(),
                    title: "Naruto the Movie".into(),
                    poster: Some("https://cdn/movie.jpg".into()),
                    url: "https://www.desidubanime.me/naruto-the-movie/".into(),
                },
            ]
        );
    }

    #[test]
    fn test_last_page() {
        let html = r#"<div id="archive-content"></div><div class="pagination"><span class="current">3</span></div>"#;
        let search = parse_search(html, "naruto", 3);

        assert!(search.results.is_empty());
        assert_eq!(search.page, 3);
        assert!(!search.has_next_page);
    }

    #[tokio::test]
    #[ignore]
    async fn test_remote() {
        use crate::fetcher::{Fetch, Fetcher};
        use crate::provider::{BASE_URL, Resource};

        let fetcher = Fetcher::new(BASE_URL, None).unwrap();
        let resource = Resource::Search {
            query: "naruto".into(),
            page: 1,
        };

        let html = fetcher.fetch(&resource.url(BASE_URL)).await.unwrap();
        let search = parse_search(&html, "naruto", 1);

        assert!(!search.results.is_empty())
    }
}
