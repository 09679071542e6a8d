use tracing::debug;

use super::{Card, Listing, leading_number};
use crate::dom::{Node, Page, first_attr, first_text, lazy_image, select_text};
use crate::models::{Home, LatestItem, LatestSection, SpotlightItem, TrendingItem};

const SLIDE: &str = ".swiper-slide";
const SPOTLIGHT_TITLE: &str = "h2 span[data-nt-title], h2 span[data-en-title]";
const SPOTLIGHT_DESCRIPTION: &str = r".text-\[13px\].line-clamp-2";
const SPOTLIGHT_LINK: &str = "a[href*='/anime/']";

const TRENDING_SLIDE: &str = ".swiper-trending .swiper-slide";
const TRENDING_TITLE: &str = "span[data-nt-title], span[data-en-title]";
const TRENDING_RANK: &str = "span.absolute";

const SECTION_ITEM: &str = r"li.odd\:bg-tertiary, .grid div";
const SECTION_ITEM_TITLE: &str = "h3, .dynamic-name";
const EPISODE_LABEL: &str = "E ";

/// Sections already listed through the carousels.
const CAROUSEL_SECTIONS: [&str; 2] = ["Trending", "Spotlight"];

pub fn parse_home(markup: &str) -> Home {
    let page = Page::parse(markup);
    let home = extract_home(&page.root());

    debug!(
        spotlight = home.spotlight.len(),
        trending = home.trending.len(),
        sections = home.latest.len(),
        "Parsed home page"
    );

    home
}

pub fn extract_home<N: Node>(root: &N) -> Home {
    let spotlight = root.select(SLIDE).iter().filter_map(spotlight).collect();
    let trending = root
        .select(TRENDING_SLIDE)
        .iter()
        .filter_map(trending)
        .collect();
    let latest = root
        .select("section")
        .iter()
        .filter_map(latest_section)
        .collect();

    Home {
        spotlight,
        trending,
        latest,
    }
}

fn spotlight<N: Node>(slide: &N) -> Option<SpotlightItem> {
    let Listing {
        id,
        title,
        url,
        poster,
    } = Card::new(
        first_text(slide, SPOTLIGHT_TITLE),
        first_attr(slide, SPOTLIGHT_LINK, "href"),
        lazy_image(slide),
    )
    .into_listing()?;

    Some(SpotlightItem {
        id,
        title,
        description: select_text(slide, SPOTLIGHT_DESCRIPTION),
        poster,
        url,
        is_dub: true,
    })
}

fn trending<N: Node>(slide: &N) -> Option<TrendingItem> {
    let Listing {
        id,
        title,
        url,
        poster,
    } = Card::new(
        first_text(slide, TRENDING_TITLE),
        first_attr(slide, "a", "href"),
        lazy_image(slide),
    )
    .into_listing()?;

    // rank 0 is not a rank
    let rank = leading_number(&select_text(slide, TRENDING_RANK)).filter(|r| *r > 0);

    Some(TrendingItem {
        id,
        title,
        poster,
        url,
        rank,
    })
}

fn latest_section<N: Node>(section: &N) -> Option<LatestSection> {
    let title = select_text(section, "h2");
    if CAROUSEL_SECTIONS.iter().any(|s| title.contains(s)) {
        return None;
    }

    let items: Vec<_> = section
        .select(SECTION_ITEM)
        .iter()
        .filter_map(latest_item)
        .collect();

    (!items.is_empty()).then_some(LatestSection { title, items })
}

fn latest_item<N: Node>(item: &N) -> Option<LatestItem> {
    let Listing {
        id,
        title,
        url,
        poster,
    } = Card::new(
        select_text(item, SECTION_ITEM_TITLE),
        first_attr(item, "a", "href"),
        lazy_image(item),
    )
    .into_listing()?;

    Some(LatestItem {
        id,
        title,
        poster,
        url,
        latest_episode: latest_episode(item),
    })
}

fn latest_episode<N: Node>(item: &N) -> Option<u32> {
    let label = item
        .select("span")
        .iter()
        .map(Node::text)
        .filter(|t| t.contains(EPISODE_LABEL))
        .collect::<String>();

    leading_number(&label.trim().replacen(EPISODE_LABEL, "", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"
    <html><body>
        <div class="swiper spotlight">
            <div class="swiper-slide">
                <h2><span data-en-title="">Jujutsu Kaisen</span><span data-nt-title="">呪術廻戦</span></h2>
                <div class="text-[13px] line-clamp-2"> A boy swallows a cursed finger. </div>
                <img data-src="https://cdn/jjk-lazy.jpg" src="https://cdn/placeholder.gif">
                <a href="https://www.desidubanime.me/watch/jujutsu-kaisen-episode-1/">Watch</a>
                <a href="https://www.desidubanime.me/anime/jujutsu-kaisen/">Detail</a>
            </div>
            <div class="swiper-slide">
                <h2></h2>
                <a href="https://www.desidubanime.me/anime/untitled/">Detail</a>
            </div>
            <div class="swiper-slide">
                <h2><span data-en-title="">No Link</span></h2>
            </div>
        </div>

        <div class="swiper-trending">
            <div class="swiper-slide">
                <span class="absolute">1</span>
                <span data-en-title="">One Piece</span>
                <img src="https://cdn/op.jpg">
                <a href="https://www.desidubanime.me/anime/one-piece/">One Piece</a>
            </div>
            <div class="swiper-slide">
                <span class="absolute">NEW</span>
                <span data-nt-title="">Naruto</span>
                <a href="https://www.desidubanime.me/anime/naruto/">Naruto</a>
            </div>
        </div>

        <section>
            <h2>Trending Now</h2>
            <div class="grid"><div><a href="https://www.desidubanime.me/anime/one-piece/"><h3>One Piece</h3></a></div></div>
        </section>
        <section>
            <h2>Latest Episodes</h2>
            <ul>
                <li class="odd:bg-tertiary">
                    <a href="https://www.desidubanime.me/anime/bleach/"><img data-src="https://cdn/bleach.jpg"></a>
                    <h3>Bleach</h3>
                    <span>E 12</span>
                </li>
                <li class="odd:bg-tertiary">
                    <a href="https://www.desidubanime.me/anime/dandadan/"></a>
                    <span class="dynamic-name">Dandadan</span>
                </li>
                <li class="odd:bg-tertiary">
                    <a href="https://www.desidubanime.me/movies/"></a>
                    <h3>Not an anime</h3>
                </li>
            </ul>
        </section>
        <section>
            <h2>Empty</h2>
            <ul><li class="odd:bg-tertiary"><h3>No link</h3></li></ul>
        </section>
    </body></html>"#;

    #[test]
    fn test_parse_spotlight() {
        let home = parse_home(HOME);

        assert_eq!(
            home.spotlight,
            vec![SpotlightItem {
                id: "jujutsu-kaisen".into(),
                title: "Jujutsu Kaisen".into(),
                description: "A boy swallows a cursed finger.".into(),
                poster: Some("https://cdn/jjk-lazy.jpg".into()),
                url: "https://www.desidubanime.me/anime/jujutsu-kaisen/".into(),
                is_dub: true,
            }]
        );
    }

    #[test]
    fn test_parse_trending() {
        let home = parse_home(HOME);

        assert_eq!(home.trending.len(), 2);
        assert_eq!(home.trending[0].id, "one-piece");
        assert_eq!(home.trending[0].rank, Some(1));
        assert_eq!(home.trending[0].poster.as_deref(), Some("https://cdn/op.jpg"));

        assert_eq!(home.trending[1].title, "Naruto");
        assert_eq!(home.trending[1].rank, None);
        assert_eq!(home.trending[1].poster, None);
    }

    #[test]
    fn test_parse_latest() {
        let home = parse_home(HOME);

        assert_eq!(home.latest.len(), 1);
        let section = &home.latest[0];
        assert_eq!(section.title, "Latest Episodes");
        assert_eq!(
            section.items,
            vec![
                LatestItem {
                    id: "bleach".into(),
                    title: "Bleach".into(),
                    poster: Some("https://cdn/bleach.jpg".into()),
                    url: "https://www.desidubanime.me/anime/bleach/".into(),
                    latest_episode: Some(12),
                },
                LatestItem {
                    id: "dandadan".into(),
                    title: "Dandadan".into(),
                    poster: None,
                    url: "https://www.desidubanime.me/anime/dandadan/".into(),
                    latest_episode: None,
                },
            ]
        );
    }

    #[test]
    fn test_empty_home() {
        let home = parse_home("<html><body><div class='swiper-slide'><h2></h2></div></body></html>");

        assert!(home.spotlight.is_empty());
        assert!(home.trending.is_empty());
        assert!(home.latest.is_empty());
    }
}
