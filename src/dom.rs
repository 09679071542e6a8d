//! Markup queries used by the page parsers.
//!
//! Parsers only talk to the [`Node`] trait, the `scraper` backed [`Page`] is
//! the one concrete implementation.

use std::cell::RefCell;
use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// A queryable element of a parsed page
pub trait Node: Sized {
    /// Descendants matching a CSS selector, in document order
    fn select(&self, css: &str) -> Vec<Self>;

    /// Attribute value, `None` when missing or empty
    fn attr(&self, name: &str) -> Option<String>;

    /// Concatenated text of every descendant text node
    fn text(&self) -> String;

    fn first(&self, css: &str) -> Option<Self> {
        self.select(css).into_iter().next()
    }
}

/// Text of every match joined together, then trimmed
pub fn select_text<N: Node>(node: &N, css: &str) -> String {
    node.select(css)
        .iter()
        .map(Node::text)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text of the first match, trimmed
pub fn first_text<N: Node>(node: &N, css: &str) -> String {
    node.first(css)
        .map(|n| n.text().trim().to_string())
        .unwrap_or_default()
}

/// Attribute of the first match only
pub fn first_attr<N: Node>(node: &N, css: &str, name: &str) -> Option<String> {
    node.first(css).and_then(|n| n.attr(name))
}

/// Image url preferring the lazy-load attribute
pub fn lazy_image<N: Node>(node: &N) -> Option<String> {
    first_attr(node, "img", "data-src").or_else(|| first_attr(node, "img", "src"))
}

/// Image url preferring the eager attribute
pub fn eager_image<N: Node>(node: &N) -> Option<String> {
    first_attr(node, "img", "src").or_else(|| first_attr(node, "img", "data-src"))
}

pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

impl<'a> Node for ElementRef<'a> {
    fn select(&self, css: &str) -> Vec<Self> {
        selector::with(css, |s| ElementRef::select(self, s).collect()).unwrap_or_default()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value()
            .attr(name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }
}

mod selector {
    use super::*;

    thread_local! {
        static COMPILED: RefCell<HashMap<String, Option<Selector>>> = RefCell::new(HashMap::new());
    }

    /// Runs `f` with the compiled selector, `None` if `css` does not parse
    pub fn with<R>(css: &str, f: impl FnOnce(&Selector) -> R) -> Option<R> {
        COMPILED.with(|compiled| {
            let mut compiled = compiled.borrow_mut();
            let selector = compiled
                .entry(css.to_string())
                .or_insert_with(|| match Selector::parse(css) {
                    Ok(s) => Some(s),
                    Err(err) => {
                        warn!(selector = css, error = %err, "Unable to parse selector");
                        None
                    }
                });

            selector.as_ref().map(f)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <div class="card">
            <a href="">empty</a>
            <img data-src="" src="/eager.jpg">
            <span class="a"> one </span>
            <span class="b">two </span>
        </div>
        <div class="card">
            <img data-src="/lazy.jpg" src="/eager.jpg">
        </div>"#;

    #[test]
    fn test_select_and_text() {
        let page = Page::parse(HTML);
        let cards = Node::select(&page.root(), "div.card");
        assert_eq!(cards.len(), 2);

        assert_eq!(select_text(&cards[0], "span"), "one two");
        assert_eq!(select_text(&cards[1], "span"), "");
    }

    #[test]
    fn test_empty_attr_is_absent() {
        let page = Page::parse(HTML);
        let cards = Node::select(&page.root(), "div.card");

        assert_eq!(first_attr(&cards[0], "a", "href"), None);
        assert_eq!(lazy_image(&cards[0]), Some("/eager.jpg".into()));
        assert_eq!(lazy_image(&cards[1]), Some("/lazy.jpg".into()));
        assert_eq!(eager_image(&cards[1]), Some("/eager.jpg".into()));
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let page = Page::parse(HTML);
        assert!(Node::select(&page.root(), "div[").is_empty());
        assert!(page.root().first("div[").is_none());
    }

    #[test]
    fn test_escaped_class_names() {
        let html = r#"<ul><li class="odd:bg-tertiary">x</li></ul><p class="text-[13px] line-clamp-2">d</p>"#;
        let page = Page::parse(html);

        assert_eq!(Node::select(&page.root(), r"li.odd\:bg-tertiary").len(), 1);
        assert_eq!(select_text(&page.root(), r".text-\[13px\].line-clamp-2"), "d");
    }
}
