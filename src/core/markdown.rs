//! Markdown to HTML conversion

use std::borrow::Cow;
use std::sync::OnceLock;

use pulldown_cmark::{html, Options, Parser};
use regex_lite::{Captures, Regex};

use super::href::entry_href;

/// Matches `[[target]]` or `[[target|display]]`
fn wiki_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[\[([^\]|]+)(?:\|([^\]]+))?\]\]").expect("wiki link pattern is valid")
    })
}

/// Rewrite wiki links into ordinary markdown links to entry pages
fn expand_wiki_links(content: &str) -> Cow<'_, str> {
    wiki_link_regex().replace_all(content, |cap: &Captures<'_>| {
        let target = cap.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let display = cap.get(2).map(|m| m.as_str().trim()).unwrap_or(target);
        format!("[{}](<{}>)", display, entry_href(target))
    })
}

/// Render markdown text as an HTML fragment
pub fn render(content: &str) -> String {
    let content = expand_wiki_links(content);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(&content, options);
    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
