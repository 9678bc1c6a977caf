//! URLs for wiki pages

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Path of the page showing `title`
pub fn entry_href(title: &str) -> String {
    format!("/wiki/{}", utf8_percent_encode(title, SEGMENT))
}

/// Path of the edit form for `title`
pub fn edit_href(title: &str) -> String {
    format!("{}/edit", entry_href(title))
}
