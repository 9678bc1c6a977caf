//! Qwikipedia - wiki-style markdown encyclopedia
//!
//! Entries are markdown files in a directory; the web layer lists, shows,
//! searches, creates and edits them.

pub mod core;
pub mod error;
pub mod web;
