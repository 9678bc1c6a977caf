//! HTML pages

use askama::Template;

use super::forms::{CreateForm, EditForm, FieldErrors};
use super::notify::Notification;
use crate::core::href::{edit_href, entry_href};

/// A title together with the path of its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLink {
    pub title: String,
    pub href: String,
}

impl TitleLink {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let href = entry_href(&title);
        Self { title, href }
    }
}

fn links(titles: &[String]) -> Vec<TitleLink> {
    titles.iter().map(TitleLink::new).collect()
}

/// Everything a handler can ask to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Index {
        titles: Vec<String>,
    },
    Entry {
        title: String,
        html: String,
    },
    NotFound {
        title: String,
        related: Vec<String>,
    },
    SearchResults {
        title: String,
        related: Vec<String>,
    },
    Create {
        form: CreateForm,
        errors: FieldErrors,
    },
    Edit {
        title: String,
        form: EditForm,
        errors: FieldErrors,
    },
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    notifications: &'a [Notification],
    entries: Vec<TitleLink>,
}

#[derive(Template)]
#[template(path = "entry.html")]
struct EntryTemplate<'a> {
    notifications: &'a [Notification],
    title: &'a str,
    body: &'a str,
    edit_href: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate<'a> {
    notifications: &'a [Notification],
    title: &'a str,
    related: Vec<TitleLink>,
}

#[derive(Template)]
#[template(path = "search.html")]
struct SearchTemplate<'a> {
    notifications: &'a [Notification],
    title: &'a str,
    related: Vec<TitleLink>,
}

#[derive(Template)]
#[template(path = "create.html")]
struct CreateTemplate<'a> {
    notifications: &'a [Notification],
    form: &'a CreateForm,
    errors: &'a FieldErrors,
}

#[derive(Template)]
#[template(path = "edit.html")]
struct EditTemplate<'a> {
    notifications: &'a [Notification],
    title: &'a str,
    action: String,
    form: &'a EditForm,
    errors: &'a FieldErrors,
}

impl Page {
    /// Render the full HTML document
    pub fn render(&self, notifications: &[Notification]) -> Result<String, askama::Error> {
        match self {
            Page::Index { titles } => IndexTemplate {
                notifications,
                entries: links(titles),
            }
            .render(),
            Page::Entry { title, html } => EntryTemplate {
                notifications,
                title,
                body: html,
                edit_href: edit_href(title),
            }
            .render(),
            Page::NotFound { title, related } => NotFoundTemplate {
                notifications,
                title,
                related: links(related),
            }
            .render(),
            Page::SearchResults { title, related } => SearchTemplate {
                notifications,
                title,
                related: links(related),
            }
            .render(),
            Page::Create { form, errors } => CreateTemplate {
                notifications,
                form,
                errors,
            }
            .render(),
            Page::Edit {
                title,
                form,
                errors,
            } => EditTemplate {
                notifications,
                title,
                action: edit_href(title),
                form,
                errors,
            }
            .render(),
        }
    }
}
