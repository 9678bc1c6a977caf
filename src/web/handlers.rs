//! Request workflows
//!
//! Each handler takes the store and the already-extracted request input and
//! returns a [`Reply`]: either a page to render (with status and
//! notifications) or a redirect that carries notifications to the next page.
//! Nothing here touches HTTP types beyond the status code.

use axum::http::StatusCode;
use tracing::{debug, info, warn};

use super::forms::{CreateForm, EditForm, FieldErrors, RawForm, SearchForm, Validation};
use super::notify::Notification;
use super::views::Page;
use crate::core::href::entry_href;
use crate::core::markdown;
use crate::core::store::{EntryStore, Result};

/// How a request reached a form-backed page
#[derive(Debug, Clone, Copy)]
pub enum FormRequest<'a> {
    /// Page opened via a link
    Show,
    /// Form posted back
    Submit(&'a RawForm),
}

/// Outcome of a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Render {
        status: StatusCode,
        notifications: Vec<Notification>,
        page: Page,
    },
    Redirect {
        to: String,
        notifications: Vec<Notification>,
    },
}

impl Reply {
    fn page(page: Page) -> Self {
        Self::Render {
            status: StatusCode::OK,
            notifications: Vec::new(),
            page,
        }
    }

    fn page_with(page: Page, notification: Notification) -> Self {
        Self::Render {
            status: StatusCode::OK,
            notifications: vec![notification],
            page,
        }
    }

    fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            notifications: Vec::new(),
        }
    }

    fn redirect_with(to: impl Into<String>, notification: Notification) -> Self {
        Self::Redirect {
            to: to.into(),
            notifications: vec![notification],
        }
    }
}

const INDEX: &str = "/";

fn missing_page(title: &str) -> Notification {
    Notification::error(format!(
        "\"{}\" page does not exist, please create it before trying to edit",
        title
    ))
}

/// List every entry
pub fn index(store: &dyn EntryStore) -> Result<Reply> {
    Ok(Reply::page(Page::Index {
        titles: store.list()?,
    }))
}

/// Show one entry, or suggestions when it does not exist
pub fn entry(store: &dyn EntryStore, title: &str) -> Result<Reply> {
    if let Some(entry) = store.get(title)? {
        return Ok(Reply::page(Page::Entry {
            html: markdown::render(&entry.content),
            title: entry.title,
        }));
    }

    let related = store.related(title)?;
    debug!("Entry {:?} not found, {} related", title, related.len());
    Ok(Reply::Render {
        status: StatusCode::NOT_FOUND,
        notifications: Vec::new(),
        page: Page::NotFound {
            title: title.to_string(),
            related,
        },
    })
}

/// Jump to an exact match, or list related titles
pub fn search(store: &dyn EntryStore, request: FormRequest<'_>) -> Result<Reply> {
    let FormRequest::Submit(raw) = request else {
        return Ok(Reply::redirect(INDEX));
    };

    let form = match SearchForm::validate(raw) {
        Validation::Valid(form) => form,
        Validation::Invalid(_) => {
            warn!("Rejected empty search");
            return Ok(Reply::redirect_with(
                INDEX,
                Notification::error("Search Form not valid, please enter a title"),
            ));
        }
    };

    debug!("Search request: {:?}", form.title);
    if let Some(entry) = store.get(&form.title)? {
        return Ok(Reply::redirect(entry_href(&entry.title)));
    }

    let related = store.related(&form.title)?;
    Ok(Reply::page(Page::SearchResults {
        title: form.title,
        related,
    }))
}

/// Create a new entry
pub fn create(store: &dyn EntryStore, request: FormRequest<'_>) -> Result<Reply> {
    let FormRequest::Submit(raw) = request else {
        return Ok(Reply::page(Page::Create {
            form: CreateForm::default(),
            errors: FieldErrors::default(),
        }));
    };

    let form = match CreateForm::validate(raw) {
        Validation::Valid(form) => form,
        Validation::Invalid(errors) => {
            return Ok(Reply::page_with(
                Page::Create {
                    form: CreateForm::from_raw(raw),
                    errors,
                },
                Notification::error("Entry Form not valid, please check the information!"),
            ));
        }
    };

    if let Some(existing) = store.get(&form.title)? {
        warn!("Refusing to create {:?}: {:?} exists", form.title, existing.title);
        return Ok(Reply::page_with(
            Page::Create {
                form,
                errors: FieldErrors::default(),
            },
            Notification::error(
                "This page already exists, please refer to the appropriate page \
                 and edit it if any change is required",
            ),
        ));
    }

    store.save(&form.title, &form.text)?;
    info!("Created entry {:?}", form.title);
    Ok(Reply::redirect_with(
        entry_href(&form.title),
        Notification::success(format!("New page \"{}\" created successfully", form.title)),
    ))
}

/// Edit the text of an existing entry
pub fn edit(store: &dyn EntryStore, title: &str, request: FormRequest<'_>) -> Result<Reply> {
    let Some(entry) = store.get(title)? else {
        warn!("Edit of missing entry {:?}", title);
        return Ok(Reply::redirect_with(INDEX, missing_page(title)));
    };

    let FormRequest::Submit(raw) = request else {
        return Ok(Reply::page(Page::Edit {
            title: entry.title,
            form: EditForm {
                text: entry.content,
            },
            errors: FieldErrors::default(),
        }));
    };

    match EditForm::validate(raw) {
        Validation::Valid(form) => {
            store.save(&entry.title, &form.text)?;
            info!("Updated entry {:?}", entry.title);
            Ok(Reply::redirect_with(
                entry_href(&entry.title),
                Notification::success(format!("Entry \"{}\" updated successfully", entry.title)),
            ))
        }
        Validation::Invalid(errors) => Ok(Reply::page_with(
            Page::Edit {
                title: entry.title,
                form: EditForm::from_raw(raw),
                errors,
            },
            Notification::error("Editing Form is not valid, please try again"),
        )),
    }
}

/// Jump to an entry chosen uniformly at random
pub fn random(store: &dyn EntryStore) -> Result<Reply> {
    let titles = store.list()?;
    if titles.is_empty() {
        return Ok(Reply::redirect_with(
            INDEX,
            Notification::error("There are no entries yet, create the first one!"),
        ));
    }

    let title = &titles[fastrand::usize(..titles.len())];
    Ok(Reply::redirect(entry_href(title)))
}
