//! HTTP server and routing

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::forms::RawForm;
use super::handlers::{self, FormRequest, Reply};
use super::notify::{clear_flash_cookie, flash_cookie, take_flash};
use crate::core::store::{EntryStore, Result as StoreResult};
use crate::error::WikiError;

/// State shared by all requests
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
}

type SharedState = Arc<AppState>;
type WikiResult = Result<Response, WikiError>;

/// Create the router for the wiki.
///
/// ```text
/// GET       /                  - All pages
/// GET       /wiki/{title}      - Show a page
/// GET|POST  /wiki/{title}/edit - Edit a page
/// GET|POST  /search            - Search by title
/// GET|POST  /create            - Create a page
/// GET       /random            - Redirect to a random page
/// GET       /healthz           - Liveness probe
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/wiki/{title}", get(entry))
        .route("/wiki/{title}/edit", get(edit_show).post(edit_submit))
        .route("/search", get(search_show).post(search_submit))
        .route("/create", get(create_show).post(create_submit))
        .route("/random", get(random))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the wiki until ctrl-c or SIGTERM
pub async fn serve(addr: SocketAddr, store: Arc<dyn EntryStore>) -> std::io::Result<()> {
    let router = create_router(Arc::new(AppState { store }));

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

/// Turn a handler reply into an HTTP response, moving notifications
/// through the flash cookie as needed.
fn respond(reply: Reply, headers: &HeaderMap) -> WikiResult {
    let incoming = take_flash(headers);
    let had_flash = incoming.is_some();
    let mut pending = incoming.unwrap_or_default();

    let mut response = match reply {
        Reply::Render {
            status,
            notifications,
            page,
        } => {
            pending.extend(notifications);
            let body = page.render(&pending)?;
            let mut response = (status, Html(body)).into_response();
            if had_flash {
                response
                    .headers_mut()
                    .append(header::SET_COOKIE, clear_flash_cookie());
            }
            return Ok(response);
        }
        Reply::Redirect { to, notifications } => {
            pending.extend(notifications);
            Redirect::to(&to).into_response()
        }
    };

    match flash_cookie(&pending) {
        Some(cookie) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        None if had_flash => {
            response
                .headers_mut()
                .append(header::SET_COOKIE, clear_flash_cookie());
        }
        None => {}
    }
    Ok(response)
}

/// Run a store-backed workflow on the blocking thread pool
async fn blocking<F>(state: &SharedState, workflow: F) -> Result<Reply, WikiError>
where
    F: FnOnce(&dyn EntryStore) -> StoreResult<Reply> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    Ok(tokio::task::spawn_blocking(move || workflow(store.as_ref())).await??)
}

async fn index(State(state): State<SharedState>, headers: HeaderMap) -> WikiResult {
    respond(blocking(&state, handlers::index).await?, &headers)
}

async fn entry(
    State(state): State<SharedState>,
    Path(title): Path<String>,
    headers: HeaderMap,
) -> WikiResult {
    let reply = blocking(&state, move |store| handlers::entry(store, &title)).await?;
    respond(reply, &headers)
}

async fn search_show(State(state): State<SharedState>, headers: HeaderMap) -> WikiResult {
    let reply = blocking(&state, |store| handlers::search(store, FormRequest::Show)).await?;
    respond(reply, &headers)
}

async fn search_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(raw): Form<RawForm>,
) -> WikiResult {
    let reply = blocking(&state, move |store| {
        handlers::search(store, FormRequest::Submit(&raw))
    })
    .await?;
    respond(reply, &headers)
}

async fn create_show(State(state): State<SharedState>, headers: HeaderMap) -> WikiResult {
    let reply = blocking(&state, |store| handlers::create(store, FormRequest::Show)).await?;
    respond(reply, &headers)
}

async fn create_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(raw): Form<RawForm>,
) -> WikiResult {
    let reply = blocking(&state, move |store| {
        handlers::create(store, FormRequest::Submit(&raw))
    })
    .await?;
    respond(reply, &headers)
}

async fn edit_show(
    State(state): State<SharedState>,
    Path(title): Path<String>,
    headers: HeaderMap,
) -> WikiResult {
    let reply = blocking(&state, move |store| {
        handlers::edit(store, &title, FormRequest::Show)
    })
    .await?;
    respond(reply, &headers)
}

async fn edit_submit(
    State(state): State<SharedState>,
    Path(title): Path<String>,
    headers: HeaderMap,
    Form(raw): Form<RawForm>,
) -> WikiResult {
    let reply = blocking(&state, move |store| {
        handlers::edit(store, &title, FormRequest::Submit(&raw))
    })
    .await?;
    respond(reply, &headers)
}

async fn random(State(state): State<SharedState>, headers: HeaderMap) -> WikiResult {
    respond(blocking(&state, handlers::random).await?, &headers)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "service": "qwikipedia" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::Entry;
    use crate::core::related::RelatedOptions;
    use crate::core::store::FileStore;
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(entries: &[(&str, &str)]) -> (tempfile::TempDir, Arc<FileStore>, Router) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path(), RelatedOptions::default()).unwrap());
        for (title, content) in entries {
            store.save(title, content).unwrap();
        }
        let router = create_router(Arc::new(AppState {
            store: store.clone(),
        }));
        (dir, store, router)
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    /// `name=value` part of the response's `Set-Cookie` header
    fn cookie_pair(response: &Response) -> String {
        let value = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        value.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn entry_page_renders_markdown() {
        let (_dir, _store, router) = test_app(&[("Python", "# Python\nA language.")]);
        for uri in ["/wiki/Python", "/wiki/python"] {
            let response = router
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(body_text(response).await.contains("<h1>Python</h1>"));
        }
    }

    #[tokio::test]
    async fn missing_entry_is_not_found_with_suggestions() {
        let (_dir, _store, router) = test_app(&[("GitHub", "x")]);
        let response = router
            .oneshot(Request::get("/wiki/Git").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Page not found"));
        assert!(html.contains(r#"<a href="/wiki/GitHub">GitHub</a>"#));
    }

    #[tokio::test]
    async fn index_lists_entries() {
        let (_dir, _store, router) = test_app(&[("CSS", "x"), ("HTML", "y")]);
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"<a href="/wiki/CSS">CSS</a>"#));
        assert!(html.contains(r#"<a href="/wiki/HTML">HTML</a>"#));
    }

    #[tokio::test]
    async fn create_redirects_and_flashes_success() {
        let (_dir, store, router) = test_app(&[]);
        let response = router
            .clone()
            .oneshot(form_post("/create", "title=Cats&text=Meow."))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Cats");
        assert_eq!(store.get("Cats").unwrap().unwrap().content, "Meow.");

        let cookie = cookie_pair(&response);
        let response = router
            .oneshot(
                Request::get("/wiki/Cats")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_pair(&response).starts_with("qwiki_flash="));
        let html = body_text(response).await;
        assert!(html.contains("alert-success"));
        assert!(html.contains("created successfully"));
    }

    #[tokio::test]
    async fn create_conflict_rerenders() {
        let (_dir, store, router) = test_app(&[("Python", "# Python\nA language.")]);
        let response = router
            .oneshot(form_post("/create", "title=python&text=other"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("already exists"));
        assert_eq!(
            store.get("Python").unwrap().unwrap().content,
            "# Python\nA language."
        );
    }

    #[tokio::test]
    async fn search_redirects_or_lists() {
        let (_dir, _store, router) = test_app(&[("Python", "x")]);
        let response = router
            .clone()
            .oneshot(form_post("/search", "title=PYTHON"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Python");

        let response = router
            .oneshot(form_post("/search", "title=pyt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Search results for"));
        assert!(html.contains(r#"<a href="/wiki/Python">Python</a>"#));
    }

    #[tokio::test]
    async fn search_get_goes_home() {
        let (_dir, _store, router) = test_app(&[]);
        let response = router
            .oneshot(Request::get("/search").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn edit_updates_entry() {
        let (_dir, store, router) = test_app(&[("Git", "old")]);
        let response = router
            .clone()
            .oneshot(Request::get("/wiki/Git/edit").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(">old</textarea>"));

        let response = router
            .oneshot(form_post("/wiki/Git/edit", "text=new+text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Git");
        assert_eq!(store.get("Git").unwrap().unwrap().content, "new text");
    }

    #[tokio::test]
    async fn edit_missing_redirects_home() {
        let (_dir, _store, router) = test_app(&[]);
        let response = router
            .oneshot(Request::get("/wiki/Ghost/edit").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(cookie_pair(&response).starts_with("qwiki_flash="));
    }

    #[tokio::test]
    async fn random_redirects_to_only_entry() {
        let (_dir, _store, router) = test_app(&[("Cats", "Meow.")]);
        let response = router
            .oneshot(Request::get("/random").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/wiki/Cats");
    }

    #[tokio::test]
    async fn random_on_empty_store_goes_home() {
        let (_dir, _store, router) = test_app(&[]);
        let response = router
            .oneshot(Request::get("/random").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let (_dir, _store, router) = test_app(&[]);
        let response = router
            .oneshot(Request::delete("/create").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_dir, _store, router) = test_app(&[]);
        let response = router
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"ok\""));
    }

    /// Store that notes which threads listed it, or panics when asked to
    struct ThreadStore {
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
        panic: bool,
    }

    impl ThreadStore {
        fn new(panic: bool) -> Arc<Self> {
            Arc::new(Self {
                threads: std::sync::Mutex::new(Vec::new()),
                panic,
            })
        }
    }

    impl EntryStore for ThreadStore {
        fn list(&self) -> StoreResult<Vec<String>> {
            if self.panic {
                panic!("store worker failed");
            }
            self.threads.lock().unwrap().push(std::thread::current().id());
            Ok(vec!["Cats".to_string()])
        }

        fn get(&self, _title: &str) -> StoreResult<Option<Entry>> {
            Ok(None)
        }

        fn save(&self, _title: &str, _content: &str) -> StoreResult<()> {
            Ok(())
        }

        fn related(&self, _title: &str) -> StoreResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn store_work_runs_off_the_request_thread() {
        let store = ThreadStore::new(false);
        let router = create_router(Arc::new(AppState {
            store: store.clone(),
        }));
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let threads = store.threads.lock().unwrap();
        assert_eq!(threads.len(), 1);
        assert_ne!(threads[0], std::thread::current().id());
    }

    #[tokio::test]
    async fn failed_store_worker_is_internal_error() {
        let router = create_router(Arc::new(AppState {
            store: ThreadStore::new(true),
        }));
        let response = router
            .oneshot(Request::get("/random").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
