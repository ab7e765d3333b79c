//! Request routing and the submit pipeline.
//!
//! Routing is kept free of `tiny_http` request objects: a request is a
//! method, a path, an optional cookie header, and a body, and a response is
//! a status, a content type, bytes, and an optional `Set-Cookie`. The serve
//! loop adapts between the two representations, which keeps every route
//! testable without opening a socket.
//!
//! Gate order on write routes is fixed: session first, strict title check
//! second, filesystem/process work last. An unauthenticated or ill-titled
//! request causes no side effect.

use super::app::App;
use crate::embed::pages::{
    EDIT_HTML, EditVars, INDEX_HTML, IndexVars, LOGIN_HTML, LoginVars, SUBMIT_HTML, SubmitVars,
};
use crate::error::WikiError;
use crate::ident::DocumentId;
use crate::session;
use crate::utils::{form, mime, path::resolve_path};
use crate::{debug, log};
use std::fs;
use tiny_http::Method;

/// Everything the router needs from an HTTP request.
pub struct RouteRequest<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    /// Raw `Cookie` header value, if any.
    pub cookie: Option<&'a str>,
    /// Request body (urlencoded form on POST routes).
    pub body: &'a str,
}

/// Everything the serve loop needs to answer one.
pub struct RouteResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub set_cookie: Option<String>,
}

impl RouteResponse {
    pub fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: mime::types::HTML,
            body: body.into_bytes(),
            set_cookie: None,
        }
    }

    pub fn plain(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: mime::types::PLAIN,
            body: body.into().into_bytes(),
            set_cookie: None,
        }
    }

    pub fn bytes(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            set_cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.set_cookie = Some(cookie);
        self
    }

    fn from_error(err: &WikiError) -> Self {
        Self::plain(err.status(), err.to_string())
    }
}

/// Route one request.
pub fn dispatch(app: &App, req: &RouteRequest<'_>) -> RouteResponse {
    let path = req.url.split('?').next().unwrap_or(req.url);
    // Decode per segment, after splitting: an encoded `/` stays inside its
    // segment instead of growing the path.
    let segments: Vec<String> = path
        .trim_matches('/')
        .split('/')
        .map(decode_segment)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    let result = match (req.method, segments.as_slice()) {
        (Method::Get, [""]) => Ok(index_page(app, "")),
        (Method::Get, ["login"]) => Ok(login_page(app, "")),
        (Method::Post, ["login"]) => Ok(login(app, req.body)),
        (Method::Get, ["logout"]) => Ok(logout(app, req.cookie)),

        (Method::Get, ["submit", title]) => submit_form(app, req, title),
        (Method::Post, ["submit", title]) => submit(app, req, title),
        (Method::Get, ["edit", title]) => edit(app, req, title),
        (Method::Get, ["view", "html", title]) => view_html(app, req, title),
        (Method::Get, ["page", title]) => page(app, title),

        (Method::Get, ["static", ..]) => Ok(static_asset(app, path)),

        _ => Err(WikiError::NotFound(path.to_owned())),
    };

    result.unwrap_or_else(|err| RouteResponse::from_error(&err))
}

/// Decode one percent-encoded path segment, falling back to the raw text.
fn decode_segment(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_owned())
}

/// Principal carried by the request's session cookie, if any.
fn principal(app: &App, req: &RouteRequest<'_>) -> Option<String> {
    let token = session::token_from_header(req.cookie?)?;
    app.sessions.principal(token)
}

/// Session gate for write routes. Runs before any title handling.
fn require_auth(app: &App, req: &RouteRequest<'_>) -> Result<String, WikiError> {
    principal(app, req).ok_or(WikiError::Unauthorized)
}

// ============================================================================
// Session routes
// ============================================================================

fn index_page(app: &App, note: &str) -> RouteResponse {
    RouteResponse::html(
        200,
        INDEX_HTML.render(&IndexVars {
            site_title: &app.config.site.title,
            note,
        }),
    )
}

fn login_page(app: &App, note: &str) -> RouteResponse {
    RouteResponse::html(
        200,
        LOGIN_HTML.render(&LoginVars {
            site_title: &app.config.site.title,
            note,
        }),
    )
}

fn login(app: &App, body: &str) -> RouteResponse {
    let fields = form::parse(body);
    let username = fields.get("username").map(String::as_str).unwrap_or("");
    let password = fields.get("password").map(String::as_str).unwrap_or("");

    if !app.users.verify(username, password) {
        let mut response = login_page(app, "invalid username or password");
        response.status = 401;
        return response;
    }

    let token = app.sessions.open(username);
    log!("session"; "{} logged in", username);
    index_page(app, "Logged in successfully").with_cookie(session::set_cookie(&token))
}

fn logout(app: &App, cookie: Option<&str>) -> RouteResponse {
    if let Some(token) = cookie.and_then(session::token_from_header) {
        app.sessions.close(token);
    }
    index_page(app, "Logged out successfully").with_cookie(session::clear_cookie())
}

// ============================================================================
// Document routes
// ============================================================================

fn submit_form(
    app: &App,
    req: &RouteRequest<'_>,
    title: &str,
) -> Result<RouteResponse, WikiError> {
    require_auth(app, req)?;
    let id = DocumentId::parse(title)?;

    Ok(RouteResponse::html(
        200,
        SUBMIT_HTML.render(&SubmitVars {
            site_title: &app.config.site.title,
            title: id.as_str(),
            note: "",
        }),
    ))
}

/// The submit pipeline: session gate, strict title check, persist source,
/// weave artifact.
///
/// A weave failure after a successful save is reported as a server error
/// naming the weave step; the saved source stays on disk and the artifact
/// may be stale until the next successful submit.
fn submit(app: &App, req: &RouteRequest<'_>, title: &str) -> Result<RouteResponse, WikiError> {
    let user = require_auth(app, req)?;
    let id = DocumentId::parse(title)?;

    let fields = form::parse(req.body);
    let text = fields.get("text").map(String::as_str).unwrap_or("");

    let lock = app.submit_lock(id.file_stem());
    let _guard = lock.lock();

    let source_path = app.store.save(&id, text)?;

    let dest_path = app.artifacts.path_for(&id);
    fs::create_dir_all(app.artifacts.root())
        .map_err(|e| crate::store::StoreError::Io(app.artifacts.root().to_path_buf(), e))?;

    debug!("weave"; "{} -> {}", source_path.display(), dest_path.display());
    app.weaver
        .weave(&source_path, &dest_path)
        .map_err(|source| WikiError::Weave {
            title: id.to_string(),
            source,
        })?;

    log!("weave"; "{} wove {}", user, id);
    Ok(RouteResponse::html(
        200,
        SUBMIT_HTML.render(&SubmitVars {
            site_title: &app.config.site.title,
            title: id.as_str(),
            note: &format!("File saved: {}.{}", id, app.config.wiki.extension),
        }),
    ))
}

fn edit(app: &App, req: &RouteRequest<'_>, title: &str) -> Result<RouteResponse, WikiError> {
    require_auth(app, req)?;
    let id = DocumentId::parse(title)?;
    let content = app.store.load(&id)?;

    Ok(RouteResponse::html(
        200,
        EDIT_HTML.render(&EditVars {
            site_title: &app.config.site.title,
            title: id.as_str(),
            content: &content,
        }),
    ))
}

fn view_html(app: &App, req: &RouteRequest<'_>, title: &str) -> Result<RouteResponse, WikiError> {
    require_auth(app, req)?;
    let id = DocumentId::parse(title)?;
    let body = app.artifacts.fetch(id.as_str())?;
    Ok(RouteResponse::bytes(200, mime::types::HTML, body))
}

/// Public artifact route. No session, no strict gate: this path only reads
/// a file it names through the lossy form, it never writes.
fn page(app: &App, title: &str) -> Result<RouteResponse, WikiError> {
    let body = app.artifacts.fetch(title)?;
    Ok(RouteResponse::bytes(200, mime::types::HTML, body))
}

fn static_asset(app: &App, path: &str) -> RouteResponse {
    let rel = path.trim_start_matches('/').trim_start_matches("static");
    match resolve_path(rel, &app.config.wiki.static_dir) {
        Some(file) => match crate::store::read_bytes(&file) {
            Ok(body) => RouteResponse::bytes(200, mime::from_path(&file), body),
            Err(_) => RouteResponse::plain(404, "404 Not Found"),
        },
        None => RouteResponse::plain(404, "404 Not Found"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WikiConfig;
    use std::path::Path;
    use std::sync::Arc;

    /// App over temp roots with `cat` standing in for the weaver.
    fn test_app(dir: &Path) -> App {
        let users_file = dir.join("users.json");
        std::fs::write(&users_file, r#"{"ada": "s3cret"}"#).unwrap();

        let mut config = WikiConfig::default();
        config.wiki.source_dir = dir.join("src");
        config.wiki.dest_dir = dir.join("dst");
        config.wiki.static_dir = dir.join("static");
        config.wiki.users_file = users_file;
        config.weaver.program = "cat".into();
        config.weaver.args = vec![];

        App::new(Arc::new(config)).unwrap()
    }

    fn get(url: &str) -> RouteRequest<'_> {
        RouteRequest {
            method: &Method::Get,
            url,
            cookie: None,
            body: "",
        }
    }

    fn login_cookie(app: &App) -> String {
        let req = RouteRequest {
            method: &Method::Post,
            url: "/login",
            cookie: None,
            body: "username=ada&password=s3cret",
        };
        let response = dispatch(app, &req);
        assert_eq!(response.status, 200);
        let set_cookie = response.set_cookie.unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    #[test]
    fn test_index_and_login_pages() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        assert_eq!(dispatch(&app, &get("/")).status, 200);
        assert_eq!(dispatch(&app, &get("/login")).status, 200);
        assert_eq!(dispatch(&app, &get("/no/such/route")).status, 404);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        let req = RouteRequest {
            method: &Method::Post,
            url: "/login",
            cookie: None,
            body: "username=ada&password=wrong",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 401);
        assert!(response.set_cookie.is_none());
    }

    #[test]
    fn test_logout_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let req = RouteRequest {
            method: &Method::Get,
            url: "/logout",
            cookie: Some(&cookie),
            body: "",
        };
        let response = dispatch(&app, &req);
        assert!(response.set_cookie.unwrap().contains("Max-Age=0"));
        assert!(app.sessions.is_empty());
    }

    #[test]
    fn test_submit_pipeline_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/Intro",
            cookie: Some(&cookie),
            body: "text=hello",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 200);

        // Source persisted, artifact woven (cat copies source to dest).
        let source = dir.path().join("src/Intro.nw");
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "hello");
        let artifact = dir.path().join("dst/Intro.html");
        assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "hello");

        // And the public page route serves it.
        let response = dispatch(&app, &get("/page/Intro"));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"hello");
    }

    #[test]
    fn test_submit_rejects_invalid_title_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/bad title!",
            cookie: Some(&cookie),
            body: "text=hello",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 400);
        assert!(
            !dir.path().join("src").exists(),
            "no file written for a rejected title"
        );
    }

    #[test]
    fn test_submit_rejects_encoded_title() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/bad%20title%21",
            cookie: Some(&cookie),
            body: "text=hello",
        };
        assert_eq!(dispatch(&app, &req).status, 400);
        assert!(!dir.path().join("src").exists());
    }

    #[test]
    fn test_submit_requires_session_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        // Even an invalid title gets the auth error: the gate runs first.
        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/bad title!",
            cookie: None,
            body: "text=hello",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 401);
        assert!(!dir.path().join("src").exists());
    }

    #[test]
    fn test_weave_failure_reports_500_and_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(dir.path());
        app.weaver = crate::weave::Weaver::new("false", vec![], None);

        let cookie = login_cookie(&app);
        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/Intro",
            cookie: Some(&cookie),
            body: "text=hello",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 500);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("weave"), "error names the weave step: {body}");

        // The source write is unaffected by the later build failure.
        let source = dir.path().join("src/Intro.nw");
        assert_eq!(std::fs::read_to_string(&source).unwrap(), "hello");
    }

    #[test]
    fn test_edit_returns_stored_source() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let submit = RouteRequest {
            method: &Method::Post,
            url: "/submit/Intro",
            cookie: Some(&cookie),
            body: "text=%3C%3Croot%3E%3E%3D",
        };
        dispatch(&app, &submit);

        let req = RouteRequest {
            method: &Method::Get,
            url: "/edit/Intro",
            cookie: Some(&cookie),
            body: "",
        };
        let response = dispatch(&app, &req);
        assert_eq!(response.status, 200);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("&lt;&lt;root&gt;&gt;="));
    }

    #[test]
    fn test_edit_missing_source_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());
        let cookie = login_cookie(&app);

        let req = RouteRequest {
            method: &Method::Get,
            url: "/edit/Nothing",
            cookie: Some(&cookie),
            body: "",
        };
        assert_eq!(dispatch(&app, &req).status, 404);
    }

    #[test]
    fn test_view_html_requires_auth_page_does_not() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        std::fs::create_dir_all(dir.path().join("dst")).unwrap();
        std::fs::write(dir.path().join("dst/Intro.html"), "<h1>ok</h1>").unwrap();

        assert_eq!(dispatch(&app, &get("/view/html/Intro")).status, 401);
        assert_eq!(dispatch(&app, &get("/page/Intro")).status, 200);

        let cookie = login_cookie(&app);
        let req = RouteRequest {
            method: &Method::Get,
            url: "/view/html/Intro",
            cookie: Some(&cookie),
            body: "",
        };
        assert_eq!(dispatch(&app, &req).status, 200);
    }

    #[test]
    fn test_page_missing_artifact_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        assert_eq!(dispatch(&app, &get("/page/Nothing")).status, 404);
    }

    #[test]
    fn test_static_assets_served_with_mime() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path());

        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static/style.css"), "body{}").unwrap();

        let response = dispatch(&app, &get("/static/style.css"));
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, mime::types::CSS);

        assert_eq!(dispatch(&app, &get("/static/../users.json")).status, 404);
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let users_file = dir.path().join("users.json");
        std::fs::write(&users_file, r#"{"ada": "s3cret"}"#).unwrap();

        let mut config = WikiConfig::default();
        config.wiki.source_dir = dir.path().join("src");
        config.wiki.dest_dir = dir.path().join("dst");
        config.wiki.users_file = users_file;
        config.serve.session_ttl_secs = 0;
        config.weaver.program = "cat".into();

        let app = App::new(Arc::new(config)).unwrap();
        let cookie = login_cookie(&app);
        std::thread::sleep(std::time::Duration::from_millis(5));

        let req = RouteRequest {
            method: &Method::Post,
            url: "/submit/Intro",
            cookie: Some(&cookie),
            body: "text=hello",
        };
        assert_eq!(dispatch(&app, &req).status, 401);
    }
}
