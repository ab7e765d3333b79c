//! Wiki HTTP server.

mod app;
mod lifecycle;
mod response;
mod router;

pub use app::App;
pub use lifecycle::setup_shutdown_handler;

use crate::config::WikiConfig;
use crate::log;
use anyhow::Result;
use crossbeam::channel;
use router::{RouteRequest, RouteResponse, dispatch};
use std::io::Read;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Request handler threads. Each weave blocks one of them.
const WORKER_THREADS: usize = 4;

/// Largest accepted request body.
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Run the wiki server until Ctrl+C.
pub fn run(config: Arc<WikiConfig>) -> Result<()> {
    let app = Arc::new(App::new(Arc::clone(&config))?);

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server(Arc::clone(&server), shutdown_tx);
    let sweeper = lifecycle::spawn_sweeper(Arc::clone(&app), shutdown_rx);

    log!("serve"; "http://{}", addr);
    log!(
        "serve";
        "{} user(s), sources in `{}`, weaving with `{}`",
        app.users.len(),
        config.wiki.source_dir.display(),
        app.weaver.program()
    );

    run_request_loop(&server, &app);
    lifecycle::wait_for_shutdown(sweeper);
    Ok(())
}

fn run_request_loop(server: &Server, app: &Arc<App>) {
    // Handle requests concurrently so one long weave cannot stall reads.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKER_THREADS)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let app = Arc::clone(app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Adapt one `tiny_http` request into the router and send its answer.
fn handle_request(mut request: Request, app: &App) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let method = request.method().clone();
    let url = request.url().to_owned();
    let cookie = header_value(&request, "cookie");

    let mut body = String::new();
    if request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut body)
        .is_err()
    {
        return response::respond(request, RouteResponse::plain(400, "400 Bad Request"));
    }
    if body.len() as u64 > MAX_BODY_BYTES {
        return response::respond(
            request,
            RouteResponse::plain(413, "413 Payload Too Large"),
        );
    }

    let routed = dispatch(
        app,
        &RouteRequest {
            method: &method,
            url: &url,
            cookie: cookie.as_deref(),
            body: &body,
        },
    );
    response::respond(request, routed)
}

/// Extract a request header value by case-insensitive name.
fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}
