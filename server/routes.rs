use std::io::Cursor;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{debug, error};

use leafcheck::AppContext;

use crate::handlers;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn response(status: u16, content_type: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    let headers = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
        .into_iter()
        .collect();
    Response::new(StatusCode(status), headers, Cursor::new(body), Some(len), None)
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    response(200, "text/html; charset=utf-8", body.into_bytes())
}

/// Serializes `value` as a 200 JSON response.  Errors are part of the body,
/// never the status line.
pub fn json_response<T: Serialize>(value: &T) -> Response<Cursor<Vec<u8>>> {
    match serde_json::to_vec(value) {
        Ok(body) => response(200, "application/json", body),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            response(500, "application/json", br#"{"error":"internal serialization error"}"#.to_vec())
        }
    }
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    response(404, "application/json", br#"{"error":"not found"}"#.to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// Handlers receive a `&mut Request` so the dispatcher keeps ownership and
/// calls `request.respond(response)` at the end.
pub fn dispatch(mut request: Request, ctx: &AppContext) {
    let method = request.method().clone();
    let url    = request.url().to_owned();
    let path   = url.split('?').next().unwrap_or("").to_owned();
    debug!(method = %method, path = %path, "request");

    let response = match (method, path.as_str()) {
        (Method::Get,  "/")           => handlers::index::handle_get(ctx),
        (Method::Post, "/identify")   => handlers::identify::handle_post(&mut request, ctx),
        (Method::Post, "/test-local") => handlers::local::handle_post(&mut request, ctx),
        (Method::Get,  "/model-info") => handlers::info::handle_get(ctx),
        _ => not_found(),
    };

    if let Err(e) = request.respond(response) {
        error!(error = %e, path = %path, "failed to send response");
    }
}
