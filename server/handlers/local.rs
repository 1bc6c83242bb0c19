use std::io::Cursor;
use tiny_http::{Request, Response};

use leafcheck::pipeline::{self, ErrorResponse};
use leafcheck::AppContext;

/// `POST /test-local`
///
/// Runs only the local classifier and visual analysis; no external call.
pub fn handle_post(request: &mut Request, ctx: &AppContext) -> Response<Cursor<Vec<u8>>> {
    let upload = super::read_upload(request);
    match pipeline::test_local(ctx, upload) {
        Ok(body) => crate::routes::json_response(&body),
        Err(e) => crate::routes::json_response(&ErrorResponse { error: e.to_string() }),
    }
}
