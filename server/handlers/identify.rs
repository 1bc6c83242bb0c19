use std::io::Cursor;
use tiny_http::{Request, Response};
use tracing::info;

use leafcheck::{pipeline, AppContext};

/// `POST /identify`
pub fn handle_post(request: &mut Request, ctx: &AppContext) -> Response<Cursor<Vec<u8>>> {
    let upload = super::read_upload(request);
    let result = pipeline::identify(ctx, upload);
    if let Some(err) = result.error() {
        info!(error = err, "identify finished with error");
    }
    crate::routes::json_response(&result)
}
