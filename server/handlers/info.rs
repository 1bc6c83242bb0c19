use std::io::Cursor;
use tiny_http::Response;

use leafcheck::{pipeline, AppContext};

/// `GET /model-info`
pub fn handle_get(ctx: &AppContext) -> Response<Cursor<Vec<u8>>> {
    crate::routes::json_response(&pipeline::model_info(ctx))
}
