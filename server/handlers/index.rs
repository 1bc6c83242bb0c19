use std::io::Cursor;
use tiny_http::Response;

use leafcheck::{pipeline, AppContext};

use crate::render::render_index;

/// `GET /`
pub fn handle_get(ctx: &AppContext) -> Response<Cursor<Vec<u8>>> {
    let info = pipeline::model_info(ctx);
    crate::routes::html_response(render_index(&info.model, ctx.max_dimension))
}
