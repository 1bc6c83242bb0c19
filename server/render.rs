/// Template renderer for the upload page.
///
/// The page (`server/assets/index.html`) is embedded at compile time and
/// carries `{{TOKEN}}` placeholders that are filled per request.

const TEMPLATE: &str = include_str!("assets/index.html");

pub fn render_index(model_name: &str, max_dimension: u32) -> String {
    let html = TEMPLATE
        .replace("{{MODEL_NAME}}", &html_escape(model_name))
        .replace("{{MAX_DIMENSION}}", &max_dimension.to_string());
    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` left unfilled with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
