use axum::{
    debug_handler,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

const SVG: [(header::HeaderName, &str); 1] = [(header::CONTENT_TYPE, "image/svg+xml")];

#[debug_handler]
pub async fn logo() -> impl IntoResponse {
    (SVG, include_res!(str, "/logo.svg"))
}

#[debug_handler]
pub async fn logo_dark() -> impl IntoResponse {
    (SVG, include_res!(str, "/logo-dark.svg"))
}

#[debug_handler]
pub async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], include_res!(str, "/style.css"))
}

/// 404 page for a missing `what`.
pub fn sorry(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html").replace("{what}", &text(what))),
    )
        .into_response()
}

/// Escapes HTML and template braces, so user text never turns into a `{placeholder}`.
pub fn text(s: &str) -> String {
    braces(&html_escape::encode_text(s))
}

pub fn attr(s: &str) -> String {
    braces(&html_escape::encode_double_quoted_attribute(s))
}

fn braces(s: &str) -> String {
    s.replace('{', "&#123;").replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_are_escaped() {
        assert_eq!(text("{content} <b>"), "&#123;content&#125; &lt;b&gt;");
        assert_eq!(attr(r#"{x}""#), "&#123;x&#125;&quot;");
    }
}
