use actix_web::{HttpRequest, HttpResponse, Responder};
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// The editor page; served for `GET /` and for posts without a submission.
pub fn page_shell_response() -> HttpResponse {
    match StaticAssets::get("index.html") {
        Some(content) => HttpResponse::Ok()
            .content_type(HTML_CONTENT_TYPE)
            .body(Cow::into_owned(content.data)),
        None => {
            log::error!("index.html is missing from the embedded assets");
            HttpResponse::NotFound().body("404 Not Found")
        }
    }
}

pub async fn page_shell() -> impl Responder {
    page_shell_response()
}

pub async fn static_file(req: HttpRequest) -> impl Responder {
    // trim leading '/'
    let path = req.path().trim_start_matches('/');

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(Cow::into_owned(content.data))
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
