use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

/// The landing page, served as a static document. The waitlist form and its
/// submit/success/error states live in the page's inline script.
pub async fn home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("home.html"))
}
