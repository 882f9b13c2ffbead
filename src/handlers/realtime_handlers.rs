use actix_web::{get, http::header, web, HttpResponse};
use log::debug;
use serde::Deserialize;

use crate::AppState;

#[derive(Deserialize)]
pub struct ChangesQuery {
    pub table: Option<String>,
}

/// GET /api/changes
/// Server-Sent Events for writes made through this service.
#[get("/changes")]
pub async fn changes(state: web::Data<AppState>, query: web::Query<ChangesQuery>) -> HttpResponse {
    let table = query.into_inner().table.filter(|t| !t.trim().is_empty());
    debug!("change listener connected (table: {:?})", table);

    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/event-stream"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(state.feed.sse_stream(table))
}
