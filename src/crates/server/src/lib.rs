pub mod albums;
pub mod middleware;

use actix_web::{HttpResponse, Responder};
use model::album::AlbumRepository;
use std::sync::Arc;

pub struct AppState {
    pub albums: Arc<dyn AlbumRepository>,
}

impl AppState {
    pub fn new(albums: Arc<dyn AlbumRepository>) -> Self {
        Self { albums }
    }
}

pub async fn index() -> impl Responder {
    "Hit the /albums endpoint to retrieve a list of albums!"
}

/// Fallback for any route the router does not know.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Route not found" }))
}
