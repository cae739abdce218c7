use crate::AppState;
use actix_web::{http::StatusCode, web, web::Json, HttpResponse};
use log::info;
use model::album::{AlbumError, AlbumPatch, NewAlbum};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid album ID")]
    InvalidId,
    #[error("{0}")]
    Validation(String),
    #[error("Album not found")]
    NotFound,
    #[error("{0}")]
    Repository(#[from] AlbumError),
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    title: Option<String>,
    artist: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
}

impl CreateAlbumRequest {
    /// All four fields must be present, the strings non-empty and the
    /// price non-negative.
    fn into_new_album(self) -> Result<NewAlbum, ApiError> {
        let title = self.title.unwrap_or_default();
        let artist = self.artist.unwrap_or_default();
        let image_url = self.image_url.unwrap_or_default();
        let price = match self.price {
            Some(price) => price,
            None => return Err(missing_fields()),
        };
        if title.is_empty() || artist.is_empty() || image_url.is_empty() {
            return Err(missing_fields());
        }
        if price < 0.0 {
            return Err(invalid_price());
        }
        Ok(NewAlbum {
            title,
            artist,
            price,
            image_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlbumRequest {
    title: Option<String>,
    artist: Option<String>,
    price: Option<f64>,
    image_url: Option<String>,
}

fn missing_fields() -> ApiError {
    ApiError::Validation("Missing required fields: title, artist, price, image_url".to_string())
}

fn invalid_price() -> ApiError {
    ApiError::Validation("Price must be a non-negative number".to_string())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::InvalidId)
}

async fn list_albums(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let albums = state.albums.list().await?;
    Ok(HttpResponse::Ok().json(albums))
}

async fn get_album(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path.into_inner())?;
    match state.albums.get(id).await? {
        Some(album) => Ok(HttpResponse::Ok().json(album)),
        None => Err(ApiError::NotFound),
    }
}

async fn create_album(
    state: web::Data<AppState>,
    Json(body): Json<CreateAlbumRequest>,
) -> Result<HttpResponse, ApiError> {
    let data = body.into_new_album()?;
    let album = state.albums.create(data).await?;
    Ok(HttpResponse::Created().json(album))
}

async fn update_album(
    state: web::Data<AppState>,
    path: web::Path<String>,
    Json(body): Json<UpdateAlbumRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path.into_inner())?;
    if let Some(price) = body.price {
        if price < 0.0 {
            return Err(invalid_price());
        }
    }
    let patch = AlbumPatch {
        title: body.title,
        artist: body.artist,
        price: body.price,
        image_url: body.image_url,
    };
    match state.albums.update(id, patch).await? {
        Some(album) => Ok(HttpResponse::Ok().json(album)),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_album(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path.into_inner())?;
    if state.albums.delete(id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound)
    }
}

pub fn configure_service(svc: &mut web::ServiceConfig) {
    info!("http config for /albums");
    svc.service(
        web::scope("/albums")
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_album))
                    .route(web::put().to(update_album))
                    .route(web::delete().to(delete_album)),
            )
            .service(
                web::resource("")
                    .route(web::get().to(list_albums))
                    .route(web::post().to(create_album)),
            ),
    );
}
