use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("{0}")]
    StorageErr(String),
    #[error(transparent)]
    OtherErr(anyhow::Error),
}

/// An album in the store catalog. `id` is assigned by the repository on
/// insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: f64,
    pub image_url: String,
}

/// Album data for creating a new album (without id).
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
    pub image_url: String,
}

/// Partial album data for updates. Only the provided fields change.
#[derive(Debug, Clone, Default)]
pub struct AlbumPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// All albums, in insertion order.
    async fn list(&self) -> Result<Vec<Album>, AlbumError>;

    async fn get(&self, id: i64) -> Result<Option<Album>, AlbumError>;

    /// Inserts a new album. The assigned id is `max(existing ids) + 1`,
    /// or 1 for an empty catalog.
    async fn create(&self, data: NewAlbum) -> Result<Album, AlbumError>;

    async fn update(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, AlbumError>;

    /// Returns whether an album with this id existed and was removed.
    async fn delete(&self, id: i64) -> Result<bool, AlbumError>;
}
