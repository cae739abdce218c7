use async_trait::async_trait;
use model::album::{Album, AlbumError, AlbumPatch, AlbumRepository, NewAlbum};
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory album catalog. State lives for the life of the process and
/// resets on restart.
#[derive(Clone, Default)]
pub struct InMemoryAlbumRepository {
    store: Arc<RwLock<Vec<Album>>>,
}

impl InMemoryAlbumRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_albums(albums: Vec<Album>) -> Self {
        Self {
            store: Arc::new(RwLock::new(albums)),
        }
    }

    /// Catalog seeded with the six-album demo data set.
    pub fn with_demo_catalog() -> Self {
        Self::with_albums(demo_catalog())
    }
}

fn demo_catalog() -> Vec<Album> {
    let seed = [
        (1, "You, Me and an App Id", "Daprize", 10.99, "https://aka.ms/albums-daprlogo"),
        (
            2,
            "Seven Revision Army",
            "The Blue-Green Stripes",
            13.99,
            "https://aka.ms/albums-containerappslogo",
        ),
        (3, "Scale It Up", "KEDA Club", 13.99, "https://aka.ms/albums-kedalogo"),
        (4, "Lost in Translation", "MegaDNS", 12.99, "https://aka.ms/albums-envoylogo"),
        (5, "Lock Down Your Love", "V is for VNET", 12.99, "https://aka.ms/albums-vnetlogo"),
        (
            6,
            "Sweet Container O' Mine",
            "Guns N Probeses",
            14.99,
            "https://aka.ms/albums-containerappslogo",
        ),
    ];
    seed.into_iter()
        .map(|(id, title, artist, price, image_url)| Album {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            price,
            image_url: image_url.to_string(),
        })
        .collect()
}

#[async_trait]
impl AlbumRepository for InMemoryAlbumRepository {
    async fn list(&self) -> Result<Vec<Album>, AlbumError> {
        Ok(self.store.read().clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Album>, AlbumError> {
        Ok(self.store.read().iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, data: NewAlbum) -> Result<Album, AlbumError> {
        let mut store = self.store.write();
        let id = store.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let album = Album {
            id,
            title: data.title,
            artist: data.artist,
            price: data.price,
            image_url: data.image_url,
        };
        store.push(album.clone());
        Ok(album)
    }

    async fn update(&self, id: i64, patch: AlbumPatch) -> Result<Option<Album>, AlbumError> {
        let mut store = self.store.write();
        match store.iter_mut().find(|a| a.id == id) {
            Some(album) => {
                if let Some(title) = patch.title {
                    album.title = title;
                }
                if let Some(artist) = patch.artist {
                    album.artist = artist;
                }
                if let Some(price) = patch.price {
                    album.price = price;
                }
                if let Some(image_url) = patch.image_url {
                    album.image_url = image_url;
                }
                Ok(Some(album.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AlbumError> {
        let mut store = self.store.write();
        match store.iter().position(|a| a.id == id) {
            Some(index) => {
                store.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
