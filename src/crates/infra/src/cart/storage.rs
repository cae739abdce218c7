use application::cart::CartStorage;
use application::error::CartStorageError;
use log::info;
use model::cart::CartItem;
use sled::Db;
use std::path::PathBuf;

/// Key the cart collection is stored under.
pub const CART_STORAGE_KEY: &str = "music-store-cart";

/// sled-backed durable cart store. The whole collection is kept as one
/// JSON array value under a fixed key and overwritten on every save.
pub struct SledCartStorage {
    db: Db,
}

impl SledCartStorage {
    pub fn new(db_path: PathBuf) -> Result<Self, sled::Error> {
        let db = sled::open(&db_path)?;
        info!("Cart database opened at {}", db_path.display());

        Ok(Self { db })
    }
}

impl CartStorage for SledCartStorage {
    fn load(&self) -> Result<Vec<CartItem>, CartStorageError> {
        let value = self
            .db
            .get(CART_STORAGE_KEY.as_bytes())
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))?;
        match value {
            // absent key means the cart was never saved
            None => Ok(Vec::new()),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| CartStorageError::Corrupt(e.to_string())),
        }
    }

    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError> {
        let value =
            serde_json::to_vec(items).map_err(|e| CartStorageError::Encode(e.to_string()))?;
        self.db
            .insert(CART_STORAGE_KEY.as_bytes(), value)
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
