use crate::error::CartStorageError;
use chrono::Utc;
use log::{error, warn};
use model::album::Album;
use model::cart::CartItem;
use parking_lot::RwLock;
use std::sync::Arc;

/// Durable store for the cart collection. Implementations persist the
/// whole collection on every save and return the whole collection on
/// load, with simple overwrite semantics.
pub trait CartStorage: Send + Sync {
    fn load(&self) -> Result<Vec<CartItem>, CartStorageError>;
    fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError>;
}

/// Receives a snapshot of the cart after every mutation. Callbacks run
/// synchronously on the mutating call, in registration order.
pub trait CartObserver: Send + Sync {
    fn cart_changed(&self, items: &[CartItem]);
}

/// The shared shopping cart.
///
/// One instance is constructed at application startup and handed to every
/// consumer as a cloned handle; all clones observe the same underlying
/// collection, so a mutation through any handle is immediately visible
/// through all others. Every mutation writes the full collection through
/// to the durable store before returning. Storage failures are logged and
/// never surface to the caller: the in-memory state is authoritative for
/// the running session.
#[derive(Clone)]
pub struct CartService {
    items: Arc<RwLock<Vec<CartItem>>>,
    storage: Arc<dyn CartStorage>,
    observers: Arc<RwLock<Vec<Arc<dyn CartObserver>>>>,
}

impl CartService {
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            storage,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Populates the cart from the durable store. Called once during
    /// application bootstrap; a non-empty cart is left untouched.
    /// Unreadable or corrupt stored data resets the cart to empty.
    pub fn initialize(&self) {
        let mut items = self.items.write();
        if !items.is_empty() {
            return;
        }
        match self.storage.load() {
            Ok(stored) => *items = stored,
            Err(e) => {
                warn!("Failed to load cart from storage: {}", e);
                items.clear();
            }
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn CartObserver>) {
        self.observers.write().push(observer);
    }

    /// Adds one unit of `album` to the cart. An existing entry keeps its
    /// position and first-added time and gains quantity; otherwise a new
    /// entry is appended. Albums without a positive id are rejected.
    pub fn add_to_cart(&self, album: Album) {
        if album.id <= 0 {
            error!("Invalid album data: id {}", album.id);
            return;
        }
        {
            let mut items = self.items.write();
            match items.iter().position(|item| item.album.id == album.id) {
                Some(index) => {
                    items[index].quantity = items[index].quantity.saturating_add(1);
                }
                None => items.push(CartItem {
                    album,
                    quantity: 1,
                    added_at: Utc::now(),
                }),
            }
        }
        self.sync_and_notify();
    }

    /// Removes the entry for `album_id` entirely. No-op when absent.
    pub fn remove_from_cart(&self, album_id: i64) {
        let removed = {
            let mut items = self.items.write();
            match items.iter().position(|item| item.album.id == album_id) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.sync_and_notify();
        }
    }

    /// Sets the entry's quantity to exactly `quantity`. Zero or below
    /// removes the entry instead; an absent entry is a no-op.
    pub fn update_quantity(&self, album_id: i64, quantity: i32) {
        if quantity <= 0 {
            self.remove_from_cart(album_id);
            return;
        }
        let changed = {
            let mut items = self.items.write();
            match items.iter_mut().find(|item| item.album.id == album_id) {
                Some(item) => {
                    item.quantity = quantity as u32;
                    true
                }
                None => false,
            }
        };
        if changed {
            self.sync_and_notify();
        }
    }

    /// Decrements the entry's quantity by one, removing the entry when it
    /// was at one. No-op when absent.
    pub fn decrease_quantity(&self, album_id: i64) {
        let changed = {
            let mut items = self.items.write();
            match items.iter().position(|item| item.album.id == album_id) {
                Some(index) => {
                    if items[index].quantity > 1 {
                        items[index].quantity -= 1;
                    } else {
                        items.remove(index);
                    }
                    true
                }
                None => false,
            }
        };
        if changed {
            self.sync_and_notify();
        }
    }

    pub fn clear_cart(&self) {
        self.items.write().clear();
        self.sync_and_notify();
    }

    pub fn find_cart_item(&self, album_id: i64) -> Option<CartItem> {
        self.items
            .read()
            .iter()
            .find(|item| item.album.id == album_id)
            .cloned()
    }

    pub fn is_in_cart(&self, album_id: i64) -> bool {
        self.items
            .read()
            .iter()
            .any(|item| item.album.id == album_id)
    }

    /// Quantity of the matching entry, or 0 when absent.
    pub fn get_item_quantity(&self, album_id: i64) -> u32 {
        self.items
            .read()
            .iter()
            .find(|item| item.album.id == album_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Snapshot of the current collection, in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.items.read().clone()
    }

    /// Sum of all entry quantities. Recomputed from the collection on
    /// every call.
    pub fn item_count(&self) -> u64 {
        self.items
            .read()
            .iter()
            .map(|item| item.quantity as u64)
            .sum()
    }

    /// Sum of `price * quantity` over all entries. Recomputed from the
    /// collection on every call.
    pub fn cart_total(&self) -> f64 {
        self.items
            .read()
            .iter()
            .map(|item| item.album.price * item.quantity as f64)
            .sum()
    }

    /// The cart total rendered with exactly two decimal digits.
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.cart_total())
    }

    // Write-through, then observer fan-out. Storage and observers always
    // receive the same snapshot.
    fn sync_and_notify(&self) {
        let snapshot = self.items.read().clone();
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("Failed to save cart to storage: {}", e);
        }
        let observers = self.observers.read().clone();
        for observer in observers {
            observer.cart_changed(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemStorage {
        stored: Mutex<Vec<CartItem>>,
        saved: Mutex<Option<Vec<CartItem>>>,
    }

    impl MemStorage {
        fn with_items(items: Vec<CartItem>) -> Self {
            Self {
                stored: Mutex::new(items),
                saved: Mutex::new(None),
            }
        }

        fn last_saved(&self) -> Option<Vec<CartItem>> {
            self.saved.lock().clone()
        }
    }

    impl CartStorage for MemStorage {
        fn load(&self) -> Result<Vec<CartItem>, CartStorageError> {
            Ok(self.stored.lock().clone())
        }

        fn save(&self, items: &[CartItem]) -> Result<(), CartStorageError> {
            *self.saved.lock() = Some(items.to_vec());
            Ok(())
        }
    }

    struct CorruptStorage;

    impl CartStorage for CorruptStorage {
        fn load(&self) -> Result<Vec<CartItem>, CartStorageError> {
            Err(CartStorageError::Corrupt("unexpected token".to_string()))
        }

        fn save(&self, _items: &[CartItem]) -> Result<(), CartStorageError> {
            Ok(())
        }
    }

    struct FailingStorage;

    impl CartStorage for FailingStorage {
        fn load(&self) -> Result<Vec<CartItem>, CartStorageError> {
            Ok(Vec::new())
        }

        fn save(&self, _items: &[CartItem]) -> Result<(), CartStorageError> {
            Err(CartStorageError::Unavailable("disk full".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        counts: Mutex<Vec<u64>>,
    }

    impl CartObserver for RecordingObserver {
        fn cart_changed(&self, items: &[CartItem]) {
            let count = items.iter().map(|item| item.quantity as u64).sum();
            self.counts.lock().push(count);
        }
    }

    fn album(id: i64, price: f64) -> Album {
        Album {
            id,
            title: format!("Album {}", id),
            artist: format!("Artist {}", id),
            price,
            image_url: format!("https://example.com/covers/{}.png", id),
        }
    }

    fn cart() -> (CartService, Arc<MemStorage>) {
        let storage = Arc::new(MemStorage::default());
        (CartService::new(storage.clone()), storage)
    }

    #[test]
    fn every_add_call_adds_exactly_one_to_item_count() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 9.99));
        cart.add_to_cart(album(2, 4.99));
        cart.add_to_cart(album(1, 9.99));
        cart.add_to_cart(album(3, 7.99));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn adding_the_same_album_twice_merges_into_one_entry() {
        let (cart, _) = cart();
        let a = album(1, 10.99);
        cart.add_to_cart(a.clone());
        cart.add_to_cart(a.clone());

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert!((cart.cart_total() - 2.0 * a.price).abs() < 1e-9);
    }

    #[test]
    fn add_preserves_insertion_order() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(2, 13.99));
        cart.add_to_cart(album(1, 10.99));

        let ids: Vec<i64> = cart.items().iter().map(|item| item.album.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn add_keeps_first_added_time_on_increment() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        let first = cart.find_cart_item(1).unwrap().added_at;
        cart.add_to_cart(album(1, 10.99));
        assert_eq!(cart.find_cart_item(1).unwrap().added_at, first);
    }

    #[test]
    fn add_rejects_album_without_valid_id() {
        let (cart, storage) = cart();
        cart.add_to_cart(album(0, 10.99));
        cart.add_to_cart(album(-3, 10.99));

        assert_eq!(cart.item_count(), 0);
        // a rejected add is a no-op: nothing was written through
        assert!(storage.last_saved().is_none());
    }

    #[test]
    fn remove_from_cart_deletes_the_entry() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(2, 13.99));
        cart.remove_from_cart(1);

        assert!(!cart.is_in_cart(1));
        assert!(cart.is_in_cart(2));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn remove_of_absent_entry_is_a_noop() {
        let (cart, storage) = cart();
        cart.remove_from_cart(42);
        assert!(storage.last_saved().is_none());
    }

    #[test]
    fn update_quantity_sets_the_absolute_value() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.update_quantity(1, 5);
        assert_eq!(cart.get_item_quantity(1), 5);
    }

    #[test]
    fn update_quantity_to_zero_or_below_removes_the_entry() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.update_quantity(1, 0);
        assert!(!cart.is_in_cart(1));

        cart.add_to_cart(album(2, 13.99));
        cart.update_quantity(2, -1);
        assert!(!cart.is_in_cart(2));
    }

    #[test]
    fn update_quantity_of_absent_entry_is_a_noop() {
        let (cart, storage) = cart();
        cart.update_quantity(42, 3);
        assert_eq!(cart.item_count(), 0);
        assert!(storage.last_saved().is_none());
    }

    #[test]
    fn decrease_quantity_decrements_above_one() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(1, 10.99));
        cart.decrease_quantity(1);

        assert!(cart.is_in_cart(1));
        assert_eq!(cart.get_item_quantity(1), 1);
    }

    #[test]
    fn decrease_quantity_at_one_removes_the_entry() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.decrease_quantity(1);
        assert!(!cart.is_in_cart(1));
    }

    #[test]
    fn clear_cart_empties_and_persists_an_empty_collection() {
        let (cart, storage) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(2, 13.99));
        cart.clear_cart();

        assert_eq!(cart.item_count(), 0);
        assert!(cart.items().is_empty());
        assert_eq!(storage.last_saved(), Some(Vec::new()));
    }

    #[test]
    fn totals_for_two_distinct_albums() {
        let (cart, _) = cart();
        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(2, 13.99));

        assert_eq!(cart.item_count(), 2);
        assert!((cart.cart_total() - 24.98).abs() < 1e-9);
        assert_eq!(cart.formatted_total(), "24.98");
    }

    #[test]
    fn totals_for_one_album_three_times() {
        let (cart, _) = cart();
        for _ in 0..3 {
            cart.add_to_cart(album(1, 10.99));
        }

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert!((cart.cart_total() - 32.97).abs() < 1e-9);
        assert_eq!(cart.formatted_total(), "32.97");
    }

    #[test]
    fn lookups_return_zero_or_none_for_absent_entries() {
        let (cart, _) = cart();
        assert!(!cart.is_in_cart(1));
        assert_eq!(cart.get_item_quantity(1), 0);
        assert!(cart.find_cart_item(1).is_none());
    }

    #[test]
    fn initialize_loads_the_stored_collection() {
        let seed = vec![CartItem {
            album: album(1, 10.99),
            quantity: 2,
            added_at: Utc::now(),
        }];
        let storage = Arc::new(MemStorage::with_items(seed.clone()));
        let cart = CartService::new(storage);
        cart.initialize();

        assert_eq!(cart.items(), seed);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn initialize_leaves_a_non_empty_cart_untouched() {
        let storage = Arc::new(MemStorage::with_items(vec![CartItem {
            album: album(9, 1.99),
            quantity: 7,
            added_at: Utc::now(),
        }]));
        let cart = CartService::new(storage);
        cart.add_to_cart(album(1, 10.99));
        cart.initialize();

        assert_eq!(cart.item_count(), 1);
        assert!(cart.is_in_cart(1));
        assert!(!cart.is_in_cart(9));
    }

    #[test]
    fn initialize_with_corrupt_storage_resets_to_empty() {
        let cart = CartService::new(Arc::new(CorruptStorage));
        cart.initialize();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn save_failure_keeps_the_in_memory_mutation() {
        let cart = CartService::new(Arc::new(FailingStorage));
        cart.add_to_cart(album(1, 10.99));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn observers_see_every_mutation_synchronously() {
        let (cart, _) = cart();
        let observer = Arc::new(RecordingObserver::default());
        cart.subscribe(observer.clone());

        cart.add_to_cart(album(1, 10.99));
        cart.add_to_cart(album(1, 10.99));
        cart.update_quantity(1, 5);
        cart.decrease_quantity(1);
        cart.clear_cart();

        assert_eq!(*observer.counts.lock(), vec![1, 2, 5, 4, 0]);
    }

    #[test]
    fn cloned_handles_share_one_collection() {
        let (cart, _) = cart();
        let icon_view = cart.clone();
        let drawer_view = cart.clone();

        cart.add_to_cart(album(1, 10.99));
        assert_eq!(icon_view.item_count(), 1);

        drawer_view.add_to_cart(album(1, 10.99));
        assert_eq!(cart.get_item_quantity(1), 2);
        assert_eq!(icon_view.formatted_total(), "21.98");
    }
}
