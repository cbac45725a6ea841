//! Item storage.
//!
//! Items live in memory only and are lost when the process exits.
//!
//! # Usage
//!
//! ```
//! use itemserver::storage::ItemStore;
//!
//! let store = ItemStore::new();
//! let id = store.insert("hello".to_string())?;
//! assert_eq!(store.get(id)?.info, "hello");
//! # Ok::<(), itemserver::storage::StoreError>(())
//! ```

mod item_store;

pub use item_store::{ItemStore, StoreError};
