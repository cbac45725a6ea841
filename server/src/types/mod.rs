//! Domain types shared by the store and the HTTP layer.

pub mod ids;
pub mod item;

pub use ids::ItemId;
pub use item::Item;
