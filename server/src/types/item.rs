use serde::{Deserialize, Serialize};

use super::ItemId;

/// A stored item.
///
/// Items are immutable once inserted. The JSON field names (`Id`, `Info`)
/// are part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Id")]
    pub id: ItemId,
    #[serde(rename = "Info")]
    pub info: String,
}

impl Item {
    #[must_use]
    pub const fn new(id: ItemId, info: String) -> Self {
        Self { id, info }
    }
}
