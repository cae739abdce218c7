use super::album::Album;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One album's presence in the cart: a full album snapshot taken at the
/// time of the first add (later catalog edits do not propagate), the
/// current quantity (always >= 1) and the first-insertion time.
///
/// The serialized form is the durable-store wire format, so the field
/// names are fixed: `album`, `quantity`, `addedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub album: Album,
    pub quantity: u32,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}
