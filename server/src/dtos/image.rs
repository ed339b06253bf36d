//! Image DTOs

use serde::{Deserialize, Serialize};

/// Reference returned after an upload, stored by clients in `Advertisement::images`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageDTO {
    pub url: String,
    pub content_type: String,
    pub size: usize,
}
