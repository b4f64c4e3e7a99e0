use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    pub term: String,
}

/// One image that survived the dimension check, placed in the grid.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct GridImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub column: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub term: String,
    pub candidates: usize,
    pub images: Vec<GridImage>,
}
