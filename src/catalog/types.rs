use crate::model::types::ItemId;
use serde::{Deserialize, Serialize};

/// A single catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wine {
    pub id: ItemId,
    pub title: String,
    pub country: String,
    pub province: String,
    pub region: String,
    pub winery: String,
    pub variety: String,
    pub designation: Option<String>,
    pub points: u32,
    pub price: Option<f64>,
    pub description: String,
    pub taster_name: Option<String>,
    pub taster_twitter_handle: Option<String>,
}

/// Attribute filter for catalog search. Unset fields match everything.
///
/// Text fields match case-insensitively as substrings; numeric bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WineFilter {
    pub country: Option<String>,
    pub variety: Option<String>,
    pub winery: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_points: Option<u32>,
    pub max_points: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WineStats {
    pub total_wines: usize,
    pub countries: usize,
    pub varieties: usize,
    pub avg_points: f64,
    pub avg_price: f64,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
