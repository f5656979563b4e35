use super::types::{Wine, WineFilter, WineStats};
use crate::model::types::ItemId;

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::collections::HashSet;
use std::path::Path;

pub struct WineCatalog {
    wines: DashMap<ItemId, Wine>,
}

impl WineCatalog {
    pub fn new() -> Self {
        Self {
            wines: DashMap::new(),
        }
    }

    /// Loads a catalog from a JSON array of wine records.
    pub fn load_json(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        let wines: Vec<Wine> = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))?;

        let catalog = Self::new();
        for wine in wines {
            catalog.insert(wine);
        }
        tracing::info!("Loaded {} wines from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// A small built-in catalog used when no catalog file is configured.
    pub fn with_sample_data() -> Self {
        let catalog = Self::new();
        for wine in sample_wines() {
            catalog.insert(wine);
        }
        tracing::info!("Created sample catalog with {} wines", catalog.len());
        catalog
    }

    /// Inserts or replaces a wine, returning the previous record with the same id.
    pub fn insert(&self, wine: Wine) -> Option<Wine> {
        self.wines.insert(wine.id, wine)
    }

    pub fn get(&self, id: ItemId) -> Option<Wine> {
        self.wines.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.wines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.wines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wines.is_empty()
    }

    /// Returns a page of wines in ascending id order.
    pub fn list(&self, skip: usize, limit: usize) -> Vec<Wine> {
        self.sorted(|_| true).into_iter().skip(skip).take(limit).collect()
    }

    pub fn search(&self, filter: &WineFilter) -> Vec<Wine> {
        let country = filter.country.as_deref().map(str::to_lowercase);
        let variety = filter.variety.as_deref().map(str::to_lowercase);
        let winery = filter.winery.as_deref().map(str::to_lowercase);

        self.sorted(|wine| {
            contains_ci(&wine.country, country.as_deref())
                && contains_ci(&wine.variety, variety.as_deref())
                && contains_ci(&wine.winery, winery.as_deref())
                && price_in_range(wine.price, filter.min_price, filter.max_price)
                && filter.min_points.is_none_or(|min| wine.points >= min)
                && filter.max_points.is_none_or(|max| wine.points <= max)
        })
    }

    pub fn stats(&self) -> WineStats {
        let mut countries = HashSet::new();
        let mut varieties = HashSet::new();
        let mut points_sum = 0u64;
        let mut points_count = 0usize;
        let mut price_sum = 0f64;
        let mut price_count = 0usize;

        for entry in self.wines.iter() {
            let wine = entry.value();
            countries.insert(wine.country.clone());
            varieties.insert(wine.variety.clone());
            if wine.points > 0 {
                points_sum += u64::from(wine.points);
                points_count += 1;
            }
            if let Some(price) = wine.price {
                price_sum += price;
                price_count += 1;
            }
        }

        let avg_points = if points_count > 0 {
            points_sum as f64 / points_count as f64
        } else {
            0.0
        };
        let avg_price = if price_count > 0 {
            price_sum / price_count as f64
        } else {
            0.0
        };

        WineStats {
            total_wines: self.wines.len(),
            countries: countries.len(),
            varieties: varieties.len(),
            avg_points: round_to(avg_points, 1),
            avg_price: round_to(avg_price, 2),
        }
    }

    /// Resolves ids into records, keeping their order and dropping ids no longer present.
    pub fn hydrate(&self, ids: &[ItemId]) -> Vec<Wine> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }

    fn sorted(&self, predicate: impl Fn(&Wine) -> bool) -> Vec<Wine> {
        let mut wines: Vec<Wine> = self
            .wines
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        wines.sort_by_key(|wine| wine.id);
        wines
    }
}

impl Default for WineCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_ci(value: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => value.to_lowercase().contains(needle),
        None => true,
    }
}

// Unpriced wines never satisfy a price bound.
fn price_in_range(price: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match price {
        Some(price) => min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max),
        None => false,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn sample_wines() -> Vec<Wine> {
    vec![
        Wine {
            id: 1,
            title: "Test Cabernet Sauvignon 2020".to_string(),
            country: "France".to_string(),
            province: "Bordeaux".to_string(),
            region: "Medoc".to_string(),
            winery: "Chateau Test".to_string(),
            variety: "Cabernet Sauvignon".to_string(),
            designation: Some("Reserve".to_string()),
            points: 88,
            price: Some(35.0),
            description: "Rich and full-bodied wine with notes of blackcurrant and oak."
                .to_string(),
            taster_name: Some("Wine Expert".to_string()),
            taster_twitter_handle: Some("@wineexpert".to_string()),
        },
        Wine {
            id: 2,
            title: "Test Pinot Noir 2019".to_string(),
            country: "USA".to_string(),
            province: "California".to_string(),
            region: "Napa Valley".to_string(),
            winery: "Test Winery".to_string(),
            variety: "Pinot Noir".to_string(),
            designation: None,
            points: 92,
            price: None,
            description: "Elegant wine with cherry and spice flavors.".to_string(),
            taster_name: None,
            taster_twitter_handle: None,
        },
        Wine {
            id: 3,
            title: "Test Chardonnay 2021".to_string(),
            country: "Australia".to_string(),
            province: "Victoria".to_string(),
            region: "Yarra Valley".to_string(),
            winery: "Aussie Wines".to_string(),
            variety: "Chardonnay".to_string(),
            designation: Some("Single Vineyard".to_string()),
            points: 85,
            price: Some(28.5),
            description: "Crisp and refreshing with citrus and mineral notes.".to_string(),
            taster_name: Some("Aussie Taster".to_string()),
            taster_twitter_handle: Some("@aussietaster".to_string()),
        },
    ]
}
