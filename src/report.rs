// src/report.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{filter_items, ScanQuery, ScanResult};
use crate::shared::types::CatalogItem;

/// Structured result of one catalog scan, for machine consumption
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanReport {
    // Запрос
    pub query: String,
    pub pages: u32,
    pub min_price: u64,
    pub max_price: u64,
    pub min_rating: f64,

    // Результаты
    pub examined: usize,
    pub matched_count: usize,
    pub matched: Vec<CatalogItem>,

    // Метаданные
    pub timestamp: DateTime<Utc>,
}

impl ScanReport {
    pub fn new(query: &ScanQuery, result: &ScanResult) -> Self {
        let (matched, matched_count) = filter_items(&result.items, &query.thresholds());
        Self {
            query: query.query.clone(),
            pages: query.pages,
            min_price: query.min_price,
            max_price: query.max_price,
            min_rating: query.min_rating,
            examined: result.examined,
            matched_count,
            matched,
            timestamp: Utc::now(),
        }
    }
}
