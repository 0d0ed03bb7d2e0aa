// src/domain/comparison.rs

use crate::domain::listing::ListingRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub label: String,
    pub value: f64,
}

/// (label, price) pairs for the selected listings, in batch order.
/// An empty series means "nothing to compare", not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSeries {
    points: Vec<ComparisonPoint>,
}

impl ComparisonSeries {
    pub fn points(&self) -> &[ComparisonPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }

    pub fn average(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let total: f64 = self.points.iter().map(|p| p.value).sum();
        Some(total / self.points.len() as f64)
    }

    /// `(label, value)` tuples in series order.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.points
            .iter()
            .map(|p| (p.label.as_str(), p.value))
            .collect()
    }
}

pub fn project<'a, I>(records: I) -> ComparisonSeries
where
    I: IntoIterator<Item = &'a ListingRecord>,
{
    let points = records
        .into_iter()
        .map(|record| ComparisonPoint {
            label: record.title().to_string(),
            value: record.price(),
        })
        .collect();

    ComparisonSeries { points }
}
