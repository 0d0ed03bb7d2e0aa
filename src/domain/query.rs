// src/domain/query.rs

pub const LOCATION_PLACEHOLDER: &str = "{location}";
pub const DEFAULT_QUERY_TEMPLATE: &str = "properties in {location}";

/// Turns a free-text location into a search query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    template: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            template: DEFAULT_QUERY_TEMPLATE.to_string(),
        }
    }
}

impl QueryBuilder {
    /// Returns `None` when the template has no `{location}` placeholder.
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        template
            .contains(LOCATION_PLACEHOLDER)
            .then_some(Self { template })
    }

    pub fn build(&self, location: &str) -> String {
        self.template.replace(LOCATION_PLACEHOLDER, location.trim())
    }
}
