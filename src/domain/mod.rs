pub mod comparison;
pub mod listing;
pub mod query;
pub mod store;

pub use comparison::{project, ComparisonSeries};
pub use listing::ListingRecord;
pub use query::QueryBuilder;
pub use store::{ResultStore, StoreError, StoreState};
