pub mod compare;
pub mod home;
pub mod prediction;

pub use compare::compare_page;
pub use home::{home_page, selection_count, HomeVm, ListingRow};
pub use prediction::prediction_page;
