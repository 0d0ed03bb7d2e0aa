pub mod comparison_xlsx;

pub use comparison_xlsx::export_comparison_xlsx;
