pub mod extractor;
pub mod types;
pub mod utils;

pub use extractor::SheetExtractor;
