pub mod excel;
pub mod file_processor;
pub mod presenter;
pub mod receivables;
pub mod reconciliation;
pub mod shipments;
