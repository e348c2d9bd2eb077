pub mod error;
pub mod fields;
