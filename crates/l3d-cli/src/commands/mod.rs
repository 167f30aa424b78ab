pub mod catalog;
pub mod compile;
pub mod resolve;
pub mod sanitize;
pub mod templates;
