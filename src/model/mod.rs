pub mod candidate;
pub mod taxonomy;
