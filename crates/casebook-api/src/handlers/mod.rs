pub mod cases;
pub mod documents;
pub mod stats;
