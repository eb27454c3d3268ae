pub mod executor;
pub mod normalize;
pub mod query;
