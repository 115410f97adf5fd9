mod aggregate;
mod normalize;
mod query;
mod similarity;
pub mod util;

pub use aggregate::Aggregate;
pub use normalize::Normalize;
pub use query::Query;
pub use similarity::Similarity;
