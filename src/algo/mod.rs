pub mod aggregate;
pub mod filters;
pub mod momentum;
pub mod normalize;
pub mod score;
pub mod string_distance;
pub mod tokenizer;
pub mod types;
pub mod url_normalize;
