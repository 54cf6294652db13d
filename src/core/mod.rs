pub mod distractor;
pub mod engine;
pub mod model;
pub mod select;
pub mod tokenizer;
pub mod types;
