pub mod corpus;
pub mod cost;
pub mod engine;
pub mod lexicon;
pub mod parser;
pub mod types;
