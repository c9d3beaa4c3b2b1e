pub mod error;
pub mod lexicon;
pub mod model;
pub mod receipt;
pub mod repository;
