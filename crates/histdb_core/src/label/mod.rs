//! Label derivation from source names.

pub mod tokenizer;
