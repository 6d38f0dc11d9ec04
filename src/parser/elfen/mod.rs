// src/parser/elfen/mod.rs

pub mod mes;
pub mod tokens;

pub use mes::MesParser;
