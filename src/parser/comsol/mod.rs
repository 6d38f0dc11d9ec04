// src/parser/comsol/mod.rs

pub mod mphtxt;

pub use mphtxt::MphtxtParser;
