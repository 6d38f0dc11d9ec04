// src/parser/abaqus/mod.rs

pub mod abaqus_inp;
pub mod element_type;
pub mod records;

pub use abaqus_inp::AbaqusInpParser;
