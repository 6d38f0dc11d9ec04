// src/parser/gmsh/mod.rs

pub mod msh;

pub use msh::MshParser;
