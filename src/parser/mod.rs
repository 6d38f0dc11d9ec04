// src/parser/mod.rs

pub mod abaqus;
pub mod comsol;
pub mod elfen;
pub mod gmsh;

pub use abaqus::AbaqusInpParser;
pub use comsol::MphtxtParser;
pub use elfen::MesParser;
pub use gmsh::MshParser;
