//! MCP server
//!
//! rmcp tool router exposing the PetPlate tools over stdio.

mod server;

pub use server::PetPlateService;
