//! PetPlate library
//!
//! Pet nutrition tracking: daily nutrient targets, intake classification and
//! supplement recommendations, served over MCP.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod providers;
pub mod recommend;
pub mod tools;
