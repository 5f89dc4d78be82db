pub mod config;
pub mod controller;
pub mod data;
pub mod filter;
pub mod geo;
pub mod layer;
pub mod models;
pub mod palette;
pub mod render;
pub mod theme;
