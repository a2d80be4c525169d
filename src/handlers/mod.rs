//! Transport adapters over the dashboard query layer.

pub mod rest;
