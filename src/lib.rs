//! Pokecatch - browse the PokeAPI catalog and keep a caught collection
//!
//! This library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod collection;
pub mod components;
pub mod effect;
pub mod logging;
pub mod pagination;
pub mod reducer;
pub mod state;
