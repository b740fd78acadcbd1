//! espalier: force-directed graph navigation for markdown outlines.
//!
//! The text buffer is the single source of truth. A heading tree is derived
//! from it on every change, flattened into a physics simulation for display,
//! and structural edits made on the graph are translated back into exact
//! rewrites of the buffer. The crate splits along those seams: [`heading`]
//! derives the tree, [`navigate`] queries it, [`mutate`] rewrites the
//! buffer, [`layout`] animates the graph, and [`controller`], [`app_state`]
//! and [`ui`] wire the pieces into the terminal application.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod controller;
pub mod heading;
pub mod layout;
pub mod mutate;
pub mod navigate;
pub mod ui;
