//! Library crate for influencer-hub.
//!
//! This crate exposes the building blocks of the TUI:
//! - Domain types (`model`) and errors (`error`)
//! - Filtering and sorting of the visible list (`view`)
//! - The in-memory record collection (`store`) and sample data (`seed`)
//! - Application state and update loop (`app`)
//! - UI rendering and widgets (`ui`)
//! - Command-line options and log setup (`cli`, `logging`)
//!
//! It is used by the `influencer-hub` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod seed;
pub mod store;
pub mod ui;
pub mod view;

// Re-export commonly used items at the crate root for convenience
pub use error::{Result, StoreError, ValidationError};
pub use model::{Influencer, InfluencerId, NewInfluencer, Platform, Score, Tier};
pub use store::DirectoryStore;
pub use view::{FilterCriteria, ScoreRange, SortKey, SortOrder, SortSpec};
