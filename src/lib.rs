//! A dynamic, bulk-loadable 2D R-tree spatial index over axis-aligned
//! rectangles.
//!
//! [`Tree`] supports one-at-a-time insertion and removal, Sort-Tile-Recursive
//! bulk loading from either a plain item list or a flat coordinate buffer,
//! rectangle-range search (eager or lazy), and a short-circuiting collision
//! test. See [`Tree`] for the full API.

mod bulk_load;
mod config;
mod error;
mod heuristics;
mod insertion;
mod item;
#[cfg(feature = "serde")]
mod json;
mod node;
mod query;
mod rect;
mod removal;
mod split;
mod tree;

pub use config::TreeConfig;
pub use error::Error;
pub use item::Item;
pub use query::SearchIter;
pub use rect::Rectangle;
pub use tree::Tree;
