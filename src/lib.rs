//! Packs timeline windows with cuts drawn from categorized source media.
//!
//! `timeline` turns an exported record source into target windows, `catalog`
//! describes the source items, and `alloc` places cuts so that no window
//! repeats an item before its category cycles and cuts from the same item
//! stay apart.
pub mod alloc;
pub mod catalog;
pub mod config;
pub mod edit_list;
pub mod staging;
pub mod timeline;
