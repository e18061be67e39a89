//! Path-tree construction and multi-selection for file and change listings.

pub mod error;
pub mod panel;
pub mod source;
pub mod tree;
