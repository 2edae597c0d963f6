//! Version-control queries backing the cleanup guards.

pub mod git;

pub use git::WorkingTree;
