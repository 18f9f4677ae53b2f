//! mush - bundle cache, retrieval and materialization engine
//!
//! Bundles are versioned collections of skills, agent definitions and tool
//! configuration. They are pulled from a registry into a content-verified
//! local cache, then installed into a project in the layout a given agent
//! harness expects, or injected for a single run and taken away again.

pub mod bundle;
pub mod cache;
pub mod common;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod harness;
pub mod hash;
pub mod installer;
pub mod ledger;
pub mod merge;
pub mod operations;
pub mod path_utils;
pub mod pull;
pub mod registry;
pub mod temp;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_fixtures;
