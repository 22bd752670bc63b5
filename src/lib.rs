//! Derive version numbers from git history and stamp them into .NET project files.

pub mod cli;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod project;
pub mod ui;

pub use error::{GitVerError, Result};
