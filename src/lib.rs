pub mod boundary;
pub mod config;
pub mod conventional;
pub mod dates;
pub mod domain;
pub mod error;
pub mod export;
pub mod git;
pub mod markdown;
pub mod render;
pub mod server;
pub mod ui;

pub use error::{ReleaseNotesError, Result};
