//! # Narrator CLI
//!
//! Command-line front ends over [`narrator_core`]:
//!
//! - `bark-narrate` expresses style with Bark prosody markers
//! - `kokoro-narrate` expresses style with Kokoro voices and speaking rate
//!
//! Both binaries are thin wrappers around [`app::main_with`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod args;
pub mod logging;
pub mod prompt;
pub mod report;

pub use app::{main_with, run, Frontend};
pub use args::{BarkCli, CommonArgs, KokoroCli};
