//! # quizcast-core
//!
//! Core types, traits, configuration, question-bank parsing, and error
//! handling for quizcast.

pub mod config;
pub mod error;
pub mod question;
pub mod traits;

pub use config::shellexpand;
