//! # quizcast-channels
//!
//! Delivery channels for quizcast.

pub mod dry_run;
pub mod telegram;
pub(crate) mod utils;

pub use dry_run::DryRunChannel;
pub use telegram::TelegramChannel;
