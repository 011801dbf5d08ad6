//! Telegram Bot API request and response types.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method replies with.
#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse {
    pub ok: bool,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// `sendPoll` body.
#[derive(Debug, Serialize)]
pub(crate) struct SendPoll<'a> {
    pub chat_id: &'a str,
    pub question: &'a str,
    pub options: &'a [String],
    pub is_anonymous: bool,
    #[serde(rename = "type")]
    pub poll_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<usize>,
}

impl<'a> SendPoll<'a> {
    /// A scored quiz when the correct option is known, a regular poll otherwise.
    pub fn new(
        chat_id: &'a str,
        question: &'a str,
        options: &'a [String],
        correct_option_id: Option<usize>,
    ) -> Self {
        Self {
            chat_id,
            question,
            options,
            is_anonymous: false,
            poll_type: if correct_option_id.is_some() {
                "quiz"
            } else {
                "regular"
            },
            correct_option_id,
        }
    }
}

/// `sendMessage` body, plain text.
#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}
