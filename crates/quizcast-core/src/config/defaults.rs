//! Default value functions used by serde for config deserialization.

pub fn default_bank_path() -> String {
    "questions.txt".to_string()
}

pub fn default_batch_size() -> usize {
    20
}

pub fn default_true() -> bool {
    true
}

pub fn default_exhausted_message() -> String {
    "All questions have been sent. We are done!".to_string()
}

pub fn default_cursor_path() -> String {
    "progress.txt".to_string()
}

pub fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
