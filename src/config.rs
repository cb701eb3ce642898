use dotenvy::dotenv;
use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    /// How long a typing record stays visible without a refresh, in ms.
    pub typing_liveness_ms: u64,
    /// Client companion contract: a typing session auto-clears after this
    /// much input inactivity. Not enforced here, exposed so UIs agree on it.
    pub typing_debounce_ms: u64,
    /// Max characters of message content mirrored into the conversation
    /// sidebar preview.
    pub preview_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            typing_liveness_ms: 3_000,
            typing_debounce_ms: 2_000,
            preview_max_chars: 80,
        }
    }
}

impl Config {
    fn env_u64(key: &str, fallback: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        let defaults = Self::default();

        let typing_liveness_ms =
            Self::env_u64("CHAT_TYPING_LIVENESS_MS", defaults.typing_liveness_ms);
        if typing_liveness_ms == 0 {
            return Err(AppError::Config(
                "CHAT_TYPING_LIVENESS_MS must be greater than zero".into(),
            ));
        }
        let typing_debounce_ms =
            Self::env_u64("CHAT_TYPING_DEBOUNCE_MS", defaults.typing_debounce_ms);

        let preview_max_chars = env::var("CHAT_PREVIEW_MAX_CHARS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.preview_max_chars);

        Ok(Self {
            typing_liveness_ms,
            typing_debounce_ms,
            preview_max_chars,
        })
    }

    /// Liveness window as a chrono duration, for timestamp arithmetic.
    pub fn typing_liveness(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.typing_liveness_ms as i64)
    }
}
