//! Socket Configuration Module

/// Backlog used by `listen()` when the caller gives none
pub const LISTEN_BACKLOG_DEFAULT: i32 = 2;

/// Socket configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketConfig {
    /// Default `listen()` backlog
    pub listen_backlog: i32,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            listen_backlog: LISTEN_BACKLOG_DEFAULT,
        }
    }
}
