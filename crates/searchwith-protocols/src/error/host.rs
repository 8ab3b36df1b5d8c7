//! Host API errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Host API unavailable: {0}")]
    Unavailable(String),

    #[error("{api} call failed: {message}")]
    CallFailed { api: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl HostError {
    pub fn call_failed(api: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CallFailed {
            api: api.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error() {
        let err = HostError::Unavailable("contextMenus".to_string());
        let display = err.to_string();
        assert!(display.contains("unavailable"));
        assert!(display.contains("contextMenus"));
    }

    #[test]
    fn test_call_failed_error() {
        let err = HostError::call_failed("contextMenus.removeAll", "port closed");
        let display = err.to_string();
        assert!(display.contains("contextMenus.removeAll"));
        assert!(display.contains("port closed"));
    }

    #[test]
    fn test_not_found_error() {
        let err = HostError::NotFound("window 7".to_string());
        assert!(err.to_string().contains("window 7"));
    }

    #[test]
    fn test_error_debug() {
        let err = HostError::Unavailable("tabs".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("Unavailable"));
    }
}
