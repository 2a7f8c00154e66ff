use std::fmt;
use std::time::Duration;

/// How long the browser keeps a toast on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    /// CSS modifier used by the browser (`toast toast-success`, ...).
    pub fn css_class(self) -> &'static str {
        match self {
            ToastLevel::Success => "toast-success",
            ToastLevel::Error => "toast-error",
            ToastLevel::Info => "toast-info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToastLevel::Success => "✅",
            ToastLevel::Error => "❌",
            ToastLevel::Info => "ℹ️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Sink for transient user messages.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_level_icon() {
        assert_eq!(Toast::error("HTTP 500").to_string(), "❌ HTTP 500");
        assert_eq!(Toast::success("ok").level.css_class(), "toast-success");
    }
}
