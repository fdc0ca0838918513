use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Main error type for weave operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeaveError {
    /// The proxy cannot be built from the given configuration. Never retried.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },

    /// Raised by a target method or by an interceptor, carried through the chain as is.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// The proxy does not expose the requested method under its dispatch strategy
    #[error("Proxy '{proxy}' does not expose method '{method}' with {arity} argument(s)")]
    UnknownMethod {
        proxy: String,
        method: String,
        arity: usize,
    },

    /// The target source could not hand out an instance
    #[error("Target unavailable: {message}")]
    TargetUnavailable {
        message: String,
    },
}

/// Result type alias for weave operations
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Error raised while a call was running, by the real target or by one of the interceptors.
///
/// Cloning is cheap: the optional source is shared, so caching and retrying
/// interceptors can hold on to it and hand back the very same error.
#[derive(Clone)]
pub struct InvocationError {
    /// Who raised it: a method name, an interceptor name...
    pub origin: String,
    pub message: String,
    source: Option<Arc<dyn Error + Send + Sync>>,
}

impl InvocationError {
    pub fn new(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        origin: impl Into<String>,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Whether two errors are the same raised error, not just equal-looking ones
    pub fn same_source(&self, other: &InvocationError) -> bool {
        match (&self.source, &other.source) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => self.origin == other.origin && self.message == other.message,
            _ => false,
        }
    }
}

impl fmt::Debug for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationError")
            .field("origin", &self.origin)
            .field("message", &self.message)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invocation error in '{}': {}", self.origin, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl Error for InvocationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|it| it as &(dyn Error + 'static))
    }
}

impl WeaveError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invocation error
    pub fn invocation(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation(InvocationError::new(origin, message))
    }

    /// Create an invocation error wrapping the error that caused it
    pub fn invocation_with_source(
        origin: impl Into<String>,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::Invocation(InvocationError::with_source(origin, message, source))
    }

    pub fn unknown_method(proxy: impl Into<String>, method: impl Into<String>, arity: usize) -> Self {
        Self::UnknownMethod {
            proxy: proxy.into(),
            method: method.into(),
            arity,
        }
    }

    pub fn target_unavailable(message: impl Into<String>) -> Self {
        Self::TargetUnavailable {
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn as_invocation(&self) -> Option<&InvocationError> {
        match self {
            Self::Invocation(error) => Some(error),
            _ => None,
        }
    }
}

// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        Err($crate::error::WeaveError::configuration($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::error::WeaveError::configuration(format!($fmt, $($arg)*)))
    };
}
