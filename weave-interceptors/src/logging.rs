use log::Level;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use tokio::time::Instant;
use uuid::Uuid;
use weave_core::{Interceptor, InvocationContext, InvocationResult};

#[derive(Debug, Clone, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[default(Level::Debug)]
    pub level: Level,
    #[default = true]
    pub log_arguments: bool,
    #[default = false]
    pub log_results: bool,
}

/// Logs entry, exit and failures of every call it sees.
///
/// Each call gets its own id so that interleaved concurrent calls can be told
/// apart. Results and errors are passed back untouched.
#[derive(Debug, Default)]
pub struct LoggingInterceptor {
    config: LoggingConfig,
}

impl LoggingInterceptor {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    async fn intercept<'a>(&'a self, invocation: InvocationContext<'a>) -> InvocationResult {
        let call_id = Uuid::new_v4();
        let method = invocation.method();
        let level = self.config.level;

        if self.config.log_arguments {
            log::log!(level, "[{}] -> {} {:?}", call_id, method, invocation.arguments());
        } else {
            log::log!(level, "[{}] -> {}", call_id, method);
        }

        let started = Instant::now();
        let result = invocation.proceed().await;
        let elapsed = started.elapsed();

        match &result {
            Ok(value) if self.config.log_results => {
                log::log!(level, "[{}] <- {} in {:?}: {}", call_id, method, elapsed, value)
            }
            Ok(_) => log::log!(level, "[{}] <- {} in {:?}", call_id, method, elapsed),
            Err(error) => log::warn!("[{}] !! {} failed after {:?}: {}", call_id, method, elapsed, error),
        }
        result
    }
}
