/// Value flowing in and out of intercepted calls: arguments and return values.
pub type Value = serde_json::Value;

/// Ordered call arguments
pub type Arguments = Vec<Value>;
