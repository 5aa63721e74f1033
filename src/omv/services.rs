//! Service status records (`services.getStatus`), passed through untouched.

use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Services {
    raw: Value,
}

impl Services {
    pub fn from_response(raw: Value) -> Self {
        Self { raw }
    }

    pub fn service(&self) -> &Value {
        &self.raw
    }
}
