//! The `{value: string}` ID wrapper used by delete/get-by-id requests.

use agentforge_errors::ForgeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct IdRequest {
    pub value: String,
}

impl IdRequest {
    pub fn validate_non_empty(&self) -> Result<(), ForgeError> {
        if self.value.trim().is_empty() {
            return Err(ForgeError::validation_at("value", "id must not be empty"));
        }
        Ok(())
    }
}
