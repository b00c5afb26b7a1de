//! Compile options

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::output::abstract_emitter::is_legal_identifier;

/// How whitespace-only and whitespace-heavy text is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceStrategy {
    #[default]
    Condense,
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Name of the generated render function
    pub function_name: String,
    /// Runtime helper used to build virtual nodes
    pub helper_name: String,
    pub whitespace: WhitespaceStrategy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            function_name: "render".to_string(),
            helper_name: "h".to_string(),
            whitespace: WhitespaceStrategy::Condense,
        }
    }
}

impl CompileOptions {
    /// Check that the names written into the generated code are identifiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (option, value) in [
            ("functionName", &self.function_name),
            ("helperName", &self.helper_name),
        ] {
            if !is_legal_identifier(value) {
                return Err(ConfigError::InvalidIdentifier {
                    option,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}
