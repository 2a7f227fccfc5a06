use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// A capability descriptor attached to a generation request.
///
/// Tools carry provider-shaped configuration verbatim: whatever mapping was
/// set is what serializes out. Typed construction is available for the
/// common function-declaration case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    #[serde(flatten)]
    data: Map<String, Value>,
}

/// A callable function schema advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema for the function parameters.
    pub parameters: Value,
}

impl Tool {
    /// Build a tool from a raw provider-shaped mapping.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(data) if !data.is_empty() => Ok(Self { data }),
            Value::Object(_) => Err(Error::validation("tool data must not be empty")),
            _ => Err(Error::validation("tool data must be a JSON object")),
        }
    }

    /// Build a tool advertising a set of callable functions.
    pub fn function_declarations(declarations: Vec<FunctionDeclaration>) -> Result<Self, Error> {
        let mut data = Map::new();
        data.insert(
            "functionDeclarations".to_string(),
            serde_json::to_value(declarations)?,
        );
        Ok(Self { data })
    }

    /// Serialize back to the raw mapping this tool was built from.
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }

    /// Look up a top-level key of the tool configuration.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}
