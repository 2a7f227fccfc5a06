use ijson::IValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::Role;
use crate::error::Error;

/// A single fragment of content exchanged with a provider.
///
/// Exactly one variant is set per part. Provider-specific keys that sit next
/// to the recognized field are kept in the variant's extra map, so a part
/// deserialized from a raw mapping serializes back to the same mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text(TextPart),
    InlineData(InlineDataPart),
    FunctionCall(FunctionCallPart),
    FunctionResponse(FunctionResponsePart),
}

/// Text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Inline binary data with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataPart {
    pub inline_data: Blob,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Base64-encoded binary payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A function call emitted by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallPart {
    pub function_call: FunctionCallData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name and arguments of a function call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCallData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<IValue>,
}

/// A function result sent back to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponsePart {
    pub function_response: FunctionResponseData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name and payload of a function result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionResponseData {
    pub name: String,
    pub response: IValue,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(TextPart {
            text: text.into(),
            extra: Map::new(),
        })
    }

    /// Create an inline data part from a MIME type and base64 payload.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData(InlineDataPart {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
                extra: Map::new(),
            },
            extra: Map::new(),
        })
    }

    /// Create a function call part.
    pub fn function_call(name: impl Into<String>, args: Option<IValue>) -> Self {
        Part::FunctionCall(FunctionCallPart {
            function_call: FunctionCallData {
                name: name.into(),
                args,
            },
            extra: Map::new(),
        })
    }

    /// Create a function response part.
    pub fn function_response(name: impl Into<String>, response: IValue) -> Self {
        Part::FunctionResponse(FunctionResponsePart {
            function_response: FunctionResponseData {
                name: name.into(),
                response,
            },
            extra: Map::new(),
        })
    }

    /// Build a part from a raw provider-shaped mapping.
    ///
    /// Sets exactly one variant (the first whose required fields are
    /// present) and fails with a validation error when none match.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::validation("part data must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|_| {
            Error::validation(
                "part requires one of: text, inlineData, functionCall, functionResponse",
            )
        })
    }

    /// Serialize back to the raw mapping this part was built from.
    pub fn to_value(&self) -> Result<Value, Error> {
        Ok(serde_json::to_value(self)?)
    }

    /// The text of this part, if it is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    /// The function call carried by this part, if any.
    pub fn as_function_call(&self) -> Option<&FunctionCallData> {
        match self {
            Part::FunctionCall(c) => Some(&c.function_call),
            _ => None,
        }
    }
}

/// One turn of a conversation: a role plus an ordered, non-empty list of
/// parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    role: Role,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    /// Create a content turn. Fails if `parts` is empty, for any role.
    pub fn new(role: Role, parts: Vec<Part>) -> Result<Self, Error> {
        if parts.is_empty() {
            return Err(Error::validation("content requires at least one part"));
        }
        Ok(Self { role, parts })
    }

    /// A user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// A model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Append a part to this turn.
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Decompose into role and parts.
    pub fn into_parts(self) -> (Role, Vec<Part>) {
        (self.role, self.parts)
    }

    pub(crate) fn parts_mut(&mut self) -> &mut Vec<Part> {
        &mut self.parts
    }

    /// All text parts concatenated in order.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_round_trip_preserves_unknown_keys() {
        let original = json!({"text": "hello", "thought": true});
        let part = Part::from_value(original.clone()).unwrap();
        assert_eq!(part.as_text(), Some("hello"));
        assert_eq!(part.to_value().unwrap(), original);

        let original = json!({
            "inlineData": {"mimeType": "image/png", "data": "aGk=", "videoMetadata": {"fps": 1}},
            "displayName": "screenshot"
        });
        let part = Part::from_value(original.clone()).unwrap();
        assert!(matches!(part, Part::InlineData(_)));
        assert_eq!(part.to_value().unwrap(), original);
    }

    #[test]
    fn test_part_round_trip_function_shapes() {
        let original = json!({"functionCall": {"name": "get_weather", "args": {"city": "Oslo"}}});
        let part = Part::from_value(original.clone()).unwrap();
        assert_eq!(part.as_function_call().unwrap().name, "get_weather");
        assert_eq!(part.to_value().unwrap(), original);

        // args is optional and must not reappear when absent
        let original = json!({"functionCall": {"name": "ping"}});
        let part = Part::from_value(original.clone()).unwrap();
        assert_eq!(part.to_value().unwrap(), original);

        let original = json!({"functionResponse": {"name": "get_weather", "response": {"temp": 3}}});
        let part = Part::from_value(original.clone()).unwrap();
        assert_eq!(part.to_value().unwrap(), original);
    }

    #[test]
    fn test_part_sets_exactly_one_discriminant() {
        // "text" wins when several recognized keys are present; the rest
        // lands in the extra map and still round-trips.
        let original = json!({"text": "hi", "functionCall": {"name": "f"}});
        let part = Part::from_value(original.clone()).unwrap();
        assert!(matches!(part, Part::Text(_)));
        assert_eq!(part.to_value().unwrap(), original);
    }

    #[test]
    fn test_part_rejects_unrecognized_mapping() {
        assert!(Part::from_value(json!({})).is_err());
        assert!(Part::from_value(json!({"unknown": 1})).is_err());
        assert!(Part::from_value(json!({"text": 42})).is_err());
        assert!(Part::from_value(json!("just a string")).is_err());
        // inlineData missing required mimeType
        assert!(Part::from_value(json!({"inlineData": {"data": "aGk="}})).is_err());
    }

    #[test]
    fn test_content_rejects_empty_parts_for_any_role() {
        for role in [Role::User, Role::Model] {
            let err = Content::new(role, vec![]).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(Content::new(Role::User, vec![Part::text("hi")]).is_ok());
    }

    #[test]
    fn test_content_text_concatenation() {
        let content = Content::new(
            Role::Model,
            vec![
                Part::text("The weather "),
                Part::function_call("get_weather", None),
                Part::text("is sunny."),
            ],
        )
        .unwrap();
        assert_eq!(content.text(), "The weather is sunny.");
    }

    #[test]
    fn test_content_wire_shape() {
        let content = Content::user("hello");
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value, json!({"role": "user", "parts": [{"text": "hello"}]}));
    }
}
