use serde_json::{json, Map, Value};

/// The JSON shape a structured completion must follow.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    String,
    Boolean,
    Array(Box<ResponseShape>),
    /// Every listed property is required.
    Object(Vec<(&'static str, ResponseShape)>),
}

impl ResponseShape {
    pub fn object<I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ResponseShape)>,
    {
        ResponseShape::Object(properties.into_iter().collect())
    }

    pub fn array_of(item: ResponseShape) -> Self {
        ResponseShape::Array(Box::new(item))
    }

    pub fn string_list() -> Self {
        Self::array_of(ResponseShape::String)
    }

    /// Renders the shape in the OpenAPI subset accepted as a Gemini
    /// `responseSchema`.
    pub fn to_schema(&self) -> Value {
        match self {
            ResponseShape::String => json!({ "type": "STRING" }),
            ResponseShape::Boolean => json!({ "type": "BOOLEAN" }),
            ResponseShape::Array(item) => json!({ "type": "ARRAY", "items": item.to_schema() }),
            ResponseShape::Object(properties) => {
                let mut rendered = Map::new();
                for (name, shape) in properties {
                    rendered.insert((*name).to_string(), shape.to_schema());
                }
                let names: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
                json!({
                    "type": "OBJECT",
                    "properties": rendered,
                    "required": names,
                    "propertyOrdering": names,
                })
            }
        }
    }
}
