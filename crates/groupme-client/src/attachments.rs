//! Message attachments
//!
//! Attachments are polymorphic on the wire: a `type` discriminator selects
//! the shape. Known discriminators get a typed variant; everything else
//! lands in the generic arm with its fields kept verbatim, so an unknown
//! type survives a decode/encode round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A location pinned to a message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<String>,
    /// Fields beyond the typed ones, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Build a location attachment for submission.
    pub fn new(name: &str, lat: &str, lng: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            lat: Some(lat.to_string()),
            lng: Some(lng.to_string()),
            extra: Map::new(),
        }
    }
}

/// An image hosted on the image service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Fields beyond the typed ones, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Image {
    /// Build an image attachment for submission.
    pub fn new(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            extra: Map::new(),
        }
    }
}

/// Catch-all for attachment types without a dedicated variant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenericAttachment {
    /// Wire discriminator.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Every other field, kept verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A message attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Location(Location),
    Image(Image),
    Other(GenericAttachment),
}

impl Attachment {
    /// Wire discriminator for this attachment.
    pub fn kind(&self) -> &str {
        match self {
            Attachment::Location(_) => "location",
            Attachment::Image(_) => "image",
            Attachment::Other(attachment) => &attachment.kind,
        }
    }

    /// Decode one attachment, dispatching on its `type` discriminator.
    ///
    /// Unknown discriminators are not an error; they decode into
    /// [`Attachment::Other`].
    pub fn from_value(value: Value) -> Result<Self> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        match kind.as_str() {
            "location" => Ok(Attachment::Location(serde_json::from_value(value)?)),
            "image" => Ok(Attachment::Image(serde_json::from_value(value)?)),
            _ => Ok(Attachment::Other(serde_json::from_value(value)?)),
        }
    }

    /// Decode an ordered list of raw attachment values, preserving order.
    pub fn from_bulk_data(values: Vec<Value>) -> Result<Vec<Self>> {
        values.into_iter().map(Attachment::from_value).collect()
    }

    /// Serialize back to the wire shape: the `type` discriminator plus
    /// exactly the fields this attachment was built from.
    pub fn to_json(&self) -> Result<Value> {
        let mut value = match self {
            Attachment::Location(location) => serde_json::to_value(location)?,
            Attachment::Image(image) => serde_json::to_value(image)?,
            Attachment::Other(attachment) => return Ok(serde_json::to_value(attachment)?),
        };

        // A decoded attachment already carries its discriminator; one built
        // by hand does not.
        if let Value::Object(map) = &mut value {
            map.entry("type")
                .or_insert_with(|| Value::String(self.kind().to_string()));
        }

        Ok(value)
    }
}
