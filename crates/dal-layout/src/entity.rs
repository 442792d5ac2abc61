use std::fmt;
use std::str::FromStr;

use dal_storage::prelude::{Document, Entity};
use dal_types::prelude::{
    EnvironmentId, LayoutId, OrganizationId, Timestamp, UserId, ENVIRONMENT_FIELD,
    ORGANIZATION_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DalError;

pub const LAYOUTS_COLLECTION: &str = "layouts";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    InApp,
    Email,
    Sms,
    Chat,
    Push,
}

impl ChannelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Chat => "chat",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_app" => Ok(Self::InApp),
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "chat" => Ok(Self::Chat),
            "push" => Ok(Self::Push),
            other => Err(format!("unknown channel '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutContentType {
    CustomHtml,
    Editor,
}

impl LayoutContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomHtml => "customHtml",
            Self::Editor => "editor",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    String,
    Array,
    Boolean,
}

/// A placeholder the layout content expects to be filled at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// Persisted layout. Field names on the wire follow the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntity {
    #[serde(rename = "_id")]
    pub id: LayoutId,
    #[serde(rename = "_environmentId")]
    pub environment_id: EnvironmentId,
    #[serde(rename = "_organizationId")]
    pub organization_id: OrganizationId,
    #[serde(rename = "_creatorId")]
    pub creator_id: UserId,
    pub channel: ChannelType,
    pub content: String,
    #[serde(rename = "contentType")]
    pub content_type: LayoutContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<TemplateVariable>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(rename = "deletedAt", default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Entity for LayoutEntity {
    const COLLECTION: &'static str = LAYOUTS_COLLECTION;
    const SCOPE_FIELDS: &'static [&'static str] = &[ENVIRONMENT_FIELD, ORGANIZATION_FIELD];

    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// Input of `create_layout`: everything but the id, timestamps and the
/// deleted flag, which the store assigns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLayout {
    #[serde(rename = "_environmentId")]
    pub environment_id: EnvironmentId,
    #[serde(rename = "_organizationId")]
    pub organization_id: OrganizationId,
    #[serde(rename = "_creatorId")]
    pub creator_id: UserId,
    pub channel: ChannelType,
    pub content: String,
    #[serde(rename = "contentType")]
    pub content_type: LayoutContentType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<TemplateVariable>>,
}

impl NewLayout {
    pub(crate) fn into_document(self) -> Result<Document, DalError> {
        let mut doc = to_document(&self)?;
        doc.insert("deleted".into(), Value::Bool(false));
        Ok(doc)
    }
}

pub(crate) fn to_document<T: Serialize>(value: &T) -> Result<Document, DalError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DalError::serialization(format!(
            "layout must serialize to an object, got {other}"
        ))),
        Err(err) => Err(DalError::serialization(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_names_follow_the_document_store() {
        let raw = json!({
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "_environmentId": "E1",
            "_organizationId": "O1",
            "_creatorId": "U1",
            "channel": "in_app",
            "content": "<div>{{{body}}}</div>",
            "contentType": "customHtml",
            "name": "base",
            "isDefault": true,
            "variables": [{"name": "body", "type": "String", "required": true}],
            "createdAt": 1,
            "updatedAt": 2
        });
        let entity: LayoutEntity = serde_json::from_value(raw).unwrap();
        assert_eq!(entity.channel, ChannelType::InApp);
        assert_eq!(entity.content_type, LayoutContentType::CustomHtml);
        assert!(!entity.deleted);
        assert_eq!(entity.deleted_at, None);

        let back = serde_json::to_value(&entity).unwrap();
        assert_eq!(back["_creatorId"], json!("U1"));
        assert_eq!(back["deleted"], json!(false));
        assert!(back.get("description").is_none());
        assert!(back["variables"][0].get("defaultValue").is_none());
    }

    #[test]
    fn channel_names_round_trip_through_from_str() {
        for channel in [
            ChannelType::InApp,
            ChannelType::Email,
            ChannelType::Sms,
            ChannelType::Chat,
            ChannelType::Push,
        ] {
            assert_eq!(channel.as_str().parse::<ChannelType>(), Ok(channel));
            assert_eq!(serde_json::to_value(channel).unwrap(), json!(channel.as_str()));
        }
        assert!("fax".parse::<ChannelType>().is_err());
    }
}
