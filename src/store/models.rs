//! Document and link records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What a document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    File,
    Link,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Text => write!(f, "text"),
            DocumentKind::File => write!(f, "file"),
            DocumentKind::Link => write!(f, "link"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(DocumentKind::Text),
            "file" => Ok(DocumentKind::File),
            "link" => Ok(DocumentKind::Link),
            other => Err(format!("unknown document type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a document about to be inserted
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub kind: Option<DocumentKind>,
    pub content: String,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub link: Option<String>,
    pub tags: Vec<String>,
}

impl Document {
    pub fn new(owner_id: Uuid, new: NewDocument) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: new.title,
            kind: new.kind.unwrap_or(DocumentKind::Text),
            content: new.content,
            file_url: new.file_url,
            file_type: new.file_type,
            file_size: new.file_size,
            link: new.link,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Editable link fields
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub title: String,
    pub url: String,
}

impl Link {
    pub fn new(owner_id: Uuid, new: NewLink) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: new.title,
            url: new.url,
            description: new.description,
            category: new.category,
            created_at: now,
            updated_at: now,
        }
    }
}
