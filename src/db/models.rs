//! Database Models - structs representing persisted records (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Portfolio project
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: String,
    pub media_urls: Vec<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// New project for insertion (id assigned by the store)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: String,
    pub media_urls: Vec<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Fully-resolved field set written by an update.
///
/// The service layer merges the caller's partial form with the existing
/// record before building this, so the store applies it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub title: String,
    pub description: String,
    pub category: String,
    pub thumbnail_url: String,
    pub media_urls: Vec<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Contact form submission
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub project_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// New contact message for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub project_type: String,
    pub message: String,
}
