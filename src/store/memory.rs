//! In-memory store backend.
//!
//! Used when the server runs without DATABASE_URL, and by tests. Records
//! live in maps behind an RwLock; ids come from an atomic counter so
//! concurrent creates never reuse one.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::models::{ContactMessage, NewContactMessage, NewProject, Project, ProjectUpdate};
use crate::store::{MessageStore, ProjectStore, StoreError};

pub struct MemoryStore {
    projects: RwLock<BTreeMap<i32, Project>>,
    messages: RwLock<BTreeMap<i32, ContactMessage>>,
    next_project_id: AtomicI32,
    next_message_id: AtomicI32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(BTreeMap::new()),
            messages: RwLock::new(BTreeMap::new()),
            next_project_id: AtomicI32::new(1),
            next_message_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert(&self, new: NewProject) -> Result<Project, StoreError> {
        let id = self.next_project_id.fetch_add(1, Ordering::SeqCst);
        let project = Project {
            id,
            title: new.title,
            description: new.description,
            category: new.category,
            thumbnail_url: new.thumbnail_url,
            media_urls: new.media_urls,
            tags: new.tags,
            featured: new.featured,
        };
        self.projects.write().await.insert(id, project.clone());
        Ok(project)
    }

    async fn get(&self, id: i32) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<Project>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, update: ProjectUpdate) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&id) {
            Some(project) => {
                project.title = update.title;
                project.description = update.description;
                project.category = update.category;
                project.thumbnail_url = update.thumbnail_url;
                project.media_urls = update.media_urls;
                project.tags = update.tags;
                project.featured = update.featured;
                Ok(Some(project.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, new: NewContactMessage) -> Result<ContactMessage, StoreError> {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let message = ContactMessage {
            id,
            name: new.name,
            email: new.email,
            project_type: new.project_type,
            message: new.message,
            created_at: Utc::now(),
        };
        self.messages.write().await.insert(id, message.clone());
        Ok(message)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(self.messages.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project(title: &str, category: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: "A sample project".to_string(),
            category: category.to_string(),
            thumbnail_url: "http://example.com/thumb.jpg".to_string(),
            media_urls: vec![],
            tags: vec!["sample".to_string()],
            featured: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_increasing_ids() {
        let store = MemoryStore::new();
        let a = ProjectStore::insert(&store, sample_project("A", "video"))
            .await
            .unwrap();
        let b = ProjectStore::insert(&store, sample_project("B", "design"))
            .await
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_get_returns_inserted_project() {
        let store = MemoryStore::new();
        let created = ProjectStore::insert(&store, sample_project("A", "video"))
            .await
            .unwrap();
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_list_filters_by_exact_category() {
        let store = MemoryStore::new();
        ProjectStore::insert(&store, sample_project("A", "video"))
            .await
            .unwrap();
        ProjectStore::insert(&store, sample_project("B", "design"))
            .await
            .unwrap();
        ProjectStore::insert(&store, sample_project("C", "video"))
            .await
            .unwrap();

        let all = ProjectStore::list(&store, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let videos = ProjectStore::list(&store, Some("video")).await.unwrap();
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|p| p.category == "video"));

        let none = ProjectStore::list(&store, Some("vid")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_id_returns_none() {
        let store = MemoryStore::new();
        let update = ProjectUpdate {
            title: "X".to_string(),
            description: "Y".to_string(),
            category: "video".to_string(),
            thumbnail_url: "http://example.com/t.jpg".to_string(),
            media_urls: vec![],
            tags: vec![],
            featured: false,
        };
        assert!(store.update(99, update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let store = MemoryStore::new();
        let created = ProjectStore::insert(&store, sample_project("A", "video"))
            .await
            .unwrap();
        assert!(store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
        assert!(!store.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_messages_append_and_list() {
        let store = MemoryStore::new();
        let msg = MessageStore::insert(
            &store,
            NewContactMessage {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                project_type: "video".to_string(),
                message: "I would like a promo video.".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(msg.id, 1);

        let listed = MessageStore::list(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "ana@example.com");
    }
}
