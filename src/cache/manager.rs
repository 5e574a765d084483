use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Task, User};

/// Consider cache stale after 15 minutes.
/// Tasks change often enough that a long window would show stale state.
const CACHE_STALE_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Disk cache of the last-fetched task list and profile, so a consumer
/// can render data while offline or before the first fetch completes.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;
        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        debug!(name, "Cache updated");
        Ok(())
    }

    // ===== Tasks =====

    pub fn load_tasks(&self) -> Result<Option<CachedData<Vec<Task>>>> {
        self.load("tasks")
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.save("tasks", &tasks)
    }

    // ===== Profile =====

    pub fn load_profile(&self) -> Result<Option<CachedData<User>>> {
        self.load("profile")
    }

    pub fn save_profile(&self, user: &User) -> Result<()> {
        self.save("profile", user)
    }

    /// Remove all cached data. Called when the session is invalidated so
    /// no identity-linked data outlives the sign-out.
    pub fn clear(&self) -> Result<()> {
        for name in ["tasks", "profile"] {
            let path = self.cache_path(name);
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove cache file: {}", name))?;
            }
        }
        debug!("Cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            content: "Buy milk".to_string(),
            description: String::new(),
            is_completed: false,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tasks_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("Failed to create cache");

        assert!(cache.load_tasks().expect("Load failed").is_none());

        let tasks = vec![sample_task("task-1"), sample_task("task-2")];
        cache.save_tasks(&tasks).expect("Save failed");

        let cached = cache
            .load_tasks()
            .expect("Load failed")
            .expect("Cache should be present");
        assert_eq!(cached.data.len(), 2);
        assert_eq!(cached.data[0].id, "task-1");
        assert!(!cached.is_stale(), "Freshly written cache must not be stale");
    }

    #[test]
    fn test_profile_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("Failed to create cache");

        let user = User {
            id: "user-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        cache.save_profile(&user).expect("Save failed");

        let cached = cache
            .load_profile()
            .expect("Load failed")
            .expect("Cache should be present");
        assert_eq!(cached.data.email, "ada@example.com");
    }

    #[test]
    fn test_clear_removes_everything() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let cache = CacheManager::new(dir.path().to_path_buf()).expect("Failed to create cache");

        cache.save_tasks(&[sample_task("task-1")]).expect("Save failed");
        cache.clear().expect("Clear failed");

        assert!(cache.load_tasks().expect("Load failed").is_none());
        assert!(cache.load_profile().expect("Load failed").is_none());

        // Clearing an empty cache is fine too.
        cache.clear().expect("Clear should be idempotent");
    }

    #[test]
    fn test_staleness_window() {
        let cached = CachedData {
            data: vec![sample_task("task-1")],
            cached_at: Utc::now() - chrono::Duration::minutes(CACHE_STALE_MINUTES + 1),
        };
        assert!(cached.is_stale());
    }
}
