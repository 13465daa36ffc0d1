//! Subscription repository for JSON storage
//!
//! Purchase tokens are globally unique; the check and the insert happen under
//! the same write lock so two verifications of one token cannot both land.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Subscription, SubscriptionId, UserId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SubscriptionData {
    subscriptions: Vec<Subscription>,
}

/// Repository for subscription persistence
pub struct SubscriptionRepository {
    path: PathBuf,
    data: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl SubscriptionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: SubscriptionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        data.clear();
        for subscription in file_data.subscriptions {
            data.insert(subscription.id, subscription);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut subscriptions: Vec<_> = data.values().cloned().collect();
        subscriptions.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        write_json_atomic(&self.path, &SubscriptionData { subscriptions })
    }

    pub fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.get(&id).cloned())
    }

    /// `owner`'s subscriptions, newest first
    pub fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Subscription>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;

        let mut subscriptions: Vec<_> = data
            .values()
            .filter(|s| &s.owner == owner)
            .cloned()
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subscriptions)
    }

    pub fn find_by_token(&self, token: &str) -> Result<Option<Subscription>, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data
            .values()
            .find(|s| s.purchase_token.as_deref() == Some(token))
            .cloned())
    }

    /// Insert or replace a subscription
    ///
    /// Fails with a conflict when another subscription already holds the same
    /// purchase token.
    pub fn insert_unique(&self, subscription: Subscription) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(|e| lock_error("write", e))?;

        if let Some(token) = subscription.purchase_token.as_deref() {
            let taken = data
                .values()
                .any(|s| s.id != subscription.id && s.purchase_token.as_deref() == Some(token));
            if taken {
                return Err(TallyError::Conflict {
                    entity_type: "Purchase token",
                    identifier: token.to_string(),
                });
            }
        }

        data.insert(subscription.id, subscription);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(|e| lock_error("read", e))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SubscriptionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = SubscriptionRepository::new(temp_dir.path().join("subscriptions.json"));
        (temp_dir, repo)
    }

    fn verified(owner: &str, token: &str) -> Subscription {
        let mut sub = Subscription::pending(UserId::from(owner), Plan::Monthly, "pro");
        sub.activate(token, None, Utc::now(), Duration::days(30))
            .unwrap();
        sub
    }

    #[test]
    fn test_token_is_globally_unique() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert_unique(verified("alice", "tok-1")).unwrap();

        let err = repo.insert_unique(verified("bob", "tok-1")).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_pending_without_token_never_conflicts() {
        let (_temp_dir, repo) = create_test_repo();
        let owner = UserId::from("alice");
        repo.insert_unique(Subscription::pending(owner.clone(), Plan::Monthly, "pro"))
            .unwrap();
        repo.insert_unique(Subscription::pending(owner, Plan::Yearly, "pro"))
            .unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_find_by_token_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let sub = verified("alice", "tok-9");
        let id = sub.id;
        repo.insert_unique(sub).unwrap();
        repo.save().unwrap();

        let repo2 = SubscriptionRepository::new(temp_dir.path().join("subscriptions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.find_by_token("tok-9").unwrap().unwrap().id, id);
        assert!(repo2.find_by_token("tok-0").unwrap().is_none());
    }
}
