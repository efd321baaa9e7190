// Catalog store module
// Activity records, the ordered catalog, and the lock-guarded store handed to handlers

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::CatalogError;

/// A single extracurricular activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    /// Advisory only, sign-ups are never refused for capacity
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    pub fn new(description: &str, schedule: &str, max_participants: u32, participants: &[&str]) -> Self {
        Self {
            description: description.to_string(),
            schedule: schedule.to_string(),
            max_participants,
            participants: participants.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// Activities keyed by name, kept in insertion order
///
/// Serializes as a JSON/TOML map so clients see `{ "Chess Club": {...}, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, Activity)>,
}

impl Catalog {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an activity, replacing (in place) any existing one with the same name
    pub fn insert(&mut self, name: impl Into<String>, activity: Activity) -> Option<Activity> {
        let name = name.into();
        if let Some(existing) = self.get_mut(&name) {
            return Some(std::mem::replace(existing, activity));
        }
        self.entries.push((name, activity));
        None
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, activity)| activity)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, activity)| activity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Activity)> {
        self.entries.iter_mut().map(|(n, a)| (n.as_str(), a))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl FromIterator<(String, Activity)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (name, activity) in iter {
            catalog.insert(name, activity);
        }
        catalog
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((name, activity)) = access.next_entry::<String, Activity>()? {
                    catalog.insert(name, activity);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Shared handle to the catalog store
pub type SharedCatalogStore = Arc<CatalogStore>;

/// Owner of the live catalog
///
/// Every check-then-mutate step runs under one write lock, so concurrent
/// sign-ups of the same email cannot both pass the duplicate check.
pub struct CatalogStore {
    catalog: RwLock<Catalog>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
        }
    }

    pub fn shared(catalog: Catalog) -> SharedCatalogStore {
        Arc::new(Self::new(catalog))
    }

    /// Snapshot of the full catalog
    pub async fn list_activities(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    pub async fn activity_count(&self) -> usize {
        self.catalog.read().await.len()
    }

    /// Register `email` for `activity_name`
    ///
    /// Capacity is not checked.
    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<String, CatalogError> {
        let mut catalog = self.catalog.write().await;
        let activity = catalog
            .get_mut(activity_name)
            .ok_or(CatalogError::ActivityNotFound)?;

        if activity.has_participant(email) {
            return Err(CatalogError::AlreadySignedUp);
        }

        activity.participants.push(email.to_string());
        Ok(format!("Signed up {email} for {activity_name}"))
    }

    /// Unregister `email` from `activity_name`
    pub async fn remove_participant(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<String, CatalogError> {
        let mut catalog = self.catalog.write().await;
        let activity = catalog
            .get_mut(activity_name)
            .ok_or(CatalogError::ActivityNotFound)?;

        let position = activity
            .participants
            .iter()
            .position(|p| p == email)
            .ok_or(CatalogError::ParticipantNotFound)?;

        activity.participants.remove(position);
        Ok(format!("Removed {email} from {activity_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert(
            "Chess Club",
            Activity::new("Chess", "Fridays", 2, &["michael@mergington.edu"]),
        );
        catalog.insert("Art Club", Activity::new("Art", "Wednesdays", 16, &[]));
        catalog
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut catalog = sample_catalog();
        let old = catalog.insert("Chess Club", Activity::new("Blitz", "Mondays", 4, &[]));
        assert_eq!(old.map(|a| a.description), Some("Chess".to_string()));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Chess Club", "Art Club"]);
        assert_eq!(catalog.get("Chess Club").map(|a| a.schedule.as_str()), Some("Mondays"));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let json = serde_json::to_string(&sample_catalog()).unwrap();
        let chess = json.find("Chess Club").unwrap();
        let art = json.find("Art Club").unwrap();
        assert!(chess < art);
        assert!(json.contains(r#""max_participants":2"#));
        assert!(json.contains(r#""participants":["michael@mergington.edu"]"#));
    }

    #[test]
    fn test_deserialize_preserves_order() {
        let json = r#"{
            "Zumba": {"description": "Dance", "schedule": "Mon", "max_participants": 10},
            "Archery": {"description": "Bows", "schedule": "Tue", "max_participants": 5, "participants": ["a@b.c"]}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Zumba", "Archery"]);
        assert!(catalog.get("Zumba").unwrap().participants.is_empty());
        assert!(catalog.get("Archery").unwrap().has_participant("a@b.c"));
    }

    #[tokio::test]
    async fn test_signup_appends_in_order() {
        let store = CatalogStore::new(sample_catalog());
        let message = store.signup("Chess Club", "new@example.com").await.unwrap();
        assert_eq!(message, "Signed up new@example.com for Chess Club");

        let snapshot = store.list_activities().await;
        assert_eq!(
            snapshot.get("Chess Club").unwrap().participants,
            vec!["michael@mergington.edu", "new@example.com"]
        );
    }

    #[tokio::test]
    async fn test_signup_ignores_capacity() {
        let store = CatalogStore::new(sample_catalog());
        store.signup("Chess Club", "one@example.com").await.unwrap();
        store.signup("Chess Club", "two@example.com").await.unwrap();

        let snapshot = store.list_activities().await;
        let chess = snapshot.get("Chess Club").unwrap();
        assert_eq!(chess.participants.len(), 3);
        assert_eq!(chess.max_participants, 2);
    }

    #[tokio::test]
    async fn test_signup_errors() {
        let store = CatalogStore::new(sample_catalog());
        assert_eq!(
            store.signup("Knitting", "x@example.com").await,
            Err(CatalogError::ActivityNotFound)
        );
        assert_eq!(
            store.signup("Chess Club", "michael@mergington.edu").await,
            Err(CatalogError::AlreadySignedUp)
        );
    }

    #[tokio::test]
    async fn test_remove_participant() {
        let store = CatalogStore::new(sample_catalog());
        let message = store
            .remove_participant("Chess Club", "michael@mergington.edu")
            .await
            .unwrap();
        assert_eq!(message, "Removed michael@mergington.edu from Chess Club");
        assert!(store.list_activities().await.get("Chess Club").unwrap().participants.is_empty());

        assert_eq!(
            store.remove_participant("Chess Club", "michael@mergington.edu").await,
            Err(CatalogError::ParticipantNotFound)
        );
        assert_eq!(
            store.remove_participant("Knitting", "michael@mergington.edu").await,
            Err(CatalogError::ActivityNotFound)
        );
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = CatalogStore::new(sample_catalog());
        let before = store.list_activities().await;
        store.signup("Art Club", "late@example.com").await.unwrap();
        assert!(before.get("Art Club").unwrap().participants.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signup_succeeds_once() {
        let store = CatalogStore::shared(sample_catalog());
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                store.signup("Art Club", "race@example.com").await
            }));
        }

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        let snapshot = store.list_activities().await;
        assert_eq!(snapshot.get("Art Club").unwrap().participants, vec!["race@example.com"]);
    }
}
