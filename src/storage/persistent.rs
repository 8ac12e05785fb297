// src/storage/persistent.rs

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Serialize, Deserialize};

use crate::core::class::Class;
use crate::core::entity::Entity;
use crate::core::errors::{Result, StoreError};
use crate::core::store::Store;
use crate::core::value::Value;
use super::memory::MemoryStore;

/// Timestamp format of the snapshot
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
    const READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, READ_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One entity as written to the snapshot
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "__class__")]
    class: String,
    id: String,
    #[serde(with = "timestamp")]
    created_at: chrono::NaiveDateTime,
    #[serde(with = "timestamp")]
    updated_at: chrono::NaiveDateTime,
    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl From<&Entity> for Record {
    fn from(entity: &Entity) -> Self {
        Record {
            class: entity.class().name().to_string(),
            id: entity.id().to_string(),
            created_at: entity.created_at(),
            updated_at: entity.updated_at(),
            attributes: entity.attributes().clone(),
        }
    }
}

impl TryFrom<Record> for Entity {
    type Error = StoreError;

    fn try_from(record: Record) -> Result<Self> {
        let class: Class = record.class
            .parse()
            .map_err(|_| StoreError::UnknownClass(record.class.clone()))?;

        Ok(Entity::from_parts(
            class,
            record.id,
            record.created_at,
            record.updated_at,
            record.attributes,
        ))
    }
}

/// An object store that keeps a JSON snapshot of its population on disk
#[derive(Debug)]
pub struct PersistentStore {
    /// Live entities
    objects: MemoryStore,
    /// Snapshot file
    path: PathBuf,
}

impl PersistentStore {
    /// Open a store backed by the snapshot at the given path, loading it if present
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let mut store = PersistentStore {
            objects: MemoryStore::new(),
            path: path.into(),
        };

        store.reload()?;
        Ok(store)
    }

    /// Path of the snapshot file, for callers that report or inspect it
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Store for PersistentStore {
    fn all(&self) -> Vec<&Entity> {
        self.objects.all()
    }

    fn register(&mut self, entity: Entity) {
        self.objects.register(entity);
    }

    fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.objects.contains(key)
    }

    fn remove(&mut self, key: &str) -> Option<Entity> {
        self.objects.remove(key)
    }

    fn count(&self) -> usize {
        self.objects.count()
    }

    fn save(&self) -> Result<()> {
        let snapshot: BTreeMap<String, Record> = self.objects
            .all()
            .into_iter()
            .map(|e| (e.key(), Record::from(e)))
            .collect();

        // Write next to the snapshot, then swap it in
        let temp = self.temp_path();
        let file = fs::File::create(&temp).map_err(|e| StoreError::io(&temp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush().map_err(|e| StoreError::io(&temp, e))?;
        drop(writer);

        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!("Saved {} objects to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        if !self.path.exists() {
            debug!("No snapshot at {}, starting empty", self.path.display());
            return Ok(());
        }

        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let snapshot: BTreeMap<String, Record> = serde_json::from_str(&text)?;

        let mut objects = MemoryStore::new();
        for record in snapshot.into_values() {
            objects.register(Entity::try_from(record)?);
        }

        debug!("Loaded {} objects from {}", objects.count(), self.path.display());
        self.objects = objects;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::open(dir.path().join("file.json")).unwrap();

        assert_eq!(store.count(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");

        let mut expected = Vec::new();
        {
            let mut store = PersistentStore::open(&path).unwrap();

            for class in Class::ALL {
                let mut entity = Entity::new(class);
                entity.set("name", "Holberton".into());
                entity.set("number_rooms", Value::Integer(4));
                entity.set("latitude", Value::Float(37.5));
                entity.set("amenity_ids", Value::List(vec!["a".into(), "b".into()]));
                expected.push(entity.clone());
                store.register(entity);
            }

            store.save().unwrap();
        }

        // Reopen the snapshot to test persistence
        let store = PersistentStore::open(&path).unwrap();
        assert_eq!(store.count(), expected.len());

        for entity in &expected {
            assert_eq!(store.get(&entity.key()), Some(entity));
        }
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");

        let mut store = PersistentStore::open(&path).unwrap();
        let city = Entity::new(Class::City);
        let key = city.key();
        store.register(city);
        store.save().unwrap();

        store.remove(&key);
        store.save().unwrap();

        let reopened = PersistentStore::open(&path).unwrap();
        assert_eq!(reopened.count(), 0);
        assert!(!dir.path().join("file.json.tmp").exists());
    }

    #[test]
    fn test_snapshot_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");

        let mut store = PersistentStore::open(&path).unwrap();
        let mut user = Entity::new(Class::User);
        user.set("email", "a@b.c".into());
        let key = user.key();
        store.register(user);
        store.save().unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = &json[key.as_str()];

        assert_eq!(record["__class__"], "User");
        assert_eq!(record["email"], "a@b.c");
        assert!(record["created_at"].as_str().unwrap().contains('T'));
        assert_eq!(record["created_at"].as_str().unwrap().len(), 26);
    }

    #[test]
    fn test_reload_accepts_whole_second_timestamps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");
        fs::write(
            &path,
            r#"{"State.1": {"__class__": "State", "id": "1",
                "created_at": "2017-09-28T21:03:54",
                "updated_at": "2017-09-28T21:03:54.052298",
                "name": "Nevada"}}"#,
        ).unwrap();

        let store = PersistentStore::open(&path).unwrap();
        let state = store.get("State.1").unwrap();

        assert_eq!(state.class(), Class::State);
        assert_eq!(state.attribute("name"), Some("Nevada".into()));
    }

    #[test]
    fn test_unknown_class_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");
        fs::write(
            &path,
            r#"{"Dragon.1": {"__class__": "Dragon", "id": "1",
                "created_at": "2017-09-28T21:03:54.052298",
                "updated_at": "2017-09-28T21:03:54.052298"}}"#,
        ).unwrap();

        let result = PersistentStore::open(&path);
        assert!(matches!(result, Err(StoreError::UnknownClass(name)) if name == "Dragon"));
    }

    #[test]
    fn test_corrupt_snapshot_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(PersistentStore::open(&path), Err(StoreError::Serialization(_))));
    }
}
