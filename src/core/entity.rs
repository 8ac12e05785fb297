//! Entity module
//!
//! An entity is an attribute bag tagged with its class, a unique
//! identifier and creation/update timestamps.

use std::collections::BTreeMap;
use std::fmt;
use chrono::{NaiveDateTime, SubsecRound, Timelike, Datelike, Utc};
use uuid::Uuid;
use super::class::{Class, CoerceError, RESERVED_ATTRIBUTES};
use super::value::{quote, Value};

/// Current time at the precision the snapshot keeps
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

/// A live domain object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    class: Class,
    id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    /// Attributes explicitly assigned to this entity
    attributes: BTreeMap<String, Value>,
}

impl Entity {
    /// Create a fresh entity of the given class with a new id
    pub fn new(class: Class) -> Self {
        let stamp = now();
        Entity {
            class,
            id: Uuid::new_v4().to_string(),
            created_at: stamp,
            updated_at: stamp,
            attributes: BTreeMap::new(),
        }
    }

    /// Rebuild an entity from previously recorded parts
    pub fn from_parts(
        class: Class,
        id: String,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
        attributes: BTreeMap<String, Value>,
    ) -> Self {
        Entity {
            class,
            id,
            created_at,
            updated_at,
            attributes,
        }
    }

    pub fn class(&self) -> Class {
        self.class
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    /// The store key `Class.id`
    pub fn key(&self) -> String {
        self.class.key(&self.id)
    }

    /// Attributes explicitly assigned to this entity
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Value of an attribute, falling back to the class default.
    /// Lets library callers read a declared attribute that was never assigned.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .get(name)
            .cloned()
            .or_else(|| self.class.declared(name).map(|a| a.default.default_value()))
    }

    /// Coerce a raw value for this entity's class without assigning it
    pub fn coerce(&self, name: &str, raw: Value) -> Result<Value, CoerceError> {
        self.class.coerce(name, raw)
    }

    /// Assign an attribute. Reserved names are ignored and `false` is returned.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if RESERVED_ATTRIBUTES.contains(&name) {
            return false;
        }

        self.attributes.insert(name.to_string(), value);
        true
    }

    /// Refresh `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = now();
    }
}

/// Format a timestamp as a datetime constructor, dropping trailing zero fields
fn datetime_repr(ts: &NaiveDateTime) -> String {
    let micros = ts.nanosecond() / 1_000;
    let mut fields = vec![
        ts.year().to_string(),
        ts.month().to_string(),
        ts.day().to_string(),
        ts.hour().to_string(),
        ts.minute().to_string(),
    ];

    if micros != 0 {
        fields.push(ts.second().to_string());
        fields.push(micros.to_string());
    } else if ts.second() != 0 {
        fields.push(ts.second().to_string());
    }

    format!("datetime.datetime({})", fields.join(", "))
}

/// `[Class] (id) {'id': ..., 'created_at': ..., 'updated_at': ..., ...}`
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{'id': {}, 'created_at': {}, 'updated_at': {}",
            self.class,
            self.id,
            quote(&self.id),
            datetime_repr(&self.created_at),
            datetime_repr(&self.updated_at),
        )?;

        for (name, value) in &self.attributes {
            write!(f, ", {}: {}", quote(name), value)?;
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed(micros: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 9, 28)
            .unwrap()
            .and_hms_micro_opt(21, 5, 54, micros)
            .unwrap()
    }

    #[test]
    fn test_new_entities_are_distinct() {
        let a = Entity::new(Class::User);
        let b = Entity::new(Class::User);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.created_at(), a.updated_at());
        assert_eq!(a.key(), format!("User.{}", a.id()));
    }

    #[test]
    fn test_attribute_falls_back_to_default() {
        let mut place = Entity::new(Class::Place);

        assert_eq!(place.attribute("number_rooms"), Some(Value::Integer(0)));
        assert_eq!(place.attribute("color"), None);
        assert!(place.attributes().is_empty());

        assert!(place.set("number_rooms", Value::Integer(3)));
        assert_eq!(place.attribute("number_rooms"), Some(Value::Integer(3)));
    }

    #[test]
    fn test_reserved_attributes_are_ignored() {
        let mut user = Entity::new(Class::User);
        let id = user.id().to_string();

        assert!(!user.set("id", "other".into()));
        assert!(!user.set("created_at", "yesterday".into()));
        assert_eq!(user.id(), id);
        assert!(user.attributes().is_empty());
    }

    #[test]
    fn test_touch_moves_updated_at() {
        let mut user = Entity::from_parts(Class::User, "1".to_string(), fixed(0), fixed(0), BTreeMap::new());
        user.touch();

        assert_eq!(user.created_at(), fixed(0));
        assert!(user.updated_at() > fixed(0));
    }

    #[test]
    fn test_display() {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), Value::from("Bob"));
        attributes.insert("age".to_string(), Value::Integer(5));
        let user = Entity::from_parts(Class::User, "42".to_string(), fixed(119427), fixed(0), attributes);

        assert_eq!(
            user.to_string(),
            "[User] (42) {'id': '42', \
             'created_at': datetime.datetime(2017, 9, 28, 21, 5, 54, 119427), \
             'updated_at': datetime.datetime(2017, 9, 28, 21, 5, 54), \
             'age': 5, 'name': 'Bob'}"
        );
    }
}
