//! Domain classes
//!
//! Every entity belongs to one of a fixed set of classes. A class is
//! only distinguished by its declared attributes and their defaults; the
//! type of a default decides how updates to that attribute are coerced.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use super::value::Value;

/// Names that belong to the entity itself and cannot be assigned
pub const RESERVED_ATTRIBUTES: [&str; 4] = ["id", "created_at", "updated_at", "__class__"];

/// Error returned when a class name is not one of the known classes
#[derive(Error, Debug, PartialEq)]
#[error("Unknown class: {0}")]
pub struct UnknownClass(pub String);

/// Error returned when a value cannot be converted to a declared type
#[derive(Error, Debug, PartialEq)]
#[error("cannot convert {value} to {target}")]
pub struct CoerceError {
    pub value: String,
    pub target: &'static str,
}

/// The declared default of an attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declared {
    Str(&'static str),
    Int(i64),
    Float(f64),
    /// Empty list default; values are stored as given
    List,
}

impl Declared {
    /// The default as a value
    pub fn default_value(&self) -> Value {
        match self {
            Declared::Str(s) => Value::from(*s),
            Declared::Int(i) => Value::Integer(*i),
            Declared::Float(f) => Value::Float(*f),
            Declared::List => Value::List(Vec::new()),
        }
    }

    /// Convert a raw value to the declared type
    pub fn coerce(&self, raw: Value) -> Result<Value, CoerceError> {
        match self {
            Declared::Str(_) => Ok(Value::String(raw.to_text())),
            Declared::Int(_) => to_integer(raw).map(Value::Integer),
            Declared::Float(_) => to_float(raw).map(Value::Float),
            Declared::List => Ok(raw),
        }
    }
}

fn to_integer(raw: Value) -> Result<i64, CoerceError> {
    let fail = |value: &Value| CoerceError { value: value.to_string(), target: "integer" };

    match &raw {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Value::String(s) => s.trim().replace('_', "").parse::<i64>().map_err(|_| fail(&raw)),
        _ => Err(fail(&raw)),
    }
}

fn to_float(raw: Value) -> Result<f64, CoerceError> {
    let fail = |value: &Value| CoerceError { value: value.to_string(), target: "float" };

    // Non-finite floats have no JSON form and would not survive the snapshot
    let parsed = match &raw {
        Value::Integer(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| fail(&raw)),
        Value::List(_) => Err(fail(&raw)),
    }?;

    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(fail(&raw))
    }
}

/// A declared attribute of a class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribute {
    pub name: &'static str,
    pub default: Declared,
}

const fn attr(name: &'static str, default: Declared) -> Attribute {
    Attribute { name, default }
}

const USER: &[Attribute] = &[
    attr("email", Declared::Str("")),
    attr("password", Declared::Str("")),
    attr("first_name", Declared::Str("")),
    attr("last_name", Declared::Str("")),
];

const STATE: &[Attribute] = &[attr("name", Declared::Str(""))];

const CITY: &[Attribute] = &[
    attr("state_id", Declared::Str("")),
    attr("name", Declared::Str("")),
];

const AMENITY: &[Attribute] = &[attr("name", Declared::Str(""))];

const PLACE: &[Attribute] = &[
    attr("city_id", Declared::Str("")),
    attr("user_id", Declared::Str("")),
    attr("name", Declared::Str("")),
    attr("description", Declared::Str("")),
    attr("number_rooms", Declared::Int(0)),
    attr("number_bathrooms", Declared::Int(0)),
    attr("max_guest", Declared::Int(0)),
    attr("price_by_night", Declared::Int(0)),
    attr("latitude", Declared::Float(0.0)),
    attr("longitude", Declared::Float(0.0)),
    attr("amenity_ids", Declared::List),
];

const REVIEW: &[Attribute] = &[
    attr("place_id", Declared::Str("")),
    attr("user_id", Declared::Str("")),
    attr("text", Declared::Str("")),
];

/// The known entity classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Class {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Class {
    /// Every known class
    pub const ALL: [Class; 7] = [
        Class::BaseModel,
        Class::User,
        Class::State,
        Class::City,
        Class::Amenity,
        Class::Place,
        Class::Review,
    ];

    /// The class name as used in keys and commands
    pub fn name(&self) -> &'static str {
        match self {
            Class::BaseModel => "BaseModel",
            Class::User => "User",
            Class::State => "State",
            Class::City => "City",
            Class::Amenity => "Amenity",
            Class::Place => "Place",
            Class::Review => "Review",
        }
    }

    /// The declared attributes of the class
    pub fn attributes(&self) -> &'static [Attribute] {
        match self {
            Class::BaseModel => &[],
            Class::User => USER,
            Class::State => STATE,
            Class::City => CITY,
            Class::Amenity => AMENITY,
            Class::Place => PLACE,
            Class::Review => REVIEW,
        }
    }

    /// Look up a declared attribute by name
    pub fn declared(&self, name: &str) -> Option<&'static Attribute> {
        self.attributes().iter().find(|a| a.name == name)
    }

    /// Build the store key for an id of this class
    pub fn key(&self, id: &str) -> String {
        format!("{}.{}", self.name(), id)
    }

    /// Coerce a value for the named attribute. Declared attributes are
    /// converted to their declared type, others keep the raw value.
    pub fn coerce(&self, name: &str, raw: Value) -> Result<Value, CoerceError> {
        match self.declared(name) {
            Some(attribute) => attribute.default.coerce(raw),
            None => Ok(raw),
        }
    }
}

impl FromStr for Class {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Class::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownClass(s.to_string()))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_round_trip() {
        for class in Class::ALL {
            assert_eq!(class.name().parse::<Class>(), Ok(class));
        }

        assert_eq!("Dragon".parse::<Class>(), Err(UnknownClass("Dragon".to_string())));
        assert!("user".parse::<Class>().is_err());
    }

    #[test]
    fn test_key() {
        assert_eq!(Class::City.key("123"), "City.123");
    }

    #[test]
    fn test_declared_attributes() {
        assert_eq!(Class::Place.declared("number_rooms").unwrap().default, Declared::Int(0));
        assert_eq!(Class::Place.declared("latitude").unwrap().default, Declared::Float(0.0));
        assert!(Class::BaseModel.declared("name").is_none());
        assert!(Class::User.declared("name").is_none());
    }

    #[test]
    fn test_coerce_declared_integer() {
        assert_eq!(Class::Place.coerce("max_guest", "30".into()), Ok(Value::Integer(30)));
        assert_eq!(Class::Place.coerce("max_guest", " -4 ".into()), Ok(Value::Integer(-4)));
        assert_eq!(Class::Place.coerce("max_guest", Value::Float(7.9)), Ok(Value::Integer(7)));
        assert_eq!(Class::Place.coerce("max_guest", Value::Float(-7.9)), Ok(Value::Integer(-7)));
        assert!(Class::Place.coerce("max_guest", "many".into()).is_err());
        assert!(Class::Place.coerce("max_guest", "5.5".into()).is_err());
    }

    #[test]
    fn test_coerce_declared_float_and_string() {
        assert_eq!(Class::Place.coerce("latitude", "37.77".into()), Ok(Value::Float(37.77)));
        assert_eq!(Class::Place.coerce("latitude", Value::Integer(2)), Ok(Value::Float(2.0)));
        assert_eq!(Class::User.coerce("email", Value::Integer(5)), Ok("5".into()));
        assert_eq!(Class::User.coerce("email", Value::Float(5.0)), Ok("5.0".into()));
    }

    #[test]
    fn test_coerce_rejects_non_finite_float() {
        for text in ["nan", "inf", "-inf", "infinity", "NaN", "1e999"] {
            assert!(Class::Place.coerce("latitude", text.into()).is_err(), "{text} should be rejected");
        }
        assert!(Class::Place.coerce("longitude", Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_coerce_undeclared_keeps_raw() {
        assert_eq!(Class::User.coerce("age", "30".into()), Ok("30".into()));
        assert_eq!(Class::User.coerce("age", Value::Integer(30)), Ok(Value::Integer(30)));

        let ids = Value::List(vec!["a".into()]);
        assert_eq!(Class::Place.coerce("amenity_ids", ids.clone()), Ok(ids));
    }
}
