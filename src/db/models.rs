use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A row of the `coffees` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coffee {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `pugs` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pug {
    pub id: i64,
    pub name: String,
    pub age: Option<i64>,
    pub favorite_coffee_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCoffee {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl NewCoffee {
    pub fn new<I, S>(name: impl Into<String>, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPug {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub favorite_coffee_id: Option<i64>,
}

impl NewPug {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            favorite_coffee_id: None,
        }
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }
}

/// Partial update of a pug. A missing field keeps the stored value; an explicit
/// `null` for `age` or `favoriteCoffeeId` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PugUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub age: Option<Option<i64>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub favorite_coffee_id: Option<Option<i64>>,
}

impl PugUpdate {
    pub fn favorite_coffee(coffee_id: Option<i64>) -> Self {
        Self {
            favorite_coffee_id: Some(coffee_id),
            ..Self::default()
        }
    }
}

// `Option<Option<T>>` only distinguishes "absent" from "null" when the field
// deserializer wraps whatever it sees in `Some`.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cody() -> Pug {
        let now = Utc::now();
        Pug {
            id: 1,
            name: "Cody".to_string(),
            age: Some(7),
            favorite_coffee_id: Some(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn absent_fields_are_left_unset() {
        let update: PugUpdate = serde_json::from_str(r#"{"favoriteCoffeeId": 2}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.age, None);
        assert_eq!(update.favorite_coffee_id, Some(Some(2)));
    }

    #[test]
    fn explicit_null_is_distinct_from_absent() {
        let update: PugUpdate = serde_json::from_str(r#"{"favoriteCoffeeId": null}"#).unwrap();
        assert_eq!(update.age, None);
        assert_eq!(update.favorite_coffee_id, Some(None));
    }

    #[test]
    fn pug_serializes_camel_case() {
        let value = serde_json::to_value(cody()).unwrap();
        assert_eq!(value["favoriteCoffeeId"], 1);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn new_coffee_defaults_to_no_ingredients() {
        let coffee: NewCoffee = serde_json::from_str(r#"{"name": "Frappe"}"#).unwrap();
        assert_eq!(coffee.name, "Frappe");
        assert!(coffee.ingredients.is_empty());
    }
}
