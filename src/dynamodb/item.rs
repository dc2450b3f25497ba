use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

/// Represents a DynamoDB item with various attribute types.
///
/// In DynamoDB, an item is a collection of attributes, each with a name and a value.
/// Items are similar to rows or records in other database systems.
///
/// # Primary Key
///
/// - Every item in a table is uniquely identified by its primary key.
/// - The primary key can be simple (partition key only) or composite (partition key and sort key).
///
/// # Item Size Limit
///
/// - The maximum item size in DynamoDB is 400 KB, including both attribute names and values.
///
/// # Example
///
/// ```
/// use gamer_profile_store::dynamodb::Item;
///
/// let item = Item::new()
///     .set_string("id", "12345")
///     .set_string("name", "johndoe")
///     .set_number("createdAt", 1_700_000_000);
///
/// assert_eq!(item.get_number("createdAt"), Some(1_700_000_000));
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) attributes: HashMap<String, AttributeValue>,
}

impl Item {
    /// Creates a new empty `Item`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes any serde value into an item.
    pub fn from_value<T: Serialize>(value: &T) -> Result<Self, serde_dynamo::Error> {
        Ok(Self {
            attributes: serde_dynamo::to_item(value)?,
        })
    }

    /// Deserializes the item into a serde value.
    pub fn to_value<T: DeserializeOwned>(&self) -> Result<T, serde_dynamo::Error> {
        serde_dynamo::from_item(self.attributes.clone())
    }

    /// Sets a string attribute.
    ///
    /// In DynamoDB, string attributes are used for text data.
    pub fn set_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::S(value.into()));
        self
    }

    /// Sets a number attribute.
    ///
    /// DynamoDB sends numbers over the wire as strings; this only ever writes integers.
    pub fn set_number(mut self, key: impl Into<String>, value: i64) -> Self {
        self.attributes
            .insert(key.into(), AttributeValue::N(value.to_string()));
        self
    }

    /// Gets the value of an attribute as a string.
    ///
    /// Returns `None` if the attribute doesn't exist or is not a string.
    pub fn get_string(&self, key: &str) -> Option<&String> {
        self.attributes.get(key).and_then(|av| av.as_s().ok())
    }

    /// Gets the value of an attribute as an integer.
    ///
    /// Returns `None` if the attribute doesn't exist, is not a number, or can't be parsed as i64.
    pub fn get_number(&self, key: &str) -> Option<i64> {
        self.attributes
            .get(key)
            .and_then(|av| av.as_n().ok())
            .and_then(|n| n.parse().ok())
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub(crate) fn into_attributes(self) -> HashMap<String, AttributeValue> {
        self.attributes
    }
}

impl From<HashMap<String, AttributeValue>> for Item {
    fn from(attributes: HashMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Score {
        player: String,
        points: i64,
    }

    #[test]
    fn test_item_operations() {
        let item = Item::new()
            .set_string("key1", "value1")
            .set_number("key2", 42);

        assert_eq!(item.get_string("key1"), Some(&"value1".to_string()));
        assert_eq!(item.get_number("key2"), Some(42));
        assert_eq!(item.get_string("key2"), None);
        assert_eq!(item.get_string("non_existent"), None);
        assert_eq!(item.get_number("non_existent"), None);
    }

    #[test]
    fn serde_values_become_typed_attributes() {
        let score = Score {
            player: "ada".to_string(),
            points: 7,
        };

        let item = Item::from_value(&score).unwrap();
        assert_eq!(item.get_string("player"), Some(&"ada".to_string()));
        assert_eq!(item.get_number("points"), Some(7));
        assert_eq!(item.to_value::<Score>().unwrap(), score);
    }

    #[test]
    fn mistyped_attribute_fails_to_deserialize() {
        let item = Item::new()
            .set_string("player", "ada")
            .set_string("points", "seven");

        assert!(item.to_value::<Score>().is_err());
    }
}
