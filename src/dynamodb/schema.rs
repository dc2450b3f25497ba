use aws_sdk_dynamodb::types::ScalarAttributeType;

/// Represents the type of a key attribute in a DynamoDB table.
///
/// DynamoDB only allows scalar types for key attributes, and this crate only ever
/// declares strings and numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Represents a string field (`S`).
    String,
    /// Represents a number field (`N`).
    Number,
}

impl FieldType {
    /// The scalar attribute type used in attribute definitions.
    pub fn scalar_type(self) -> ScalarAttributeType {
        match self {
            FieldType::String => ScalarAttributeType::S,
            FieldType::Number => ScalarAttributeType::N,
        }
    }
}

/// One attribute of a table's primary key.
///
/// # Primary Key
///
/// Every DynamoDB table must have a primary key, which can be:
/// - **Simple Primary Key**: Consists of just a partition key.
/// - **Composite Primary Key**: Consists of a partition key and a sort key.
///
/// Both halves are declared the same way: an attribute name plus its scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    name: String,
    field_type: FieldType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// A string-typed key attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// A number-typed key attribute.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}
