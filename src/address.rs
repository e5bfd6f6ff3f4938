use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const US: &str = "US";

/// A standardized, deliverable US address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}, {}", self.street, self.city, self.state, self.zip, self.country)
    }
}

/// Structured address input, every part optional.
///
/// `street` may span several lines, e.g. "1 Main St\nSte 200".
/// `zip` is kept as a string so leading zeros survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip: Option<String>,
}

impl AddressFields {
    /// Read the known keys of a record.
    ///
    /// Numbers and booleans are taken as their text. Nested values are dropped,
    /// except under `country`, where anything present must still fail the US check.
    fn from_map(map: &Map<String, Value>) -> Self {
        let part = |key: &str| map.get(key).and_then(scalar_text);

        Self {
            street: part("street"),
            city: part("city"),
            state: part("state"),
            country: map.get("country")
                .filter(|v| !v.is_null())
                .map(|v| scalar_text(v).unwrap_or_else(|| v.to_string())),
            zip: part("zip"),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressInput {
    /// free-form text, treated as the street line
    Line(String),
    Fields(AddressFields),
}

/// Why an input was turned down before any lookup was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// neither a string nor an object
    Shape,
    /// a country other than "US"
    NotUs,
}

impl AddressInput {
    pub fn from_value(value: &Value) -> Result<Self, InputError> {
        match value {
            Value::String(line) => Ok(Self::Line(line.clone())),
            Value::Object(map) => Ok(Self::Fields(AddressFields::from_map(map))),
            _ => Err(InputError::Shape),
        }
    }

    /// Only US addresses are accepted. The comparison is exact.
    pub fn check_country(&self) -> Result<(), InputError> {
        match self {
            Self::Fields(AddressFields { country: Some(country), .. }) if country != US => {
                Err(InputError::NotUs)
            }
            _ => Ok(()),
        }
    }

    pub fn into_fields(self) -> AddressFields {
        match self {
            Self::Line(line) => AddressFields {
                street: Some(line),
                ..Default::default()
            },
            Self::Fields(fields) => fields,
        }
    }
}

impl From<&str> for AddressInput {
    fn from(line: &str) -> Self {
        Self::Line(line.to_string())
    }
}

impl From<AddressFields> for AddressInput {
    fn from(fields: AddressFields) -> Self {
        Self::Fields(fields)
    }
}

impl From<Address> for AddressInput {
    fn from(address: Address) -> Self {
        Self::Fields(AddressFields {
            street: Some(address.street),
            city: Some(address.city),
            state: Some(address.state),
            country: Some(address.country),
            zip: Some(address.zip),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_is_a_street_line() {
        let input = AddressInput::from_value(&json!("1 Main St")).unwrap();
        assert_eq!(input, AddressInput::from("1 Main St"));
        assert_eq!(input.into_fields().street.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn object_keeps_leading_zeros_and_ignores_unknown_keys() {
        let input = AddressInput::from_value(&json!({
            "street": "1 Elm St",
            "zip": "02139",
            "city": null,
            "note": 42,
        }))
        .unwrap();
        let fields = input.into_fields();
        assert_eq!(fields.zip.as_deref(), Some("02139"));
        assert_eq!(fields.city, None);
    }

    #[test]
    fn non_string_parts_of_a_record_are_read_as_text() {
        let fields = AddressInput::from_value(&json!({
            "street": "1 Main St",
            "zip": 94158,
            "state": ["CA"],
        }))
        .unwrap()
        .into_fields();
        assert_eq!(fields.zip.as_deref(), Some("94158"));
        assert_eq!(fields.state, None);
    }

    #[test]
    fn only_strings_and_objects_have_the_right_shape() {
        for value in [json!(12), json!(["1 Main St"]), json!(null), json!(true)] {
            assert_eq!(AddressInput::from_value(&value), Err(InputError::Shape));
        }
        assert!(AddressInput::from_value(&json!({})).is_ok());
    }

    #[test]
    fn country_must_be_exactly_us() {
        let check = |value: Value| AddressInput::from_value(&value).unwrap().check_country();
        assert_eq!(check(json!({"country": "US"})), Ok(()));
        assert_eq!(check(json!({"street": "1 Main St"})), Ok(()));
        assert_eq!(check(json!({"country": null})), Ok(()));
        assert_eq!(check(json!("1 Main St, Toronto, Canada")), Ok(()));
        assert_eq!(check(json!({"country": "CA"})), Err(InputError::NotUs));
        assert_eq!(check(json!({"country": "us"})), Err(InputError::NotUs));
        assert_eq!(check(json!({"country": "United States"})), Err(InputError::NotUs));
        assert_eq!(check(json!({"country": 1})), Err(InputError::NotUs));
        assert_eq!(check(json!({"country": ["US"]})), Err(InputError::NotUs));
    }

    #[test]
    fn address_value_matches_its_serde_form() {
        let address = Address {
            street: "1 Main St".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip: "94158".to_string(),
            country: "US".to_string(),
        };
        let value = address.to_value().unwrap();
        assert_eq!(
            value,
            json!({"street": "1 Main St", "city": "San Francisco", "state": "CA", "zip": "94158", "country": "US"})
        );
        assert_eq!(serde_json::from_value::<Address>(value).unwrap(), address);
        assert_eq!(address.to_string(), "1 Main St, San Francisco, CA 94158, US");
    }
}
