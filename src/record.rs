use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use us_address_validate::{Address, FailureReason};

/// One row of the batch input file. Every column is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputRow {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl InputRow {
    /// the row as a structured address value, blank columns left out
    pub fn to_value(&self) -> Value {
        let columns = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("country", &self.country),
        ];
        let map = columns.into_iter()
            .filter_map(|(key, value)| {
                value.as_ref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (key.to_string(), Value::String(v.clone())))
            })
            .collect::<Map<_, _>>();
        Value::Object(map)
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Valid,
    Invalid,
    /// the service could not be reached for this row
    Error,
}

/// A row of the result file
#[derive(Debug, Serialize)]
pub struct Record {
    input_street: String,
    input_city: String,
    input_state: String,
    input_zip: String,
    input_country: String,
    pub status: Status,
    street: String,
    city: String,
    state: String,
    zip: String,
    country: String,
    reason: String,
    /// suggested addresses, separated by "; "
    suggestions: String,
}

impl Record {
    fn from_input(row: InputRow, status: Status) -> Self {
        Self {
            input_street: row.street.unwrap_or_default(),
            input_city: row.city.unwrap_or_default(),
            input_state: row.state.unwrap_or_default(),
            input_zip: row.zip.unwrap_or_default(),
            input_country: row.country.unwrap_or_default(),
            status,
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: String::new(),
            reason: String::new(),
            suggestions: String::new(),
        }
    }

    pub fn valid(row: InputRow, address: Address) -> Self {
        Self {
            street: address.street,
            city: address.city,
            state: address.state,
            zip: address.zip,
            country: address.country,
            ..Self::from_input(row, Status::Valid)
        }
    }

    pub fn invalid(row: InputRow, reason: FailureReason) -> Self {
        Self {
            suggestions: reason.suggestions().iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            reason: reason.message,
            ..Self::from_input(row, Status::Invalid)
        }
    }

    pub fn failed(row: InputRow, error: String) -> Self {
        Self {
            reason: error,
            ..Self::from_input(row, Status::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read(data: &str) -> Vec<InputRow> {
        csv::Reader::from_reader(data.as_bytes())
            .deserialize()
            .collect::<Result<Vec<InputRow>, _>>()
            .unwrap()
    }

    #[test]
    fn blank_and_missing_columns_are_left_out() {
        let rows = read("street,zip,country\n1 Elm St,02139,\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].to_value(), json!({"street": "1 Elm St", "zip": "02139"}));
    }

    #[test]
    fn records_write_one_line_each() {
        let row = InputRow {
            street: Some("1 main st".to_string()),
            ..Default::default()
        };
        let address = Address {
            street: "1 Main St".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zip: "94158".to_string(),
            country: "US".to_string(),
        };
        let reason = FailureReason {
            message: "was not a deliverable address. suggestions:".to_string(),
            suggestions: Some(vec![address.clone(), Address { street: "1 Main St Ste 2".to_string(), ..address.clone() }]),
        };

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.serialize(Record::valid(row.clone(), address)).unwrap();
        wtr.serialize(Record::invalid(row.clone(), reason)).unwrap();
        wtr.serialize(Record::failed(row, "smarty request failed: timed out".to_string())).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines = out.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("input_street,input_city"));
        assert_eq!(lines[1], "1 main st,,,,,valid,1 Main St,San Francisco,CA,94158,US,,");
        assert_eq!(
            lines[2],
            "1 main st,,,,,invalid,,,,,,was not a deliverable address. suggestions:,\"1 Main St, San Francisco, CA 94158, US; 1 Main St Ste 2, San Francisco, CA 94158, US\""
        );
        assert_eq!(lines[3], "1 main st,,,,,error,,,,,,smarty request failed: timed out,");
    }
}
