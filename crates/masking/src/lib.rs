// Rust guideline compliant 2026-10-12

//! Masking of personally identifiable fields in tabular records.
//!
//! A record is a JSON object. [`mask_records`] returns masked copies of a
//! list of records; the strategy for each listed field is chosen from its
//! name by [`MaskKind::for_field`]. Error messages never echo the value
//! being masked.

use serde_json::Value;

/// One row of tabular data.
pub type Record = serde_json::Map<String, Value>;

const MASK: char = '*';

// ---------------------------------------------------------------------------
// MaskingError
// ---------------------------------------------------------------------------

/// Errors that can occur while masking.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskingError {
    /// The value of an `email` field is not `local@name.ext`.
    #[error("malformed email: {reason}")]
    MalformedEmail {
        /// What is wrong with the shape.
        reason: &'static str,
    },
    /// A field masked by a text strategy holds a number, bool, array or object.
    #[error("field `{field}` is not text")]
    NotText {
        /// Name of the field.
        field: String,
    },
    /// Masking failed inside a record.
    #[error("record {position}: {source}")]
    Record {
        /// Zero-based position of the record.
        position: usize,
        /// The underlying failure.
        source: Box<MaskingError>,
    },
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Masking strategy, selected by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// `name`: first letter of each word kept.
    Name,
    /// `email`: first letter of the local part and of the domain name kept.
    Email,
    /// `phone`: last four digits kept.
    Phone,
    /// Anything else: every character masked.
    Generic,
}

impl MaskKind {
    /// Strategy for a field called `field`.
    #[must_use]
    pub fn for_field(field: &str) -> Self {
        match field {
            "name" => Self::Name,
            "email" => Self::Email,
            "phone" => Self::Phone,
            _ => Self::Generic,
        }
    }
}

fn keep_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => std::iter::once(first).chain(chars.map(|_| MASK)).collect(),
        None => String::new(),
    }
}

/// `"John Doe"` becomes `"J*** D**"`. Whitespace runs collapse to one space.
#[must_use]
pub fn mask_name(name: &str) -> String {
    name.split_whitespace().map(keep_first).collect::<Vec<_>>().join(" ")
}

/// `"john.doe@example.com"` becomes `"j*******@e******.com"`.
///
/// Everything after the first `.` of the domain is kept as the extension, so
/// `"a@mail.co.uk"` becomes `"a@m***.co.uk"`.
///
/// # Errors
///
/// Returns [`MaskingError::MalformedEmail`] when there is not exactly one
/// `@`, the local part is empty, or the domain has no `.` or an empty name.
pub fn mask_email(email: &str) -> Result<String, MaskingError> {
    let (local, domain) = email
        .split_once('@')
        .ok_or(MaskingError::MalformedEmail { reason: "missing `@`" })?;
    if domain.contains('@') {
        return Err(MaskingError::MalformedEmail { reason: "more than one `@`" });
    }
    if local.is_empty() {
        return Err(MaskingError::MalformedEmail { reason: "empty local part" });
    }
    let (domain_name, extension) = domain
        .split_once('.')
        .ok_or(MaskingError::MalformedEmail { reason: "domain has no extension" })?;
    if domain_name.is_empty() {
        return Err(MaskingError::MalformedEmail { reason: "empty domain name" });
    }
    Ok(format!("{}@{}.{extension}", keep_first(local), keep_first(domain_name)))
}

/// Keep the digits only, then mask all but the last four:
/// `"(123) 456-7890"` becomes `"******7890"`.
///
/// Four digits or fewer come back unmasked.
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    let hidden = digits.len().saturating_sub(4);
    std::iter::repeat_n(MASK, hidden).chain(digits[hidden..].iter().copied()).collect()
}

/// One `*` per character of `text`.
#[must_use]
pub fn mask_generic(text: &str) -> String {
    std::iter::repeat_n(MASK, text.chars().count()).collect()
}

/// Mask a single value of field `field`. `null` is returned unchanged.
///
/// # Errors
///
/// Returns [`MaskingError::NotText`] when a name, email or phone field holds a
/// non-string, and [`MaskingError::MalformedEmail`] from [`mask_email`].
pub fn mask_value(field: &str, value: &Value) -> Result<Value, MaskingError> {
    let kind = MaskKind::for_field(field);
    let masked = match (kind, value) {
        (_, Value::Null) => return Ok(Value::Null),
        (MaskKind::Generic, Value::String(s)) => mask_generic(s),
        (MaskKind::Generic, other) => mask_generic(&other.to_string()),
        (MaskKind::Name, Value::String(s)) => mask_name(s),
        (MaskKind::Email, Value::String(s)) => mask_email(s)?,
        (MaskKind::Phone, Value::String(s)) => mask_phone(s),
        (_, _) => return Err(MaskingError::NotText { field: field.to_owned() }),
    };
    Ok(Value::String(masked))
}

/// Return masked copies of `records`, masking each of `fields` where present.
///
/// Fields missing from a record are ignored; unlisted fields are copied as-is.
///
/// # Errors
///
/// Returns [`MaskingError::Record`] wrapping the first failure.
pub fn mask_records(records: &[Record], fields: &[&str]) -> Result<Vec<Record>, MaskingError> {
    tracing::debug!(records = records.len(), fields = fields.len(), "masking.mask_records");
    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let mut masked = record.clone();
            for field in fields {
                if let Some(value) = masked.get_mut(*field) {
                    *value = mask_value(field, value).map_err(|e| MaskingError::Record {
                        position,
                        source: Box::new(e),
                    })?;
                }
            }
            Ok(masked)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixtures are objects"),
        }
    }

    // ------------------------------------------------------------------
    // Strategies
    // ------------------------------------------------------------------

    #[test]
    fn name_keeps_first_letters() {
        assert_eq!(mask_name("John Doe"), "J*** D**");
        assert_eq!(mask_name("  Jane   Smith "), "J*** S****");
        assert_eq!(mask_name("Zoë"), "Z**");
        assert_eq!(mask_name(""), "");
    }

    #[test]
    fn email_keeps_first_letters_and_extension() {
        assert_eq!(mask_email("john.doe@example.com").unwrap(), "j*******@e******.com");
        assert_eq!(mask_email("a@mail.co.uk").unwrap(), "a@m***.co.uk");
    }

    #[test]
    fn email_shape_errors() {
        for bad in ["nobody", "a@b@c.com", "@example.com", "a@localhost", "a@.com"] {
            assert!(
                matches!(mask_email(bad), Err(MaskingError::MalformedEmail { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn phone_keeps_last_four_digits() {
        assert_eq!(mask_phone("(123) 456-7890"), "******7890");
        assert_eq!(mask_phone("987-654-3210"), "******3210");
        assert_eq!(mask_phone("+44 20 7946 0958"), "********0958");
    }

    #[test]
    fn short_phone_is_returned_as_digits() {
        assert_eq!(mask_phone("12-34"), "1234");
        assert_eq!(mask_phone("x9"), "9");
        assert_eq!(mask_phone(""), "");
    }

    #[test]
    fn generic_masks_every_character() {
        assert_eq!(mask_generic("secret"), "******");
        assert_eq!(mask_value("ssn", &json!(123_456_789)).unwrap(), json!("*********"));
        assert_eq!(mask_value("vip", &json!(true)).unwrap(), json!("****"));
    }

    #[test]
    fn null_is_left_alone() {
        assert_eq!(mask_value("email", &Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn text_strategies_reject_non_strings() {
        let err = mask_value("phone", &json!(1_234_567_890)).unwrap_err();
        assert_eq!(err, MaskingError::NotText { field: "phone".to_owned() });
    }

    // ------------------------------------------------------------------
    // mask_records
    // ------------------------------------------------------------------

    #[test]
    fn sample_dataset_is_masked() {
        let data = vec![
            record(json!({"id": 1, "name": "John Doe", "email": "john.doe@example.com", "phone": "(123) 456-7890"})),
            record(json!({"id": 2, "name": "Jane Smith", "email": "jane.smith@example.com", "phone": "987-654-3210"})),
        ];
        let masked = mask_records(&data, &["name", "email", "phone"]).unwrap();
        assert_eq!(
            Value::Object(masked[0].clone()),
            json!({"id": 1, "name": "J*** D**", "email": "j*******@e******.com", "phone": "******7890"})
        );
        assert_eq!(
            Value::Object(masked[1].clone()),
            json!({"id": 2, "name": "J*** S****", "email": "j*********@e******.com", "phone": "******3210"})
        );
        // Input untouched.
        assert_eq!(data[0]["name"], json!("John Doe"));
    }

    #[test]
    fn absent_fields_are_ignored() {
        let data = vec![record(json!({"id": 1}))];
        let masked = mask_records(&data, &["name", "email"]).unwrap();
        assert_eq!(masked, data);
    }

    #[test]
    fn error_carries_record_position() {
        let data = vec![
            record(json!({"email": "ok@example.com"})),
            record(json!({"email": "broken"})),
        ];
        let err = mask_records(&data, &["email"]).unwrap_err();
        assert!(matches!(err, MaskingError::Record { position: 1, .. }));
        assert_eq!(err.to_string(), "record 1: malformed email: missing `@`");
    }
}
