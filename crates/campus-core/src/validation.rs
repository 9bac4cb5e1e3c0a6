//! # Validation Module
//!
//! Input validation for Campus Coffee points of sale.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (out of this workspace)                            │
//! │  └── Deserialization into PosInput (shape only)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present and non-blank                             │
//! │  ├── type / campus inside their closed sets                            │
//! │  └── postalCode an integer inside 1..=99999                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints on enum columns                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use campus_core::types::{PosInput, PostalCodeInput};
//! use campus_core::validation::validate_pos_input;
//!
//! let input = PosInput {
//!     name: Some("Kaffeebar".to_string()),
//!     description: None,
//!     pos_type: Some("CAFE".to_string()),
//!     campus: Some("ALTSTADT".to_string()),
//!     street: Some("Hauptstraße".to_string()),
//!     house_number: Some("1".to_string()),
//!     postal_code: Some(PostalCodeInput::Text("69117".to_string())),
//!     city: Some("Heidelberg".to_string()),
//! };
//!
//! let fields = validate_pos_input(&input).unwrap();
//! assert_eq!(fields.postal_code, 69117);
//! ```

use crate::error::ValidationError;
use crate::types::{CampusType, PosFields, PosInput, PosType, PostalCodeInput};
use crate::{MAX_TEXT_LENGTH, MAX_POSTAL_CODE, MIN_POSTAL_CODE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it unchanged.
///
/// ## Rules
/// - Must be present
/// - Must not be blank after trimming
/// - Must be at most [`MAX_TEXT_LENGTH`] characters
pub fn validate_required_text(field: &str, value: Option<&str>) -> ValidationResult<String> {
    let value = match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            return Err(ValidationError::Required {
                field: field.to_string(),
            })
        }
    };

    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Validates the optional description.
///
/// Absent is fine; present must respect the length limit.
pub fn validate_description(value: Option<&str>) -> ValidationResult<Option<String>> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LENGTH => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_TEXT_LENGTH,
        }),
        other => Ok(other.map(str::to_string)),
    }
}

// =============================================================================
// Enum Validators
// =============================================================================

/// Parses a required `type` value into [`PosType`].
pub fn validate_pos_type(value: Option<&str>) -> ValidationResult<PosType> {
    match value {
        Some(raw) => raw.parse(),
        None => Err(ValidationError::Required {
            field: "type".to_string(),
        }),
    }
}

/// Parses a required `campus` value into [`CampusType`].
pub fn validate_campus(value: Option<&str>) -> ValidationResult<CampusType> {
    match value {
        Some(raw) => raw.parse(),
        None => Err(ValidationError::Required {
            field: "campus".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a postal code.
///
/// ## Rules
/// - Must be present
/// - Text must parse as an integer
/// - Must be between 1 and 99999 (five-digit codes, leading zeros dropped)
///
/// ## Example
/// ```rust
/// use campus_core::types::PostalCodeInput;
/// use campus_core::validation::validate_postal_code;
///
/// assert_eq!(validate_postal_code(Some(&PostalCodeInput::Number(69120))).unwrap(), 69120);
/// assert_eq!(validate_postal_code(Some(&PostalCodeInput::Text("69120".into()))).unwrap(), 69120);
/// assert!(validate_postal_code(Some(&PostalCodeInput::Number(0))).is_err());
/// assert!(validate_postal_code(None).is_err());
/// ```
pub fn validate_postal_code(value: Option<&PostalCodeInput>) -> ValidationResult<i32> {
    let code = match value {
        Some(PostalCodeInput::Number(code)) => *code,
        Some(PostalCodeInput::Text(raw)) => parse_postal_code(raw)?,
        None => {
            return Err(ValidationError::Required {
                field: "postalCode".to_string(),
            })
        }
    };

    let out_of_range = || ValidationError::OutOfRange {
        field: "postalCode".to_string(),
        min: i64::from(MIN_POSTAL_CODE),
        max: i64::from(MAX_POSTAL_CODE),
    };

    if !(i64::from(MIN_POSTAL_CODE)..=i64::from(MAX_POSTAL_CODE)).contains(&code) {
        return Err(out_of_range());
    }

    i32::try_from(code).map_err(|_| out_of_range())
}

/// Parses a postal code sent as text.
///
/// ## Example
/// ```rust
/// use campus_core::validation::parse_postal_code;
///
/// assert_eq!(parse_postal_code(" 69120 ").unwrap(), 69120);
/// assert!(parse_postal_code("69I20").is_err());
/// ```
pub fn parse_postal_code(raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "postalCode".to_string(),
            reason: "must be an integer".to_string(),
        })
}

// =============================================================================
// Record Validator
// =============================================================================

/// Validates a complete POS field-set.
///
/// Fields are checked in wire order; the first failure is returned.
pub fn validate_pos_input(input: &PosInput) -> ValidationResult<PosFields> {
    Ok(PosFields {
        name: validate_required_text("name", input.name.as_deref())?,
        description: validate_description(input.description.as_deref())?,
        pos_type: validate_pos_type(input.pos_type.as_deref())?,
        campus: validate_campus(input.campus.as_deref())?,
        street: validate_required_text("street", input.street.as_deref())?,
        house_number: validate_required_text("houseNumber", input.house_number.as_deref())?,
        postal_code: validate_postal_code(input.postal_code.as_ref())?,
        city: validate_required_text("city", input.city.as_deref())?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PosInput {
        PosInput {
            name: Some("Kaffeebar".to_string()),
            description: Some("Main hall".to_string()),
            pos_type: Some("CAFE".to_string()),
            campus: Some("NEUENHEIMER_FELD".to_string()),
            street: Some("Im Neuenheimer Feld".to_string()),
            house_number: Some("300".to_string()),
            postal_code: Some(PostalCodeInput::Number(69120)),
            city: Some("Heidelberg".to_string()),
        }
    }

    #[test]
    fn test_validate_pos_input() {
        let fields = validate_pos_input(&valid_input()).unwrap();
        assert_eq!(fields.name, "Kaffeebar");
        assert_eq!(fields.pos_type, PosType::Cafe);
        assert_eq!(fields.campus, CampusType::NeuenheimerFeld);
        assert_eq!(fields.postal_code, 69120);
    }

    #[test]
    fn test_description_is_optional() {
        let mut input = valid_input();
        input.description = None;
        assert_eq!(validate_pos_input(&input).unwrap().description, None);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut input = valid_input();
        input.street = None;
        assert_eq!(
            validate_pos_input(&input).unwrap_err(),
            ValidationError::Required {
                field: "street".to_string()
            }
        );

        let mut input = valid_input();
        input.name = Some("   ".to_string());
        assert_eq!(validate_pos_input(&input).unwrap_err().field(), "name");

        let mut input = valid_input();
        input.campus = None;
        assert_eq!(validate_pos_input(&input).unwrap_err().field(), "campus");
    }

    #[test]
    fn test_unknown_enum_member() {
        let mut input = valid_input();
        input.pos_type = Some("FOOD_TRUCK".to_string());
        assert!(matches!(
            validate_pos_input(&input),
            Err(ValidationError::NotAllowed { ref field, .. }) if field == "type"
        ));
    }

    #[test]
    fn test_validate_postal_code() {
        let number = |code: i64| validate_postal_code(Some(&PostalCodeInput::Number(code)));

        assert_eq!(number(1).unwrap(), 1);
        assert_eq!(number(99999).unwrap(), 99999);

        assert!(number(0).is_err());
        assert!(number(-69120).is_err());
        assert!(number(100_000).is_err());
        assert!(number(i64::MAX).is_err());
    }

    #[test]
    fn test_postal_code_text_is_parsed() {
        let text = |raw: &str| validate_postal_code(Some(&PostalCodeInput::Text(raw.to_string())));

        assert_eq!(text(" 69117 ").unwrap(), 69117);
        assert!(matches!(
            text("69I20"),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "postalCode"
        ));
        assert!(matches!(text("0"), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_malformed_postal_code_in_record() {
        let mut input = valid_input();
        input.postal_code = Some(PostalCodeInput::Text("sixty-nine".to_string()));
        assert!(matches!(
            validate_pos_input(&input),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_postal_code() {
        assert_eq!(parse_postal_code("69117").unwrap(), 69117);
        assert!(matches!(
            parse_postal_code("sixty-nine"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_postal_code("").is_err());
    }

    #[test]
    fn test_text_length_limit() {
        let long = "A".repeat(MAX_TEXT_LENGTH + 1);
        assert!(validate_required_text("city", Some(&long)).is_err());
        assert!(validate_description(Some(&long)).is_err());
        assert!(validate_required_text("city", Some(&"A".repeat(MAX_TEXT_LENGTH))).is_ok());
    }
}
