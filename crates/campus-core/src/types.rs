//! # Domain Types
//!
//! Core domain types for Campus Coffee.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    PosInput     │   │    PosFields    │   │       Pos       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  raw, unchecked │──►│  validated      │──►│  id (UUID)      │       │
//! │  │  type: String   │   │  type: PosType  │   │  fields         │       │
//! │  │  campus: String │   │  campus: Campus │   │  created_at     │       │
//! │  └─────────────────┘   └─────────────────┘   │  updated_at     │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    PosType      │   │   CampusType    │   │   PosTarget     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  CAFE           │   │  ALTSTADT       │   │  Id(String)     │       │
//! │  │  VENDING_MACHINE│   │  BERGHEIM       │   │  Name(String)   │       │
//! │  │  BAKERY         │   │  NEUENHEIMER_   │   └─────────────────┘       │
//! │  │  CAFETERIA      │   │    FELD         │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every POS has:
//! - `id`: UUID v4 - immutable, assigned by the persistence layer
//! - `name`: human-readable, used by callers to find a POS they have no id for

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// POS Type
// =============================================================================

/// The kind of a point of sale.
///
/// The member names are wire-visible vocabulary. Adding a member is a
/// contract change for every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosType {
    Cafe,
    VendingMachine,
    Bakery,
    Cafeteria,
}

impl PosType {
    /// All members, in declaration order.
    pub const ALL: [PosType; 4] = [
        PosType::Cafe,
        PosType::VendingMachine,
        PosType::Bakery,
        PosType::Cafeteria,
    ];

    /// Returns the wire name (e.g. `VENDING_MACHINE`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PosType::Cafe => "CAFE",
            PosType::VendingMachine => "VENDING_MACHINE",
            PosType::Bakery => "BAKERY",
            PosType::Cafeteria => "CAFETERIA",
        }
    }
}

impl fmt::Display for PosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PosType::ALL
            .into_iter()
            .find(|member| member.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: PosType::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Campus Type
// =============================================================================

/// The campus a point of sale is located on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampusType {
    Altstadt,
    Bergheim,
    NeuenheimerFeld,
}

impl CampusType {
    /// All members, in declaration order.
    pub const ALL: [CampusType; 3] = [
        CampusType::Altstadt,
        CampusType::Bergheim,
        CampusType::NeuenheimerFeld,
    ];

    /// Returns the wire name (e.g. `NEUENHEIMER_FELD`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            CampusType::Altstadt => "ALTSTADT",
            CampusType::Bergheim => "BERGHEIM",
            CampusType::NeuenheimerFeld => "NEUENHEIMER_FELD",
        }
    }
}

impl fmt::Display for CampusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampusType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampusType::ALL
            .into_iter()
            .find(|member| member.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "campus".to_string(),
                allowed: CampusType::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// POS Input (unchecked)
// =============================================================================

/// A POS field-set as it arrives from a caller.
///
/// Nothing here is trusted: required fields may be missing and enum members
/// may be outside their closed set. [`crate::validation::validate_pos_input`]
/// turns this into [`PosFields`] or rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub pos_type: Option<String>,
    pub campus: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<PostalCodeInput>,
    pub city: Option<String>,
}

/// A postal code as a caller sent it: a JSON number or a string.
///
/// Strings are parsed during validation, so `"69I20"` fails only the
/// element that carries it instead of the whole request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostalCodeInput {
    Number(i64),
    Text(String),
}

impl From<i64> for PostalCodeInput {
    fn from(code: i64) -> Self {
        PostalCodeInput::Number(code)
    }
}

impl From<&PosFields> for PosInput {
    fn from(fields: &PosFields) -> Self {
        PosInput {
            name: Some(fields.name.clone()),
            description: fields.description.clone(),
            pos_type: Some(fields.pos_type.as_str().to_string()),
            campus: Some(fields.campus.as_str().to_string()),
            street: Some(fields.street.clone()),
            house_number: Some(fields.house_number.clone()),
            postal_code: Some(PostalCodeInput::Number(i64::from(fields.postal_code))),
            city: Some(fields.city.clone()),
        }
    }
}

impl From<&Pos> for PosInput {
    fn from(pos: &Pos) -> Self {
        PosInput::from(&pos.fields())
    }
}

// =============================================================================
// POS Update
// =============================================================================

/// How an update names the POS it wants to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosTarget {
    Id(String),
    Name(String),
}

impl fmt::Display for PosTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PosTarget::Id(id) => write!(f, "id '{}'", id),
            PosTarget::Name(name) => write!(f, "name '{}'", name),
        }
    }
}

/// One element of an update batch: an optional id plus the new field values.
///
/// When `id` is absent the POS is looked up by `fields.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: PosInput,
}

impl PosUpdate {
    /// Targets an existing POS by id.
    pub fn by_id(id: impl Into<String>, fields: PosInput) -> Self {
        PosUpdate {
            id: Some(id.into()),
            fields,
        }
    }

    /// Targets an existing POS by the name carried in `fields`.
    pub fn by_name(fields: PosInput) -> Self {
        PosUpdate { id: None, fields }
    }

    /// Resolves which key this update uses.
    ///
    /// An empty id counts as absent. Without an id or a name there is
    /// nothing to look up.
    pub fn target(&self) -> Result<PosTarget, ValidationError> {
        if let Some(id) = self.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(PosTarget::Id(id.to_string()));
        }

        match self.fields.name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(PosTarget::Name(name.to_string())),
            _ => Err(ValidationError::Required {
                field: "id or name".to_string(),
            }),
        }
    }
}

// =============================================================================
// POS Fields (validated)
// =============================================================================

/// Every caller-controlled field of a POS, validated.
///
/// Holding a `PosFields` means validation already passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosFields {
    pub name: String,
    pub description: Option<String>,
    pub pos_type: PosType,
    pub campus: CampusType,
    pub street: String,
    pub house_number: String,
    pub postal_code: i32,
    pub city: String,
}

// =============================================================================
// POS
// =============================================================================

/// A stored point of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Pos {
    /// Unique identifier (UUID v4), assigned on insert.
    pub id: String,

    /// Display name, also the lookup key for updates by name.
    pub name: String,

    pub description: Option<String>,

    #[serde(rename = "type")]
    pub pos_type: PosType,

    pub campus: CampusType,

    pub street: String,

    pub house_number: String,

    pub postal_code: i32,

    pub city: String,

    /// When the POS was created. Never changes.
    pub created_at: DateTime<Utc>,

    /// When the POS was last written.
    pub updated_at: DateTime<Utc>,
}

impl Pos {
    /// Assembles a stored record from its parts.
    pub fn from_parts(
        id: String,
        fields: PosFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Pos {
            id,
            name: fields.name,
            description: fields.description,
            pos_type: fields.pos_type,
            campus: fields.campus,
            street: fields.street,
            house_number: fields.house_number,
            postal_code: fields.postal_code,
            city: fields.city,
            created_at,
            updated_at,
        }
    }

    /// Returns the caller-controlled fields, dropping identity and timestamps.
    pub fn fields(&self) -> PosFields {
        PosFields {
            name: self.name.clone(),
            description: self.description.clone(),
            pos_type: self.pos_type,
            campus: self.campus,
            street: self.street.clone(),
            house_number: self.house_number.clone(),
            postal_code: self.postal_code,
            city: self.city.clone(),
        }
    }
}

// =============================================================================
// Persistence Drafts
// =============================================================================

/// A validated POS ready to be inserted. The repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPos {
    pub fields: PosFields,
    pub created_at: DateTime<Utc>,
}

/// A validated overwrite of an existing POS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosChange {
    pub id: String,
    pub fields: PosFields,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
