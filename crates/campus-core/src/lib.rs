//! # campus-core: POS Business Logic for Campus Coffee
//!
//! This crate is the **heart** of Campus Coffee. It owns every rule about what
//! a valid point of sale (POS) is and how batches of them are created,
//! updated, listed and cleared. It performs no I/O itself; storage is reached
//! through the [`ports::PosRepository`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Campus Coffee Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Transport (HTTP, not in this workspace)         │   │
//! │  │        POST /pos ──► PUT /pos ──► GET /pos ──► reset           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data records                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ campus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │  service  │  │   ports   │  │   │
//! │  │   │    Pos    │  │   rules   │  │PosService │  │  PosRepo  │  │   │
//! │  │   │  PosType  │  │  checks   │  │  batches  │  │  (trait)  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • STORAGE ONLY VIA THE PORT         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    campus-db (Database Layer)                   │   │
//! │  │          SQLite adapter of PosRepository, migrations            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Pos, PosType, CampusType, inputs)
//! - [`validation`] - Field validation rules
//! - [`error`] - Domain, validation and port error types
//! - [`ports`] - The persistence port
//! - [`service`] - The POS domain service
//!
//! ## Design Principles
//!
//! 1. **Validate, then persist**: a batch is fully validated before anything is written
//! 2. **Closed enums**: `type` and `campus` are Rust enums, unknown members never reach storage
//! 3. **Order in, order out**: results mirror input order one-to-one
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use campus_core::types::{PosInput, PosType, PostalCodeInput};
//! use campus_core::validation::validate_pos_input;
//!
//! let input = PosInput {
//!     name: Some("Kaffeebar".to_string()),
//!     pos_type: Some("CAFE".to_string()),
//!     campus: Some("NEUENHEIMER_FELD".to_string()),
//!     street: Some("Im Neuenheimer Feld".to_string()),
//!     house_number: Some("300".to_string()),
//!     postal_code: Some(PostalCodeInput::Number(69120)),
//!     city: Some("Heidelberg".to_string()),
//!     ..Default::default()
//! };
//!
//! let fields = validate_pos_input(&input).unwrap();
//! assert_eq!(fields.pos_type, PosType::Cafe);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ports;
pub mod service;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{PosError, PosResult, RepositoryError, RepositoryResult, ValidationError};
pub use ports::PosRepository;
pub use service::PosService;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length, in characters, of any POS text field.
///
/// Matches the `VARCHAR(255)` columns of the relational schema the data
/// was first modelled in.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Smallest accepted postal code.
pub const MIN_POSTAL_CODE: i32 = 1;

/// Largest accepted postal code (five digits).
pub const MAX_POSTAL_CODE: i32 = 99_999;
