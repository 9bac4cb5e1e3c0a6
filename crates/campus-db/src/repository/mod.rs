//! # Repository Module
//!
//! Database repository implementations for Campus Coffee.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  campus-core declares the port, this module implements it.             │
//! │                                                                         │
//! │  PosService (campus-core)                                              │
//! │       │                                                                 │
//! │       │  repo.insert_all(&drafts)                                      │
//! │       ▼                                                                 │
//! │  dyn PosRepository  ◄── trait, lives in campus-core                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePosRepository                                                   │
//! │  ├── insert_batch(&self, drafts)                                       │
//! │  ├── update_batch(&self, changes)                                      │
//! │  ├── get_by_id / get_by_name                                           │
//! │  ├── list(&self)                                                       │
//! │  └── purge(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`pos::SqlitePosRepository`] - POS persistence

pub mod pos;
