//! telex-core – Gemeinsame Typen, Fehlertypen und Konstanten
//!
//! Dieses Crate ist die unterste Schicht des Workspace und haelt alles,
//! was mehrere Crates gemeinsam benoetigen: Id-Newtypes und den zentralen
//! Fehler-Enum.

pub mod error;
pub mod types;

// Bequeme Re-Exporte
pub use error::{Result, TelexError};
pub use types::SessionId;
