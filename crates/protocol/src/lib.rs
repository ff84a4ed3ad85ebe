//! telex-protocol – Der Draht-Kontrakt des Relays
//!
//! Jede Anwendungsnachricht ist in beiden Richtungen genau EIN
//! authentifiziertes Verschluesselungs-Token (siehe [`crypto`]).
//! Es existiert bewusst kein Framing darum herum; eine Nachricht muss in
//! einem einzigen begrenzten Read ankommen.

pub mod crypto;

// Bequeme Re-Exporte
pub use crypto::{SessionCipher, SessionKey, NONCE_LAENGE, SCHLUESSEL_LAENGE, TAG_LAENGE};
