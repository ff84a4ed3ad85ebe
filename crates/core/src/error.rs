//! Fehlertypen fuer Telex
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Die Varianten folgen der Fehler-Taxonomie des Systems:
//! verbindungsfatal, nachrichtenlokal, Bedienereingabe und startfatal.

use thiserror::Error;

use crate::types::SessionId;

/// Globaler Result-Alias fuer Telex
pub type Result<T> = std::result::Result<T, TelexError>;

/// Alle moeglichen Fehler im Telex-System
#[derive(Debug, Error)]
pub enum TelexError {
    // --- Verbindung & Netzwerk (verbindungsfatal) ---
    #[error("Verbindung fehlgeschlagen: {0}")]
    Verbindung(String),

    #[error("Verbindung getrennt: {0}")]
    Getrennt(String),

    // --- Nachrichtenlokal ---
    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Ungueltige Schluessellaenge: erwartet={erwartet}, erhalten={erhalten}")]
    SchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Senden an Session {id} fehlgeschlagen: {grund}")]
    Senden { id: SessionId, grund: String },

    #[error("Uebersetzung fehlgeschlagen: {0}")]
    Uebersetzung(String),

    // --- Bedienereingabe ---
    #[error("Keine Session mit id {0}")]
    SessionNichtGefunden(SessionId),

    #[error("Keine Session ausgewaehlt")]
    KeineAuswahl,

    #[error("Ungueltiger Befehl: {0}")]
    UngueltigerBefehl(String),

    // --- Startfatal ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TelexError {
    /// Gibt true zurueck wenn der Fehler die betroffene Session beendet
    ///
    /// Nur verbindungsfatale Fehler entfernen eine Session; nachrichtenlokale
    /// Fehler werden geloggt und die Session laeuft weiter.
    pub fn ist_verbindungsfatal(&self) -> bool {
        matches!(self, Self::Verbindung(_) | Self::Getrennt(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = TelexError::SessionNichtGefunden(SessionId(9));
        assert_eq!(e.to_string(), "Keine Session mit id 9");
    }

    #[test]
    fn entschluesselung_ist_nicht_fatal() {
        assert!(!TelexError::Entschluesselung("kaputtes Token".into()).ist_verbindungsfatal());
        assert!(TelexError::Getrennt("EOF".into()).ist_verbindungsfatal());
    }

    #[test]
    fn schluessel_laenge_fehler() {
        let e = TelexError::SchluesselLaenge {
            erwartet: 32,
            erhalten: 16,
        };
        assert!(e.to_string().contains("erwartet=32"));
        assert!(e.to_string().contains("erhalten=16"));
    }
}
