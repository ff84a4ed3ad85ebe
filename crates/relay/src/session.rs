//! Session – Zustand eines verbundenen Peers
//!
//! Eine Session entsteht bei erfolgreichem Accept nach dem
//! Schluessel-Handoff und verschwindet wenn der Peer trennt, ein fataler
//! Lesefehler auftritt oder der Server herunterfaehrt.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use telex_core::SessionId;
use telex_protocol::SessionCipher;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Schreibhaelfte eines Session-Sockets
///
/// Haengt hinter einem eigenen tokio-Mutex, damit Sendungen an
/// verschiedene Sessions sich nie gegenseitig blockieren und nie das
/// Register-Lock halten.
pub type SessionSchreiber = Arc<Mutex<OwnedWriteHalf>>;

/// Zustand eines verbundenen Peers
///
/// Wird ausschliesslich unter dem Register-Lock mutiert.
pub struct Session {
    /// Eindeutige, streng steigende Id
    pub id: SessionId,
    /// Netzwerk-Endpunkt des Peers (unveraenderlich)
    pub adresse: SocketAddr,
    /// Symmetrischer Cipher dieser Session (pro Session frisch erzeugt)
    pub cipher: Arc<SessionCipher>,
    /// Zielsprache in die eingehende Nachrichten uebersetzt werden
    pub ziel_sprache: String,
    /// Sprachausgabe fuer eingehende Nachrichten dieser Session
    pub sprachausgabe: bool,
    /// Zeitpunkt der letzten (manuellen oder automatischen) Antwort.
    /// `None` = nie, aelter als jede moegliche Nachrichten-Ankunft.
    pub letzte_manuelle_antwort: Option<Instant>,
    /// Schreibhaelfte des Sockets
    pub schreiber: SessionSchreiber,
}

impl Session {
    /// Erstellt eine neue Session mit den Standardwerten fuer die
    /// veraenderlichen Felder
    pub fn neu(
        id: SessionId,
        adresse: SocketAddr,
        cipher: Arc<SessionCipher>,
        ziel_sprache: String,
        schreiber: SessionSchreiber,
    ) -> Self {
        Self {
            id,
            adresse,
            cipher,
            ziel_sprache,
            sprachausgabe: false,
            letzte_manuelle_antwort: None,
            schreiber,
        }
    }
}

/// Schnappschuss einer Session fuer die Bediener-Anzeige (`/list`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: SessionId,
    pub adresse: SocketAddr,
    pub ziel_sprache: String,
}
