//! Ausgehender Sendepfad – gemeinsam fuer Bediener und Autoantwort
//!
//! Reihenfolge-Invariante: der Antwort-Zeitstempel der Session wird
//! unter dem Register-Lock gesetzt BEVOR verschluesselt und geschrieben
//! wird. Verschluesseln und Schreiben laufen ohne Register-Lock, nur
//! unter dem Schreib-Mutex der einen betroffenen Session – ein traeger
//! Peer bremst damit hoechstens die eine Sendung, nie andere Sessions.

use telex_core::{Result, SessionId, TelexError};
use tokio::io::AsyncWriteExt;

use crate::state::RelayState;

/// Verschluesselt und sendet einen Klartext an eine Session
///
/// Fehlt die Session, kommt [`TelexError::SessionNichtGefunden`] zurueck
/// und nichts wird veraendert. Ein Schreibfehler entfernt die Session
/// NICHT – nur ein Null-Read des Horchers bedeutet, dass der Peer weg ist.
pub async fn senden(zustand: &RelayState, id: SessionId, klartext: &str) -> Result<()> {
    let handles = zustand
        .register
        .senden_vormerken(id)
        .ok_or(TelexError::SessionNichtGefunden(id))?;

    let token = handles.cipher.encrypt(klartext.as_bytes())?;

    let mut schreiber = handles.schreiber.lock().await;
    schreiber
        .write_all(&token)
        .await
        .map_err(|e| TelexError::Senden {
            id,
            grund: e.to_string(),
        })?;

    tracing::debug!(session = %id, bytes = token.len(), "Nachricht gesendet");
    Ok(())
}

/// Sendet einen Klartext unabhaengig an jede aktive Session
///
/// Gibt die Anzahl erfolgreicher Sendungen zurueck. Fehlschlaege werden
/// geloggt und stoppen den Rundruf nicht.
pub async fn rundruf(zustand: &RelayState, klartext: &str) -> usize {
    let ids = zustand.register.session_ids();
    let mut gesendet = 0;

    for id in ids {
        match senden(zustand, id, klartext).await {
            Ok(()) => gesendet += 1,
            Err(e) => {
                tracing::warn!(session = %id, fehler = %e, "Rundruf-Sendung fehlgeschlagen");
            }
        }
    }

    gesendet
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
