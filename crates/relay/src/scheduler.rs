//! Autoantwort-Planung – ein Debounce-Task pro eingehender Nachricht
//!
//! Kein abbrechbarer Timer: pro Nachricht startet ein kurzlebiger
//! tokio-Task, der das Verzoegerungsfenster schlaeft und dann prueft, ob
//! seit SEINER Ankunftszeit eine Antwort rausging. Mehrere Tasks pro
//! Session duerfen gleichzeitig in der Luft sein; jeder wird nur von
//! einer Antwort verdraengt, die nach seiner eigenen Ankunft liegt.
//! Ist die Session beim Aufwachen verschwunden, endet der Task still.

use std::sync::Arc;
use std::time::Instant;

use telex_core::SessionId;

use crate::classify::automatische_antwort;
use crate::outbound::senden;
use crate::state::RelayState;

/// Startet den Debounce-Task fuer eine eingehende Nachricht
///
/// Der zurueckgegebene JoinHandle wird im Normalbetrieb ignoriert;
/// Tests warten darauf.
pub fn autoantwort_planen(
    zustand: Arc<RelayState>,
    id: SessionId,
    ankunft: Instant,
    nachricht: String,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(zustand.config.autoantwort_verzoegerung).await;

        // Gleicher Lock wie der Sendepfad: kein check-then-act-Rennen
        if !zustand.register.autoantwort_faellig(id, ankunft) {
            tracing::debug!(session = %id, "Autoantwort verdraengt oder Session weg");
            return;
        }

        let antwort = automatische_antwort(&nachricht);
        println!("\n[Autoantwort -> Session {id}] {antwort}");

        if let Err(e) = senden(&zustand, id, antwort).await {
            // Session kann zwischen Pruefung und Sendung verschwinden
            tracing::debug!(session = %id, fehler = %e, "Autoantwort nicht zugestellt");
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
