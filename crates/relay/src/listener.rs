//! SessionListener – Eine Empfangsschleife pro Verbindung
//!
//! Liest begrenzte Rohbloecke, entschluesselt sie mit dem Session-Cipher
//! und stoesst pro Nachricht die Autoantwort-Planung an.
//!
//! ## Bekannte Einschraenkung (geerbt, nicht behoben)
//! Der Draht-Kontrakt hat KEIN Framing: ein Read wird als genau ein
//! verschluesseltes Token angenommen. Eine ueber zwei Reads zerrissene
//! oder mit einer zweiten zusammengeklebte Nachricht scheitert an der
//! Entschluesselung und wird verworfen. Abhilfe waere ein
//! Laengen-Praefix-Framing – das aendert aber den Draht-Kontrakt und
//! ist hier bewusst nicht umgesetzt.

use std::sync::Arc;
use std::time::Instant;

use telex_core::SessionId;
use telex_protocol::SessionCipher;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;

use crate::scheduler::autoantwort_planen;
use crate::services::uebersetzen_oder_original;
use crate::state::RelayState;

/// Verarbeitet die eingehende Haelfte einer Session
///
/// Laeuft in einem eigenen tokio-Task bis der Peer trennt, ein fataler
/// Lesefehler auftritt oder das Shutdown-Signal kommt.
pub struct SessionListener {
    zustand: Arc<RelayState>,
    id: SessionId,
    cipher: Arc<SessionCipher>,
}

impl SessionListener {
    /// Erstellt einen neuen SessionListener
    pub fn neu(zustand: Arc<RelayState>, id: SessionId, cipher: Arc<SessionCipher>) -> Self {
        Self {
            zustand,
            id,
            cipher,
        }
    }

    /// Startet die Empfangsschleife
    ///
    /// Beim Verlassen wird die Session aus dem Register entfernt; eine
    /// darauf zeigende Bediener-Auswahl faellt mit.
    pub async fn verarbeiten(
        self,
        mut lese: OwnedReadHalf,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let id = self.id;
        let mut puffer = vec![0u8; self.zustand.config.lese_puffer];

        loop {
            tokio::select! {
                gelesen = lese.read(&mut puffer) => {
                    match gelesen {
                        Ok(0) => {
                            println!("\nSession {id} hat die Verbindung getrennt.");
                            tracing::info!(session = %id, "Peer hat getrennt");
                            break;
                        }
                        Ok(n) => {
                            self.nachricht_verarbeiten(&puffer[..n]).await;
                        }
                        Err(e) => {
                            tracing::warn!(session = %id, fehler = %e, "Lesefehler, Session endet");
                            break;
                        }
                    }
                }

                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::debug!(session = %id, "Shutdown-Signal, Horcher endet");
                        break;
                    }
                }
            }
        }

        if self.zustand.register.entfernen(id) {
            tracing::info!(session = %id, "Session entfernt");
        }
    }

    /// Verarbeitet einen Rohblock: entschluesseln, anzeigen, uebersetzen,
    /// optional vorlesen, Autoantwort planen
    ///
    /// Entschluesselungs- und UTF-8-Fehler sind nachrichtenlokal: loggen,
    /// Nachricht fallen lassen, Session laeuft weiter.
    async fn nachricht_verarbeiten(&self, roh: &[u8]) {
        let id = self.id;

        let klartext = match self.cipher.decrypt(roh) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(session = %id, fehler = %e, "Eingehende Daten nicht entschluesselbar");
                return;
            }
        };

        let nachricht = match String::from_utf8(klartext) {
            Ok(text) => text,
            Err(_) => {
                tracing::warn!(session = %id, "Entschluesselte Nachricht ist kein UTF-8");
                return;
            }
        };

        let ankunft = Instant::now();
        println!("\n<< [Session {id}] {nachricht}");

        // Session kann zwischen Read und Verarbeitung verschwunden sein
        let Some((sprache, sprachausgabe_an)) = self.zustand.register.ziel_einstellungen(id)
        else {
            return;
        };

        let uebersetzt =
            uebersetzen_oder_original(self.zustand.uebersetzer.as_ref(), &nachricht, &sprache)
                .await;
        println!("[Uebersetzt -> {sprache}] {uebersetzt}");

        if sprachausgabe_an {
            // Best effort; Fehler verschluckt die Implementierung
            self.zustand.sprachausgabe.sprechen(&uebersetzt).await;
        }

        autoantwort_planen(Arc::clone(&self.zustand), id, ankunft, nachricht);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
