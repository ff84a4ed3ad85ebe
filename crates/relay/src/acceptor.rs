//! RelayAcceptor – Bindet den Socket, nimmt Verbindungen an
//!
//! Fuer jede eingehende Verbindung: Id vergeben, frischen
//! Session-Schluessel erzeugen, Schluessel als allererste Bytes roh an
//! den Peer senden (bekannte Schwaeche des Draht-Kontrakts, siehe
//! `telex-protocol`), Session registrieren und einen
//! [`SessionListener`]-Task starten.
//!
//! Schlaegt der Schluessel-Handoff fehl, wird die Verbindung verworfen
//! und keine Session angelegt; die vergebene Id bleibt verbraucht.
//! Ein Fehler der Accept-Schleife selbst beendet nur die Annahme –
//! laufende Sessions sind davon unberuehrt.

use std::net::SocketAddr;
use std::sync::Arc;

use telex_protocol::{SessionCipher, SessionKey};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

use crate::listener::SessionListener;
use crate::session::Session;
use crate::state::RelayState;

/// Nimmt Verbindungen an und startet pro Verbindung einen Horcher-Task
pub struct RelayAcceptor {
    zustand: Arc<RelayState>,
    listener: TcpListener,
}

impl RelayAcceptor {
    /// Bindet den TCP-Socket
    ///
    /// Ein Bind-Fehler ist startfatal und wird propagiert.
    pub async fn binden(zustand: Arc<RelayState>, adresse: SocketAddr) -> std::io::Result<Self> {
        let listener = TcpListener::bind(adresse).await?;
        tracing::info!(adresse = %listener.local_addr()?, "Relay-Hub lauscht");
        Ok(Self { zustand, listener })
    }

    /// Gibt die tatsaechlich gebundene Adresse zurueck
    pub fn lokale_adresse(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Startet die Annahme-Schleife
    ///
    /// Laeuft bis `shutdown_rx` ein `true`-Signal empfaengt oder die
    /// Annahme fehlschlaegt.
    pub async fn starten(self, mut shutdown_rx: tokio::sync::watch::Receiver<bool>) {
        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_adresse)) => {
                            self.verbindung_annehmen(stream, peer_adresse, &shutdown_rx).await;
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "Accept fehlgeschlagen, Annahme endet");
                            break;
                        }
                    }
                }

                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Shutdown-Signal, Annahme endet");
                        break;
                    }
                }
            }
        }
    }

    /// Baut eine Session fuer eine frisch akzeptierte Verbindung auf
    async fn verbindung_annehmen(
        &self,
        mut stream: TcpStream,
        peer_adresse: SocketAddr,
        shutdown_rx: &tokio::sync::watch::Receiver<bool>,
    ) {
        let id = self.zustand.register.id_vergeben();
        let schluessel = SessionKey::generieren();

        // Schluessel-Handoff: roh, unverschluesselt, als allererste Bytes
        if let Err(e) = stream.write_all(schluessel.as_bytes()).await {
            tracing::warn!(peer = %peer_adresse, fehler = %e, "Schluessel-Handoff fehlgeschlagen, keine Session");
            return;
        }

        let cipher = Arc::new(SessionCipher::neu(&schluessel));
        let (lese, schreib) = stream.into_split();

        self.zustand.register.einfuegen(Session::neu(
            id,
            peer_adresse,
            Arc::clone(&cipher),
            self.zustand.config.standard_sprache.clone(),
            Arc::new(tokio::sync::Mutex::new(schreib)),
        ));

        println!("\nNeue Verbindung von {peer_adresse} -> Session {id}");
        tracing::info!(
            session = %id,
            peer = %peer_adresse,
            schluessel = %schluessel.fingerabdruck(),
            "Session verbunden"
        );

        let horcher = SessionListener::neu(Arc::clone(&self.zustand), id, cipher);
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            horcher.verarbeiten(lese, shutdown_rx).await;
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
