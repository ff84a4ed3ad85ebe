//! telex-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und verdrahtet den Relay-Kern:
//! Annahme-Task und Horcher laufen im Hintergrund, die Bedienerschleife
//! blockiert den Haupt-Task bis `/quit`.

pub mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use telex_relay::{
    bediener_schleife, BefehlsAusfuehrer, DurchreichUebersetzer, RelayAcceptor, RelayConfig,
    RelayState, StummeAusgabe,
};
use tokio::sync::watch;

use config::ServerConfig;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Relay-Hub und laeuft bis `/quit` auf der Konsole
    ///
    /// Reihenfolge:
    /// 1. Geteilten Zustand mit den Standard-Kollaborateuren aufbauen
    /// 2. TCP-Socket binden (startfatal bei Fehler)
    /// 3. Annahme-Task starten
    /// 4. Bedienerschleife auf dem Haupt-Task laufen lassen
    /// 5. Shutdown-Signal an Annahme und Horcher, dann auslaufen lassen
    pub async fn starten(self) -> Result<()> {
        let relay_config = RelayConfig {
            autoantwort_verzoegerung: Duration::from_secs(
                self.config.relay.autoantwort_verzoegerung_sek,
            ),
            standard_sprache: self.config.relay.standard_sprache.clone(),
            lese_puffer: self.config.relay.lese_puffer,
        };

        let zustand = RelayState::neu(
            relay_config,
            Arc::new(DurchreichUebersetzer),
            Arc::new(StummeAusgabe),
        );

        let adresse: SocketAddr = self
            .config
            .tcp_bind_adresse()
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.config.tcp_bind_adresse()))?;

        let acceptor = RelayAcceptor::binden(Arc::clone(&zustand), adresse)
            .await
            .with_context(|| format!("Bind auf {adresse} fehlgeschlagen"))?;

        tracing::info!(
            server_name = %self.config.server.name,
            adresse = %acceptor.lokale_adresse()?,
            fenster_sek = self.config.relay.autoantwort_verzoegerung_sek,
            "Server startet"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let annahme_task = tokio::spawn(acceptor.starten(shutdown_rx));

        bediener_schleife(BefehlsAusfuehrer::neu(Arc::clone(&zustand)), shutdown_tx).await;

        annahme_task.await?;
        tracing::info!("Server beendet");
        Ok(())
    }
}
