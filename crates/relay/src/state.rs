//! Gemeinsamer Zustand des Relay-Hubs
//!
//! Haelt Konfiguration, Register und die externen Kollaborateure als
//! eine Arc-geteilte Struktur, die an jeden Task gereicht wird.

use std::sync::Arc;
use std::time::Duration;

use crate::registry::SessionRegister;
use crate::services::{DurchreichUebersetzer, Sprachausgabe, StummeAusgabe, Uebersetzer};

/// Konfiguration des Relay-Kerns
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Debounce-Fenster: so lange darf eine manuelle Antwort die
    /// automatische noch verdraengen
    pub autoantwort_verzoegerung: Duration,
    /// Zielsprache neuer Sessions
    pub standard_sprache: String,
    /// Groesse des begrenzten Lese-Puffers pro Read
    pub lese_puffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            autoantwort_verzoegerung: Duration::from_secs(6),
            standard_sprache: "en".to_string(),
            lese_puffer: 8192,
        }
    }
}

/// Gemeinsamer Zustand (thread-safe, Arc-geteilt)
pub struct RelayState {
    /// Konfiguration (unveraenderlich nach dem Start)
    pub config: RelayConfig,
    /// Die Session-Tabelle
    pub register: SessionRegister,
    /// Uebersetzung eingehender Nachrichten (externer Kollaborateur)
    pub uebersetzer: Arc<dyn Uebersetzer>,
    /// Prozessweiter Sprachausgabe-Handle, von allen Sessions geteilt
    pub sprachausgabe: Arc<dyn Sprachausgabe>,
}

impl RelayState {
    /// Erstellt einen neuen RelayState mit den gegebenen Kollaborateuren
    pub fn neu(
        config: RelayConfig,
        uebersetzer: Arc<dyn Uebersetzer>,
        sprachausgabe: Arc<dyn Sprachausgabe>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            register: SessionRegister::neu(),
            uebersetzer,
            sprachausgabe,
        })
    }

    /// Erstellt einen RelayState mit Durchreich-Uebersetzung und stummer
    /// Sprachausgabe
    pub fn mit_standard_diensten(config: RelayConfig) -> Arc<Self> {
        Self::neu(
            config,
            Arc::new(DurchreichUebersetzer),
            Arc::new(StummeAusgabe),
        )
    }
}
