//! telex-relay – Verbindungs- und Session-Verwaltung des Relay-Hubs
//!
//! Dieses Crate implementiert die Server-Haelfte des Relays:
//! - `SessionRegister`: nebenlaeufige Session-Tabelle mit Id-Vergabe
//! - `RelayAcceptor`: nimmt Verbindungen an und uebergibt den Schluessel
//! - `SessionListener`: eine Empfangsschleife pro Verbindung
//! - Autoantwort-Planung: Debounce-Timer pro eingehender Nachricht
//! - `BefehlsAusfuehrer` + Bedienerschleife: die Operator-Konsole
//!
//! ## Concurrency-Modell
//! Ein tokio-Task pro Verbindung, ein kurzlebiger Task pro eingehender
//! Nachricht, ein Annahme-Task, und die Bedienerschleife auf dem
//! Haupt-Task. Alle teilen sich GENAU EINEN groben Mutex ueber das
//! gesamte Register; unter dem Lock findet nie Netzwerk-I/O statt.

pub mod acceptor;
pub mod classify;
pub mod command;
pub mod listener;
pub mod outbound;
pub mod registry;
pub mod scheduler;
pub mod services;
pub mod session;
pub mod state;

// Bequeme Re-Exporte
pub use acceptor::RelayAcceptor;
pub use command::{bediener_schleife, parse_zeile, BefehlsAusfuehrer, BefehlsErgebnis, OperatorBefehl};
pub use listener::SessionListener;
pub use registry::{SendeHandles, SessionRegister};
pub use services::{DurchreichUebersetzer, Sprachausgabe, StummeAusgabe, Uebersetzer};
pub use session::{Session, SessionInfo};
pub use state::{RelayConfig, RelayState};
