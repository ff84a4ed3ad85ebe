//! Bediener-Konsole – Befehlsparser, Ausfuehrer und Eingabeschleife
//!
//! Zeilenbasierte Befehle auf stdin, eine einzelne Schleife auf dem
//! Haupt-Task. Parsen und Ausfuehren sind getrennt: der Parser liefert
//! einen Befehls-Enum, der Ausfuehrer mutiert Register/Sessions und gibt
//! die Konsolenausgabe als Text zurueck.
//!
//! | Befehl          | Wirkung                                        |
//! |-----------------|------------------------------------------------|
//! | `/list`         | Id/Adresse/Zielsprache aller Sessions          |
//! | `/select <id>`  | Session auswaehlen                             |
//! | `/all <text>`   | Rundruf an alle Sessions                       |
//! | `/lang <code>`  | Zielsprache der ausgewaehlten Session          |
//! | `/tts on\|off`  | Sprachausgabe der ausgewaehlten Session        |
//! | `/quit`         | Alle Verbindungen schliessen, Server beenden   |
//! | sonstiger Text  | Direktnachricht an die ausgewaehlte Session    |

use std::io::Write as _;
use std::sync::Arc;

use telex_core::{SessionId, TelexError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::outbound::{rundruf, senden};
use crate::state::RelayState;

/// Hilfezeile beim Start der Bedienerschleife
pub const BEFEHLS_HILFE: &str =
    "Bedienerbefehle: /list, /select <id>, /all <text>, /lang <code>, /tts on|off, /quit";

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Ein geparster Bedienerbefehl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorBefehl {
    /// `/list` – Sessions anzeigen
    Liste,
    /// `/select <id>` – Session auswaehlen
    Auswaehlen(u64),
    /// `/all <text>` – Rundruf
    Rundruf(String),
    /// `/lang <code>` – Zielsprache der Auswahl setzen
    Sprache(String),
    /// `/tts on|off` – Sprachausgabe der Auswahl schalten
    Sprachausgabe(bool),
    /// `/quit` oder `/exit` – Server beenden
    Beenden,
    /// Alles andere: Direktnachricht an die Auswahl
    Direkt(String),
    /// Erkannter Befehl mit unbrauchbaren Argumenten; traegt die
    /// Verwendungszeile
    Ungueltig(&'static str),
}

/// Parst eine Eingabezeile; `None` bei leerer Eingabe
pub fn parse_zeile(zeile: &str) -> Option<OperatorBefehl> {
    let zeile = zeile.trim();
    if zeile.is_empty() {
        return None;
    }

    if zeile == "/list" {
        return Some(OperatorBefehl::Liste);
    }
    if zeile == "/quit" || zeile == "/exit" {
        return Some(OperatorBefehl::Beenden);
    }
    if let Some(rest) = zeile.strip_prefix("/select ") {
        return Some(match rest.trim().parse::<u64>() {
            Ok(id) => OperatorBefehl::Auswaehlen(id),
            Err(_) => OperatorBefehl::Ungueltig("Verwendung: /select <id>"),
        });
    }
    if let Some(rest) = zeile.strip_prefix("/all ") {
        return Some(OperatorBefehl::Rundruf(rest.to_string()));
    }
    if let Some(rest) = zeile.strip_prefix("/lang ") {
        return Some(OperatorBefehl::Sprache(rest.trim().to_lowercase()));
    }
    if let Some(rest) = zeile.strip_prefix("/tts ") {
        return Some(match rest.trim() {
            "on" => OperatorBefehl::Sprachausgabe(true),
            "off" => OperatorBefehl::Sprachausgabe(false),
            _ => OperatorBefehl::Ungueltig("Verwendung: /tts on|off"),
        });
    }

    // Unerkannte, nicht-leere Eingabe ist eine Direktnachricht
    Some(OperatorBefehl::Direkt(zeile.to_string()))
}

// ---------------------------------------------------------------------------
// Ausfuehrer
// ---------------------------------------------------------------------------

/// Ergebnis einer Befehlsausfuehrung
#[derive(Debug, PartialEq, Eq)]
pub enum BefehlsErgebnis {
    /// Konsolenausgabe, Schleife laeuft weiter
    Ausgabe(String),
    /// Konsolenausgabe, Schleife endet (Shutdown)
    Beenden(String),
}

/// Fuehrt Bedienerbefehle gegen den geteilten Zustand aus
pub struct BefehlsAusfuehrer {
    zustand: Arc<RelayState>,
}

impl BefehlsAusfuehrer {
    /// Erstellt einen neuen BefehlsAusfuehrer
    pub fn neu(zustand: Arc<RelayState>) -> Self {
        Self { zustand }
    }

    /// Fuehrt einen Befehl aus und gibt die Konsolenausgabe zurueck
    ///
    /// Fehlerhafte Eingaben werden gemeldet, nie still verschluckt; die
    /// Schleife laeuft in jedem Fall ausser `/quit` weiter.
    pub async fn ausfuehren(&self, befehl: OperatorBefehl) -> BefehlsErgebnis {
        let register = &self.zustand.register;

        let ausgabe = match befehl {
            OperatorBefehl::Liste => {
                let infos = register.uebersicht();
                if infos.is_empty() {
                    "Keine verbundenen Peers.".to_string()
                } else {
                    infos
                        .iter()
                        .map(|i| {
                            format!(
                                " - id={} adresse={} sprache={}",
                                i.id, i.adresse, i.ziel_sprache
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }

            OperatorBefehl::Auswaehlen(id) => {
                let id = SessionId(id);
                if register.auswaehlen(id) {
                    format!("Session {id} ausgewaehlt.")
                } else {
                    format!("Keine Session mit id {id}.")
                }
            }

            OperatorBefehl::Rundruf(text) => {
                let gesendet = rundruf(&self.zustand, &text).await;
                format!("Rundruf an {gesendet} Session(s) gesendet.")
            }

            OperatorBefehl::Sprache(code) => match register.auswahl() {
                None => "Erst eine Session auswaehlen: /select <id>".to_string(),
                Some(id) => {
                    if register.sprache_setzen(id, &code) {
                        format!("Zielsprache fuer Session {id} ist jetzt '{code}'.")
                    } else {
                        "Die ausgewaehlte Session existiert nicht mehr.".to_string()
                    }
                }
            },

            OperatorBefehl::Sprachausgabe(an) => match register.auswahl() {
                None => "Erst eine Session auswaehlen: /select <id>".to_string(),
                Some(id) => {
                    if register.sprachausgabe_setzen(id, an) {
                        let zustand = if an { "an" } else { "aus" };
                        format!("Sprachausgabe fuer Session {id} ist {zustand}.")
                    } else {
                        "Die ausgewaehlte Session existiert nicht mehr.".to_string()
                    }
                }
            },

            OperatorBefehl::Direkt(text) => match register.auswahl() {
                None => {
                    "Keine Session ausgewaehlt. /list und /select <id>, oder /all <text>."
                        .to_string()
                }
                Some(id) => match senden(&self.zustand, id, &text).await {
                    Ok(()) => format!("Gesendet an Session {id}."),
                    Err(TelexError::SessionNichtGefunden(id)) => {
                        format!("Keine Session mit id {id}.")
                    }
                    Err(e) => format!("Senden fehlgeschlagen: {e}"),
                },
            },

            OperatorBefehl::Ungueltig(verwendung) => verwendung.to_string(),

            OperatorBefehl::Beenden => {
                let anzahl = register.alle_entfernen();
                return BefehlsErgebnis::Beenden(format!(
                    "{anzahl} Verbindung(en) geschlossen. Server endet."
                ));
            }
        };

        BefehlsErgebnis::Ausgabe(ausgabe)
    }
}

// ---------------------------------------------------------------------------
// Eingabeschleife
// ---------------------------------------------------------------------------

/// Die Bedienerschleife: liest stdin bis `/quit` oder EOF
///
/// Sendet beim Beenden das Shutdown-Signal an Annahme und Horcher.
pub async fn bediener_schleife(
    ausfuehrer: BefehlsAusfuehrer,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
) {
    println!("{BEFEHLS_HILFE}");

    let mut zeilen = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nServer> ");
        let _ = std::io::stdout().flush();

        match zeilen.next_line().await {
            Ok(Some(zeile)) => {
                let Some(befehl) = parse_zeile(&zeile) else {
                    continue;
                };
                match ausfuehrer.ausfuehren(befehl).await {
                    BefehlsErgebnis::Ausgabe(text) => println!("{text}"),
                    BefehlsErgebnis::Beenden(text) => {
                        println!("{text}");
                        break;
                    }
                }
            }
            // stdin zu Ende: wie /quit behandeln
            Ok(None) => {
                if let BefehlsErgebnis::Beenden(text) =
                    ausfuehrer.ausfuehren(OperatorBefehl::Beenden).await
                {
                    println!("{text}");
                }
                break;
            }
            Err(e) => {
                tracing::warn!(fehler = %e, "Bedienereingabe nicht lesbar");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    tracing::info!("Bedienerschleife beendet");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
