//! Externe Kollaborateure – Uebersetzung und Sprachausgabe
//!
//! Beide Dienste sind Black Boxes hinter Trait-Naehten. Der Kern
//! funktioniert vollstaendig mit den mitgelieferten Durchreich- bzw.
//! Stumm-Implementierungen; echte Engines werden beim Serverstart
//! eingehaengt.

use async_trait::async_trait;

use telex_core::Result;

// ---------------------------------------------------------------------------
// Uebersetzer
// ---------------------------------------------------------------------------

/// Uebersetzt Nachrichtentext in eine Zielsprache
///
/// Implementierungen duerfen fehlschlagen; Aufrufer degradieren dann auf
/// den Originaltext (siehe [`uebersetzen_oder_original`]).
#[async_trait]
pub trait Uebersetzer: Send + Sync {
    async fn uebersetzen(&self, text: &str, ziel_sprache: &str) -> Result<String>;
}

/// Durchreich-Implementierung: gibt den Text unveraendert zurueck
pub struct DurchreichUebersetzer;

#[async_trait]
impl Uebersetzer for DurchreichUebersetzer {
    async fn uebersetzen(&self, text: &str, _ziel_sprache: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Uebersetzt oder faellt leise auf den Originaltext zurueck
pub async fn uebersetzen_oder_original(
    uebersetzer: &dyn Uebersetzer,
    text: &str,
    ziel_sprache: &str,
) -> String {
    match uebersetzer.uebersetzen(text, ziel_sprache).await {
        Ok(uebersetzt) => uebersetzt,
        Err(e) => {
            tracing::warn!(fehler = %e, ziel = ziel_sprache, "Uebersetzung fehlgeschlagen, verwende Original");
            text.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Sprachausgabe
// ---------------------------------------------------------------------------

/// Liest Text auf der Server-Konsole vor (best effort)
///
/// Es gibt EINEN prozessweiten Handle fuer alle Sessions; gleichzeitige
/// Nutzung durch mehrere Sessions ist fuer uebliche Engines unsicher,
/// Implementierungen muessen den Engine-Zugriff darum intern
/// serialisieren. Fehler werden verschluckt.
#[async_trait]
pub trait Sprachausgabe: Send + Sync {
    async fn sprechen(&self, text: &str);
}

/// Stumme Implementierung: tut nichts
pub struct StummeAusgabe;

#[async_trait]
impl Sprachausgabe for StummeAusgabe {
    async fn sprechen(&self, _text: &str) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use telex_core::TelexError;

    struct KaputterUebersetzer;

    #[async_trait]
    impl Uebersetzer for KaputterUebersetzer {
        async fn uebersetzen(&self, _text: &str, _ziel: &str) -> Result<String> {
            Err(TelexError::Uebersetzung("Dienst nicht erreichbar".into()))
        }
    }

    #[tokio::test]
    async fn durchreich_gibt_original_zurueck() {
        let u = DurchreichUebersetzer;
        assert_eq!(u.uebersetzen("hallo", "fr").await.unwrap(), "hallo");
    }

    #[tokio::test]
    async fn fehlschlag_degradiert_auf_original() {
        let text = uebersetzen_oder_original(&KaputterUebersetzer, "hello", "de").await;
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn stumme_ausgabe_schluckt_alles() {
        StummeAusgabe.sprechen("wird nie gesprochen").await;
    }
}
