//! Schlagwort-Klassifikation fuer die automatische Antwort
//!
//! Reine Funktion ohne Zustand: die eingehende Nachricht wird
//! kleingeschrieben und gegen feste Schlagwort-Gruppen geprueft
//! (Begruessung, Befinden, Preis, Abschied); der erste Treffer gewinnt.
//! Die Pruefung ist bewusst eine Teilstring-Suche, keine Wortgrenzen.

/// Antwort auf Begruessungen
const ANTWORT_BEGRUESSUNG: &str = "Hello! I am currently away, I'll reply properly soon.";
/// Antwort auf Befindensfragen
const ANTWORT_BEFINDEN: &str = "I'm fine, thank you! How about you?";
/// Antwort auf Preis-/Kostenfragen
const ANTWORT_PREIS: &str = "Can you share more details so I can help with that?";
/// Antwort auf Abschiede
const ANTWORT_ABSCHIED: &str = "Goodbye! Talk later.";
/// Rueckfall-Antwort wenn nichts passt
const ANTWORT_STANDARD: &str = "Thanks for your message. I'll get back to you shortly.";

/// Waehlt die Standardantwort fuer eine eingehende Nachricht
pub fn automatische_antwort(nachricht: &str) -> &'static str {
    let text = nachricht.to_lowercase();

    if ["hello", "hi", "hey"].iter().any(|g| text.contains(g)) {
        return ANTWORT_BEGRUESSUNG;
    }
    if text.contains("how are you") || text.contains("how r u") {
        return ANTWORT_BEFINDEN;
    }
    if text.contains("price") || text.contains("cost") {
        return ANTWORT_PREIS;
    }
    if text.contains("bye") || text.contains("exit") {
        return ANTWORT_ABSCHIED;
    }
    ANTWORT_STANDARD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begruessung() {
        assert_eq!(automatische_antwort("Hello there"), ANTWORT_BEGRUESSUNG);
        assert_eq!(automatische_antwort("HEY!"), ANTWORT_BEGRUESSUNG);
    }

    #[test]
    fn befinden() {
        assert_eq!(automatische_antwort("How are you today?"), ANTWORT_BEFINDEN);
        assert_eq!(automatische_antwort("how r u"), ANTWORT_BEFINDEN);
    }

    #[test]
    fn preis() {
        assert_eq!(automatische_antwort("what is the price?"), ANTWORT_PREIS);
        assert_eq!(automatische_antwort("total COST please"), ANTWORT_PREIS);
    }

    #[test]
    fn abschied() {
        assert_eq!(automatische_antwort("ok bye"), ANTWORT_ABSCHIED);
        assert_eq!(automatische_antwort("I will exit now"), ANTWORT_ABSCHIED);
    }

    #[test]
    fn rueckfall() {
        assert_eq!(
            automatische_antwort("can you send the report?"),
            ANTWORT_STANDARD
        );
        assert_eq!(automatische_antwort(""), ANTWORT_STANDARD);
    }

    #[test]
    fn erster_treffer_gewinnt() {
        // Begruessung steht vor Abschied in der Pruefreihenfolge
        assert_eq!(automatische_antwort("hello and bye"), ANTWORT_BEGRUESSUNG);
    }

    #[test]
    fn teilstring_semantik() {
        // "hi" trifft auch mitten im Wort – beabsichtigtes Verhalten
        assert_eq!(automatische_antwort("this"), ANTWORT_BEGRUESSUNG);
    }
}
