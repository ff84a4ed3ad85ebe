//! SessionRegister – Nebenlaeufige Session-Tabelle mit Id-Vergabe
//!
//! Ein einziger grober Mutex schuetzt Tabelle, Id-Zaehler und die
//! Bediener-Auswahl gemeinsam. Das ist bewusst so: die kritischen
//! Abschnitte sind kurz, und der Debounce-Check der Autoantwort muss
//! denselben Lock sehen wie das Setzen des Antwort-Zeitstempels im
//! Sendepfad – sonst entsteht ein klassisches check-then-act-Rennen.
//!
//! Unter dem Lock findet NIE Netzwerk-I/O statt; alle Iterationen
//! arbeiten auf herauskopierten Schnappschuessen.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use telex_core::SessionId;
use telex_protocol::SessionCipher;

use crate::session::{Session, SessionInfo, SessionSchreiber};

/// Handles fuer eine vorbereitete Sendung
///
/// Wird unter dem Register-Lock herausgereicht; das eigentliche
/// Verschluesseln und Schreiben passiert danach ohne Lock.
pub struct SendeHandles {
    pub cipher: Arc<SessionCipher>,
    pub schreiber: SessionSchreiber,
}

struct RegisterInner {
    sessions: HashMap<SessionId, Session>,
    /// Naechste zu vergebende Id; beginnt bei 1, zaehlt nur aufwaerts
    naechste_id: u64,
    /// Vom Bediener ausgewaehlte Session
    auswahl: Option<SessionId>,
}

/// Nebenlaeufige Session-Tabelle
///
/// Thread-safe via Arc + Mutex. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct SessionRegister {
    inner: Arc<Mutex<RegisterInner>>,
}

impl SessionRegister {
    /// Erstellt ein leeres Register
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegisterInner {
                sessions: HashMap::new(),
                naechste_id: 1,
                auswahl: None,
            })),
        }
    }

    /// Vergibt die naechste Id (streng steigend, nie wiederverwendet)
    pub fn id_vergeben(&self) -> SessionId {
        let mut inner = self.inner.lock();
        let id = SessionId(inner.naechste_id);
        inner.naechste_id += 1;
        id
    }

    /// Fuegt eine fertig aufgebaute Session ein
    pub fn einfuegen(&self, session: Session) {
        let id = session.id;
        self.inner.lock().sessions.insert(id, session);
        tracing::debug!(session = %id, "Session registriert");
    }

    /// Entfernt eine Session; loescht die Auswahl falls sie hierher zeigte
    ///
    /// Gibt true zurueck wenn die Session existierte.
    pub fn entfernen(&self, id: SessionId) -> bool {
        let mut inner = self.inner.lock();
        let entfernt = inner.sessions.remove(&id).is_some();
        if entfernt && inner.auswahl == Some(id) {
            inner.auswahl = None;
        }
        entfernt
    }

    /// Entfernt alle Sessions und loescht die Auswahl (Shutdown)
    ///
    /// Mit dem Entfernen fallen die Schreibhaelften der Sockets und die
    /// Verbindungen werden geschlossen.
    pub fn alle_entfernen(&self) -> usize {
        let mut inner = self.inner.lock();
        let anzahl = inner.sessions.len();
        inner.sessions.clear();
        inner.auswahl = None;
        anzahl
    }

    /// Anzahl der aktiven Sessions
    pub fn anzahl(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    /// Waehlt eine Session aus, sofern sie existiert
    ///
    /// Eine bestehende Auswahl bleibt bei unbekannter Id unveraendert.
    pub fn auswaehlen(&self, id: SessionId) -> bool {
        let mut inner = self.inner.lock();
        if inner.sessions.contains_key(&id) {
            inner.auswahl = Some(id);
            true
        } else {
            false
        }
    }

    /// Gibt die aktuelle Bediener-Auswahl zurueck
    pub fn auswahl(&self) -> Option<SessionId> {
        self.inner.lock().auswahl
    }

    /// Schnappschuss aller Sessions fuer die Anzeige, nach Id sortiert
    pub fn uebersicht(&self) -> Vec<SessionInfo> {
        let inner = self.inner.lock();
        let mut infos: Vec<SessionInfo> = inner
            .sessions
            .values()
            .map(|s| SessionInfo {
                id: s.id,
                adresse: s.adresse,
                ziel_sprache: s.ziel_sprache.clone(),
            })
            .collect();
        infos.sort_by_key(|i| i.id);
        infos
    }

    /// Schnappschuss aller Session-Ids, nach Id sortiert (fuer Rundruf)
    pub fn session_ids(&self) -> Vec<SessionId> {
        let inner = self.inner.lock();
        let mut ids: Vec<SessionId> = inner.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Setzt die Zielsprache einer Session
    pub fn sprache_setzen(&self, id: SessionId, sprache: &str) -> bool {
        let mut inner = self.inner.lock();
        match inner.sessions.get_mut(&id) {
            Some(session) => {
                session.ziel_sprache = sprache.to_string();
                true
            }
            None => false,
        }
    }

    /// Schaltet die Sprachausgabe einer Session
    pub fn sprachausgabe_setzen(&self, id: SessionId, an: bool) -> bool {
        let mut inner = self.inner.lock();
        match inner.sessions.get_mut(&id) {
            Some(session) => {
                session.sprachausgabe = an;
                true
            }
            None => false,
        }
    }

    /// Anzeige-Einstellungen einer Session: (Zielsprache, Sprachausgabe an)
    pub fn ziel_einstellungen(&self, id: SessionId) -> Option<(String, bool)> {
        let inner = self.inner.lock();
        inner
            .sessions
            .get(&id)
            .map(|s| (s.ziel_sprache.clone(), s.sprachausgabe))
    }

    /// Bereitet eine Sendung vor: setzt den Antwort-Zeitstempel und gibt
    /// Cipher- und Schreiber-Handles heraus
    ///
    /// Der Zeitstempel ist damit gesetzt BEVOR auch nur ein Byte den
    /// Socket verlaesst. Automatische Antworten laufen ueber denselben
    /// Pfad und zaehlen darum ebenfalls als Antwort – das verhindert
    /// Autoantwort-Ketten.
    pub fn senden_vormerken(&self, id: SessionId) -> Option<SendeHandles> {
        let mut inner = self.inner.lock();
        let session = inner.sessions.get_mut(&id)?;
        session.letzte_manuelle_antwort = Some(Instant::now());
        Some(SendeHandles {
            cipher: Arc::clone(&session.cipher),
            schreiber: Arc::clone(&session.schreiber),
        })
    }

    /// Prueft ob eine Autoantwort fuer eine Nachricht mit Ankunftszeit
    /// `ankunft` noch faellig ist
    ///
    /// Nicht faellig wenn die Session verschwunden ist oder seit der
    /// Ankunft bereits eine Antwort rausging. Laeuft unter demselben Lock
    /// wie [`senden_vormerken`](Self::senden_vormerken).
    pub fn autoantwort_faellig(&self, id: SessionId, ankunft: Instant) -> bool {
        let inner = self.inner.lock();
        match inner.sessions.get(&id) {
            None => false,
            Some(session) => match session.letzte_manuelle_antwort {
                Some(antwort) => antwort <= ankunft,
                None => true,
            },
        }
    }
}

impl Default for SessionRegister {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use telex_protocol::SessionKey;
    use tokio::net::{TcpListener, TcpStream};

    /// Baut eine Session ueber ein echtes Socket-Paar und registriert sie
    async fn test_session(register: &SessionRegister) -> (SessionId, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let adresse = listener.local_addr().unwrap();
        let peer = TcpStream::connect(adresse).await.unwrap();
        let (stream, peer_adresse) = listener.accept().await.unwrap();

        let cipher = Arc::new(SessionCipher::neu(&SessionKey::generieren()));
        let (_lese, schreib) = stream.into_split();

        let id = register.id_vergeben();
        register.einfuegen(Session::neu(
            id,
            peer_adresse,
            cipher,
            "en".into(),
            Arc::new(tokio::sync::Mutex::new(schreib)),
        ));
        (id, peer)
    }

    #[test]
    fn ids_streng_steigend_und_nie_wiederverwendet() {
        let register = SessionRegister::neu();
        let a = register.id_vergeben();
        let b = register.id_vergeben();
        assert_eq!(a, SessionId(1));
        assert_eq!(b, SessionId(2));

        // Auch nach einem Fehlschlag (Id verbraucht, nie eingefuegt)
        // geht es nur aufwaerts weiter
        let c = register.id_vergeben();
        assert_eq!(c, SessionId(3));
    }

    #[tokio::test]
    async fn einfuegen_und_entfernen() {
        let register = SessionRegister::neu();
        let (id, _peer) = test_session(&register).await;

        assert_eq!(register.anzahl(), 1);
        assert!(register.entfernen(id));
        assert_eq!(register.anzahl(), 0);
        assert!(!register.entfernen(id), "Doppeltes Entfernen ist kein Treffer");
    }

    #[tokio::test]
    async fn entfernen_loescht_passende_auswahl() {
        let register = SessionRegister::neu();
        let (id_a, _peer_a) = test_session(&register).await;
        let (id_b, _peer_b) = test_session(&register).await;

        assert!(register.auswaehlen(id_a));
        register.entfernen(id_a);
        assert_eq!(register.auswahl(), None);

        // Fremde Auswahl bleibt beim Entfernen anderer Sessions stehen
        assert!(register.auswaehlen(id_b));
        let (id_c, _peer_c) = test_session(&register).await;
        register.entfernen(id_c);
        assert_eq!(register.auswahl(), Some(id_b));
    }

    #[tokio::test]
    async fn auswahl_unbekannter_id_bleibt_unveraendert() {
        let register = SessionRegister::neu();
        let (id, _peer) = test_session(&register).await;

        assert!(register.auswaehlen(id));
        assert!(!register.auswaehlen(SessionId(999)));
        assert_eq!(register.auswahl(), Some(id));
    }

    #[tokio::test]
    async fn uebersicht_ist_sortiert_und_zeigt_sprache() {
        let register = SessionRegister::neu();
        let (id_a, _peer_a) = test_session(&register).await;
        let (id_b, _peer_b) = test_session(&register).await;

        assert!(register.sprache_setzen(id_b, "fr"));

        let infos = register.uebersicht();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].id, id_a);
        assert_eq!(infos[0].ziel_sprache, "en");
        assert_eq!(infos[1].id, id_b);
        assert_eq!(infos[1].ziel_sprache, "fr");
    }

    #[tokio::test]
    async fn sprache_und_sprachausgabe_nur_fuer_existierende() {
        let register = SessionRegister::neu();
        let (id, _peer) = test_session(&register).await;

        assert!(register.sprachausgabe_setzen(id, true));
        assert_eq!(register.ziel_einstellungen(id), Some(("en".into(), true)));

        assert!(!register.sprache_setzen(SessionId(42), "de"));
        assert!(!register.sprachausgabe_setzen(SessionId(42), true));
        assert_eq!(register.ziel_einstellungen(SessionId(42)), None);
    }

    #[tokio::test]
    async fn autoantwort_faellig_ohne_antwort() {
        let register = SessionRegister::neu();
        let (id, _peer) = test_session(&register).await;

        let ankunft = Instant::now();
        assert!(register.autoantwort_faellig(id, ankunft));
    }

    #[tokio::test]
    async fn vormerken_unterdrueckt_aeltere_ankunft() {
        let register = SessionRegister::neu();
        let (id, _peer) = test_session(&register).await;

        let ankunft = Instant::now();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(register.senden_vormerken(id).is_some());

        // Antwort kam NACH der Ankunft -> Autoantwort unterdrueckt
        assert!(!register.autoantwort_faellig(id, ankunft));

        // Eine spaeter angekommene Nachricht ist davon unberuehrt
        tokio::time::sleep(Duration::from_millis(5)).await;
        let neue_ankunft = Instant::now();
        assert!(register.autoantwort_faellig(id, neue_ankunft));
    }

    #[tokio::test]
    async fn fehlende_session_ist_nie_faellig() {
        let register = SessionRegister::neu();
        assert!(!register.autoantwort_faellig(SessionId(1), Instant::now()));
        assert!(register.senden_vormerken(SessionId(1)).is_none());
    }

    #[tokio::test]
    async fn alle_entfernen_raeumt_auf() {
        let register = SessionRegister::neu();
        let (id, _peer_a) = test_session(&register).await;
        let (_id_b, _peer_b) = test_session(&register).await;

        register.auswaehlen(id);
        assert_eq!(register.alle_entfernen(), 2);
        assert_eq!(register.anzahl(), 0);
        assert_eq!(register.auswahl(), None);
        assert!(register.session_ids().is_empty());
    }

    #[tokio::test]
    async fn clone_teilt_inneren_zustand() {
        let register_a = SessionRegister::neu();
        let register_b = register_a.clone();
        let (id, _peer) = test_session(&register_a).await;
        assert_eq!(register_b.anzahl(), 1);
        assert!(register_b.auswaehlen(id));
    }
}
