//! Gemeinsame Identifikationstypen fuer Telex
//!
//! Session-Ids verwenden das Newtype-Pattern um Verwechslungen mit anderen
//! Zahlenwerten zur Compilezeit auszuschliessen. Ids werden vom Register
//! streng monoton vergeben und innerhalb eines Prozesslebens nie wiederholt.

/// Eindeutige Session-ID eines verbundenen Peers
///
/// Positiv, streng steigend, wird nie wiederverwendet. Die Vergabe erfolgt
/// ausschliesslich durch das `SessionRegister`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Gibt den inneren Zahlenwert zurueck
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SessionId {
    fn from(wert: u64) -> Self {
        Self(wert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_display_ist_nackte_zahl() {
        assert_eq!(SessionId(7).to_string(), "7");
    }

    #[test]
    fn session_id_ordnung() {
        assert!(SessionId(1) < SessionId(2));
        assert_eq!(SessionId(3), SessionId::from(3));
    }
}
