//! Session-Schluessel und Nachrichten-Token
//!
//! Pro Verbindung wird ein frischer symmetrischer Schluessel erzeugt und
//! als ALLERERSTE Bytes roh an den Peer uebertragen – unverschluesselt und
//! unauthentifiziert. Das ist eine bekannte Schwaeche des bestehenden
//! Draht-Kontrakts und wird hier bewusst beibehalten statt still durch
//! einen ausgehandelten Handshake ersetzt.
//!
//! ## Token-Format
//! ```text
//! [nonce(12)] [ciphertext + auth_tag(16)]
//! ```
//!
//! Die Nonce wird pro Nachricht zufaellig erzeugt. Ein Token das nicht
//! entschluesselt werden kann (falscher Schluessel, abgeschnitten,
//! manipuliert) wird verworfen; die Session bleibt bestehen.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

use telex_core::{Result, TelexError};

/// Laenge des rohen Session-Schluessels in Bytes
pub const SCHLUESSEL_LAENGE: usize = 32;

/// Laenge der Nonce am Token-Anfang in Bytes
pub const NONCE_LAENGE: usize = 12;

/// Laenge des Authentifizierungs-Tags am Token-Ende in Bytes
pub const TAG_LAENGE: usize = 16;

// ---------------------------------------------------------------------------
// SessionKey
// ---------------------------------------------------------------------------

/// Roher symmetrischer Session-Schluessel (32 Bytes)
///
/// Wird pro Session frisch erzeugt, nie persistiert und nie ueber
/// Sessions hinweg wiederverwendet.
#[derive(Clone)]
pub struct SessionKey {
    bytes: [u8; SCHLUESSEL_LAENGE],
}

impl SessionKey {
    /// Erzeugt einen frischen zufaelligen Schluessel
    pub fn generieren() -> Self {
        let mut bytes = [0u8; SCHLUESSEL_LAENGE];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Erstellt einen Schluessel aus rohen Bytes (Peer-Seite des Handoffs)
    pub fn aus_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SCHLUESSEL_LAENGE] =
            bytes.try_into().map_err(|_| TelexError::SchluesselLaenge {
                erwartet: SCHLUESSEL_LAENGE,
                erhalten: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Gibt die rohen Schluessel-Bytes zurueck (fuer den Draht-Handoff)
    pub fn as_bytes(&self) -> &[u8; SCHLUESSEL_LAENGE] {
        &self.bytes
    }

    /// Kurzer Fingerabdruck fuer Logausgaben (nie der ganze Schluessel)
    pub fn fingerabdruck(&self) -> String {
        STANDARD.encode(&self.bytes[..6])
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Schluesselmaterial darf nie im Klartext in Logs landen
        write!(f, "SessionKey({}..)", self.fingerabdruck())
    }
}

// ---------------------------------------------------------------------------
// SessionCipher
// ---------------------------------------------------------------------------

/// Symmetrischer Cipher einer Session (AES-256-GCM)
///
/// Beide Seiten der Verbindung konstruieren ihn aus demselben
/// [`SessionKey`]. `encrypt`/`decrypt` arbeiten auf ganzen Tokens.
pub struct SessionCipher {
    cipher: Aes256Gcm,
}

impl SessionCipher {
    /// Erstellt den Cipher aus einem Session-Schluessel
    pub fn neu(schluessel: &SessionKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(schluessel.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Verschluesselt einen Klartext zu einem Token
    pub fn encrypt(&self, klartext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LAENGE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, klartext)
            .map_err(|e| TelexError::Verschluesselung(e.to_string()))?;

        let mut token = Vec::with_capacity(NONCE_LAENGE + ciphertext.len());
        token.extend_from_slice(&nonce_bytes);
        token.extend_from_slice(&ciphertext);
        Ok(token)
    }

    /// Entschluesselt ein Token zurueck zum Klartext
    ///
    /// Schlaegt fehl wenn das Token zu kurz, manipuliert oder mit einem
    /// fremden Schluessel erzeugt ist.
    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>> {
        if token.len() < NONCE_LAENGE + TAG_LAENGE {
            return Err(TelexError::Entschluesselung(format!(
                "Token zu kurz: {} Bytes",
                token.len()
            )));
        }

        let (nonce_bytes, ciphertext) = token.split_at(NONCE_LAENGE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| TelexError::Entschluesselung(e.to_string()))
    }
}

impl std::fmt::Debug for SessionCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionCipher")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let schluessel = SessionKey::generieren();
        let cipher = SessionCipher::neu(&schluessel);

        let token = cipher.encrypt(b"hello relay").unwrap();
        let klartext = cipher.decrypt(&token).unwrap();
        assert_eq!(klartext, b"hello relay");
    }

    #[test]
    fn token_hat_nonce_und_tag_overhead() {
        let cipher = SessionCipher::neu(&SessionKey::generieren());
        let token = cipher.encrypt(b"x").unwrap();
        assert_eq!(token.len(), NONCE_LAENGE + 1 + TAG_LAENGE);
    }

    #[test]
    fn fremder_schluessel_schlaegt_fehl() {
        let cipher_a = SessionCipher::neu(&SessionKey::generieren());
        let cipher_b = SessionCipher::neu(&SessionKey::generieren());

        let token = cipher_a.encrypt(b"geheim").unwrap();
        assert!(cipher_b.decrypt(&token).is_err());
    }

    #[test]
    fn manipuliertes_token_schlaegt_fehl() {
        let cipher = SessionCipher::neu(&SessionKey::generieren());
        let mut token = cipher.encrypt(b"unverfaelscht").unwrap();
        let letzte = token.len() - 1;
        token[letzte] ^= 0xFF;
        assert!(cipher.decrypt(&token).is_err());
    }

    #[test]
    fn abgeschnittenes_token_schlaegt_fehl() {
        let cipher = SessionCipher::neu(&SessionKey::generieren());
        let token = cipher.encrypt(b"lang genug").unwrap();
        assert!(cipher.decrypt(&token[..NONCE_LAENGE + TAG_LAENGE - 1]).is_err());
        assert!(cipher.decrypt(&[]).is_err());
    }

    #[test]
    fn gleicher_klartext_ergibt_verschiedene_tokens() {
        // Zufaellige Nonce pro Nachricht
        let cipher = SessionCipher::neu(&SessionKey::generieren());
        let a = cipher.encrypt(b"wiederholt").unwrap();
        let b = cipher.encrypt(b"wiederholt").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn schluessel_aus_bytes_laengenpruefung() {
        assert!(SessionKey::aus_bytes(&[0u8; 32]).is_ok());
        assert!(SessionKey::aus_bytes(&[0u8; 16]).is_err());
        assert!(SessionKey::aus_bytes(&[]).is_err());
    }

    #[test]
    fn beide_seiten_teilen_den_schluessel() {
        // Peer konstruiert seinen Cipher aus den rohen Handoff-Bytes
        let server_schluessel = SessionKey::generieren();
        let peer_schluessel = SessionKey::aus_bytes(server_schluessel.as_bytes()).unwrap();

        let server = SessionCipher::neu(&server_schluessel);
        let peer = SessionCipher::neu(&peer_schluessel);

        let token = server.encrypt(b"vom Server").unwrap();
        assert_eq!(peer.decrypt(&token).unwrap(), b"vom Server");

        let token = peer.encrypt(b"vom Peer").unwrap();
        assert_eq!(server.decrypt(&token).unwrap(), b"vom Peer");
    }

    #[test]
    fn debug_verraet_keinen_schluessel() {
        let schluessel = SessionKey::generieren();
        let debug = format!("{:?}", schluessel);
        assert!(!debug.contains(&STANDARD.encode(schluessel.as_bytes())));
    }
}
