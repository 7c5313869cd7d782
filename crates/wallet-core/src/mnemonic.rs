use bip39::{Language, Mnemonic};
use crypto_utils::random::MIN_ENTROPY_LEN;
use crypto_utils::{EntropySource, ZeroizingBytes, ZeroizingString};

use crate::error::WalletError;

/// Words produced by [`entropy_to_mnemonic`].
pub const QUICK_MNEMONIC_WORDS: usize = 12;

/// Entropy length of a 12-word BIP-39 phrase.
pub const BIP39_ENTROPY_LEN: usize = 16;

/// Entropy drawn for a quick wallet: two bytes per word, so no index wraps.
pub const QUICK_ENTROPY_LEN: usize = 2 * QUICK_MNEMONIC_WORDS;

/// Renders entropy as 12 words from the English BIP-39 list.
///
/// Word `i` is `((b[2i mod n] << 8) | b[(2i + 1) mod n]) mod 2048`. With
/// fewer than [`QUICK_ENTROPY_LEN`] bytes the tail words repeat the head.
/// The same entropy always yields the same words. No BIP-39 checksum is
/// computed, so the phrase usually fails validation and never recovers the
/// key. Only the quick-wallet path uses it.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<ZeroizingString, WalletError> {
    if entropy.len() < MIN_ENTROPY_LEN {
        return Err(WalletError::Entropy(format!(
            "need at least {MIN_ENTROPY_LEN} bytes, got {}",
            entropy.len()
        )));
    }

    let words = word_list();
    let n = entropy.len();
    let phrase = (0..QUICK_MNEMONIC_WORDS)
        .map(|i| {
            let hi = entropy[(2 * i) % n] as usize;
            let lo = entropy[(2 * i + 1) % n] as usize;
            words[((hi << 8) | lo) % words.len()]
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ZeroizingString::new(phrase))
}

/// Encodes entropy as a standard BIP-39 phrase (16 bytes -> 12 words).
pub fn entropy_to_bip39(entropy: &[u8]) -> Result<ZeroizingString, WalletError> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| WalletError::Entropy(e.to_string()))?;
    Ok(ZeroizingString::new(mnemonic.to_string()))
}

/// Generate a new 12-word BIP-39 mnemonic from the given source
pub fn generate_mnemonic(source: &mut dyn EntropySource) -> Result<ZeroizingString, WalletError> {
    let entropy = source.entropy(BIP39_ENTROPY_LEN)?;
    entropy_to_bip39(&entropy)
}

/// Validate a mnemonic phrase (word list membership and checksum)
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

/// Like [`validate_mnemonic`], but explains the first problem found.
pub fn check_mnemonic(phrase: &str) -> Result<(), WalletError> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() {
        return Err(WalletError::InvalidMnemonic("phrase is empty".into()));
    }
    if words.len() % 3 != 0 || !(12..=24).contains(&words.len()) {
        return Err(WalletError::InvalidMnemonic(format!(
            "expected 12, 15, 18, 21 or 24 words, got {}",
            words.len()
        )));
    }
    if let Some(position) = words.iter().position(|w| !is_valid_word(w)) {
        return Err(WalletError::InvalidMnemonic(format!(
            "word {} is not in the word list",
            position + 1
        )));
    }

    Mnemonic::parse_in_normalized(Language::English, phrase)
        .map(|_| ())
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

/// Derive the 64-byte BIP-39 seed from mnemonic + passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<ZeroizingBytes, WalletError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

    Ok(ZeroizingBytes::new(mnemonic.to_seed(passphrase).to_vec()))
}

/// The English BIP-39 word list
pub fn word_list() -> &'static [&'static str] {
    Language::English.word_list()
}

/// Validate a single word against the BIP-39 word list
pub fn is_valid_word(word: &str) -> bool {
    Language::English.find_word(word).is_some()
}
