use bip39::Mnemonic;
use sha2::{Digest, Sha256};

use crate::constants::NODE_TITLE_WORDS;

/// Derive the display title of a node from its id.
///
/// Hex ids (an optional `0x` prefix and `#session` suffix are ignored) of a
/// valid BIP-39 entropy length are encoded directly, anything else goes
/// through SHA-256 first. Words 2-4 of the English mnemonic are
/// capitalized and joined, e.g. `"Quarter Moral Gallery"`.
pub fn node_title(id: &str) -> String {
    let entropy = hex_entropy(id).unwrap_or_else(|| Sha256::digest(id.as_bytes()).to_vec());
    let phrase = match Mnemonic::from_entropy(&entropy) {
        Ok(m) => m.to_string(),
        // sha256 output is always valid entropy
        Err(_) => return id.to_string(),
    };
    phrase
        .split_whitespace()
        .skip(1)
        .take(NODE_TITLE_WORDS)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn hex_entropy(id: &str) -> Option<Vec<u8>> {
    let address = id.split('#').next().unwrap_or(id);
    let address = address.strip_prefix("0x").unwrap_or(address);
    let bytes = hex::decode(address).ok()?;
    match bytes.len() {
        16 | 20 | 24 | 28 | 32 => Some(bytes),
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
