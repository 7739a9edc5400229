//! Waves address representation and utilities.

use std::fmt;
use std::str::FromStr;

use super::hash::secure_hash;
use super::DeriveError;

/// Length of a raw address: version, chain id, 20-byte hash, 4-byte checksum.
pub const ADDRESS_BYTES: usize = 26;

/// Address format version.
pub const ADDRESS_VERSION: u8 = 1;

/// Length of a base58-encoded address.
pub const ADDRESS_CHARS: usize = 35;

/// The Waves network an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Chain id `W`, addresses start with `3P`
    #[default]
    Mainnet,
    /// Chain id `T`
    Testnet,
    /// Chain id `S`
    Stagenet,
}

impl Network {
    /// Returns the chain id byte embedded in addresses.
    pub const fn chain_id(self) -> u8 {
        match self {
            Network::Mainnet => b'W',
            Network::Testnet => b'T',
            Network::Stagenet => b'S',
        }
    }

    /// Returns the characters every base58 address on this network starts
    /// with, e.g. `3P` on mainnet.
    pub fn address_lead(self) -> String {
        let mut lowest = [0x00; ADDRESS_BYTES];
        let mut highest = [0xff; ADDRESS_BYTES];
        for bytes in [&mut lowest, &mut highest] {
            bytes[0] = ADDRESS_VERSION;
            bytes[1] = self.chain_id();
        }

        // Base58 digits sort like their values and every address has the
        // same length, so the shared head of the extremes is fixed.
        let lowest = bs58::encode(lowest).into_string();
        let highest = bs58::encode(highest).into_string();
        lowest
            .chars()
            .zip(highest.chars())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect()
    }

    pub fn from_chain_id(id: u8) -> Option<Self> {
        match id {
            b'W' => Some(Network::Mainnet),
            b'T' => Some(Network::Testnet),
            b'S' => Some(Network::Stagenet),
            _ => None,
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "w" => Ok(Network::Mainnet),
            "testnet" | "test" | "t" => Ok(Network::Testnet),
            "stagenet" | "stage" | "s" => Ok(Network::Stagenet),
            _ => Err(format!("Unknown network: {}", s)),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Stagenet => write!(f, "stagenet"),
        }
    }
}

/// A Waves address (26 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Derives the address of a public key on a network.
    ///
    /// Layout: `version || chain id || secure_hash(pk)[..20] || checksum`,
    /// where the checksum is the first 4 bytes of the secure hash of the
    /// preceding 22 bytes.
    pub fn from_public_key(public_key: &[u8; 32], network: Network) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = network.chain_id();
        bytes[2..22].copy_from_slice(&secure_hash(public_key)[..20]);

        let checksum = secure_hash(&bytes[..22]);
        bytes[22..].copy_from_slice(&checksum[..4]);

        Self(bytes)
    }

    /// Parses a base58 address and verifies its version and checksum.
    pub fn from_base58(encoded: &str) -> Result<Self, DeriveError> {
        let decoded = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| DeriveError::InvalidAddress(e.to_string()))?;

        let bytes: [u8; ADDRESS_BYTES] = decoded.try_into().map_err(|v: Vec<u8>| {
            DeriveError::InvalidAddress(format!("expected {} bytes, got {}", ADDRESS_BYTES, v.len()))
        })?;

        if bytes[0] != ADDRESS_VERSION {
            return Err(DeriveError::InvalidAddress(format!(
                "unsupported version {}",
                bytes[0]
            )));
        }

        let checksum = secure_hash(&bytes[..22]);
        if bytes[22..] != checksum[..4] {
            return Err(DeriveError::InvalidAddress("checksum mismatch".into()));
        }

        Ok(Self(bytes))
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Returns the network this address was derived for, if known.
    pub fn network(&self) -> Option<Network> {
        Network::from_chain_id(self.0[1])
    }

    /// Returns the base58 form used everywhere addresses are displayed.
    #[inline]
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}
