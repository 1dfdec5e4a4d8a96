//! Chain address codec.
//!
//! Validates 20-byte hex addresses and defines the canonical ordering of a
//! token pair. Every pair lookup goes through [`TokenPair`], which is the only
//! place where the two tokens are sorted.

use primitive_types::H160;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hex digits in an address, without prefix.
const ADDRESS_HEX_LEN: usize = 40;

/// Errors raised while decoding or pairing addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Input is not a 20-byte hex address.
    #[error("The address entered is invalid: {0}")]
    Invalid(String),
    /// Both sides of a pair are the same token.
    #[error("a token pair needs two distinct tokens, got {0} twice")]
    IdenticalTokens(TokenId),
    /// The zero address was supplied where a token is required.
    #[error("the zero address is not a token")]
    ZeroAddress,
}

/// A 160-bit chain address identifying a token or account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TokenId(H160);

impl TokenId {
    /// The zero address, used by factories as the "no pair" sentinel.
    pub const ZERO: TokenId = TokenId(H160::zero());

    /// Wraps raw address bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160(bytes))
    }

    /// Returns true for the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the underlying fixed hash.
    #[must_use]
    pub fn as_h160(&self) -> H160 {
        self.0
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Lower-cased `0x`-prefixed hex form, as indexers store addresses.
    #[must_use]
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl From<H160> for TokenId {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl FromStr for TokenId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate(s)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lower_hex())
    }
}

/// Address of a liquidity pool, which is also the address of its receipt token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(TokenId);

impl PairId {
    /// Wraps a non-zero pool address.
    ///
    /// # Errors
    /// Returns [`AddressError::ZeroAddress`] for the zero address.
    pub fn new(address: TokenId) -> Result<Self, AddressError> {
        if address.is_zero() {
            return Err(AddressError::ZeroAddress);
        }
        Ok(Self(address))
    }

    /// Parses a pool address from hex.
    ///
    /// # Errors
    /// Returns an error if the input is malformed or the zero address.
    pub fn parse(address: &str) -> Result<Self, AddressError> {
        Self::new(validate(address)?)
    }

    /// The receipt token minted by this pool.
    #[must_use]
    pub fn receipt_token(&self) -> TokenId {
        self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validates a textual address and decodes it.
///
/// Accepts 40 hex digits with an optional `0x` prefix, in any letter case.
/// Mixed-case checksums are not verified.
///
/// # Errors
/// Returns [`AddressError::Invalid`] if the input is not a well-formed address.
pub fn validate(address: &str) -> Result<TokenId, AddressError> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    if digits.len() != ADDRESS_HEX_LEN {
        return Err(AddressError::Invalid(address.to_string()));
    }

    let mut raw = [0u8; 20];
    hex::decode_to_slice(digits, &mut raw)
        .map_err(|_| AddressError::Invalid(address.to_string()))?;
    Ok(TokenId::from_bytes(raw))
}

/// Validates every address, failing on the first malformed one.
///
/// # Errors
/// Returns the error for the first invalid address.
pub fn validate_all(addresses: &[&str]) -> Result<Vec<TokenId>, AddressError> {
    addresses.iter().map(|a| validate(a)).collect()
}

/// Orders two tokens as `(greater, lesser)` by numeric address value.
#[must_use]
pub fn canonical_order(a: TokenId, b: TokenId) -> (TokenId, TokenId) {
    if a > b { (a, b) } else { (b, a) }
}

/// Two distinct tokens in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    greater: TokenId,
    lesser: TokenId,
}

impl TokenPair {
    /// Builds the canonical pair for two tokens given in any order.
    ///
    /// # Errors
    /// Returns an error if the tokens are equal or either is the zero address.
    pub fn new(a: TokenId, b: TokenId) -> Result<Self, AddressError> {
        if a.is_zero() || b.is_zero() {
            return Err(AddressError::ZeroAddress);
        }
        if a == b {
            return Err(AddressError::IdenticalTokens(a));
        }
        let (greater, lesser) = canonical_order(a, b);
        Ok(Self { greater, lesser })
    }

    /// Validates two textual addresses and pairs them.
    ///
    /// # Errors
    /// Returns an error if either address is invalid or they are equal.
    pub fn parse(a: &str, b: &str) -> Result<Self, AddressError> {
        Self::new(validate(a)?, validate(b)?)
    }

    /// Token with the greater address value.
    #[must_use]
    pub fn greater(&self) -> TokenId {
        self.greater
    }

    /// Token with the lesser address value.
    #[must_use]
    pub fn lesser(&self) -> TokenId {
        self.lesser
    }

    /// Both tokens as `(greater, lesser)`.
    #[must_use]
    pub fn ordered(&self) -> (TokenId, TokenId) {
        (self.greater, self.lesser)
    }

    /// Whether `token` is one side of the pair.
    #[must_use]
    pub fn contains(&self, token: TokenId) -> bool {
        self.greater == token || self.lesser == token
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.greater, self.lesser)
    }
}
