//! Encoded hash strings
//!
//! The native library renders a hash as
//! `$argon2i$m=<m>,t=<t>,p=<p>$<salt>$<hash>`, with salt and hash in
//! unpadded standard base64. Builds of that library tag every string
//! `argon2i`. Later builds add a `v=<version>` segment after the tag and use
//! the real variant name. [`EncodedHash`] parses either form back into its
//! parameters so a password can be verified against it.
//!
//! A string that does not match the format is reported the way the native
//! decoder reports it: `Native(DecodingFail)`.

use crate::error::{Argon2Error, Argon2Result, ErrorCode};
use crate::types::{HashOptions, Variant};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

/// Parameters, salt and hash recovered from an encoded string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub variant: Variant,
    pub version: Option<u32>,
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

impl EncodedHash {
    pub fn parse(encoded: &str) -> Argon2Result<Self> {
        let mut parts = encoded.split('$');

        // Leading '$' leaves an empty first segment
        if parts.next() != Some("") {
            return Err(decoding_fail());
        }

        let variant = match parts.next() {
            Some("argon2d") => Variant::Argon2d,
            Some("argon2i") => Variant::Argon2i,
            Some("argon2id") => Variant::Argon2id,
            _ => return Err(decoding_fail()),
        };

        let mut segment = parts.next().ok_or_else(decoding_fail)?;
        let version = match segment.strip_prefix("v=") {
            Some(v) => {
                let version = parse_decimal(v)?;
                segment = parts.next().ok_or_else(decoding_fail)?;
                Some(version)
            }
            None => None,
        };

        let (memory_cost, time_cost, parallelism) = parse_costs(segment)?;
        let salt = decode_b64(parts.next().ok_or_else(decoding_fail)?)?;
        let hash = decode_b64(parts.next().ok_or_else(decoding_fail)?)?;

        if parts.next().is_some() {
            return Err(decoding_fail());
        }

        Ok(Self {
            variant,
            version,
            memory_cost,
            time_cost,
            parallelism,
            salt,
            hash,
        })
    }

    /// Options that reproduce this hash
    pub fn to_options(&self) -> HashOptions {
        HashOptions {
            time_cost: self.time_cost,
            memory_cost: self.memory_cost,
            parallelism: self.parallelism,
            output_len: self.hash.len(),
            variant: self.variant,
        }
    }
}

impl std::str::FromStr for EncodedHash {
    type Err = Argon2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decoding_fail() -> Argon2Error {
    Argon2Error::Native(ErrorCode::DecodingFail)
}

/// `m=<m>,t=<t>,p=<p>`, in that order
fn parse_costs(segment: &str) -> Argon2Result<(u32, u32, u32)> {
    let mut fields = segment.split(',');
    let mut next = |key: &str| -> Argon2Result<u32> {
        fields
            .next()
            .and_then(|field| field.strip_prefix(key))
            .ok_or_else(decoding_fail)
            .and_then(parse_decimal)
    };

    let costs = (next("m=")?, next("t=")?, next("p=")?);
    if fields.next().is_some() {
        return Err(decoding_fail());
    }
    Ok(costs)
}

/// Plain decimal digits only; no sign, no leading zeros
fn parse_decimal(text: &str) -> Argon2Result<u32> {
    let digits_only = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    let leading_zero = text.len() > 1 && text.starts_with('0');
    if !digits_only || leading_zero {
        return Err(decoding_fail());
    }
    text.parse().map_err(|_| decoding_fail())
}

fn decode_b64(text: &str) -> Argon2Result<Vec<u8>> {
    STANDARD_NO_PAD.decode(text).map_err(|_| decoding_fail())
}
