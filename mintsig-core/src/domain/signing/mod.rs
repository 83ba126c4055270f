//! ECDSA mint authorization: packed keccak digest, recoverable signing and
//! signer recovery in the Ethereum `(v, r, s)` convention.

use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, PublicKey, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::foundation::{
    decode_hex, EthAddress, Hash32, MintError, RequestHash, Result, ADDRESS_SIZE,
    COMPACT_SIGNATURE_SIZE, HASH_SIZE, RAW_SIGNATURE_SIZE, V_OFFSET,
};

pub fn keccak256(data: &[u8]) -> Hash32 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Digest a mint authorization signs over: keccak256 of the 20 raw address
/// bytes immediately followed by the 32 hash bytes (packed encoding).
///
/// The address is never left-padded to 32 bytes; the padded layout hashes to
/// a different digest and its signatures do not verify on-chain.
pub fn mint_digest(address: &EthAddress, hash: &RequestHash) -> Hash32 {
    let mut packed = [0u8; ADDRESS_SIZE + HASH_SIZE];
    packed[..ADDRESS_SIZE].copy_from_slice(address.as_bytes());
    packed[ADDRESS_SIZE..].copy_from_slice(hash.as_hash());
    keccak256(&packed)
}

/// Ethereum-style recoverable signature. `v` is always 27 or 28.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VrsSignature {
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl VrsSignature {
    /// Builds from a 64-byte compact signature plus a recovery value, which
    /// may be raw (0/1) or already offset (27/28).
    pub fn from_compact(compact: &[u8; COMPACT_SIGNATURE_SIZE], recovery_v: i32) -> Result<Self> {
        let v = normalize_v(recovery_v)?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[0..32]);
        s.copy_from_slice(&compact[32..64]);
        Ok(Self { v, r, s })
    }

    /// Parses the 65-byte `r || s || v` wire layout.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RAW_SIGNATURE_SIZE {
            return Err(MintError::SigningError(format!(
                "expected {RAW_SIGNATURE_SIZE}-byte signature, got {}",
                bytes.len()
            )));
        }
        let mut compact = [0u8; COMPACT_SIGNATURE_SIZE];
        compact.copy_from_slice(&bytes[..COMPACT_SIGNATURE_SIZE]);
        Self::from_compact(&compact, i32::from(bytes[COMPACT_SIGNATURE_SIZE]))
    }

    pub fn to_raw(&self) -> [u8; RAW_SIGNATURE_SIZE] {
        let mut out = [0u8; RAW_SIGNATURE_SIZE];
        out[0..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[COMPACT_SIGNATURE_SIZE] = self.v;
        out
    }

    pub fn compact(&self) -> [u8; COMPACT_SIGNATURE_SIZE] {
        let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
        out[0..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out
    }

    pub fn recovery_id(&self) -> Result<RecoveryId> {
        Ok(RecoveryId::from_i32(i32::from(self.v) - i32::from(V_OFFSET))?)
    }

    pub fn r_hex(&self) -> String {
        format!("0x{}", hex::encode(self.r))
    }

    pub fn s_hex(&self) -> String {
        format!("0x{}", hex::encode(self.s))
    }
}

/// Maps a recovery value onto the 27/28 convention. Accepts raw recovery ids
/// (0/1) and already-offset values (27/28); everything else is rejected.
fn normalize_v(recovery_v: i32) -> Result<u8> {
    match recovery_v {
        0 | 1 => Ok(recovery_v as u8 + V_OFFSET),
        27 | 28 => Ok(recovery_v as u8),
        other => Err(MintError::SigningError(format!("unsupported recovery value: {other}"))),
    }
}

/// Holds the process-wide signing key. Constructed once at startup; the key
/// material is never logged and never re-read per call.
pub struct MintSigner {
    secp: Secp256k1<All>,
    secret: SecretKey,
    address: EthAddress,
}

impl MintSigner {
    /// Imports a 32-byte hex key (optional `0x` prefix). The decoded bytes
    /// are zeroized once the key is imported.
    pub fn from_key_hex(key_hex: &str) -> Result<Self> {
        let mut key_bytes = decode_hex(key_hex).map_err(|_| invalid_key_error())?;
        if key_bytes.len() != HASH_SIZE {
            key_bytes.zeroize();
            return Err(invalid_key_error());
        }
        let secret = SecretKey::from_slice(&key_bytes).map_err(|_| invalid_key_error());
        key_bytes.zeroize();
        let secret = secret?;
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret);
        let address = address_from_public_key(&public_key);
        Ok(Self { secp, secret, address })
    }

    /// EVM address derived from the signing key.
    pub fn address(&self) -> EthAddress {
        self.address
    }

    /// Signs the packed mint digest for `(address, hash)`.
    pub fn sign(&self, address: &EthAddress, hash: &RequestHash) -> Result<VrsSignature> {
        let digest = mint_digest(address, hash);
        let message = Message::from_digest(digest);
        let recoverable = self.secp.sign_ecdsa_recoverable(&message, &self.secret);
        let (recovery_id, compact) = recoverable.serialize_compact();
        VrsSignature::from_compact(&compact, recovery_id.to_i32())
    }
}

impl fmt::Debug for MintSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintSigner").field("address", &self.address).finish_non_exhaustive()
    }
}

// Key material must not leak through error messages.
fn invalid_key_error() -> MintError {
    MintError::SigningError(format!("signing key must be {HASH_SIZE} bytes of hex"))
}

/// Recovers the signing address from a digest and signature.
pub fn recover_signer(digest: &Hash32, signature: &VrsSignature) -> Result<EthAddress> {
    let recoverable = RecoverableSignature::from_compact(&signature.compact(), signature.recovery_id()?)?;
    let message = Message::from_digest(*digest);
    let secp = Secp256k1::verification_only();
    let public_key = secp.recover_ecdsa(&message, &recoverable)?;
    Ok(address_from_public_key(&public_key))
}

/// Last 20 bytes of keccak256 over the uncompressed key without the 0x04 tag.
fn address_from_public_key(public_key: &PublicKey) -> EthAddress {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    let mut out = [0u8; ADDRESS_SIZE];
    out.copy_from_slice(&digest[HASH_SIZE - ADDRESS_SIZE..]);
    EthAddress::new(out)
}
