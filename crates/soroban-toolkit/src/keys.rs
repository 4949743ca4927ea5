// Stellar ed25519 keypairs used as transaction signers

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use stellar_strkey::ed25519;
use stellar_xdr::curr::{
    AccountId, DecoratedSignature, MuxedAccount, PublicKey, ScAddress, Signature,
    SignatureHint, Uint256,
};
use thiserror::Error;

/// Errors that can occur while parsing or using a key
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid secret key: {0}")]
    InvalidSecret(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Signature encoding error: {0}")]
    Signature(String),
}

/// An ed25519 keypair addressed by a Stellar account id (`G...`)
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Parse a Stellar secret seed (`S...`)
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        let seed = ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|e| KeyError::InvalidSecret(e.to_string()))?;
        Ok(Self::from_seed(&seed.0))
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Fresh random keypair
    pub fn random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Account id (`G...`)
    pub fn public_key(&self) -> String {
        ed25519::PublicKey(self.public_key_bytes()).to_string()
    }

    /// Secret seed (`S...`)
    pub fn secret(&self) -> String {
        ed25519::PrivateKey(self.signing_key.to_bytes()).to_string()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.verifying_key().to_bytes()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Last four bytes of the public key, as carried in decorated signatures
    pub fn signature_hint(&self) -> [u8; 4] {
        let public = self.public_key_bytes();
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&public[28..]);
        hint
    }

    /// Sign a transaction hash and wrap it for an envelope
    pub fn sign_decorated(&self, hash: &[u8; 32]) -> Result<DecoratedSignature, KeyError> {
        let signature = self.sign(hash);
        let signature = Signature(
            signature
                .to_vec()
                .try_into()
                .map_err(|e: stellar_xdr::curr::Error| KeyError::Signature(e.to_string()))?,
        );
        Ok(DecoratedSignature {
            hint: SignatureHint(self.signature_hint()),
            signature,
        })
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(self.public_key_bytes())))
    }

    pub fn muxed_account(&self) -> MuxedAccount {
        MuxedAccount::Ed25519(Uint256(self.public_key_bytes()))
    }

    pub fn sc_address(&self) -> ScAddress {
        ScAddress::Account(self.account_id())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// Decode a `G...` account id into raw key bytes
pub fn decode_account_id(account_id: &str) -> Result<[u8; 32], KeyError> {
    ed25519::PublicKey::from_string(account_id.trim())
        .map(|key| key.0)
        .map_err(|e| KeyError::InvalidPublicKey(format!("{}: {}", account_id, e)))
}
