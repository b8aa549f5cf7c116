use {
    alloy::primitives::{Address, B256, U256},
    anyhow::{Context as _, Result, bail},
    serde::{Deserialize, Serialize},
};

/// Signature embedded in an order document.
///
/// The maker signs the order hash as an EIP-191 personal message, i.e. the
/// ECDSA signature is over `keccak256("\x19Ethereum Signed Message:\n32" ||
/// hash)`. This is the scheme the exchange contract verifies on fill.
///
/// https://eips.ethereum.org/EIPS/eip-191
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Deserialize, Serialize, Hash)]
pub struct SignatureData {
    /// The order hash the maker claims to have signed.
    pub hash: B256,
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl SignatureData {
    /// r + s + v
    pub fn to_bytes(self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    pub fn from_bytes(hash: B256, bytes: &[u8; 65]) -> Self {
        Self {
            hash,
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }

    fn y_parity(&self) -> Result<bool> {
        match self.v {
            27 => Ok(false),
            28 => Ok(true),
            v => bail!("invalid recovery id {v}"),
        }
    }

    /// Recovers the address that signed `hash` as a personal message.
    pub fn recover(&self, hash: &B256) -> Result<Address> {
        let signature = alloy::primitives::Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            self.y_parity()?,
        );
        signature
            .recover_address_from_msg(hash.as_slice())
            .context("unable to recover signer")
    }
}

/// Returns whether `signature` is a signature by `signer` over `hash`.
///
/// Malformed signature material never errors, it simply does not verify.
pub fn verify(hash: &B256, signature: &SignatureData, signer: Address) -> bool {
    match signature.recover(hash) {
        Ok(recovered) if recovered == signer => true,
        Ok(recovered) => {
            tracing::debug!(%recovered, %signer, "signature recovered to a different address");
            false
        }
        Err(err) => {
            tracing::debug!(?err, "malformed signature");
            false
        }
    }
}
