//! Items stored in a tree
//!
//! A tree never inspects the items it commits to. It only asks each item for
//! its digest and whether it equals another item, through the [`Content`]
//! trait.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use digest::Digest;
use sha2::Sha256;

/// Capability required of every item stored in a [`MerkleTree`](crate::MerkleTree).
///
/// Both operations may fail; failures are propagated to the caller as
/// [`TreeError::Content`](crate::TreeError::Content).
pub trait Content {
    /// Error returned when hashing or comparing fails
    type Error: std::error::Error + Send + Sync + 'static;

    /// The digest of this item. It becomes the hash of the item's leaf.
    fn digest(&self) -> Result<Bytes, Self::Error>;

    /// Whether this item is the same as `other`
    fn equals(&self, other: &Self) -> Result<bool, Self::Error>;
}

/// Raw bytes whose digest is computed with the hash function `D`.
///
/// Equality is byte equality, so two values are equal exactly when their
/// digests are.
pub struct DigestContent<D = Sha256> {
    data: Bytes,
    _hasher: PhantomData<fn() -> D>,
}

impl<D> DigestContent<D> {
    /// Wrap `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            _hasher: PhantomData,
        }
    }

    /// The wrapped bytes
    #[inline(always)]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }
}

impl<D: Digest> Content for DigestContent<D> {
    type Error = Infallible;

    fn digest(&self) -> Result<Bytes, Self::Error> {
        Ok(Bytes::copy_from_slice(&D::digest(&self.data)))
    }

    fn equals(&self, other: &Self) -> Result<bool, Self::Error> {
        Ok(self.data == other.data)
    }
}

impl<D> Clone for DigestContent<D> {
    fn clone(&self) -> Self {
        Self::new(self.data.clone())
    }
}

impl<D> PartialEq for DigestContent<D> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<D> Eq for DigestContent<D> {}

impl<D> fmt::Debug for DigestContent<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DigestContent").field(&self.data).finish()
    }
}

impl<D> fmt::Display for DigestContent<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}

impl<D> From<&'static [u8]> for DigestContent<D> {
    fn from(data: &'static [u8]) -> Self {
        Self::new(data)
    }
}

impl<D> From<&'static str> for DigestContent<D> {
    fn from(data: &'static str) -> Self {
        Self::new(data)
    }
}

impl<D> From<Vec<u8>> for DigestContent<D> {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha512;

    #[test]
    fn test_digest_is_sha256_by_default() {
        let content = DigestContent::<Sha256>::from("A");
        let expected =
            hex::decode("559aead08264d5795d3909718cdd05abd49572e84fe55590eef31a88a08fdffd")
                .unwrap();
        assert_eq!(content.digest().unwrap().as_ref(), expected.as_slice());
    }

    #[test]
    fn test_hash_policy_changes_digest_length() {
        let content = DigestContent::<Sha512>::from("A");
        assert_eq!(content.digest().unwrap().len(), 64);
    }

    #[test]
    fn test_equals() {
        let a = DigestContent::<Sha256>::from("same");
        let b = DigestContent::<Sha256>::new(b"same".to_vec());
        let c = DigestContent::<Sha256>::from("different");

        assert!(a.equals(&b).unwrap());
        assert!(!a.equals(&c).unwrap());
    }
}
