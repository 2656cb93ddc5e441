//! Streaming checksum computation over the fixed algorithm set.

use std::fmt;
use std::io::Read;

use digest::DynDigest;
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

/// Size of chunks for streaming digest computation.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// The closed set of checksum algorithms a manifest may declare.
///
/// Names follow the manifest convention (`MD5`, `SHA-1`, `SHA-256`,
/// `SHA-384`, `SHA-512`). Anything else on an entry is a structural
/// defect, not a silently skipped checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// MD5 (128-bit).
    Md5,
    /// SHA-1 (160-bit).
    Sha1,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl ChecksumAlgorithm {
    /// All supported algorithms, in declaration-name order.
    pub const ALL: [Self; 5] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Parses a manifest `CHECKSUMTYPE` value.
    #[must_use]
    pub fn from_declared(name: &str) -> Option<Self> {
        match name {
            "MD5" => Some(Self::Md5),
            "SHA-1" => Some(Self::Sha1),
            "SHA-256" => Some(Self::Sha256),
            "SHA-384" => Some(Self::Sha384),
            "SHA-512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// The name used in manifests for this algorithm.
    #[must_use]
    pub fn declared_name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    fn hasher(self) -> Box<dyn DynDigest> {
        match self {
            Self::Md5 => Box::new(Md5::default()),
            Self::Sha1 => Box::new(Sha1::default()),
            Self::Sha256 => Box::new(Sha256::default()),
            Self::Sha384 => Box::new(Sha384::default()),
            Self::Sha512 => Box::new(Sha512::default()),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.declared_name())
    }
}

/// Streams `reader` to completion through `algorithm` and returns the
/// lowercase hex digest.
///
/// Content is processed in [`CHUNK_SIZE`] chunks, so memory use is
/// independent of file size.
///
/// # Errors
///
/// Returns any I/O error raised while reading. Callers report these as
/// `error` findings, distinct from checksum mismatches.
pub fn stream_digest<R: Read>(mut reader: R, algorithm: ChecksumAlgorithm) -> std::io::Result<String> {
    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn declared_name_round_trips() {
        for algorithm in ChecksumAlgorithm::ALL {
            assert_eq!(
                ChecksumAlgorithm::from_declared(algorithm.declared_name()),
                Some(algorithm)
            );
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(ChecksumAlgorithm::from_declared("CRC32"), None);
        assert_eq!(ChecksumAlgorithm::from_declared("sha-256"), None);
        assert_eq!(ChecksumAlgorithm::from_declared(""), None);
    }

    #[test]
    fn known_sha256_vector() {
        let digest = stream_digest(Cursor::new(b"abc"), ChecksumAlgorithm::Sha256).unwrap();
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn known_md5_vector() {
        let digest = stream_digest(Cursor::new(b"abc"), ChecksumAlgorithm::Md5).unwrap();
        assert_eq!(digest, "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn empty_input_sha1() {
        let digest = stream_digest(Cursor::new(b""), ChecksumAlgorithm::Sha1).unwrap();
        assert_eq!(digest, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn chunked_input_matches_single_read() {
        // Larger than one chunk to exercise the streaming loop.
        let data = vec![0x5au8; CHUNK_SIZE * 2 + 17];
        let digest = stream_digest(Cursor::new(&data), ChecksumAlgorithm::Sha512).unwrap();
        let again = stream_digest(Cursor::new(&data), ChecksumAlgorithm::Sha512).unwrap();
        assert_eq!(digest, again);
        assert_eq!(digest.len(), 128);
    }
}
