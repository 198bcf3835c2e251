//! Digest provider: algorithm names → incremental accumulators, and chunked stream digesting.

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use crate::error::HashpipeError;

/// Supported digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Crc32,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Crc32,
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
    ];

    /// Lowercase name, as used on the command line and in manifests.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Crc32 => "crc32",
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
        }
    }

    /// Digest width in bytes.
    pub fn output_size(self) -> usize {
        match self {
            Algorithm::Crc32 => 4,
            Algorithm::Md5 => 16,
            Algorithm::Sha1 => 20,
            Algorithm::Sha224 => 28,
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
        }
    }

    /// Fresh accumulator in the zero state.
    pub fn accumulator(self) -> Box<dyn Accumulator> {
        match self {
            Algorithm::Crc32 => Box::new(Crc32Accumulator::default()),
            Algorithm::Md5 => Box::new(DigestAccumulator::<Md5>::default()),
            Algorithm::Sha1 => Box::new(DigestAccumulator::<Sha1>::default()),
            Algorithm::Sha224 => Box::new(DigestAccumulator::<Sha224>::default()),
            Algorithm::Sha256 => Box::new(DigestAccumulator::<Sha256>::default()),
            Algorithm::Sha384 => Box::new(DigestAccumulator::<Sha384>::default()),
            Algorithm::Sha512 => Box::new(DigestAccumulator::<Sha512>::default()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashpipeError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == lower)
            .ok_or_else(|| HashpipeError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Incremental digest state owned by a single worker.
pub trait Accumulator: Send {
    fn write(&mut self, bytes: &[u8]);
    /// Digest of everything written since creation or the last reset. Does not disturb state.
    fn sum(&self) -> Vec<u8>;
    fn reset(&mut self);
    fn output_size(&self) -> usize;
}

/// Any RustCrypto [`Digest`].
#[derive(Default)]
struct DigestAccumulator<D>(D);

impl<D> Accumulator for DigestAccumulator<D>
where
    D: Digest + Clone + Send,
{
    fn write(&mut self, bytes: &[u8]) {
        Digest::update(&mut self.0, bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.0.clone().finalize().to_vec()
    }

    fn reset(&mut self) {
        self.0 = D::new();
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

/// CRC-32 (IEEE). Sum is the checksum in big-endian byte order.
#[derive(Default)]
struct Crc32Accumulator(crc32fast::Hasher);

impl Accumulator for Crc32Accumulator {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn sum(&self) -> Vec<u8> {
        self.0.clone().finalize().to_be_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    fn output_size(&self) -> usize {
        4
    }
}

/// Resolve an algorithm name and return a fresh accumulator for it.
pub fn new_accumulator(id: &str) -> Result<Box<dyn Accumulator>, HashpipeError> {
    Ok(id.parse::<Algorithm>()?.accumulator())
}

/// Stream `reader` into `acc` with reads of at most `chunk_size` bytes until end of stream.
/// Returns the number of bytes consumed.
pub fn digest_stream<R: Read + ?Sized>(
    reader: &mut R,
    acc: &mut dyn Accumulator,
    chunk_size: usize,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0_u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        acc.write(&buffer[..n]);
        total += n as u64;
    }
    Ok(total)
}

/// Compare a computed digest with a hex string, ignoring hex case.
pub fn hex_equals(digest: &[u8], expected_hex: &str) -> bool {
    hex::encode(digest).eq_ignore_ascii_case(expected_hex.trim())
}
