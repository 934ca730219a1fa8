//! File fingerprints for drift detection
//!
//! A fingerprint is one `"<algorithm>\t<hex>"` line per configured algorithm,
//! joined with newlines. It is used to decide whether a patched file has been
//! touched since the importer last wrote it, not for security.

use md5::Md5;
use sha1::Sha1;
use sha2::digest::Output;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;

use crate::{Error, NormalizedPath, Result};

/// Files are hashed in blocks of this size.
const BLOCK_SIZE: usize = 65536;

/// Digest algorithms a fingerprint can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    fn hasher(&self) -> Box<dyn DynHasher> {
        match self {
            Self::Md5 => Box::new(Md5::new()),
            Self::Sha1 => Box::new(Sha1::new()),
            Self::Sha224 => Box::new(Sha224::new()),
            Self::Sha256 => Box::new(Sha256::new()),
            Self::Sha384 => Box::new(Sha384::new()),
            Self::Sha512 => Box::new(Sha512::new()),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(Error::UnknownHashAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object-safe view over the RustCrypto `Digest` implementations.
trait DynHasher {
    fn update(&mut self, data: &[u8]);
    fn finish_hex(self: Box<Self>) -> String;
}

impl<D> DynHasher for D
where
    D: Digest,
    Output<D>: fmt::LowerHex,
{
    fn update(&mut self, data: &[u8]) {
        Digest::update(self, data);
    }

    fn finish_hex(self: Box<Self>) -> String {
        format!("{:x}", Digest::finalize(*self))
    }
}

/// Computes multi-algorithm fingerprints of files and byte buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprinter {
    algorithms: Vec<HashAlgorithm>,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self {
            algorithms: vec![HashAlgorithm::Md5],
        }
    }
}

impl Fingerprinter {
    pub fn new(algorithms: Vec<HashAlgorithm>) -> Self {
        if algorithms.is_empty() {
            return Self::default();
        }
        Self { algorithms }
    }

    /// Build from algorithm names such as `["md5", "sha1"]`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let algorithms = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(algorithms))
    }

    pub fn algorithms(&self) -> &[HashAlgorithm] {
        &self.algorithms
    }

    /// Fingerprint in-memory content.
    pub fn fingerprint_bytes(&self, content: &[u8]) -> String {
        self.algorithms
            .iter()
            .map(|algorithm| {
                let mut hasher = algorithm.hasher();
                hasher.update(content);
                format!("{}\t{}", algorithm, hasher.finish_hex())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fingerprint a file, streaming it once per algorithm.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn fingerprint_file(&self, path: &NormalizedPath) -> Result<String> {
        let native = path.to_native();
        let mut lines = Vec::with_capacity(self.algorithms.len());
        let mut buf = vec![0u8; BLOCK_SIZE];

        for algorithm in &self.algorithms {
            let mut hasher = algorithm.hasher();
            let mut file = File::open(&native).map_err(|e| Error::io(&native, e))?;
            loop {
                let read = file.read(&mut buf).map_err(|e| Error::io(&native, e))?;
                if read == 0 {
                    break;
                }
                hasher.update(&buf[..read]);
            }
            lines.push(format!("{}\t{}", algorithm, hasher.finish_hex()));
        }

        Ok(lines.join("\n"))
    }

    /// Whether the file at `path` still has the fingerprint `recorded`.
    ///
    /// The file is hashed with the algorithms named in `recorded`, so a
    /// fingerprint stays comparable after the configured set changes. A
    /// recorded fingerprint that cannot be parsed never matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn matches_recorded(recorded: &str, path: &NormalizedPath) -> Result<bool> {
        let recorded = recorded.trim_end();
        let names: Option<Vec<&str>> = recorded
            .lines()
            .map(|line| line.split_once('\t').map(|(name, _)| name))
            .collect();
        let fingerprinter = match names {
            Some(names) if !names.is_empty() => match Self::from_names(&names) {
                Ok(fingerprinter) => fingerprinter,
                Err(_) => return Ok(false),
            },
            _ => return Ok(false),
        };
        Ok(fingerprinter.fingerprint_file(path)? == recorded)
    }
}
