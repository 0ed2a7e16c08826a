use std::io::Write;
use std::str::FromStr;

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

const GZIP_DEFAULT_LEVEL: u8 = 6;
const LZ4_DEFAULT_LEVEL: u8 = 0;
const ZSTD_DEFAULT_LEVEL: u8 = 0;

/// Suffixes of compressed files, as recognised when deriving labels
pub const COMPRESSION_SUFFIXES: [&str; 4] = [".gz", ".bz2", ".lz4", ".zst"];

lazy_static! {
    static ref COMPRESSION_RE: Regex =
        Regex::new(r"^(?P<algo>[[:alnum:]]+)(?P<lvl>_\d+)?$").unwrap();
}

/// Compression format
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Compression {
    /// The bzip2 format
    Bzip2,
    /// The gzip format with compression level as associated value
    Gzip(u8),
    /// The lz4 format with compression level as associated value
    Lz4(u8),
    /// The zstd format with compression level as associated value
    Zstd(u8),
}

impl Compression {
    /// Conventional file name suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            Compression::Bzip2 => ".bz2",
            Compression::Gzip(_) => ".gz",
            Compression::Lz4(_) => ".lz4",
            Compression::Zstd(_) => ".zst",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseCompressionErr {
    #[error("Unknown compression algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Level {1} not supported for {0} compression")]
    UnsupportedLevel(String, String),
}

fn parse_level(
    algo: &str,
    lvl: Option<regex::Match<'_>>,
    max: u8,
    default: u8,
) -> Result<u8, ParseCompressionErr> {
    let Some(lvl) = lvl else {
        return Ok(default);
    };
    match lvl.as_str()[1..].parse::<u8>() {
        Ok(n) if n <= max => Ok(n),
        _ => Err(ParseCompressionErr::UnsupportedLevel(
            algo.to_owned(),
            lvl.as_str()[1..].to_owned(),
        )),
    }
}

/// Parse a compression specification like `gzip` or `zstd_10`
impl FromStr for Compression {
    type Err = ParseCompressionErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Compression::*;
        use ParseCompressionErr::*;

        let lower_case = s.to_ascii_lowercase();
        let Some(captures) = COMPRESSION_RE.captures(&lower_case) else {
            return Err(UnknownAlgorithm(s.to_owned()));
        };
        let algo = &captures["algo"];
        let lvl = captures.name("lvl");
        match algo {
            "bzip2" | "bz2" => {
                if let Some(lvl) = lvl {
                    Err(UnsupportedLevel(algo.into(), lvl.as_str()[1..].to_owned()))
                } else {
                    Ok(Bzip2)
                }
            }
            "gzip" | "gz" => parse_level(algo, lvl, 9, GZIP_DEFAULT_LEVEL).map(Gzip),
            "lz4" => parse_level(algo, lvl, 16, LZ4_DEFAULT_LEVEL).map(Lz4),
            "zstd" | "zstandard" => {
                parse_level(algo, lvl, 19, ZSTD_DEFAULT_LEVEL).map(Zstd)
            }
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Convert into a writer that compresses to the given format
pub fn compress_writer<'a, W: 'a + Write>(
    writer: W,
    compression: Option<Compression>,
) -> Result<Box<dyn Write + 'a>, std::io::Error> {
    match compression {
        Some(Compression::Bzip2) => {
            let encoder = BzEncoder::new(writer, bzip2::Compression::best());
            Ok(Box::new(encoder))
        }
        Some(Compression::Gzip(lvl)) => {
            let encoder =
                GzEncoder::new(writer, flate2::Compression::new(lvl.into()));
            Ok(Box::new(encoder))
        }
        Some(Compression::Lz4(lvl)) => {
            let encoder = lz4::EncoderBuilder::new()
                .auto_flush(true)
                .level(lvl.into())
                .build(writer)?;
            Ok(Box::new(encoder))
        }
        Some(Compression::Zstd(lvl)) => {
            let encoder = zstd::Encoder::new(writer, lvl.into())?;
            Ok(Box::new(encoder.auto_finish()))
        }
        None => Ok(Box::new(writer)),
    }
}
