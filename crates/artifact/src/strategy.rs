//! Named decode strategies for model artifacts.
//!
//! Artifacts reach us from trainers we do not control, so the on-disk form is
//! not guaranteed to match one decoder's assumptions. Each [`DecodeStrategy`]
//! is one such assumption; the loader tries them in order and keeps the first
//! artifact that decodes *and* validates.
//!
//! | Strategy | Input assumption |
//! |----------|------------------|
//! | `binary` | `CRPF` header followed by fixed-int bincode |
//! | `utf8-json` | UTF-8 JSON |
//! | `latin1-json` | JSON written in ISO-8859-1 (only after a UTF-8 decoding failure) |
//! | `raw-bytes-json` | JSON whose text fields may be raw byte arrays; lossy, best effort |
use std::fmt;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::error::{FailureKind, StrategyFailure};
use crate::forest::{ModelArtifact, TreeArrays};

/// Header that opens every binary artifact.
pub const BINARY_MAGIC: &[u8; 4] = b"CRPF";

type DecodeResult = Result<ModelArtifact, (FailureKind, String)>;

/// One way of turning artifact bytes into a [`ModelArtifact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeStrategy {
    Binary,
    Utf8Json,
    Latin1Json,
    RawBytesJson,
}

impl DecodeStrategy {
    /// Default chain, strictest first.
    pub const DEFAULT_CHAIN: [DecodeStrategy; 4] = [
        DecodeStrategy::Binary,
        DecodeStrategy::Utf8Json,
        DecodeStrategy::Latin1Json,
        DecodeStrategy::RawBytesJson,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DecodeStrategy::Binary => "binary",
            DecodeStrategy::Utf8Json => "utf8-json",
            DecodeStrategy::Latin1Json => "latin1-json",
            DecodeStrategy::RawBytesJson => "raw-bytes-json",
        }
    }

    /// Whether a success through this strategy may have altered text fields.
    pub fn is_best_effort(self) -> bool {
        matches!(self, DecodeStrategy::RawBytesJson)
    }

    /// The legacy single-byte retry only runs right after a text-decoding failure.
    pub(crate) fn applies(self, prior: &[StrategyFailure]) -> bool {
        match self {
            DecodeStrategy::Latin1Json => prior
                .last()
                .is_some_and(|failure| failure.kind == FailureKind::Encoding),
            _ => true,
        }
    }

    pub(crate) fn decode(self, bytes: &[u8]) -> DecodeResult {
        match self {
            DecodeStrategy::Binary => decode_binary(bytes),
            DecodeStrategy::Utf8Json => decode_utf8_json(bytes),
            DecodeStrategy::Latin1Json => decode_latin1_json(bytes),
            DecodeStrategy::RawBytesJson => decode_raw_bytes_json(bytes),
        }
    }
}

impl fmt::Display for DecodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn binary_options() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Serialize `artifact` in the format read by [`DecodeStrategy::Binary`].
pub fn encode_binary(artifact: &ModelArtifact) -> Result<Vec<u8>, bincode::Error> {
    let mut out = BINARY_MAGIC.to_vec();
    binary_options().serialize_into(&mut out, artifact)?;
    Ok(out)
}

fn decode_binary(bytes: &[u8]) -> DecodeResult {
    let body = bytes
        .strip_prefix(&BINARY_MAGIC[..])
        .ok_or_else(|| (FailureKind::Syntax, "missing binary artifact header".to_string()))?;
    // Length prefixes are bounded by the payload so a text file can't trigger a huge allocation.
    binary_options()
        .with_limit(body.len() as u64)
        .deserialize::<ModelArtifact>(body)
        .map_err(|err| (classify_bincode(&err), err.to_string()))
}

fn classify_bincode(err: &bincode::Error) -> FailureKind {
    match &**err {
        bincode::ErrorKind::InvalidUtf8Encoding(_) => FailureKind::Encoding,
        bincode::ErrorKind::Custom(_) => FailureKind::Schema,
        _ => FailureKind::Syntax,
    }
}

fn decode_utf8_json(bytes: &[u8]) -> DecodeResult {
    let text = std::str::from_utf8(bytes).map_err(|err| (FailureKind::Encoding, err.to_string()))?;
    parse_json(text)
}

fn decode_latin1_json(bytes: &[u8]) -> DecodeResult {
    let text: String = bytes.iter().copied().map(char::from).collect();
    parse_json(&text)
}

fn decode_raw_bytes_json(bytes: &[u8]) -> DecodeResult {
    let text = String::from_utf8_lossy(bytes);
    let raw: RawModelArtifact = parse_json(&text)?;
    Ok(raw.into_artifact())
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, (FailureKind, String)> {
    serde_json::from_str(text).map_err(|err| {
        let kind = match err.classify() {
            Category::Data => FailureKind::Schema,
            Category::Io => FailureKind::Io,
            Category::Syntax | Category::Eof => FailureKind::Syntax,
        };
        (kind, err.to_string())
    })
}

/// Text field that may have been written as a byte array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Bytes(Vec<u8>),
}

impl RawText {
    fn into_lossy_string(self) -> String {
        match self {
            RawText::Text(text) => text,
            RawText::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

#[derive(Deserialize)]
struct RawModelArtifact {
    format_version: u32,
    algorithm: RawText,
    producer: Option<RawText>,
    feature_names: Vec<RawText>,
    classes: Vec<i64>,
    trees: Vec<TreeArrays>,
}

impl RawModelArtifact {
    fn into_artifact(self) -> ModelArtifact {
        ModelArtifact {
            format_version: self.format_version,
            algorithm: self.algorithm.into_lossy_string(),
            producer: self.producer.map(RawText::into_lossy_string),
            feature_names: self
                .feature_names
                .into_iter()
                .map(RawText::into_lossy_string)
                .collect(),
            classes: self.classes,
            trees: self.trees,
        }
    }
}
