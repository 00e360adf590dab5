use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CorpusError, Result};

/// Text encodings accepted for corpus files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
	#[default]
	Utf8,
	/// ISO-8859-1: every byte maps to the code point of the same value.
	Latin1,
}

impl FromStr for Encoding {
	type Err = CorpusError;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().replace('_', "-").as_str() {
			"utf-8" | "utf8" => Ok(Encoding::Utf8),
			"latin-1" | "latin1" | "iso-8859-1" => Ok(Encoding::Latin1),
			_ => Err(CorpusError::UnsupportedEncoding(s.to_owned())),
		}
	}
}

impl fmt::Display for Encoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Encoding::Utf8 => f.write_str("utf-8"),
			Encoding::Latin1 => f.write_str("latin-1"),
		}
	}
}

/// Reads a whole text file and decodes it.
///
/// - A missing file yields `FileNotFound`
/// - Bytes that are invalid for `encoding` yield `Decode`
pub(crate) fn read_text<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<String> {
	let path = path.as_ref();
	let bytes = fs::read(path).map_err(|e| match e.kind() {
		io::ErrorKind::NotFound => CorpusError::FileNotFound { path: path.to_path_buf() },
		_ => CorpusError::Io(e),
	})?;

	match encoding {
		Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| CorpusError::Decode {
			path: path.to_path_buf(),
			encoding: encoding.to_string(),
		}),
		Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
	}
}
