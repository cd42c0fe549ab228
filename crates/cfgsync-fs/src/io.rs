//! Whole-file text I/O
//!
//! Files are read completely, transformed in memory and written back
//! completely. There is no temp-file/rename step and no locking: a crash in
//! the middle of [`write_text`] can leave a truncated file behind.
//!
//! Assembler listings are frequently not UTF-8. A file that fails UTF-8
//! decoding is read as ISO-8859-1 and written back in the same encoding, so
//! untouched bytes survive a round trip unchanged.

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Character encoding a text file was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

/// Decoded file content together with the encoding needed to write it back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextFile {
    pub content: String,
    pub encoding: TextEncoding,
}

impl TextFile {
    /// Create UTF-8 text.
    pub fn utf8(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: TextEncoding::Utf8,
        }
    }

    /// Decode raw bytes, falling back to ISO-8859-1 for invalid UTF-8.
    pub fn decode(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(content) => Self::utf8(content),
            Err(err) => {
                let content = err.into_bytes().into_iter().map(char::from).collect();
                Self {
                    content,
                    encoding: TextEncoding::Latin1,
                }
            }
        }
    }

    /// Same encoding, new content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            encoding: self.encoding,
        }
    }
}

/// Read a text file.
pub fn read_text(path: &NormalizedPath) -> Result<TextFile> {
    let native_path = path.to_native();
    let bytes = fs::read(&native_path).map_err(|e| Error::io(&native_path, e))?;
    let file = TextFile::decode(bytes);
    if file.encoding == TextEncoding::Latin1 {
        tracing::debug!(path = %path, "file is not UTF-8, reading as ISO-8859-1");
    }
    Ok(file)
}

/// Read a text file, returning `None` if it does not exist.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<TextFile>> {
    match read_text(path) {
        Ok(file) => Ok(Some(file)),
        Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write a text file in the given encoding, creating parent directories.
pub fn write_text(path: &NormalizedPath, file: &TextFile) -> Result<()> {
    let native_path = path.to_native();
    let bytes = encode(path, file)?;

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    fs::write(&native_path, bytes).map_err(|e| Error::io(&native_path, e))?;
    tracing::info!(path = %path, bytes = file.content.len(), "wrote file");
    Ok(())
}

fn encode(path: &NormalizedPath, file: &TextFile) -> Result<Vec<u8>> {
    match file.encoding {
        TextEncoding::Utf8 => Ok(file.content.as_bytes().to_vec()),
        TextEncoding::Latin1 => file
            .content
            .chars()
            .map(|ch| {
                u8::try_from(u32::from(ch)).map_err(|_| Error::Unencodable {
                    path: path.to_native(),
                    ch,
                })
            })
            .collect(),
    }
}
