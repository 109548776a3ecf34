// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Little-endian tagged binary record stream.
//!
//! Every persistent section starts with a `(tag, version)` header so a reader
//! can validate what it is about to parse and branch on older layouts.
//! Records of unknown kind can be skipped wholesale: a writer reserves an
//! `i64` byte-length before the payload (`begin_skip`) and back-patches it
//! afterwards (`end_skip`); readers consume exactly that many bytes when they
//! do not recognize the record.

use thiserror::Error;

/// Errors raised while reading or writing a binary stream
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("unexpected end of stream (wanted {wanted} more bytes at offset {offset})")]
    UnexpectedEof { wanted: usize, offset: usize },

    #[error("header tag mismatch: expected '{expected}', found '{found}'")]
    TagMismatch { expected: String, found: String },

    #[error("version {found} of section '{tag}' is newer than supported version {supported}")]
    VersionMismatch {
        tag: String,
        found: u32,
        supported: u32,
    },

    #[error("invalid utf-8 in string field")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid property payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("negative skip length {0}")]
    NegativeSkip(i64),
}

/// Growable little-endian binary writer
#[derive(Debug, Default)]
pub struct StreamWriter {
    buf: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v as u8);
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
    }

    /// Write a section header: tag string plus version number
    pub fn write_header(&mut self, tag: &str, version: u32) {
        self.write_string(tag);
        self.write_u32(version);
    }

    /// Reserve a byte-length prefix for a skippable record.
    /// Returns a token for `end_skip`.
    pub fn begin_skip(&mut self) -> usize {
        let at = self.buf.len();
        self.write_i64(0);
        at
    }

    /// Back-patch the byte length reserved by `begin_skip`
    pub fn end_skip(&mut self, token: usize) {
        let len = (self.buf.len() - token - 8) as i64;
        self.buf[token..token + 8].copy_from_slice(&len.to_le_bytes());
    }
}

/// Positioned little-endian binary reader
#[derive(Debug)]
pub struct StreamReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StreamReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], StreamError> {
        if self.remaining() < n {
            return Err(StreamError::UnexpectedEof {
                wanted: n,
                offset: self.pos,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, StreamError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        Ok(i64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    pub fn read_u64(&mut self) -> Result<u64, StreamError> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> Result<f32, StreamError> {
        Ok(f32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_string(&mut self) -> Result<String, StreamError> {
        let len = self.read_u32()? as usize;
        Ok(String::from_utf8(self.take(len)?.to_vec())?)
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], StreamError> {
        let len = self.read_u32()? as usize;
        self.take(len)
    }

    /// Read and validate a section header.
    /// Returns the stored version so callers can branch on older layouts.
    pub fn read_header(&mut self, tag: &str, supported: u32) -> Result<u32, StreamError> {
        let found = self.read_string()?;
        if found != tag {
            return Err(StreamError::TagMismatch {
                expected: tag.to_string(),
                found,
            });
        }
        let version = self.read_u32()?;
        if version > supported {
            return Err(StreamError::VersionMismatch {
                tag: tag.to_string(),
                found: version,
                supported,
            });
        }
        Ok(version)
    }

    /// Consume `len` bytes without interpreting them
    pub fn skip(&mut self, len: i64) -> Result<(), StreamError> {
        if len < 0 {
            return Err(StreamError::NegativeSkip(len));
        }
        self.take(len as usize)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_roundtrip() {
        let mut w = StreamWriter::new();
        w.write_u32(12345);
        w.write_i64(-7);
        w.write_f32(1.5);
        w.write_bool(true);
        w.write_string("hello");

        let mut r = StreamReader::new(w.as_bytes());
        assert_eq!(r.read_u32().unwrap(), 12345);
        assert_eq!(r.read_i64().unwrap(), -7);
        assert_eq!(r.read_f32().unwrap(), 1.5);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_string().unwrap(), "hello");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_header_tag_mismatch() {
        let mut w = StreamWriter::new();
        w.write_header("alpha", 1);
        let mut r = StreamReader::new(w.as_bytes());
        let err = r.read_header("beta", 1).unwrap_err();
        assert!(matches!(err, StreamError::TagMismatch { .. }));
    }

    #[test]
    fn test_header_newer_version_rejected() {
        let mut w = StreamWriter::new();
        w.write_header("sec", 3);
        let mut r = StreamReader::new(w.as_bytes());
        let err = r.read_header("sec", 2).unwrap_err();
        assert!(matches!(err, StreamError::VersionMismatch { .. }));
    }

    #[test]
    fn test_skip_block_preserves_alignment() {
        let mut w = StreamWriter::new();
        let token = w.begin_skip();
        w.write_string("opaque payload");
        w.write_u32(99);
        w.end_skip(token);
        w.write_u32(1234);

        let mut r = StreamReader::new(w.as_bytes());
        let len = r.read_i64().unwrap();
        r.skip(len).unwrap();
        assert_eq!(r.read_u32().unwrap(), 1234);
    }

    #[test]
    fn test_truncated_stream() {
        let mut w = StreamWriter::new();
        w.write_u32(1);
        let bytes = w.into_bytes();
        let mut r = StreamReader::new(&bytes[..2]);
        assert!(matches!(
            r.read_u32(),
            Err(StreamError::UnexpectedEof { .. })
        ));
    }
}
