//! Document blob wire format
//!
//! ```text
//! +------------------+
//! | Blob Length      | (u32 LE, total length including this field)
//! +------------------+
//! | Format Tag       | (u8, currently 1)
//! +------------------+
//! | Entity Version   | (i64 LE, mirrored from the root map)
//! +------------------+
//! | Document Payload | (length-prefixed tree encoding)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 of all preceding bytes)
//! +------------------+
//! ```
//!
//! The entity version lives in the fixed header so `peek_version` can decide
//! whether migration is needed without constructing the tree. The payload is
//! one tag byte per value, u32 LE lengths and counts, map entries in document
//! order; encoding is deterministic and byte-stable across decode/encode.

use super::checksum::compute_checksum;
use super::errors::{CodecError, CodecResult};
use crate::document::{DocumentValue, ENTITY_VERSION_FIELD};
use std::io::{Cursor, Read};

/// Current blob format tag
pub const FORMAT_TAG: u8 = 1;

// Header: length (4) + format tag (1) + entity version (8) + payload length (4)
const HEADER_SIZE: usize = 4 + 1 + 8 + 4;
// Smallest legal blob: header + empty payload + checksum
const MIN_BLOB_SIZE: usize = HEADER_SIZE + 4;

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_TEXT: u8 = 4;
const TAG_ARRAY: u8 = 5;
const TAG_MAP: u8 = 6;

/// Read the entity version from a blob without constructing the tree.
///
/// The checksum is still verified: corruption is never ignored, and the
/// cost is a CRC pass over bytes already in memory, not a decode.
pub fn peek_version(bytes: &[u8]) -> CodecResult<i64> {
    let body = verified_body(bytes)?;
    // body starts after the length field: format tag, then version
    if body[0] != FORMAT_TAG {
        return Err(CodecError::UnsupportedFormat(body[0]));
    }
    let mut version_buf = [0u8; 8];
    version_buf.copy_from_slice(&body[1..9]);
    Ok(i64::from_le_bytes(version_buf))
}

/// Fully decode a blob into a document.
///
/// Verifies the checksum, parses the tree, and cross-checks the header
/// version against the root `entityVersion` field.
pub fn decode(bytes: &[u8]) -> CodecResult<DocumentValue> {
    let header_version = peek_version(bytes)?;
    let body = verified_body(bytes)?;

    let mut cursor = Cursor::new(&body[9..]);
    let payload = read_bytes(&mut cursor)?;
    let remaining = body.len() - 9 - 4 - payload.len();
    if remaining != 0 {
        return Err(CodecError::TrailingBytes(remaining));
    }

    let mut payload_cursor = Cursor::new(payload.as_slice());
    let doc = read_value(&mut payload_cursor)?;
    let consumed = payload_cursor.position() as usize;
    if consumed != payload.len() {
        return Err(CodecError::TrailingBytes(payload.len() - consumed));
    }

    let root_version = root_version(&doc)?;
    if root_version != header_version {
        return Err(CodecError::VersionMismatch {
            header: header_version,
            root: root_version,
        });
    }
    Ok(doc)
}

/// Serialize a document into a blob.
///
/// The document root must be a map carrying an integer `entityVersion`
/// field; the version is mirrored into the header.
pub fn encode(doc: &DocumentValue) -> CodecResult<Vec<u8>> {
    let version = root_version(doc)?;

    let mut payload = Vec::new();
    write_value(&mut payload, doc);

    let blob_length = (HEADER_SIZE + payload.len() + 4) as u32;
    let mut blob = Vec::with_capacity(blob_length as usize);
    blob.extend_from_slice(&blob_length.to_le_bytes());
    blob.push(FORMAT_TAG);
    blob.extend_from_slice(&version.to_le_bytes());
    blob.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    blob.extend_from_slice(&payload);

    let checksum = compute_checksum(&blob);
    blob.extend_from_slice(&checksum.to_le_bytes());
    Ok(blob)
}

/// Validate length and checksum, returning the bytes between the length
/// field and the checksum.
fn verified_body(bytes: &[u8]) -> CodecResult<&[u8]> {
    if bytes.len() < MIN_BLOB_SIZE {
        return Err(CodecError::Truncated {
            expected: MIN_BLOB_SIZE,
            actual: bytes.len(),
        });
    }

    let blob_length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if blob_length < MIN_BLOB_SIZE || bytes.len() < blob_length {
        return Err(CodecError::Truncated {
            expected: blob_length.max(MIN_BLOB_SIZE),
            actual: bytes.len(),
        });
    }

    let checksum_offset = blob_length - 4;
    let stored = u32::from_le_bytes([
        bytes[checksum_offset],
        bytes[checksum_offset + 1],
        bytes[checksum_offset + 2],
        bytes[checksum_offset + 3],
    ]);
    let computed = compute_checksum(&bytes[..checksum_offset]);
    if computed != stored {
        return Err(CodecError::ChecksumMismatch { computed, stored });
    }

    Ok(&bytes[4..checksum_offset])
}

/// Extract the root entity version, distinguishing the malformed cases.
fn root_version(doc: &DocumentValue) -> CodecResult<i64> {
    let DocumentValue::Map(_) = doc else {
        return Err(CodecError::NotAMap {
            type_name: doc.type_name(),
        });
    };
    let Some(field) = doc.entry(ENTITY_VERSION_FIELD) else {
        return Err(CodecError::MissingEntityVersion);
    };
    field.as_int().ok_or(CodecError::NonIntegerVersion {
        type_name: field.type_name(),
    })
}

fn write_value(buf: &mut Vec<u8>, value: &DocumentValue) {
    match value {
        DocumentValue::Null => buf.push(TAG_NULL),
        DocumentValue::Bool(b) => {
            buf.push(TAG_BOOL);
            buf.push(u8::from(*b));
        }
        DocumentValue::Int(i) => {
            buf.push(TAG_INT);
            buf.extend_from_slice(&i.to_le_bytes());
        }
        DocumentValue::Float(f) => {
            buf.push(TAG_FLOAT);
            buf.extend_from_slice(&f.to_le_bytes());
        }
        DocumentValue::Text(s) => {
            buf.push(TAG_TEXT);
            buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
            buf.extend_from_slice(s.as_bytes());
        }
        DocumentValue::Array(items) => {
            buf.push(TAG_ARRAY);
            buf.extend_from_slice(&(items.len() as u32).to_le_bytes());
            for item in items {
                write_value(buf, item);
            }
        }
        DocumentValue::Map(entries) => {
            buf.push(TAG_MAP);
            buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
            for (key, child) in entries {
                buf.extend_from_slice(&(key.len() as u32).to_le_bytes());
                buf.extend_from_slice(key.as_bytes());
                write_value(buf, child);
            }
        }
    }
}

fn read_value<R: Read>(reader: &mut R) -> CodecResult<DocumentValue> {
    let tag = read_u8(reader)?;
    match tag {
        TAG_NULL => Ok(DocumentValue::Null),
        TAG_BOOL => Ok(DocumentValue::Bool(read_u8(reader)? != 0)),
        TAG_INT => {
            let mut buf = [0u8; 8];
            read_exact(reader, &mut buf)?;
            Ok(DocumentValue::Int(i64::from_le_bytes(buf)))
        }
        TAG_FLOAT => {
            let mut buf = [0u8; 8];
            read_exact(reader, &mut buf)?;
            Ok(DocumentValue::Float(f64::from_le_bytes(buf)))
        }
        TAG_TEXT => Ok(DocumentValue::Text(read_string(reader)?)),
        TAG_ARRAY => {
            let count = read_u32(reader)? as usize;
            let mut items = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                items.push(read_value(reader)?);
            }
            Ok(DocumentValue::Array(items))
        }
        TAG_MAP => {
            let count = read_u32(reader)? as usize;
            let mut entries = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                let key = read_string(reader)?;
                let child = read_value(reader)?;
                entries.push((key, child));
            }
            Ok(DocumentValue::Map(entries))
        }
        other => Err(CodecError::InvalidTag(other)),
    }
}

fn read_u8<R: Read>(reader: &mut R) -> CodecResult<u8> {
    let mut buf = [0u8; 1];
    read_exact(reader, &mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> CodecResult<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_string<R: Read>(reader: &mut R) -> CodecResult<String> {
    let bytes = read_bytes(reader)?;
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

fn read_bytes<R: Read>(reader: &mut R) -> CodecResult<Vec<u8>> {
    let len = read_u32(reader)? as usize;
    let mut buf = vec![0u8; len];
    read_exact(reader, &mut buf)?;
    Ok(buf)
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> CodecResult<()> {
    reader.read_exact(buf).map_err(|_| CodecError::Truncated {
        expected: buf.len(),
        actual: 0,
    })
}
