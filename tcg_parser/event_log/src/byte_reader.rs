/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! Byte Reader Module
//!
//! Forward-only cursor over a byte buffer used by every decoder in this crate.
//! All multi-byte integers are little-endian. Every read checks the number of
//! remaining bytes first and reports `EventLogError::UnexpectedEnd` instead of
//! panicking, so callers can decide to stop or fall back.
//!
//! The module contains two main components:
//! - `ByteReader`: the cursor with fixed-width, declared-length and UTF-16 reads
//! - `ByteParseable`: a trait for structures that decode themselves field by field

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use uuid::Uuid;

use crate::error::EventLogError;

/// UEFI GUID size
pub const UEFI_GUID_SIZE: usize = 16;

/// Binary data parsing helper structure
///
/// Wraps a `Cursor` over borrowed bytes. The position only moves forward.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

/// Trait for types that can be parsed from a byte stream
///
/// # Example
///
/// ```rust ignore
/// use tcg_event_log::{ByteReader, ByteParseable, EventLogError};
///
/// struct Blob {
///     base: u64,
///     length: u64,
/// }
///
/// impl ByteParseable for Blob {
///     fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
///         Ok(Self { base: parser.read_u64()?, length: parser.read_u64()? })
///     }
/// }
/// ```
pub trait ByteParseable: Sized {
    /// Parse an instance of the current type from a byte reader
    ///
    /// # Errors
    ///
    /// Returns an error when the byte stream contains insufficient data or is incorrectly formatted
    fn parse_from(parser: &mut ByteReader<'_>) -> Result<Self, EventLogError>;
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the first byte of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current reading position (byte offset)
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Number of unread bytes remaining
    pub fn remaining(&self) -> u64 {
        let total: u64 = self.cursor.get_ref().len() as u64;
        total.saturating_sub(self.cursor.position())
    }

    /// Check if the end of data has been reached
    pub fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, length: u64) -> Result<(), EventLogError> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(EventLogError::UnexpectedEnd { requested: length, remaining });
        }
        Ok(())
    }

    /// Read a u8 value
    pub fn read_u8(&mut self) -> Result<u8, EventLogError> {
        self.ensure(1)?;
        self.cursor.read_u8()
            .map_err(|e| EventLogError::InputError(format!("Failed to read u8: {}", e)))
    }

    /// Read a u16 value (little-endian)
    pub fn read_u16(&mut self) -> Result<u16, EventLogError> {
        self.ensure(2)?;
        self.cursor.read_u16::<LittleEndian>()
            .map_err(|e| EventLogError::InputError(format!("Failed to read u16: {}", e)))
    }

    /// Read a u32 value (little-endian)
    pub fn read_u32(&mut self) -> Result<u32, EventLogError> {
        self.ensure(4)?;
        self.cursor.read_u32::<LittleEndian>()
            .map_err(|e| EventLogError::InputError(format!("Failed to read u32: {}", e)))
    }

    /// Read a u64 value (little-endian)
    pub fn read_u64(&mut self) -> Result<u64, EventLogError> {
        self.ensure(8)?;
        self.cursor.read_u64::<LittleEndian>()
            .map_err(|e| EventLogError::InputError(format!("Failed to read u64: {}", e)))
    }

    /// Read bytes of specified length into an owned buffer
    ///
    /// # Errors
    /// * Returns `UnexpectedEnd` when the requested number of bytes exceeds the remaining bytes
    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, EventLogError> {
        self.ensure(length as u64)?;
        let mut buffer: Vec<u8> = vec![0u8; length];
        self.cursor.read_exact(&mut buffer)
            .map_err(|e| EventLogError::InputError(format!("Failed to read bytes: {}", e)))?;
        Ok(buffer)
    }

    /// Read a fixed-size byte array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EventLogError> {
        self.ensure(N as u64)?;
        let mut buffer = [0u8; N];
        self.cursor.read_exact(&mut buffer)
            .map_err(|e| EventLogError::InputError(format!("Failed to read {} bytes: {}", N, e)))?;
        Ok(buffer)
    }

    /// Read every remaining byte
    pub fn read_remaining(&mut self) -> Vec<u8> {
        let start = self.cursor.position() as usize;
        let data: &'a [u8] = *self.cursor.get_ref();
        let rest = data.get(start..).unwrap_or_default().to_vec();
        self.cursor.set_position(data.len() as u64);
        rest
    }

    /// Borrow the next `length` bytes without moving the position
    pub fn peek_bytes(&self, length: usize) -> Option<&'a [u8]> {
        let start = self.cursor.position() as usize;
        let data: &'a [u8] = *self.cursor.get_ref();
        data.get(start..start.checked_add(length)?)
    }

    /// Advance the position by `length` bytes without interpreting them
    ///
    /// # Errors
    /// * Returns `UnexpectedEnd` if fewer than `length` bytes remain; the position is unchanged
    pub fn skip(&mut self, length: u64) -> Result<(), EventLogError> {
        self.ensure(length)?;
        self.cursor.set_position(self.cursor.position() + length);
        Ok(())
    }

    /// Split off the next `length` bytes as an independent reader
    ///
    /// The parent reader is advanced past the isolated span whether or not the
    /// child consumes all of it.
    pub fn sub_reader(&mut self, length: usize) -> Result<ByteReader<'a>, EventLogError> {
        self.ensure(length as u64)?;
        let start = self.cursor.position() as usize;
        let data: &'a [u8] = *self.cursor.get_ref();
        let span = &data[start..start + length];
        self.cursor.set_position((start + length) as u64);
        Ok(ByteReader::new(span))
    }

    /// Read GUID (16 bytes, mixed-endian UEFI layout)
    pub fn read_guid(&mut self) -> Result<Uuid, EventLogError> {
        let guid_bytes: [u8; UEFI_GUID_SIZE] = self.read_array()?;
        Ok(Uuid::from_bytes_le(guid_bytes))
    }

    /// Read exactly `length` UTF-16LE code units
    ///
    /// The text ends at the first NUL unit, but all `length` units are consumed.
    /// Invalid surrogates become U+FFFD.
    pub fn read_utf16_units(&mut self, length: usize) -> Result<String, EventLogError> {
        let byte_length = length.checked_mul(2)
            .ok_or_else(|| EventLogError::InputError(format!("UTF-16 length overflow: {}", length)))?;
        self.ensure(byte_length as u64)?;
        let mut units: Vec<u16> = Vec::with_capacity(length);
        for _ in 0..length {
            units.push(self.read_u16()?);
        }
        Ok(decode_utf16_until_nul(&units))
    }

    /// Read UCS-2 (UTF-16LE) string
    ///
    /// Consumes code units until a NUL unit or until fewer than two bytes remain.
    /// The NUL terminator is consumed but not returned.
    pub fn read_ucs2_string(&mut self) -> Result<String, EventLogError> {
        let mut units: Vec<u16> = Vec::new();
        while self.remaining() >= 2 {
            let code_unit = self.read_u16()?;
            if code_unit == 0 {
                break;
            }
            units.push(code_unit);
        }
        Ok(decode_utf16_until_nul(&units))
    }
}

/// Decode UTF-16 code units, stopping at the first NUL
pub fn decode_utf16_until_nul(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    char::decode_utf16(units[..end].iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
