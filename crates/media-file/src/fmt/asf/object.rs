// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Minimal codec for the top-level ASF Header Object.
//!
//! Only the Content Description and Extended Content Description
//! objects are decoded. All other header objects and everything that
//! follows the header are preserved byte by byte.

use std::{
    fs::File,
    io::{self, Read, Seek as _, SeekFrom, Write as _},
};

use thiserror::Error;

/// GUID in its on-disk (mixed-endian) byte order.
pub type Guid = [u8; 16];

/// `75B22630-668E-11CF-A6D9-00AA0062CE6C`
pub const HEADER_OBJECT_GUID: Guid = [
    0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

/// `8CABDCA1-A947-11CF-8EE4-00C00C205365`
pub const FILE_PROPERTIES_OBJECT_GUID: Guid = [
    0xA1, 0xDC, 0xAB, 0x8C, 0x47, 0xA9, 0xCF, 0x11, 0x8E, 0xE4, 0x00, 0xC0, 0x0C, 0x20, 0x53, 0x65,
];

/// `75B22633-668E-11CF-A6D9-00AA0062CE6C`
pub const CONTENT_DESCRIPTION_OBJECT_GUID: Guid = [
    0x33, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

/// `D2D0A440-E307-11D2-97F0-00A0C95EA850`
pub const EXTENDED_CONTENT_DESCRIPTION_OBJECT_GUID: Guid = [
    0x40, 0xA4, 0xD0, 0xD2, 0x07, 0xE3, 0xD2, 0x11, 0x97, 0xF0, 0x00, 0xA0, 0xC9, 0x5E, 0xA8, 0x50,
];

/// GUID and size
const OBJECT_PREFIX_LEN: usize = 24;

/// GUID, size, number of objects and two reserved bytes
const HEADER_OBJECT_PREFIX_LEN: usize = 30;

/// Offset of the file size within the File Properties Object data
const FILE_SIZE_OFFSET: usize = 16;

#[derive(Debug, Error)]
pub enum AsfError {
    #[error("missing ASF header object")]
    NotAsf,

    #[error("malformed {0}")]
    Malformed(&'static str),

    #[error("value of {0} is too long")]
    ValueTooLong(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AsfResult<T> = Result<T, AsfError>;

/// A child of the Header Object with its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderObject {
    pub guid: Guid,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Header {
    objects: Vec<HeaderObject>,
    reserved: [u8; 2],
    original_len: u64,
}

impl Header {
    /// Read the Header Object at the current position.
    pub fn read_from<R: Read>(reader: &mut R) -> AsfResult<Self> {
        let mut prefix = [0; HEADER_OBJECT_PREFIX_LEN];
        reader.read_exact(&mut prefix)?;
        if prefix[..16] != HEADER_OBJECT_GUID {
            return Err(AsfError::NotAsf);
        }
        let original_len = read_u64(&prefix[16..24]);
        let num_objects = read_u32(&prefix[24..28]);
        let reserved = [prefix[28], prefix[29]];
        let body_len = original_len
            .checked_sub(HEADER_OBJECT_PREFIX_LEN as u64)
            .ok_or(AsfError::Malformed("header object size"))?;
        let mut body = Vec::new();
        reader.by_ref().take(body_len).read_to_end(&mut body)?;
        if body.len() as u64 != body_len {
            return Err(AsfError::Malformed("truncated header object"));
        }
        let mut objects = Vec::with_capacity(num_objects.min(64) as usize);
        let mut remaining = body.as_slice();
        for _ in 0..num_objects {
            if remaining.len() < OBJECT_PREFIX_LEN {
                return Err(AsfError::Malformed("header child object"));
            }
            let mut guid = Guid::default();
            guid.copy_from_slice(&remaining[..16]);
            let size = usize::try_from(read_u64(&remaining[16..24]))
                .ok()
                .filter(|size| (OBJECT_PREFIX_LEN..=remaining.len()).contains(size))
                .ok_or(AsfError::Malformed("header child object size"))?;
            objects.push(HeaderObject {
                guid,
                data: remaining[OBJECT_PREFIX_LEN..size].to_vec(),
            });
            remaining = &remaining[size..];
        }
        if !remaining.is_empty() {
            log::debug!(
                "Ignoring {num_bytes} trailing byte(s) in ASF header",
                num_bytes = remaining.len()
            );
        }
        Ok(Self {
            objects,
            reserved,
            original_len,
        })
    }

    /// The size of the header when it was read.
    #[must_use]
    pub const fn original_len(&self) -> u64 {
        self.original_len
    }

    /// The size of the header when written.
    #[must_use]
    pub fn encoded_len(&self) -> u64 {
        let objects_len: usize = self
            .objects
            .iter()
            .map(|object| OBJECT_PREFIX_LEN + object.data.len())
            .sum();
        (HEADER_OBJECT_PREFIX_LEN + objects_len) as u64
    }

    pub fn objects(&self) -> impl Iterator<Item = &HeaderObject> {
        self.objects.iter()
    }

    #[must_use]
    pub fn object(&self, guid: &Guid) -> Option<&HeaderObject> {
        self.objects.iter().find(|object| &object.guid == guid)
    }

    /// Replace the first object with the same GUID or append it.
    pub fn replace_object(&mut self, guid: Guid, data: Vec<u8>) {
        if let Some(object) = self.objects.iter_mut().find(|object| object.guid == guid) {
            object.data = data;
        } else {
            self.objects.push(HeaderObject { guid, data });
        }
    }

    pub fn content_description(&self) -> AsfResult<Option<ContentDescription>> {
        self.object(&CONTENT_DESCRIPTION_OBJECT_GUID)
            .map(|object| ContentDescription::decode(&object.data))
            .transpose()
    }

    pub fn set_content_description(&mut self, content: &ContentDescription) -> AsfResult<()> {
        let data = content.encode()?;
        self.replace_object(CONTENT_DESCRIPTION_OBJECT_GUID, data);
        Ok(())
    }

    pub fn extended_content_description(&self) -> AsfResult<Option<ExtendedContentDescription>> {
        self.object(&EXTENDED_CONTENT_DESCRIPTION_OBJECT_GUID)
            .map(|object| ExtendedContentDescription::decode(&object.data))
            .transpose()
    }

    pub fn set_extended_content_description(
        &mut self,
        content: &ExtendedContentDescription,
    ) -> AsfResult<()> {
        let data = content.encode()?;
        self.replace_object(EXTENDED_CONTENT_DESCRIPTION_OBJECT_GUID, data);
        Ok(())
    }

    fn update_file_size(&mut self, file_size: u64) {
        let Some(object) = self
            .objects
            .iter_mut()
            .find(|object| object.guid == FILE_PROPERTIES_OBJECT_GUID)
        else {
            return;
        };
        if let Some(field) = object
            .data
            .get_mut(FILE_SIZE_OFFSET..FILE_SIZE_OFFSET + 8)
        {
            field.copy_from_slice(&file_size.to_le_bytes());
        }
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len() as usize);
        bytes.extend_from_slice(&HEADER_OBJECT_GUID);
        bytes.extend_from_slice(&self.encoded_len().to_le_bytes());
        bytes.extend_from_slice(&(self.objects.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.reserved);
        for object in &self.objects {
            bytes.extend_from_slice(&object.guid);
            bytes.extend_from_slice(&((OBJECT_PREFIX_LEN + object.data.len()) as u64).to_le_bytes());
            bytes.extend_from_slice(&object.data);
        }
        bytes
    }

    /// Replace the header of the file in place.
    ///
    /// All data following the original header is moved accordingly
    /// and the file size in the File Properties Object is updated.
    pub fn write_to(&mut self, file: &mut File) -> AsfResult<()> {
        file.seek(SeekFrom::Start(self.original_len))?;
        let mut trailing = Vec::new();
        file.read_to_end(&mut trailing)?;
        let file_size = self.encoded_len() + trailing.len() as u64;
        self.update_file_size(file_size);
        file.rewind()?;
        file.write_all(&self.encode())?;
        file.write_all(&trailing)?;
        file.set_len(file_size)?;
        self.original_len = self.encoded_len();
        Ok(())
    }
}

/// The five fixed strings of the Content Description Object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDescription {
    pub title: String,
    pub author: String,
    pub copyright: String,
    pub description: String,
    pub rating: String,
}

impl ContentDescription {
    pub fn decode(data: &[u8]) -> AsfResult<Self> {
        let mut reader = SliceReader::new(data, "content description object");
        let mut lengths = [0; 5];
        for len in &mut lengths {
            *len = usize::from(reader.read_u16()?);
        }
        let [title, author, copyright, description, rating] = lengths;
        Ok(Self {
            title: decode_utf16le(reader.read_bytes(title)?),
            author: decode_utf16le(reader.read_bytes(author)?),
            copyright: decode_utf16le(reader.read_bytes(copyright)?),
            description: decode_utf16le(reader.read_bytes(description)?),
            rating: decode_utf16le(reader.read_bytes(rating)?),
        })
    }

    pub fn encode(&self) -> AsfResult<Vec<u8>> {
        let fields = [
            ("title", &self.title),
            ("author", &self.author),
            ("copyright", &self.copyright),
            ("description", &self.description),
            ("rating", &self.rating),
        ];
        let mut strings = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            strings.push(encode_utf16le_string(name, value)?);
        }
        let mut bytes = Vec::new();
        for string in &strings {
            // Checked when encoding
            bytes.extend_from_slice(&(string.len() as u16).to_le_bytes());
        }
        for string in strings {
            bytes.extend_from_slice(&string);
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Unicode(String),
    Bytes(Vec<u8>),
    Bool(bool),
    DWord(u32),
    QWord(u64),
    Word(u16),
}

impl AttributeValue {
    const UNICODE: u16 = 0;
    const BYTES: u16 = 1;
    const BOOL: u16 = 2;
    const DWORD: u16 = 3;
    const QWORD: u16 = 4;
    const WORD: u16 = 5;

    /// Textual representation of all but binary values.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Unicode(value) => Some(value.clone()),
            Self::Bytes(_) => None,
            Self::Bool(value) => Some(if *value { "1" } else { "0" }.to_owned()),
            Self::DWord(value) => Some(value.to_string()),
            Self::QWord(value) => Some(value.to_string()),
            Self::Word(value) => Some(value.to_string()),
        }
    }

    fn decode(value_type: u16, data: &[u8]) -> AsfResult<Self> {
        let value = match value_type {
            Self::UNICODE => Self::Unicode(decode_utf16le(data)),
            Self::BYTES => Self::Bytes(data.to_vec()),
            Self::BOOL => Self::Bool(data.iter().any(|byte| *byte != 0)),
            Self::DWORD if data.len() == 4 => Self::DWord(read_u32(data)),
            Self::QWORD if data.len() == 8 => Self::QWord(read_u64(data)),
            Self::WORD if data.len() == 2 => Self::Word(u16::from_le_bytes([data[0], data[1]])),
            _ => {
                return Err(AsfError::Malformed("attribute value"));
            }
        };
        Ok(value)
    }

    fn encode(&self, name: &str) -> AsfResult<(u16, Vec<u8>)> {
        let encoded = match self {
            Self::Unicode(value) => (Self::UNICODE, encode_utf16le_string(name, value)?),
            Self::Bytes(value) => (Self::BYTES, value.clone()),
            Self::Bool(value) => (Self::BOOL, u32::from(*value).to_le_bytes().to_vec()),
            Self::DWord(value) => (Self::DWORD, value.to_le_bytes().to_vec()),
            Self::QWord(value) => (Self::QWORD, value.to_le_bytes().to_vec()),
            Self::Word(value) => (Self::WORD, value.to_le_bytes().to_vec()),
        };
        Ok(encoded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

/// Named and typed descriptors in the order of their occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedContentDescription {
    pub attributes: Vec<Attribute>,
}

impl ExtendedContentDescription {
    pub fn decode(data: &[u8]) -> AsfResult<Self> {
        let mut reader = SliceReader::new(data, "extended content description object");
        let count = reader.read_u16()?;
        let mut attributes = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let name_len = usize::from(reader.read_u16()?);
            let name = decode_utf16le(reader.read_bytes(name_len)?);
            let value_type = reader.read_u16()?;
            let value_len = usize::from(reader.read_u16()?);
            let value = AttributeValue::decode(value_type, reader.read_bytes(value_len)?)?;
            attributes.push(Attribute { name, value });
        }
        Ok(Self { attributes })
    }

    pub fn encode(&self) -> AsfResult<Vec<u8>> {
        let count = u16::try_from(self.attributes.len())
            .map_err(|_| AsfError::ValueTooLong("extended content description".to_owned()))?;
        let mut bytes = count.to_le_bytes().to_vec();
        for Attribute { name, value } in &self.attributes {
            let encoded_name = encode_utf16le_string(name, name)?;
            let (value_type, encoded_value) = value.encode(name)?;
            let value_len = u16::try_from(encoded_value.len())
                .map_err(|_| AsfError::ValueTooLong(name.clone()))?;
            bytes.extend_from_slice(&(encoded_name.len() as u16).to_le_bytes());
            bytes.extend_from_slice(&encoded_name);
            bytes.extend_from_slice(&value_type.to_le_bytes());
            bytes.extend_from_slice(&value_len.to_le_bytes());
            bytes.extend_from_slice(&encoded_value);
        }
        Ok(bytes)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.get_all(name).next()
    }

    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a AttributeValue> {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.name == name)
            .map(|attribute| &attribute.value)
    }

    /// Replace all values of an attribute with a single value.
    pub fn set(&mut self, name: &str, value: AttributeValue) {
        self.remove(name);
        self.push(name, value);
    }

    pub fn push(&mut self, name: &str, value: AttributeValue) {
        self.attributes.push(Attribute {
            name: name.to_owned(),
            value,
        });
    }

    pub fn remove(&mut self, name: &str) {
        self.attributes.retain(|attribute| attribute.name != name);
    }
}

/// Payload of a `WM/Picture` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfPicture {
    /// Same numbering as ID3v2 `APIC`
    pub picture_type: u8,
    pub media_type: String,
    pub description: String,
    pub data: Vec<u8>,
}

impl AsfPicture {
    pub const FRONT_COVER: u8 = 3;

    pub fn decode(data: &[u8]) -> AsfResult<Self> {
        let mut reader = SliceReader::new(data, "picture attribute");
        let picture_type = reader.read_u8()?;
        let data_len = reader.read_u32()? as usize;
        let media_type = decode_utf16le(reader.read_utf16z()?);
        let description = decode_utf16le(reader.read_utf16z()?);
        let data = reader.read_bytes(data_len)?.to_vec();
        Ok(Self {
            picture_type,
            media_type,
            description,
            data,
        })
    }

    pub fn encode(&self) -> AsfResult<Vec<u8>> {
        let data_len = u32::try_from(self.data.len())
            .map_err(|_| AsfError::ValueTooLong("picture".to_owned()))?;
        let mut bytes = vec![self.picture_type];
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.extend(encode_utf16le(&self.media_type));
        bytes.extend(encode_utf16le(&self.description));
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

/// Decode UTF-16LE and strip the terminating NUL characters.
#[must_use]
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|unit| u16::from_le_bytes([unit[0], unit[1]]))
        .collect::<Vec<_>>();
    let mut decoded = String::from_utf16_lossy(&units);
    decoded.truncate(decoded.trim_end_matches('\0').len());
    decoded
}

/// Encode as UTF-16LE with a terminating NUL character.
fn encode_utf16le(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Encode a string with a 16-bit length prefix.
///
/// Empty strings are encoded without a terminator.
fn encode_utf16le_string(name: &str, value: &str) -> AsfResult<Vec<u8>> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let encoded = encode_utf16le(value);
    if encoded.len() > usize::from(u16::MAX) {
        return Err(AsfError::ValueTooLong(name.to_owned()));
    }
    Ok(encoded)
}

/// Whether a string fits into a value with a 16-bit length prefix.
#[must_use]
pub fn fits_utf16le_string(value: &str) -> bool {
    (value.encode_utf16().count() + 1) * 2 <= usize::from(u16::MAX)
}

struct SliceReader<'a> {
    remaining: &'a [u8],
    context: &'static str,
}

impl<'a> SliceReader<'a> {
    const fn new(data: &'a [u8], context: &'static str) -> Self {
        Self {
            remaining: data,
            context,
        }
    }

    fn read_bytes(&mut self, len: usize) -> AsfResult<&'a [u8]> {
        if self.remaining.len() < len {
            return Err(AsfError::Malformed(self.context));
        }
        let (bytes, remaining) = self.remaining.split_at(len);
        self.remaining = remaining;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> AsfResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> AsfResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> AsfResult<u32> {
        self.read_bytes(4).map(read_u32)
    }

    /// Read up to and including a 16-bit NUL terminator.
    fn read_utf16z(&mut self) -> AsfResult<&'a [u8]> {
        let len = self
            .remaining
            .chunks_exact(2)
            .position(|unit| unit == [0, 0])
            .map(|units| (units + 1) * 2)
            .ok_or(AsfError::Malformed(self.context))?;
        self.read_bytes(len)
    }
}
