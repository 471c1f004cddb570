//! Version sniffing for GFD files.
use std::{fs::File, io::Read, path::Path};

use crate::reader::BinaryReader;

pub const VERSION_A: u32 = 0x0001_0C06;
pub const VERSION_B: u32 = 0x0001_0F06;

/// Size of the magic + version tag at the start of every GFD file.
pub const TAG_LEN: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ident {
    NotFound,
    NotSupported,
    VersionA,
    VersionB,
}

impl Ident {
    pub fn from_version(version: u32) -> Self {
        match version {
            VERSION_A => Ident::VersionA,
            VERSION_B => Ident::VersionB,
            _ => Ident::NotSupported,
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self, Ident::VersionA | Ident::VersionB)
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ident::NotFound => "NotFound",
            Ident::NotSupported => "NotSupported",
            Ident::VersionA => "VersionA",
            Ident::VersionB => "VersionB",
        };
        f.write_str(s)
    }
}

/// Classify the file at `path` by its version field.
///
/// Only the 8-byte tag is read and the file is closed before returning.
/// The magic bytes are not checked.
pub fn identify(path: impl AsRef<Path>) -> Ident {
    let path = path.as_ref();
    let Ok(file) = File::open(path) else {
        return Ident::NotFound;
    };
    if !path.is_file() {
        return Ident::NotFound;
    }
    let ident = read_ident(file);
    log::debug!("identified {} as {ident}", path.display());
    ident
}

/// Classify an in-memory GFD buffer.
pub fn identify_bytes(bytes: &[u8]) -> Ident {
    read_ident(bytes)
}

fn read_ident<R: Read>(inner: R) -> Ident {
    let mut reader = BinaryReader::new(inner);
    match reader.read_array::<TAG_LEN>() {
        Ok(tag) => Ident::from_version(u32::from_le_bytes([tag[4], tag[5], tag[6], tag[7]])),
        Err(_) => Ident::NotSupported,
    }
}
