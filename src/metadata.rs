//! The seq=2 metadata payload: `<basename>,<extension>,<size-in-bytes>`.

use crate::err::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub basename: String,
    pub extension: String,
    pub size: u64,
}

impl Metadata {
    /// Splits a filename into basename and extension on its final dot.
    pub fn from_filename(filename: &str, size: u64) -> Self {
        match filename.rsplit_once('.') {
            Some((basename, extension)) => Metadata {
                basename: basename.to_string(),
                extension: extension.to_string(),
                size,
            },
            None => Metadata {
                basename: filename.to_string(),
                extension: String::new(),
                size,
            },
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        format!("{},{},{}", self.basename, self.extension, self.size).into_bytes()
    }

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload).map_err(|_| Error::InvalidMetadata(payload.to_vec()))?;
        let mut parts = text.splitn(3, ',');
        let (basename, extension, size) = match (parts.next(), parts.next(), parts.next()) {
            (Some(basename), Some(extension), Some(size)) => (basename, extension, size),
            _ => return Err(Error::InvalidMetadata(payload.to_vec())),
        };
        let size: u64 = size
            .parse()
            .map_err(|_| Error::InvalidMetadata(payload.to_vec()))?;
        Ok(Metadata {
            basename: basename.to_string(),
            extension: extension.to_string(),
            size,
        })
    }

    pub fn filename(&self) -> String {
        if self.extension.is_empty() {
            self.basename.clone()
        } else {
            format!("{}.{}", self.basename, self.extension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_wire_format() {
        let meta = Metadata::from_filename("a.txt", 1);
        assert_eq!(meta.basename, "a");
        assert_eq!(meta.extension, "txt");
        let decoded = Metadata::decode(&meta.encode()).unwrap();
        assert_eq!(decoded, meta);
        assert_eq!(decoded.filename(), "a.txt");
    }

    #[test]
    fn filename_without_extension_round_trips() {
        let meta = Metadata::from_filename("README", 42);
        assert_eq!(meta.basename, "README");
        assert_eq!(meta.extension, "");
        let decoded = Metadata::decode(&meta.encode()).unwrap();
        assert_eq!(decoded.filename(), "README");
    }

    #[test]
    fn rejects_payload_missing_fields() {
        assert!(Metadata::decode(b"only,two").is_err());
        assert!(Metadata::decode(b"not,a,number").is_err());
    }
}
