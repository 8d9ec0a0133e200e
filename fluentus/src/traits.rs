//! Reading and writing whole `.ftl` files.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Cursor, Read, Write},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::{
    ast::Resource,
    error::Error,
    parser::parse,
    serializer::Serializer,
};

/// A trait for parsing and writing one localization file.
///
/// # Example
///
/// ```rust,no_run
/// use fluentus::{ast::Resource, traits::Parser};
/// let resource = Resource::read_from("locales/en/main.ftl")?;
/// resource.write_to("locales/en/main.copy.ftl")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|error| match error {
            Error::Io(source) => Error::Read {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            self.to_writer(&mut writer).map_err(io::Error::other)?;
            writer.flush()
        };
        write().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl Parser for Resource {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(parse(&decode(&bytes)?))
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let content = Serializer::default().serialize(self);
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

/// Decodes file content, honouring a UTF-8 or UTF-16 byte order mark.
///
/// Unlike a lossy decode, malformed input is an error so a corrupt file is
/// never loaded and later written back with replacement characters.
pub(crate) fn decode(bytes: &[u8]) -> io::Result<Cow<'_, str>> {
    let (encoding, bom_length): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("content is not valid {}", encoding.name()),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Entry;
    use tempfile::tempdir;

    #[test]
    fn test_from_str_and_writer() {
        let resource = Resource::from_str("hello = Hello\n").unwrap();
        assert_eq!(resource.body.len(), 1);

        let mut out = Vec::new();
        resource.to_writer(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello = Hello\n");
    }

    #[test]
    fn test_utf8_bom_is_skipped() {
        let resource = Resource::from_bytes(b"\xEF\xBB\xBFhello = Hello\n").unwrap();
        assert!(matches!(&resource.body[0], Entry::Message(message) if message.id == "hello"));
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "a = b\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let resource = Resource::from_bytes(&bytes).unwrap();
        assert_eq!(resource.messages().count(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let result = Resource::from_bytes(b"a = \xFF\xFE\xFD oops\n");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.ftl");
        let resource = Resource::from_str("# Note\nhello = Hello\n").unwrap();
        resource.write_to(&path).unwrap();

        let reloaded = Resource::read_from(&path).unwrap();
        assert_eq!(reloaded, resource);
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.ftl");
        match Resource::read_from(&path) {
            Err(Error::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a read error, got {:?}", other),
        }
    }
}
