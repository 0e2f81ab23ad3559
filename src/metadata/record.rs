use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of scalar tags the catalog keeps per track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Artist,
    Album,
    /// Remixer or other reinterpreting artist.
    ModifiedBy,
    /// Preferred grouping identifier over `Artist` (album artist).
    Grouping,
    Copyright,
    Publisher,
    Composer,
    /// Track number as `X` or `X/Y`.
    Track,
    /// Disc number as `X` or `X/Y`.
    Set,
    Bpm,
    Year,
    Genre,
    Codec,
    EncodedBy,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Title,
        Field::Artist,
        Field::Album,
        Field::ModifiedBy,
        Field::Grouping,
        Field::Copyright,
        Field::Publisher,
        Field::Composer,
        Field::Track,
        Field::Set,
        Field::Bpm,
        Field::Year,
        Field::Genre,
        Field::Codec,
        Field::EncodedBy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::ModifiedBy => "modified_by",
            Field::Grouping => "grouping",
            Field::Copyright => "copyright",
            Field::Publisher => "publisher",
            Field::Composer => "composer",
            Field::Track => "track",
            Field::Set => "set",
            Field::Bpm => "bpm",
            Field::Year => "year",
            Field::Genre => "genre",
            Field::Codec => "codec",
            Field::EncodedBy => "encoded_by",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary data tagged with its MIME type (cover art).
#[derive(Clone, PartialEq, Eq)]
pub struct MimeData {
    pub mime: String,
    pub data: Vec<u8>,
}

impl MimeData {
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }
}

impl fmt::Debug for MimeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimeData")
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Sparse output of one extraction.
///
/// Only fields that were present and non-empty are stored, so merging a
/// record never blanks out existing catalog values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    mime: Option<String>,
    fields: BTreeMap<Field, String>,
    cover: Option<MimeData>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MetadataRecord::insert`].
    #[cfg(test)]
    pub fn with(mut self, field: Field, value: impl AsRef<str>) -> Self {
        self.insert(field, value);
        self
    }

    /// Store `value` trimmed; blank values are dropped.
    pub fn insert(&mut self, field: Field, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.fields.insert(field, value.to_string());
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn set_mime(&mut self, mime: impl AsRef<str>) {
        let mime = mime.as_ref().trim();
        if !mime.is_empty() {
            self.mime = Some(mime.to_string());
        }
    }

    pub fn cover(&self) -> Option<&MimeData> {
        self.cover.as_ref()
    }

    /// Attach cover art. Empty payloads are not a cover.
    pub fn set_cover(&mut self, cover: MimeData) {
        if !cover.data.is_empty() {
            self.cover = Some(cover);
        }
    }
}
