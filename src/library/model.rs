use crate::metadata::{Field, MetadataRecord};
use crate::sync::SyncTime;

/// One catalogued audio file.
///
/// Every metadata field is optional: absence is the common case, not an
/// error. `last_sync_time` is `None` only for a record that has never been
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    /// Library-relative, slash-separated key. Unique across the catalog.
    pub path: String,
    pub mime: Option<String>,
    pub last_sync_time: Option<SyncTime>,

    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub modified_by: Option<String>,
    pub grouping: Option<String>,
    pub copyright: Option<String>,
    pub publisher: Option<String>,
    pub composer: Option<String>,
    pub track: Option<String>,
    pub set: Option<String>,
    pub bpm: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub codec: Option<String>,
    pub encoded_by: Option<String>,

    /// Whether the latest successful extraction carried cover art.
    pub has_cover: bool,
}

impl Track {
    /// A fresh, not yet persisted record for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// True until the record has been touched by a sync run.
    pub fn is_new(&self) -> bool {
        self.last_sync_time.is_none()
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::ModifiedBy => &self.modified_by,
            Field::Grouping => &self.grouping,
            Field::Copyright => &self.copyright,
            Field::Publisher => &self.publisher,
            Field::Composer => &self.composer,
            Field::Track => &self.track,
            Field::Set => &self.set,
            Field::Bpm => &self.bpm,
            Field::Year => &self.year,
            Field::Genre => &self.genre,
            Field::Codec => &self.codec,
            Field::EncodedBy => &self.encoded_by,
        };
        value.as_deref()
    }

    pub fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Artist => &mut self.artist,
            Field::Album => &mut self.album,
            Field::ModifiedBy => &mut self.modified_by,
            Field::Grouping => &mut self.grouping,
            Field::Copyright => &mut self.copyright,
            Field::Publisher => &mut self.publisher,
            Field::Composer => &mut self.composer,
            Field::Track => &mut self.track,
            Field::Set => &mut self.set,
            Field::Bpm => &mut self.bpm,
            Field::Year => &mut self.year,
            Field::Genre => &mut self.genre,
            Field::Codec => &mut self.codec,
            Field::EncodedBy => &mut self.encoded_by,
        }
    }

    /// Overlay an extraction onto this record.
    ///
    /// Only fields present in `record` are written; everything else keeps its
    /// previous value. `has_cover` is the exception and always mirrors the
    /// new extraction.
    pub fn merge(&mut self, record: &MetadataRecord) {
        if let Some(mime) = record.mime() {
            self.mime = Some(mime.to_string());
        }
        for (field, value) in record.fields() {
            *self.field_mut(field) = Some(value.to_string());
        }
        self.has_cover = record.cover().is_some();
    }

    pub fn touch(&mut self, at: SyncTime) {
        self.last_sync_time = Some(at);
    }

    /// "Artist - Title" when both are known, the title alone without an
    /// artist, else the key.
    pub fn display(&self) -> String {
        let artist = self.artist.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let title = self.title.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (artist, title) {
            (Some(a), Some(t)) => format!("{a} - {t}"),
            (None, Some(t)) => t.to_string(),
            (_, None) => self.path.clone(),
        }
    }
}
