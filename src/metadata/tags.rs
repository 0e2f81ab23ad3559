use std::path::Path;

use lofty::file::{FileType, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{ItemKey, Tag};
use tracing::debug;

use super::record::{Field, MetadataRecord, MimeData};
use super::registry::MetadataExtractor;

/// Built-in extractor backed by `lofty`.
///
/// Reads the primary tag (or the first one present) and coerces every value
/// to text. Works for any container lofty can read, so one instance serves
/// every configured extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagExtractor;

impl MetadataExtractor for TagExtractor {
    fn read_metadata(&self, path: &Path) -> Option<MetadataRecord> {
        let tagged = match lofty::read_from_path(path) {
            Ok(tagged) => tagged,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "cannot parse tags");
                return None;
            }
        };

        let file_type = tagged.file_type();
        let mut record = MetadataRecord::new();
        if let Some(mime) = file_type_mime(file_type) {
            record.set_mime(mime);
        }

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            collect_fields(tag, &mut record);
            if let Some(cover) = pick_cover(tag.pictures()) {
                record.set_cover(cover);
            }
        }

        if !record.contains(Field::Codec) {
            if let Some(codec) = codec_name(file_type) {
                record.insert(Field::Codec, codec);
            }
        }

        Some(record)
    }
}

fn field_for(key: &ItemKey) -> Option<Field> {
    let field = match key {
        ItemKey::TrackTitle => Field::Title,
        ItemKey::TrackArtist => Field::Artist,
        ItemKey::AlbumTitle => Field::Album,
        ItemKey::Remixer => Field::ModifiedBy,
        ItemKey::AlbumArtist => Field::Grouping,
        ItemKey::CopyrightMessage => Field::Copyright,
        ItemKey::Publisher => Field::Publisher,
        ItemKey::Composer => Field::Composer,
        ItemKey::TrackNumber => Field::Track,
        ItemKey::DiscNumber => Field::Set,
        // ID3v2 TBPM and MP4 tmpo come through as the integer form.
        ItemKey::IntegerBpm | ItemKey::Bpm => Field::Bpm,
        ItemKey::RecordingDate => Field::Year,
        ItemKey::Genre => Field::Genre,
        ItemKey::EncodedBy => Field::EncodedBy,
        ItemKey::FileType => Field::Codec,
        _ => return None,
    };
    Some(field)
}

fn text<'a>(tag: &'a Tag, key: &ItemKey) -> Option<&'a str> {
    tag.items()
        .find(|item| item.key() == key)
        .and_then(|item| item.value().text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(super) fn collect_fields(tag: &Tag, record: &mut MetadataRecord) {
    for item in tag.items() {
        let Some(field) = field_for(item.key()) else {
            continue;
        };
        if record.contains(field) {
            continue;
        }
        if let Some(value) = item.value().text() {
            record.insert(field, value);
        }
    }

    // Some formats only carry a plain year item.
    if !record.contains(Field::Year) {
        if let Some(year) = text(tag, &ItemKey::Year) {
            record.insert(Field::Year, year);
        }
    }

    // lofty splits "X/Y" into two items; the catalog keeps the joined form.
    join_total(tag, record, Field::Track, &ItemKey::TrackTotal);
    join_total(tag, record, Field::Set, &ItemKey::DiscTotal);
}

fn join_total(tag: &Tag, record: &mut MetadataRecord, field: Field, total_key: &ItemKey) {
    let Some(number) = record.get(field) else {
        return;
    };
    if number.contains('/') {
        return;
    }
    if let Some(total) = text(tag, total_key) {
        let joined = format!("{number}/{total}");
        record.insert(field, joined);
    }
}

pub(super) fn pick_cover(pictures: &[Picture]) -> Option<MimeData> {
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())?;

    let mime = picture
        .mime_type()
        .map(mime_type_name)
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Some(MimeData::new(mime, picture.data().to_vec()))
}

pub(super) fn mime_type_name(mime: &MimeType) -> String {
    match mime {
        MimeType::Png => "image/png".to_string(),
        MimeType::Jpeg => "image/jpeg".to_string(),
        MimeType::Tiff => "image/tiff".to_string(),
        MimeType::Bmp => "image/bmp".to_string(),
        MimeType::Gif => "image/gif".to_string(),
        MimeType::Unknown(other) => other.clone(),
        _ => "application/octet-stream".to_string(),
    }
}

pub(super) fn file_type_mime(file_type: FileType) -> Option<&'static str> {
    let mime = match file_type {
        FileType::Aac => "audio/aac",
        FileType::Aiff => "audio/aiff",
        FileType::Ape => "audio/ape",
        FileType::Flac => "audio/flac",
        FileType::Mpeg => "audio/mpeg",
        FileType::Mp4 => "audio/mp4",
        FileType::Mpc => "audio/musepack",
        FileType::Opus => "audio/opus",
        FileType::Vorbis => "audio/vorbis",
        FileType::Speex => "audio/speex",
        FileType::Wav => "audio/wav",
        FileType::WavPack => "audio/wavpack",
        _ => return None,
    };
    Some(mime)
}

pub(super) fn codec_name(file_type: FileType) -> Option<&'static str> {
    let codec = match file_type {
        FileType::Aac => "AAC",
        FileType::Aiff => "AIFF",
        FileType::Ape => "APE",
        FileType::Flac => "FLAC",
        FileType::Mpeg => "MPEG",
        FileType::Mp4 => "MP4",
        FileType::Mpc => "Musepack",
        FileType::Opus => "Opus",
        FileType::Vorbis => "Vorbis",
        FileType::Speex => "Speex",
        FileType::Wav => "WAV",
        FileType::WavPack => "WavPack",
        _ => return None,
    };
    Some(codec)
}
