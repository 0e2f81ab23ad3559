use super::registry::extension;
use super::tags::{codec_name, collect_fields, file_type_mime, mime_type_name, pick_cover};
use super::*;
use lofty::file::FileType;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{ItemKey, Tag, TagType};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

fn title_only(_: &Path) -> Option<MetadataRecord> {
    Some(MetadataRecord::new().with(Field::Title, "X"))
}

#[test]
fn extension_keeps_dot_and_case() {
    assert_eq!(extension(Path::new("/m/a.mp3")), Some(".mp3"));
    assert_eq!(extension(Path::new("/m/a.MP3")), Some(".MP3"));
    assert_eq!(extension(Path::new("/m/a.tar.gz")), Some(".gz"));
    assert_eq!(extension(Path::new("/m/.hidden")), None);
    assert_eq!(extension(Path::new("/m/README")), None);
    assert_eq!(extension(Path::new("/m.d/README")), None);
}

#[test]
fn register_rejects_duplicates_and_bad_extensions() {
    let mut registry = Registry::new();
    registry.register(".mp3", title_only).unwrap();
    assert_eq!(
        registry.register(".mp3", TagExtractor),
        Err(RegistryError::DuplicateProvider(".mp3".into()))
    );
    assert_eq!(
        registry.register("mp3", TagExtractor),
        Err(RegistryError::InvalidExtension("mp3".into()))
    );
    assert_eq!(
        registry.register(".", TagExtractor),
        Err(RegistryError::InvalidExtension(".".into()))
    );
    // Case-sensitive: a different spelling is a different binding.
    registry.register(".MP3", title_only).unwrap();
    assert_eq!(registry.extensions(), vec![".MP3", ".mp3"]);
}

#[test]
fn extract_distinguishes_unsupported_from_failed() {
    let mut registry = Registry::new();
    registry.register(".mp3", title_only).unwrap();
    registry
        .register(".ogg", |_: &Path| -> Option<MetadataRecord> { None })
        .unwrap();

    assert_eq!(
        registry.extract(Path::new("/m/a.flac")),
        Extraction::Unsupported
    );
    assert_eq!(registry.extract(Path::new("/m/noext")), Extraction::Unsupported);
    assert_eq!(registry.extract(Path::new("/m/a.ogg")), Extraction::Failed);
    assert_eq!(
        registry.extract(Path::new("/m/a.mp3")),
        Extraction::Extracted(MetadataRecord::new().with(Field::Title, "X"))
    );
}

#[test]
fn extract_does_not_call_extractor_for_other_extensions() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let mut registry = Registry::new();
    registry
        .register(".mp3", move |_: &Path| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(MetadataRecord::new())
        })
        .unwrap();

    registry.extract(Path::new("/m/a.wav"));
    registry.extract(Path::new("/m/a.mp3"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_extractor_is_reported_as_failed() {
    let mut registry = Registry::new();
    registry
        .register(".mp3", |_: &Path| -> Option<MetadataRecord> {
            panic!("malformed frame")
        })
        .unwrap();
    assert_eq!(registry.extract(Path::new("/m/a.mp3")), Extraction::Failed);
}

#[test]
fn record_drops_blank_values_and_trims() {
    let mut record = MetadataRecord::new();
    record.insert(Field::Title, "  Song  ");
    record.insert(Field::Artist, "   ");
    record.set_mime("");
    record.set_cover(MimeData::new("image/png", Vec::new()));

    assert_eq!(record.get(Field::Title), Some("Song"));
    assert!(!record.contains(Field::Artist));
    assert_eq!(record.mime(), None);
    assert!(record.cover().is_none());
    assert_eq!(record.fields().count(), 1);
}

#[test]
fn field_names_are_unique() {
    let mut names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Field::ALL.len());
    assert_eq!(Field::ModifiedBy.to_string(), "modified_by");
}

#[test]
fn tag_extractor_returns_none_for_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.mp3");
    fs::write(&path, b"not a real mp3").unwrap();

    assert!(TagExtractor.read_metadata(&path).is_none());

    let mut registry = Registry::new();
    registry.register(".mp3", TagExtractor).unwrap();
    assert_eq!(registry.extract(&path), Extraction::Failed);
}

#[test]
fn file_type_mapping_covers_common_formats() {
    assert_eq!(file_type_mime(FileType::Mpeg), Some("audio/mpeg"));
    assert_eq!(file_type_mime(FileType::Flac), Some("audio/flac"));
    assert_eq!(codec_name(FileType::Vorbis), Some("Vorbis"));
    assert_eq!(codec_name(FileType::Mp4), Some("MP4"));
}

fn fields_of(tag: &Tag) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    collect_fields(tag, &mut record);
    record
}

fn picture(kind: PictureType, mime: Option<MimeType>, data: &[u8]) -> Picture {
    Picture::new_unchecked(kind, mime, None, data.to_vec())
}

#[test]
fn id3v2_items_map_onto_catalog_fields() {
    let mut tag = Tag::new(TagType::Id3v2);
    tag.insert_text(ItemKey::TrackTitle, "Song".into());
    tag.insert_text(ItemKey::TrackArtist, "Artist".into());
    tag.insert_text(ItemKey::AlbumArtist, "Various".into());
    tag.insert_text(ItemKey::Remixer, "DJ X".into());
    tag.insert_text(ItemKey::IntegerBpm, "128".into());
    tag.insert_text(ItemKey::FileType, "MPG/3".into());
    tag.insert_text(ItemKey::RecordingDate, "2001".into());
    tag.insert_text(ItemKey::TrackNumber, "3".into());
    tag.insert_text(ItemKey::TrackTotal, "12".into());
    tag.insert_text(ItemKey::Comment, "ignored".into());

    let record = fields_of(&tag);
    assert_eq!(record.get(Field::Title), Some("Song"));
    assert_eq!(record.get(Field::Artist), Some("Artist"));
    assert_eq!(record.get(Field::Grouping), Some("Various"));
    assert_eq!(record.get(Field::ModifiedBy), Some("DJ X"));
    assert_eq!(record.get(Field::Bpm), Some("128"));
    assert_eq!(record.get(Field::Codec), Some("MPG/3"));
    assert_eq!(record.get(Field::Year), Some("2001"));
    assert_eq!(record.get(Field::Track), Some("3/12"));
    assert_eq!(record.fields().count(), 8);
}

#[test]
fn vorbis_year_fallback_and_disc_total() {
    let mut tag = Tag::new(TagType::VorbisComments);
    tag.insert_text(ItemKey::Year, "1999".into());
    tag.insert_text(ItemKey::Bpm, "90".into());
    tag.insert_text(ItemKey::DiscNumber, "1".into());
    tag.insert_text(ItemKey::DiscTotal, "2".into());
    tag.insert_text(ItemKey::TrackNumber, "5/10".into());
    tag.insert_text(ItemKey::TrackTotal, "12".into());
    tag.insert_text(ItemKey::TrackTitle, "   ".into());

    let record = fields_of(&tag);
    assert_eq!(record.get(Field::Year), Some("1999"));
    assert_eq!(record.get(Field::Bpm), Some("90"));
    assert_eq!(record.get(Field::Set), Some("1/2"));
    // Already joined numbers are kept as written.
    assert_eq!(record.get(Field::Track), Some("5/10"));
    assert!(!record.contains(Field::Title));

    tag.insert_text(ItemKey::RecordingDate, "2003-04-01".into());
    assert_eq!(fields_of(&tag).get(Field::Year), Some("2003-04-01"));
}

#[test]
fn cover_prefers_front_picture_then_first() {
    let mut tag = Tag::new(TagType::Id3v2);
    assert!(pick_cover(tag.pictures()).is_none());

    tag.push_picture(picture(PictureType::Other, None, b"other"));
    let cover = pick_cover(tag.pictures()).unwrap();
    assert_eq!(cover.mime, "application/octet-stream");
    assert_eq!(cover.data, b"other".to_vec());

    tag.push_picture(picture(PictureType::CoverFront, Some(MimeType::Jpeg), b"front"));
    let cover = pick_cover(tag.pictures()).unwrap();
    assert_eq!(cover.mime, "image/jpeg");
    assert_eq!(cover.data, b"front".to_vec());
}

#[test]
fn picture_mime_names() {
    assert_eq!(mime_type_name(&MimeType::Png), "image/png");
    assert_eq!(mime_type_name(&MimeType::Gif), "image/gif");
    assert_eq!(
        mime_type_name(&MimeType::Unknown("image/webp".into())),
        "image/webp"
    );
}
