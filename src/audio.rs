//! Audio tag reading: display fields and embedded cover art.
//!
//! Tags are read with the `id3` crate. Only the first attached-picture
//! frame is considered, and only when its MIME type is JPEG or PNG; any
//! other picture is ignored and the file gets the generic audio icon.
//!
//! Text fields are stripped of non-ASCII code points. Tag encodings in the
//! wild are frequently wrong, and the stripped strings are only used for
//! display, never for the cover path.

use crate::thumbs::{AssetMime, ThumbnailAsset};
use id3::{Tag, TagLike};
use std::fmt;
use std::path::Path;

/// Metadata read from an audio file's tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioInfo {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub genre: String,
    pub cover: Option<ThumbnailAsset>,
}

/// Read the tag of `path`.
///
/// Fails with the `id3` error when the file can't be opened or carries no
/// parseable ID3 tag; callers decide which of those are fatal.
pub fn read_audio_info(path: &Path) -> Result<AudioInfo, id3::Error> {
    let tag = Tag::read_from_path(path)?;
    Ok(info_from_tag(&tag, path))
}

fn info_from_tag(tag: &Tag, path: &Path) -> AudioInfo {
    AudioInfo {
        title: ascii_only(tag.title().unwrap_or_default()),
        artist: ascii_only(tag.artist().unwrap_or_default()),
        album: ascii_only(tag.album().unwrap_or_default()),
        year: tag.year().map(|y| y.to_string()).unwrap_or_default(),
        genre: ascii_only(tag.genre().unwrap_or_default()),
        cover: cover_asset(tag, path),
    }
}

/// First attached picture as an asset named `<stem>.<jpeg|png>`.
fn cover_asset(tag: &Tag, path: &Path) -> Option<ThumbnailAsset> {
    let picture = tag.pictures().next()?;
    let mime = AssetMime::from_mime_type(&picture.mime_type)?;
    let stem = path.file_stem()?.to_string_lossy();
    Some(ThumbnailAsset {
        name: format!("{}.{}", stem, mime.extension()),
        bytes: picture.data.clone(),
    })
}

/// Drop every code point above U+007F.
pub fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

impl fmt::Display for AudioInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Artist: {}\nTitle: {}\nAlbum: {}\nYear: {}, Genre: {}",
            self.artist, self.title, self.album, self.year, self.genre
        )
    }
}
