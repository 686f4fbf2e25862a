//! Thumbnail resolution: one image file per contact-sheet entry.
//!
//! Every file shown on a sheet needs a picture the PDF writer can embed.
//! [`ThumbnailResolver::resolve`] picks a [`ThumbnailSource`] for the file
//! and turns it into a path on disk:
//!
//! | Source | When | Path |
//! |---|---|---|
//! | `Original` | `.jpg .jpeg .png .gif` | the file itself, nothing written |
//! | `AudioCover` | audio file whose tag carries a JPEG/PNG picture | `<temp dir>/<dir key>/<stem>.<ext>` |
//! | `Icon` | everything else, and audio without a usable cover | `<storage dir>/<kind>.png` |
//!
//! ## Materialization
//!
//! Covers and icons are written to disk the first time they are needed and
//! reused afterwards. An existing file is never compared or refreshed: icon
//! bytes are deterministic, and covers are kept apart per source directory
//! (see [`cover_dir`]) so a cover belongs to exactly one source file. New files are written to a temp file in the same directory and then
//! renamed into place, so a concurrent run either sees no file or a complete
//! one.
//!
//! Covers live in the process temp directory and disappear with it; icons
//! live in the persistent storage directory and survive across runs.

use crate::audio::read_audio_info;
use crate::classify::{FileKind, classify, is_raster_image};
use crate::context::Context;
use crate::icons;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("cannot write thumbnail {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot read audio tag of {path}: {source}")]
    Tag { path: PathBuf, source: id3::Error },
    #[error("cannot encode icon: {0}")]
    Encode(#[from] image::ImageError),
}

/// Raster formats an asset can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetMime {
    Jpeg,
    Png,
}

impl AssetMime {
    /// Map a declared MIME type (`image/jpeg`, `image/jpg`, `image/png`).
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(AssetMime::Jpeg),
            "image/png" => Some(AssetMime::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AssetMime::Jpeg => "jpeg",
            AssetMime::Png => "png",
        }
    }
}

/// In-memory image waiting to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ThumbnailAsset {
    /// The built-in icon for `kind`.
    pub fn icon(kind: FileKind) -> Result<Self, ThumbnailError> {
        Ok(Self {
            name: icons::icon_name(kind),
            bytes: icons::icon_png(kind)?,
        })
    }
}

/// Where a file's thumbnail comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSource {
    Original,
    AudioCover,
    Icon(FileKind),
}

impl ThumbnailSource {
    /// Choose the strategy for `path` from its extension and classification.
    pub fn for_path(path: &Path) -> Self {
        if is_raster_image(path) {
            return ThumbnailSource::Original;
        }
        match classify(path) {
            FileKind::Audio => ThumbnailSource::AudioCover,
            kind => ThumbnailSource::Icon(kind),
        }
    }
}

/// A resolved thumbnail and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedThumbnail {
    pub path: PathBuf,
    pub source: ThumbnailSource,
}

/// Outcome of writing an asset to its target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    Written,
    Reused,
}

/// Write `asset` to `<dir>/<asset.name>` unless that file already exists.
pub fn materialize(dir: &Path, asset: &ThumbnailAsset) -> io::Result<(PathBuf, Materialized)> {
    let target = dir.join(&asset.name);
    match std::fs::metadata(&target) {
        Ok(_) => return Ok((target, Materialized::Reused)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&asset.bytes)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok((target, Materialized::Written))
}

/// Directory under `temp_dir` for covers extracted from files in `source_dir`.
///
/// Keyed by a SHA-256 of the directory path, so `a/track.mp3` and
/// `b/track.mp3` never share a cover file.
pub fn cover_dir(temp_dir: &Path, source_dir: &Path) -> PathBuf {
    let digest = Sha256::digest(source_dir.as_os_str().as_encoded_bytes());
    let key = format!("{:x}", digest);
    temp_dir.join(&key[..16])
}

/// Resolves thumbnails against a [`Context`], counting cache behaviour.
pub struct ThumbnailResolver<'a> {
    ctx: &'a Context,
    stats: CacheStats,
}

impl<'a> ThumbnailResolver<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Resolve the thumbnail for `dir/name`.
    ///
    /// Fails only when the source can't be opened to read its tag or when
    /// writing a cover or icon fails. A missing or unparseable tag falls
    /// back to the audio icon.
    pub fn resolve(&mut self, dir: &Path, name: &str) -> Result<ResolvedThumbnail, ThumbnailError> {
        let path = dir.join(name);
        let source = ThumbnailSource::for_path(&path);
        match source {
            ThumbnailSource::Original => {
                self.stats.original();
                Ok(ResolvedThumbnail { path, source })
            }
            ThumbnailSource::AudioCover => match self.audio_cover(&path)? {
                Some(resolved) => Ok(resolved),
                None => self.icon(FileKind::Audio),
            },
            ThumbnailSource::Icon(kind) => self.icon(kind),
        }
    }

    fn audio_cover(&mut self, path: &Path) -> Result<Option<ResolvedThumbnail>, ThumbnailError> {
        let info = match read_audio_info(path) {
            Ok(info) => info,
            Err(e) if matches!(e.kind, id3::ErrorKind::Io(_)) => {
                return Err(ThumbnailError::Tag {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no usable audio tag");
                return Ok(None);
            }
        };
        let Some(cover) = info.cover else {
            return Ok(None);
        };
        let dir = cover_dir(self.ctx.temp_dir(), path.parent().unwrap_or(Path::new("")));
        let written = self.write(&dir, &cover)?;
        Ok(Some(ResolvedThumbnail {
            path: written,
            source: ThumbnailSource::AudioCover,
        }))
    }

    fn icon(&mut self, kind: FileKind) -> Result<ResolvedThumbnail, ThumbnailError> {
        let ctx = self.ctx;
        let asset = ThumbnailAsset::icon(kind)?;
        let path = self.write(ctx.storage_dir(), &asset)?;
        Ok(ResolvedThumbnail {
            path,
            source: ThumbnailSource::Icon(kind),
        })
    }

    fn write(&mut self, dir: &Path, asset: &ThumbnailAsset) -> Result<PathBuf, ThumbnailError> {
        let (path, outcome) = materialize(dir, asset).map_err(|source| ThumbnailError::Io {
            path: dir.join(&asset.name),
            source,
        })?;
        match outcome {
            Materialized::Written => self.stats.written(),
            Materialized::Reused => self.stats.reused(),
        }
        Ok(path)
    }
}

/// Summary of thumbnail resolution for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub originals: u32,
    pub reused: u32,
    pub written: u32,
}

impl CacheStats {
    pub fn original(&mut self) {
        self.originals += 1;
    }

    pub fn reused(&mut self) {
        self.reused += 1;
    }

    pub fn written(&mut self) {
        self.written += 1;
    }

    pub fn total(&self) -> u32 {
        self.originals + self.reused + self.written
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} original, {} cached, {} written ({} total)",
            self.originals,
            self.reused,
            self.written,
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{png_bytes, test_context, write_tagged_mp3};
    use id3::Tag;
    use id3::TagLike;
    use id3::frame::{Picture, PictureType};
    use std::fs;
    use tempfile::TempDir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        match fs::read_dir(dir) {
            Ok(rd) => {
                let mut names: Vec<String> = rd
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn raster_images_pass_through_without_writes() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        let mut resolver = ThumbnailResolver::new(&ctx);

        for name in ["a.jpg", "b.JPEG", "c.Png", "d.GIF"] {
            fs::write(src.path().join(name), b"x").unwrap();
            let resolved = resolver.resolve(src.path(), name).unwrap();
            assert_eq!(resolved.path, src.path().join(name));
            assert_eq!(resolved.source, ThumbnailSource::Original);
        }

        assert!(dir_entries(ctx.storage_dir()).is_empty());
        assert!(dir_entries(ctx.temp_dir()).is_empty());
        assert_eq!(resolver.stats().originals, 4);
    }

    #[test]
    fn same_kind_shares_one_icon() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("one.zip"), b"PK").unwrap();
        fs::write(src.path().join("two.zip"), b"PK").unwrap();
        let mut resolver = ThumbnailResolver::new(&ctx);

        let first = resolver.resolve(src.path(), "one.zip").unwrap();
        assert_eq!(first.path, ctx.storage_dir().join("archive.png"));
        assert_eq!(first.source, ThumbnailSource::Icon(FileKind::Archive));

        // Mark the cached icon so a rewrite would be visible.
        fs::write(&first.path, b"sentinel").unwrap();

        let second = resolver.resolve(src.path(), "two.zip").unwrap();
        assert_eq!(second.path, first.path);
        assert_eq!(fs::read(&second.path).unwrap(), b"sentinel");
        assert_eq!(resolver.stats().written, 1);
        assert_eq!(resolver.stats().reused, 1);
        assert_eq!(dir_entries(ctx.storage_dir()), vec!["archive.png"]);
    }

    #[test]
    fn audio_png_cover_goes_to_temp_dir() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        let cover = png_bytes(3, 2);
        let mut tag = Tag::new();
        tag.add_frame(Picture {
            mime_type: "image/png".to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.clone(),
        });
        write_tagged_mp3(src.path(), "track.mp3", &tag);

        let mut resolver = ThumbnailResolver::new(&ctx);
        let resolved = resolver.resolve(src.path(), "track.mp3").unwrap();

        assert_eq!(resolved.source, ThumbnailSource::AudioCover);
        assert!(resolved.path.to_string_lossy().ends_with(".png"));
        assert!(resolved.path.starts_with(ctx.temp_dir()));
        assert!(!resolved.path.starts_with(ctx.storage_dir()));
        assert_eq!(fs::read(&resolved.path).unwrap(), cover);
    }

    fn png_cover_tag(cover: &[u8]) -> Tag {
        let mut tag = Tag::new();
        tag.add_frame(Picture {
            mime_type: "image/png".to_string(),
            picture_type: PictureType::CoverFront,
            description: String::new(),
            data: cover.to_vec(),
        });
        tag
    }

    #[test]
    fn same_named_tracks_in_different_dirs_keep_their_covers() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        let a = src.path().join("a");
        let b = src.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        let cover_a = png_bytes(2, 2);
        let cover_b = png_bytes(5, 5);
        write_tagged_mp3(&a, "track.mp3", &png_cover_tag(&cover_a));
        write_tagged_mp3(&b, "track.mp3", &png_cover_tag(&cover_b));

        let mut resolver = ThumbnailResolver::new(&ctx);
        let first = resolver.resolve(&a, "track.mp3").unwrap();
        let second = resolver.resolve(&b, "track.mp3").unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(fs::read(&first.path).unwrap(), cover_a);
        assert_eq!(fs::read(&second.path).unwrap(), cover_b);
        assert!(second.path.starts_with(ctx.temp_dir()));
        assert_eq!(second.path.file_name().unwrap(), "track.png");
        assert_eq!(resolver.stats().written, 2);
    }

    #[test]
    fn same_track_resolved_twice_reuses_cover() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        write_tagged_mp3(src.path(), "track.mp3", &png_cover_tag(&png_bytes(3, 3)));

        let mut resolver = ThumbnailResolver::new(&ctx);
        let first = resolver.resolve(src.path(), "track.mp3").unwrap();
        let second = resolver.resolve(src.path(), "track.mp3").unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(resolver.stats().written, 1);
        assert_eq!(resolver.stats().reused, 1);
    }

    #[test]
    fn cover_dir_depends_on_source_dir() {
        let temp = Path::new("/tmp/snap");
        let a = cover_dir(temp, Path::new("/music/a"));
        assert_eq!(a, cover_dir(temp, Path::new("/music/a")));
        assert_ne!(a, cover_dir(temp, Path::new("/music/b")));
        assert_eq!(a.parent(), Some(temp));
        assert_eq!(a.file_name().unwrap().len(), 16);
    }

    #[test]
    fn audio_without_picture_uses_audio_icon() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        let mut tag = Tag::new();
        tag.set_title("No Art");
        write_tagged_mp3(src.path(), "plain.mp3", &tag);

        let mut resolver = ThumbnailResolver::new(&ctx);
        let resolved = resolver.resolve(src.path(), "plain.mp3").unwrap();

        assert_eq!(resolved.source, ThumbnailSource::Icon(FileKind::Audio));
        assert_eq!(resolved.path, ctx.storage_dir().join("audio.png"));
    }

    #[test]
    fn untagged_audio_uses_audio_icon() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        let mut body = b"fLaC".to_vec();
        body.resize(64, 0);
        fs::write(src.path().join("noise.flac"), body).unwrap();

        let mut resolver = ThumbnailResolver::new(&ctx);
        let resolved = resolver.resolve(src.path(), "noise.flac").unwrap();
        assert_eq!(resolved.source, ThumbnailSource::Icon(FileKind::Audio));
    }

    #[test]
    fn folders_get_folder_icon() {
        let (_tmp, ctx) = test_context();
        let src = TempDir::new().unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();

        let mut resolver = ThumbnailResolver::new(&ctx);
        let resolved = resolver.resolve(src.path(), "sub").unwrap();
        assert_eq!(resolved.path, ctx.storage_dir().join("folder.png"));
    }

    #[test]
    fn unwritable_storage_is_error() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the storage directory should be.
        let blocker = tmp.path().join("storage");
        fs::write(&blocker, b"").unwrap();
        let ctx = Context::with_dirs(blocker, tmp.path().join("temp"));
        let src = TempDir::new().unwrap();
        fs::write(src.path().join("notes.txt"), b"hi").unwrap();

        let mut resolver = ThumbnailResolver::new(&ctx);
        let err = resolver.resolve(src.path(), "notes.txt").unwrap_err();
        assert!(matches!(err, ThumbnailError::Io { .. }));
    }

    #[test]
    fn materialize_writes_once() {
        let tmp = TempDir::new().unwrap();
        let asset = ThumbnailAsset {
            name: "x.png".into(),
            bytes: vec![1, 2, 3],
        };
        let (path, first) = materialize(tmp.path(), &asset).unwrap();
        assert_eq!(first, Materialized::Written);
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);

        let changed = ThumbnailAsset {
            bytes: vec![9],
            ..asset
        };
        let (_, second) = materialize(tmp.path(), &changed).unwrap();
        assert_eq!(second, Materialized::Reused);
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3]);
        assert_eq!(dir_entries(tmp.path()), vec!["x.png"]);
    }

    #[test]
    fn mime_mapping() {
        assert_eq!(AssetMime::from_mime_type("image/JPEG"), Some(AssetMime::Jpeg));
        assert_eq!(AssetMime::from_mime_type("image/jpg"), Some(AssetMime::Jpeg));
        assert_eq!(AssetMime::from_mime_type("image/png"), Some(AssetMime::Png));
        assert_eq!(AssetMime::from_mime_type("image/gif"), None);
    }

    #[test]
    fn cache_stats_display() {
        let stats = CacheStats {
            originals: 2,
            reused: 5,
            written: 1,
        };
        assert_eq!(stats.to_string(), "2 original, 5 cached, 1 written (8 total)");
    }
}
