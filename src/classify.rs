//! File classification by extension.
//!
//! Every entry shown on a contact sheet gets a coarse [`FileKind`]. The kind
//! picks the built-in icon for files that have no picture of their own and
//! decides whether the thumbnail resolver should look for embedded cover art.
//!
//! Classification is total: anything that can't be stat'ed or whose
//! extension isn't in the table is [`FileKind::Unknown`].
//!
//! | Kind | Extensions |
//! |---|---|
//! | Camera | jpg jpeg png gif kdc sfw raw heic |
//! | Audio | mp3 m4a flac wav wma aac ogg |
//! | Pdf | pdf |
//! | Video | mp4 m4v mov wmv avi avchd hevc flv f4v swf 3gp mpeg mpg |
//! | Archive | zip gz tgz gzip 7z jar |
//! | Executable | exe com bat cmd sh bin |
//! | Bitmap | bmp tiff tif |
//! | Html | html htm |
//! | Document | dat txt csv xls xlsx doc docx odt ods odp odg |

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Coarse file type used to pick an icon or a thumbnail strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Camera,
    Audio,
    Video,
    Document,
    Pdf,
    Executable,
    Archive,
    Bitmap,
    Html,
    Folder,
    Unknown,
}

impl FileKind {
    /// Every kind, in icon-table order.
    pub const ALL: [FileKind; 11] = [
        FileKind::Camera,
        FileKind::Audio,
        FileKind::Video,
        FileKind::Document,
        FileKind::Pdf,
        FileKind::Executable,
        FileKind::Archive,
        FileKind::Bitmap,
        FileKind::Html,
        FileKind::Folder,
        FileKind::Unknown,
    ];

    /// Stable lowercase tag, also used as the icon file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Camera => "camera",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Document => "document",
            FileKind::Pdf => "pdf",
            FileKind::Executable => "executable",
            FileKind::Archive => "archive",
            FileKind::Bitmap => "bitmap",
            FileKind::Html => "html",
            FileKind::Folder => "folder",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a filesystem entry.
///
/// Directories are always [`FileKind::Folder`], whatever their name looks
/// like. A path that can't be stat'ed is [`FileKind::Unknown`].
pub fn classify(path: &Path) -> FileKind {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => FileKind::Folder,
        Ok(_) => path
            .extension()
            .and_then(|e| e.to_str())
            .map(kind_for_extension)
            .unwrap_or(FileKind::Unknown),
        Err(_) => FileKind::Unknown,
    }
}

/// Pure extension lookup (no leading dot, any case).
pub fn kind_for_extension(ext: &str) -> FileKind {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "kdc" | "sfw" | "raw" | "heic" => FileKind::Camera,
        "mp3" | "m4a" | "flac" | "wav" | "wma" | "aac" | "ogg" => FileKind::Audio,
        "pdf" => FileKind::Pdf,
        "mp4" | "m4v" | "mov" | "wmv" | "avi" | "avchd" | "hevc" | "flv" | "f4v" | "swf"
        | "3gp" | "mpeg" | "mpg" => FileKind::Video,
        "zip" | "gz" | "tgz" | "gzip" | "7z" | "jar" => FileKind::Archive,
        "exe" | "com" | "bat" | "cmd" | "sh" | "bin" => FileKind::Executable,
        "bmp" | "tiff" | "tif" => FileKind::Bitmap,
        "html" | "htm" => FileKind::Html,
        "dat" | "txt" | "csv" | "xls" | "xlsx" | "doc" | "docx" | "odt" | "ods" | "odp"
        | "odg" => FileKind::Document,
        _ => FileKind::Unknown,
    }
}

/// Extensions the PDF writer embeds directly, without an icon.
pub fn is_raster_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            matches!(
                e.to_ascii_lowercase().as_str(),
                "jpg" | "jpeg" | "png" | "gif"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extension_table() {
        assert_eq!(kind_for_extension("heic"), FileKind::Camera);
        assert_eq!(kind_for_extension("flac"), FileKind::Audio);
        assert_eq!(kind_for_extension("pdf"), FileKind::Pdf);
        assert_eq!(kind_for_extension("mpg"), FileKind::Video);
        assert_eq!(kind_for_extension("tgz"), FileKind::Archive);
        assert_eq!(kind_for_extension("sh"), FileKind::Executable);
        assert_eq!(kind_for_extension("tif"), FileKind::Bitmap);
        assert_eq!(kind_for_extension("htm"), FileKind::Html);
        assert_eq!(kind_for_extension("odp"), FileKind::Document);
        assert_eq!(kind_for_extension("rs"), FileKind::Unknown);
    }

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(kind_for_extension("MP3"), FileKind::Audio);
        assert_eq!(kind_for_extension("Zip"), FileKind::Archive);
    }

    #[test]
    fn classify_regular_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Song.MP3");
        fs::write(&path, b"").unwrap();
        assert_eq!(classify(&path), FileKind::Audio);
    }

    #[test]
    fn classify_directory_ignores_extension() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("photos.jpg");
        fs::create_dir(&dir).unwrap();
        assert_eq!(classify(&dir), FileKind::Folder);
    }

    #[test]
    fn classify_missing_is_unknown() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(classify(&tmp.path().join("gone.zip")), FileKind::Unknown);
    }

    #[test]
    fn classify_without_extension_is_unknown() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Makefile");
        fs::write(&path, b"all:").unwrap();
        assert_eq!(classify(&path), FileKind::Unknown);
    }

    #[test]
    fn raster_images() {
        assert!(is_raster_image(Path::new("a/b.JPG")));
        assert!(is_raster_image(Path::new("b.jpeg")));
        assert!(is_raster_image(Path::new("b.Png")));
        assert!(is_raster_image(Path::new("b.gif")));
        assert!(!is_raster_image(Path::new("b.heic")));
        assert!(!is_raster_image(Path::new("b.bmp")));
        assert!(!is_raster_image(Path::new("jpg")));
    }

    #[test]
    fn kind_tags_are_unique() {
        let mut tags: Vec<&str> = FileKind::ALL.iter().map(|k| k.as_str()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), FileKind::ALL.len());
    }
}
