//! File classification and upload metadata.
//!
//! Every file the segmenter emits falls into one of three classes, keyed by
//! extension. The class determines the HTTP metadata the file is published
//! with; files of any other extension are ignored by the publisher.

use std::path::Path;

/// Cache policy for all published objects. Output directories are
/// content-addressed by their base name, so assets are effectively immutable.
pub const CACHE_FOREVER: &str = "max-age=31536000,public";

/// Entry-point manifest the segmenter is contracted to produce.
pub const MASTER_PLAYLIST: &str = "index.m3u8";

/// Class of a segmenter output file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileClass {
    /// HLS playlist (`.m3u8`). Stored gzip-encoded under its original name.
    Manifest,
    /// Poster image (`.jpg`).
    Poster,
    /// Media segment (`.mp4`).
    Fragment,
}

impl FileClass {
    /// Classify a path by extension. `None` means the file is not part of
    /// the published asset set.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "m3u8" => Some(FileClass::Manifest),
            "jpg" => Some(FileClass::Poster),
            "mp4" => Some(FileClass::Fragment),
            _ => None,
        }
    }

    /// Upload metadata for this class.
    pub fn descriptor(self) -> UploadDescriptor {
        match self {
            FileClass::Manifest => UploadDescriptor {
                content_type: "application/vnd.apple.mpegurl",
                cache_control: CACHE_FOREVER,
                // Manifests are rewritten as gzip bytes before publishing but
                // keep their .m3u8 name; delivery relies on this header.
                content_encoding: Some("gzip"),
                public_read: true,
            },
            FileClass::Poster => UploadDescriptor {
                content_type: "image/jpeg",
                cache_control: CACHE_FOREVER,
                content_encoding: None,
                public_read: true,
            },
            FileClass::Fragment => UploadDescriptor {
                content_type: "video/mp4",
                cache_control: CACHE_FOREVER,
                content_encoding: None,
                public_read: true,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileClass::Manifest => "manifest",
            FileClass::Poster => "poster",
            FileClass::Fragment => "fragment",
        }
    }
}

/// Per-object metadata applied at upload time, determined solely by the
/// file's class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadDescriptor {
    pub content_type: &'static str,
    pub cache_control: &'static str,
    pub content_encoding: Option<&'static str>,
    pub public_read: bool,
}

/// Storage key for an output file: `hls/{base_name}/{filename}`.
pub fn object_key(base_name: &str, filename: &str) -> String {
    format!("hls/{}/{}", base_name, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_known_extensions() {
        assert_eq!(
            FileClass::from_path(&PathBuf::from("index.m3u8")),
            Some(FileClass::Manifest)
        );
        assert_eq!(
            FileClass::from_path(&PathBuf::from("poster.jpg")),
            Some(FileClass::Poster)
        );
        assert_eq!(
            FileClass::from_path(&PathBuf::from("seg_001.mp4")),
            Some(FileClass::Fragment)
        );
    }

    #[test]
    fn test_classify_unknown_extensions() {
        assert_eq!(FileClass::from_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(FileClass::from_path(&PathBuf::from("segment.ts")), None);
        assert_eq!(FileClass::from_path(&PathBuf::from("noextension")), None);
    }

    #[test]
    fn test_classify_nested_path() {
        assert_eq!(
            FileClass::from_path(&PathBuf::from("clip.fmp4/sub/index.m3u8")),
            Some(FileClass::Manifest)
        );
    }

    #[test]
    fn test_manifest_descriptor() {
        let d = FileClass::Manifest.descriptor();
        assert_eq!(d.content_type, "application/vnd.apple.mpegurl");
        assert_eq!(d.cache_control, "max-age=31536000,public");
        assert_eq!(d.content_encoding, Some("gzip"));
        assert!(d.public_read);
    }

    #[test]
    fn test_binary_descriptors_have_no_encoding() {
        assert_eq!(FileClass::Poster.descriptor().content_encoding, None);
        assert_eq!(FileClass::Fragment.descriptor().content_encoding, None);
        assert_eq!(FileClass::Poster.descriptor().content_type, "image/jpeg");
        assert_eq!(FileClass::Fragment.descriptor().content_type, "video/mp4");
    }

    #[test]
    fn test_class_upload_order() {
        // Publisher relies on the derived ordering: manifests first,
        // then posters, then fragments.
        assert!(FileClass::Manifest < FileClass::Poster);
        assert!(FileClass::Poster < FileClass::Fragment);
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key("clip.fmp4", "index.m3u8"),
            "hls/clip.fmp4/index.m3u8"
        );
    }
}
