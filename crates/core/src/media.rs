//! Upload file-type rules.
//!
//! Uploads are accepted or rejected by file extension, the same way for
//! every storage backend.

/// Extensions accepted for question audio.
pub const SOUND_EXTENSIONS: &[&str] = &["mp3", "m4a"];

/// Extensions accepted for user photos.
pub const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns the lowercase extension of a file name, without the dot.
///
/// A leading dot alone (`.profile`) does not count as an extension.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || (stem.is_empty() && !file_name[1..].contains('.')) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Returns the lowercase extension if it is one of `allowed`.
#[must_use]
pub fn allowed_extension(file_name: &str, allowed: &[&str]) -> Option<String> {
    extension_of(file_name).filter(|ext| allowed.contains(&ext.as_str()))
}

/// Returns true if the file name has an extension in `allowed`.
#[must_use]
pub fn allowed_file(file_name: &str, allowed: &[&str]) -> bool {
    allowed_extension(file_name, allowed).is_some()
}

/// Guesses a content type from the file extension.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("voice.mp3", Some("mp3"))]
    #[case("voice.M4A", Some("m4a"))]
    #[case("archive.tar.gz", Some("gz"))]
    #[case("no_extension", None)]
    #[case("trailing.", None)]
    #[case(".profile", None)]
    fn test_extension_of(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension_of(name).as_deref(), expected);
    }

    #[rstest]
    #[case("question.mp3", SOUND_EXTENSIONS, true)]
    #[case("question.MP3", SOUND_EXTENSIONS, true)]
    #[case("question.m4a", SOUND_EXTENSIONS, true)]
    #[case("question.wav", SOUND_EXTENSIONS, false)]
    #[case("mp3", SOUND_EXTENSIONS, false)]
    #[case("photo.jpeg", PHOTO_EXTENSIONS, true)]
    #[case("photo.gif", PHOTO_EXTENSIONS, false)]
    fn test_allowed_file(#[case] name: &str, #[case] allowed: &[&str], #[case] expected: bool) {
        assert_eq!(allowed_file(name, allowed), expected);
    }

    #[test]
    fn test_allowed_extension_is_lowercased() {
        assert_eq!(
            allowed_extension("Photo.JPEG", PHOTO_EXTENSIONS).as_deref(),
            Some("jpeg")
        );
        assert_eq!(allowed_extension("photo.gif", PHOTO_EXTENSIONS), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("a.m4a"), "audio/mp4");
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Accepted names always carry one of the allowed extensions, in any case.
        #[test]
        fn prop_allowed_file_matches_extension(
            stem in "[a-zA-Z0-9_-]{1,20}",
            ext in prop::sample::select(vec!["mp3", "MP3", "m4a", "wav", "ogg", "png"]),
        ) {
            let name = format!("{stem}.{ext}");
            let expected = SOUND_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str());
            prop_assert_eq!(allowed_file(&name, SOUND_EXTENSIONS), expected);
        }

        // Names without a dot are never accepted.
        #[test]
        fn prop_dotless_names_rejected(name in "[a-zA-Z0-9_-]{0,30}") {
            prop_assert!(!allowed_file(&name, SOUND_EXTENSIONS));
            prop_assert!(!allowed_file(&name, PHOTO_EXTENSIONS));
        }
    }
}
