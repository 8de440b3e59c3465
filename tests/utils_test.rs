use scloud::utils::*;
use std::path::Path;

#[test]
fn test_mime_type_for_audio() {
    assert_eq!(mime_type_for_path(Path::new("song.mp3")), "audio/mpeg");
    assert_eq!(mime_type_for_path(Path::new("song.WAV")), "audio/wav");
    assert_eq!(mime_type_for_path(Path::new("dir/song.flac")), "audio/flac");
    assert_eq!(mime_type_for_path(Path::new("song.m4a")), "audio/mp4");
}

#[test]
fn test_mime_type_for_artwork() {
    assert_eq!(mime_type_for_path(Path::new("cover.jpg")), "image/jpeg");
    assert_eq!(mime_type_for_path(Path::new("cover.JPEG")), "image/jpeg");
    assert_eq!(mime_type_for_path(Path::new("cover.png")), "image/png");
}

#[test]
fn test_mime_type_fallback() {
    assert_eq!(
        mime_type_for_path(Path::new("noext")),
        "application/octet-stream"
    );
    assert_eq!(
        mime_type_for_path(Path::new("track.xyz")),
        "application/octet-stream"
    );
}

#[test]
fn test_file_name_of() {
    assert_eq!(file_name_of(Path::new("/tmp/music/song.mp3")), "song.mp3");
    assert_eq!(file_name_of(Path::new("cover.jpg")), "cover.jpg");

    // Paths without a file name fall back to a generic name
    assert_eq!(file_name_of(Path::new("/")), "upload");
}

#[test]
fn test_title_from_path() {
    assert_eq!(title_from_path(Path::new("/tmp/My Song.mp3")), "My Song");
    assert_eq!(title_from_path(Path::new("demo")), "demo");
    assert_eq!(title_from_path(Path::new("/")), "Untitled");
}
