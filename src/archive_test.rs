use std::io::{Cursor, Read};

use super::*;
use crate::surface::RasterFormat;

fn raster(name: &str, bytes: &[u8]) -> Raster {
    Raster { name: name.into(), format: RasterFormat::Png, width_px: 32, height_px: 105, bytes: bytes.to_vec() }
}

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn packs_every_raster_in_order() {
    let rasters = vec![raster("poster-ff0000.png", b"red"), raster("poster-00ff00.png", b"green")];
    let archive = pack("poster.zip", &rasters).unwrap();

    assert_eq!(archive.file_name, "poster.zip");
    assert_eq!(archive.entries, vec!["poster-ff0000.png", "poster-00ff00.png"]);

    let zip = zip::ZipArchive::new(Cursor::new(archive.bytes.as_slice())).unwrap();
    assert_eq!(zip.len(), 2);
    let names: Vec<&str> = zip.file_names().collect();
    assert!(names.contains(&"poster-ff0000.png"));
    assert!(names.contains(&"poster-00ff00.png"));

    assert_eq!(read_entry(&archive.bytes, "poster-ff0000.png"), b"red");
    assert_eq!(read_entry(&archive.bytes, "poster-00ff00.png"), b"green");
}

#[test]
fn entries_are_stored_uncompressed() {
    let archive = pack("a.zip", &[raster("a.png", &[7; 256])]).unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes.as_slice())).unwrap();
    let file = zip.by_index(0).unwrap();
    assert_eq!(file.compression(), CompressionMethod::Stored);
    assert_eq!(file.size(), 256);
}

#[test]
fn duplicate_entry_is_rejected() {
    let err = pack("a.zip", &[raster("a.png", b"1"), raster("a.png", b"2")]).unwrap_err();
    assert!(matches!(err, ArchiveError::DuplicateEntry(ref name) if name == "a.png"));
    assert_eq!(err.error_code(), "E_ARCHIVE_DUPLICATE_ENTRY");
}

#[test]
fn empty_input_yields_valid_empty_archive() {
    let archive = pack("empty.zip", &[]).unwrap();
    assert!(archive.entries.is_empty());
    let zip = zip::ZipArchive::new(Cursor::new(archive.bytes.as_slice())).unwrap();
    assert_eq!(zip.len(), 0);
}
