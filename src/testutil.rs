//! In-memory builders for the archive shapes the tests feed through the
//! pipeline.

use std::io::{Cursor, Read, Write};

/// Build a zip in memory from `(entry name, contents)` pairs, in order.
pub fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Compress `data` into a single-stream xz artifact.
pub fn xz_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = xz2::read::XzEncoder::new(data, 6);
    let mut out = Vec::new();
    encoder.read_to_end(&mut out).unwrap();
    out
}
