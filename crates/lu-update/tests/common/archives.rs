//! Release archive construction for tests

use flate2::write::GzEncoder;
use flate2::Compression;

/// Build a gzip-compressed tar holding `entries` in order
pub fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, name, *data)
            .expect("append archive entry");
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .expect("finish archive")
}

/// A typical release archive: binary plus docs
pub fn release_archive(binary: &[u8]) -> Vec<u8> {
    tar_gz(&[
        ("README.md", b"# lu-hut"),
        ("lu", binary),
        ("LICENSE", b"MIT"),
    ])
}
