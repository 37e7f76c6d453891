//! In-memory extraction of the binary from a release tarball.

use std::io::{self, Read};
use std::path::PathBuf;

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use tracing::debug;

use super::error::UpdateError;

/// Executable bytes pulled out of a release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    /// Path of the entry inside the archive.
    pub entry_path: PathBuf,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// Extract the first entry whose file name is `binary_name` from a `.tar.gz`.
///
/// The entry may sit at any depth. Both the decompressed tarball and the
/// payload are buffered in memory.
pub fn extract_binary(
    archive_data: &[u8],
    binary_name: &str,
) -> Result<BinaryPayload, UpdateError> {
    let mut tarball = Vec::new();
    GzDecoder::new(archive_data)
        .read_to_end(&mut tarball)
        .map_err(UpdateError::Gzip)?;
    debug!(
        "Decompressed archive: {} -> {} bytes",
        archive_data.len(),
        tarball.len()
    );

    let mut archive = Archive::new(tarball.as_slice());
    for entry in archive.entries().map_err(UpdateError::Tar)? {
        let mut entry = entry.map_err(UpdateError::Tar)?;
        let path = entry.path().map_err(UpdateError::Tar)?.into_owned();

        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == binary_name);
        if !matches {
            continue;
        }
        if !matches!(
            entry.header().entry_type(),
            EntryType::Regular | EntryType::Continuous
        ) {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }

        // The header size is untrusted; grow the buffer from what is read.
        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(UpdateError::Tar)?;
        if (content.len() as u64) < entry.size() {
            return Err(UpdateError::Tar(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "entry {} ends after {} of {} bytes",
                    path.display(),
                    content.len(),
                    entry.size()
                ),
            )));
        }
        debug!(
            "Extracted {} ({} bytes) from archive",
            path.display(),
            content.len()
        );
        return Ok(BinaryPayload {
            entry_path: path,
            content,
        });
    }

    Err(UpdateError::NotFound {
        name: binary_name.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, EntryType, Header};

    /// Build a `.tar.gz` holding the given `(path, content)` files.
    pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);
        for (path, content) in files {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// Build a `.tar.gz` that starts with a directory entry `dir`.
    pub fn tar_gz_with_dir(dir: &str, files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, dir, std::io::empty())
            .unwrap();
        for (path, content) in files {
            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{tar_gz, tar_gz_with_dir};
    use super::*;

    #[test]
    fn extracts_top_level_binary() {
        let archive = tar_gz(&[("aw", "binary-content-here")]);

        let payload = extract_binary(&archive, "aw").unwrap();
        assert_eq!(payload.content, b"binary-content-here");
        assert_eq!(payload.entry_path, PathBuf::from("aw"));
    }

    #[test]
    fn extracts_nested_binary() {
        let archive = tar_gz(&[
            ("aw_linux_amd64/README.md", "docs"),
            ("aw_linux_amd64/bin/aw", "nested"),
        ]);

        let payload = extract_binary(&archive, "aw").unwrap();
        assert_eq!(payload.content, b"nested");
        assert_eq!(payload.entry_path, PathBuf::from("aw_linux_amd64/bin/aw"));
    }

    #[test]
    fn first_match_wins() {
        let archive = tar_gz(&[("a/aw", "first"), ("b/aw", "second")]);
        let payload = extract_binary(&archive, "aw").unwrap();
        assert_eq!(payload.content, b"first");
    }

    #[test]
    fn name_must_match_exactly() {
        let archive = tar_gz(&[("aw.exe", "x"), ("awk", "y"), ("AW", "z")]);
        let err = extract_binary(&archive, "aw").unwrap_err();
        assert!(matches!(err, UpdateError::NotFound { ref name } if name == "aw"));
    }

    #[test]
    fn skips_directory_named_like_binary() {
        let archive = tar_gz_with_dir("aw/", &[("aw/aw", "inner")]);
        let payload = extract_binary(&archive, "aw").unwrap();
        assert_eq!(payload.content, b"inner");
    }

    #[test]
    fn missing_binary_is_not_found() {
        let archive = tar_gz(&[("other-file", "some content")]);
        let err = extract_binary(&archive, "aw").unwrap_err();
        assert!(err.to_string().contains("not found in archive"));
    }

    #[test]
    fn empty_archive_is_not_found() {
        let archive = tar_gz(&[]);
        assert!(matches!(
            extract_binary(&archive, "aw"),
            Err(UpdateError::NotFound { .. })
        ));
    }

    #[test]
    fn rejects_non_gzip_input() {
        let err = extract_binary(b"definitely not gzip", "aw").unwrap_err();
        assert!(matches!(err, UpdateError::Gzip(_)), "got {:?}", err);
    }

    #[test]
    fn rejects_gzip_of_garbage_tar() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xAB; 700]).unwrap();
        let data = encoder.finish().unwrap();

        let err = extract_binary(&data, "aw").unwrap_err();
        assert!(matches!(err, UpdateError::Tar(_)), "got {:?}", err);
    }

    #[test]
    fn oversized_entry_header_is_tar_error() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut header = tar::Header::new_gnu();
        header.set_path("aw").unwrap();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(0o755);
        header.set_size(1 << 62);
        header.set_cksum();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(header.as_bytes()).unwrap();
        encoder.write_all(&[0u8; 512]).unwrap();
        let data = encoder.finish().unwrap();

        let err = extract_binary(&data, "aw").unwrap_err();
        assert!(matches!(err, UpdateError::Tar(_)), "got {:?}", err);
    }

    #[test]
    fn truncated_entry_is_tar_error() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut tarball = Vec::new();
        GzDecoder::new(tar_gz(&[("aw", "complete-binary")]).as_slice())
            .read_to_end(&mut tarball)
            .unwrap();
        // Header claims 15 bytes; keep the header and 4 bytes of body.
        tarball.truncate(512 + 4);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tarball).unwrap();
        let data = encoder.finish().unwrap();

        let err = extract_binary(&data, "aw").unwrap_err();
        assert!(matches!(err, UpdateError::Tar(_)), "got {:?}", err);
    }
}
