// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! ZIP and TAR extraction

use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{Extraction, Tool, ToolArgs, ToolOutput};
use crate::paths::normalize_path;
use crate::{AgentError, Result};

/// Entry names kept in the report
const LISTED_ENTRIES: usize = 20;

/// Suffixes recognised as archives, longest first
const ARCHIVE_SUFFIXES: [&str; 5] = [".tar.gz", ".tgz", ".tar", ".zip", ".gz"];

pub struct ExtractArchiveTool;

#[async_trait]
impl Tool for ExtractArchiveTool {
    fn name(&self) -> &'static str {
        "extract_archive"
    }

    fn description(&self) -> &'static str {
        r#"
- description: Extract a compressed archive (zip, tar, tar.gz, tgz).
- args schema:
  {
    "archive_path": "string, path to the archive file",
    "destination": "optional string, where to extract (default: folder named after the archive, next to it)"
  }
"#
    }

    async fn run(&self, args: &ToolArgs<'_>) -> Result<ToolOutput> {
        let archive_path = args.require("archive_path")?;
        let destination = args.optional("destination");
        Ok(ToolOutput::Extraction(extract_archive(&archive_path, destination.as_deref())?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Zip,
    Tar,
    TarGz,
}

/// Extract `archive_path` into `destination` or a sibling folder
pub fn extract_archive(archive_path: &str, destination: Option<&str>) -> Result<Extraction> {
    let archive = normalize_path(archive_path);
    if !archive.exists() {
        return Err(AgentError::tool(format!("Archive not found: {}", archive_path)));
    }

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let format = if file_name.ends_with(".zip") {
        Format::Zip
    } else if file_name.ends_with(".tar.gz") || file_name.ends_with(".tgz") || file_name.ends_with(".gz") {
        Format::TarGz
    } else if file_name.ends_with(".tar") {
        Format::Tar
    } else {
        let ext = archive
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        return Err(AgentError::tool(format!(
            "Unsupported archive format: {}. Supported: .zip, .tar, .tar.gz, .tgz",
            ext
        )));
    };

    let dest = match destination {
        Some(d) => normalize_path(d),
        None => default_destination(&archive),
    };
    fs::create_dir_all(&dest)?;

    let names = match format {
        Format::Zip => extract_zip(&archive, &dest)?,
        Format::Tar => extract_tar(File::open(&archive)?, &dest)?,
        Format::TarGz => extract_tar(GzDecoder::new(File::open(&archive)?), &dest)?,
    };

    info!("Extracted {} entries from {:?} into {:?}", names.len(), archive, dest);

    let total_files = names.len();
    Ok(Extraction {
        archive,
        destination: dest,
        extracted_files: names.into_iter().take(LISTED_ENTRIES).collect(),
        total_files,
    })
}

/// Archive's directory joined with its name minus the archive suffix
pub fn default_destination(archive: &Path) -> PathBuf {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_lowercase();

    let stem = ARCHIVE_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix) && lower.len() > suffix.len())
        .and_then(|suffix| name.len().checked_sub(suffix.len()))
        .and_then(|end| name.get(..end))
        .map(str::to_string)
        .unwrap_or_else(|| name.clone());

    let parent = archive.parent().unwrap_or_else(|| Path::new("."));
    parent.join(stem)
}

fn extract_zip(path: &Path, dest: &Path) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AgentError::Archive(format!("Failed to open ZIP: {}", e)))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| AgentError::Archive(format!("Failed to read ZIP entry: {}", e)))?;
        names.push(entry.name().to_string());
    }

    // Entries escaping `dest` are rejected by the zip crate
    archive
        .extract(dest)
        .map_err(|e| AgentError::Archive(format!("Failed to extract ZIP: {}", e)))?;

    Ok(names)
}

fn extract_tar<R: Read>(reader: R, dest: &Path) -> Result<Vec<String>> {
    let mut archive = tar::Archive::new(reader);
    let mut names = Vec::new();

    for entry in archive
        .entries()
        .map_err(|e| AgentError::Archive(format!("Failed to read TAR: {}", e)))?
    {
        let mut entry = entry.map_err(|e| AgentError::Archive(format!("Failed to read TAR entry: {}", e)))?;
        let name = entry
            .path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| AgentError::Archive(format!("Failed to extract {}: {}", name, e)))?;
        if unpacked {
            names.push(name);
        } else {
            warn!("Skipped unsafe archive entry {:?}", name);
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn s(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, body) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    /// Raw entries; names are written unchecked so `..` can be tested
    fn append_entries<W: Write>(builder: &mut tar::Builder<W>, entries: &[(&str, &str)]) {
        for (name, body) in entries {
            let mut header = tar::Header::new_gnu();
            let raw = name.as_bytes();
            header.as_gnu_mut().unwrap().name[..raw.len()].copy_from_slice(raw);
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_cksum();
            builder.append(&header, body.as_bytes()).unwrap();
        }
    }

    fn write_tar(path: &Path, entries: &[(&str, &str)]) {
        let mut builder = tar::Builder::new(File::create(path).unwrap());
        append_entries(&mut builder, entries);
        builder.into_inner().unwrap();
    }

    fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_entries(&mut builder, entries);
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_default_destination() {
        assert_eq!(default_destination(Path::new("/tmp/site.tar.gz")), PathBuf::from("/tmp/site"));
        assert_eq!(default_destination(Path::new("/tmp/Site.TGZ")), PathBuf::from("/tmp/Site"));
        assert_eq!(default_destination(Path::new("/tmp/photos.zip")), PathBuf::from("/tmp/photos"));
        assert_eq!(default_destination(Path::new("/tmp/logs.tar")), PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_extract_zip_to_default_destination() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("bundle.zip");
        write_zip(&archive, &[("a.txt", "alpha"), ("sub/b.txt", "beta")]);

        let result = extract_archive(&s(&archive), None).unwrap();
        assert_eq!(result.destination, dir.path().join("bundle"));
        assert_eq!(result.total_files, 2);
        assert_eq!(result.extracted_files, vec!["a.txt", "sub/b.txt"]);
        assert_eq!(fs::read_to_string(dir.path().join("bundle/sub/b.txt")).unwrap(), "beta");
    }

    #[test]
    fn test_extract_tar_gz_to_explicit_destination() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("site.tar.gz");
        write_tar_gz(&archive, &[("index.html", "<h1>hi</h1>"), ("css/site.css", "body{}")]);

        let out = dir.path().join("out");
        let result = extract_archive(&s(&archive), Some(&s(&out))).unwrap();
        assert_eq!(result.total_files, 2);
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "<h1>hi</h1>");
    }

    #[test]
    fn test_extract_plain_tar() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("logs.tar");
        write_tar(&archive, &[("app.log", "started")]);

        let result = extract_archive(&s(&archive), None).unwrap();
        assert_eq!(result.destination, dir.path().join("logs"));
        assert_eq!(result.extracted_files, vec!["app.log"]);
        assert_eq!(fs::read_to_string(dir.path().join("logs/app.log")).unwrap(), "started");
    }

    #[test]
    fn test_extract_tgz_and_bare_gz() {
        let dir = TempDir::new().unwrap();
        for name in ["site.tgz", "backup.gz"] {
            write_tar_gz(&dir.path().join(name), &[("index.html", "home")]);
        }

        let tgz = extract_archive(&s(&dir.path().join("site.tgz")), None).unwrap();
        assert_eq!(tgz.destination, dir.path().join("site"));
        assert_eq!(fs::read_to_string(dir.path().join("site/index.html")).unwrap(), "home");

        let gz = extract_archive(&s(&dir.path().join("backup.gz")), None).unwrap();
        assert_eq!(gz.destination, dir.path().join("backup"));
        assert_eq!(gz.total_files, 1);
    }

    #[test]
    fn test_tar_parent_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("sneaky.tar.gz");
        write_tar_gz(&archive, &[("../evil.txt", "gotcha"), ("ok.txt", "fine")]);

        let out = dir.path().join("out");
        let result = extract_archive(&s(&archive), Some(&s(&out))).unwrap();
        assert_eq!(result.extracted_files, vec!["ok.txt"]);
        assert!(out.join("ok.txt").exists());
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_zip_escaping_entry_is_rejected() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("sneaky.zip");
        write_zip(&archive, &[("../evil.txt", "gotcha")]);

        let out = dir.path().join("out");
        let err = extract_archive(&s(&archive), Some(&s(&out))).unwrap_err();
        assert!(matches!(err, AgentError::Archive(_)));
        assert!(!dir.path().join("evil.txt").exists());
    }

    #[test]
    fn test_listing_is_capped() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("many.zip");
        let names: Vec<String> = (0..25).map(|i| format!("f{:02}.txt", i)).collect();
        let entries: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "x")).collect();
        write_zip(&archive, &entries);

        let result = extract_archive(&s(&archive), None).unwrap();
        assert_eq!(result.total_files, 25);
        assert_eq!(result.extracted_files.len(), LISTED_ENTRIES);
    }

    #[test]
    fn test_errors() {
        let dir = TempDir::new().unwrap();
        let missing = s(&dir.path().join("gone.zip"));
        assert_eq!(
            extract_archive(&missing, None).unwrap_err().to_string(),
            format!("Archive not found: {}", missing)
        );

        let rar = dir.path().join("data.rar");
        fs::write(&rar, "rar").unwrap();
        assert_eq!(
            extract_archive(&s(&rar), None).unwrap_err().to_string(),
            "Unsupported archive format: .rar. Supported: .zip, .tar, .tar.gz, .tgz"
        );
    }
}
