// ─── Update Packager ───
// Every successful outcome's release is downloaded into `mods/` of an
// in-memory zip, and `UPDATE_REPORT.txt` summarizes what made it in and what
// did not. A failed download becomes a report line; packaging carries on.

mod report;

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::core::downloader::ArtifactFetcher;
use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::resolver::UpdateOutcome;

pub use report::{UpdateReport, REPORT_FILE_NAME};

pub const MODS_FOLDER: &str = "mods";

/// A finished update archive, ready to hand to the user.
#[derive(Debug, Clone)]
pub struct UpdatePackage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Same text as the archived `UPDATE_REPORT.txt`.
    pub report: String,
}

impl UpdatePackage {
    /// Write the archive into `dir` under its own file name.
    pub async fn write_to(&self, dir: &Path) -> UpdaterResult<PathBuf> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| UpdaterError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let dest = dir.join(&self.file_name);
        tokio::fs::write(&dest, &self.bytes)
            .await
            .map_err(|e| UpdaterError::Io {
                path: dest.clone(),
                source: e,
            })?;

        info!("Wrote update package to {:?}", dest);
        Ok(dest)
    }
}

pub fn archive_name(generated_at: DateTime<Local>) -> String {
    format!(
        "minecraft-mods-updated-{}.zip",
        generated_at.format("%Y-%m-%d")
    )
}

pub struct UpdatePackager<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: ArtifactFetcher> UpdatePackager<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn package(&self, outcomes: &[UpdateOutcome]) -> UpdaterResult<UpdatePackage> {
        self.package_at(outcomes, Local::now()).await
    }

    /// Build the archive, stamping the report and file name with `generated_at`.
    /// Only archive writing can fail; download problems end up in the report.
    pub async fn package_at(
        &self,
        outcomes: &[UpdateOutcome],
        generated_at: DateTime<Local>,
    ) -> UpdaterResult<UpdatePackage> {
        info!("Packaging {} update outcomes", outcomes.len());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut report = UpdateReport::new(outcomes.len());
        let mut packaged_urls = HashSet::new();
        let mut entry_names = HashSet::new();

        for outcome in outcomes {
            let file_name = &outcome.descriptor.file_name;
            let release = match (&outcome.resolved_release, outcome.updated) {
                (Some(release), true) => release,
                _ => {
                    let reason = outcome.error_reason.as_deref().unwrap_or("update failed");
                    report.record_failure(file_name, reason);
                    continue;
                }
            };

            // Two inputs can resolve to the same release; it is packaged once.
            if packaged_urls.contains(&release.download_url) {
                debug!("{} already packaged", release.download_url);
                report.record_success(file_name, &release.version_label);
                continue;
            }

            let Some(base_name) = entry_file_name(&release.filename) else {
                warn!("Unusable release file name {:?}", release.filename);
                report.record_failure(file_name, "release file name is not usable");
                continue;
            };

            let bytes = match self
                .fetcher
                .fetch(&release.download_url, release.sha1.as_deref())
                .await
            {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Download of {} failed: {}", release.download_url, e);
                    report.record_failure(file_name, &format!("download failed: {e}"));
                    continue;
                }
            };

            let entry_name = unique_entry_name(&base_name, &entry_names);
            writer.start_file(
                format!("{MODS_FOLDER}/{entry_name}"),
                SimpleFileOptions::default(),
            )?;
            writer.write_all(&bytes)?;
            entry_names.insert(entry_name);
            packaged_urls.insert(release.download_url.clone());
            report.record_success(file_name, &release.version_label);
        }

        let report_text = report.render(generated_at);
        writer.start_file(REPORT_FILE_NAME, SimpleFileOptions::default())?;
        writer.write_all(report_text.as_bytes())?;
        let bytes = writer.finish()?.into_inner();

        info!(
            "Packaged {} of {} mods ({} bytes)",
            report.updated.len(),
            outcomes.len(),
            bytes.len()
        );

        Ok(UpdatePackage {
            file_name: archive_name(generated_at),
            bytes,
            report: report_text,
        })
    }
}

/// Last path component of a registry-supplied file name, so nothing can
/// land outside `mods/`.
fn entry_file_name(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// `name`, or `stem-2.ext`, `stem-3.ext`... when it is already taken.
fn unique_entry_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (name, String::new()),
    };
    (2..)
        .map(|n| format!("{stem}-{n}{ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
