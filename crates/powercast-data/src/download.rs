//! Fetching and unpacking the dataset archive.

use std::path::{Path, PathBuf};

use powercast_core::{Error, PowercastConfig, Result};
use tokio::io::AsyncWriteExt;

use crate::load::raw_file_path;

/// File name of the downloaded archive.
pub const ARCHIVE_FILE_NAME: &str = "household_power_consumption.zip";

/// Creates the raw and processed data directories.
pub async fn create_dirs(raw_dir: &Path, processed_dir: &Path) -> Result<()> {
    for dir in [raw_dir, processed_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::io_with_path(e, dir))?;
    }
    tracing::info!(
        raw = %raw_dir.display(),
        processed = %processed_dir.display(),
        "Created directories"
    );
    Ok(())
}

/// Downloads the archive into `raw_dir` unless it is already there.
///
/// The body is streamed to a `.part` file that is renamed once complete, so
/// an interrupted transfer never looks like a finished download.
pub async fn download_dataset(client: &reqwest::Client, url: &str, raw_dir: &Path) -> Result<PathBuf> {
    let zip_path = raw_dir.join(ARCHIVE_FILE_NAME);
    if tokio::fs::try_exists(&zip_path).await.unwrap_or(false) {
        tracing::info!(path = %zip_path.display(), "Dataset already downloaded");
        return Ok(zip_path);
    }

    tracing::info!(url, "Downloading dataset");
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::http_with_source(format!("request to {url} failed"), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::http(format!("{url} returned {status}")));
    }

    let part_path = zip_path.with_extension("zip.part");
    let mut file = tokio::fs::File::create(&part_path)
        .await
        .map_err(|e| Error::io_with_path(e, &part_path))?;

    let mut bytes = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::http_with_source("failed reading response body", e))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io_with_path(e, &part_path))?;
        bytes += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| Error::io_with_path(e, &part_path))?;
    drop(file);

    tokio::fs::rename(&part_path, &zip_path)
        .await
        .map_err(|e| Error::io_with_path(e, &zip_path))?;
    tracing::info!(path = %zip_path.display(), bytes, "Dataset downloaded");
    Ok(zip_path)
}

/// Extracts every entry of the archive into `raw_dir`.
pub async fn extract_dataset(zip_path: &Path, raw_dir: &Path) -> Result<()> {
    tracing::info!(path = %zip_path.display(), "Extracting archive");
    let zip_path = zip_path.to_path_buf();
    let target = raw_dir.to_path_buf();

    let entries = tokio::task::spawn_blocking(move || -> Result<usize> {
        let file = std::fs::File::open(&zip_path).map_err(|e| Error::io_with_path(e, &zip_path))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            Error::archive_with_source(format!("cannot open {}", zip_path.display()), e)
        })?;
        archive.extract(&target).map_err(|e| {
            Error::archive_with_source(format!("cannot extract {}", zip_path.display()), e)
        })?;
        Ok(archive.len())
    })
    .await
    .map_err(|e| Error::archive_with_source("extraction task failed", e))??;

    tracing::info!(entries, dir = %raw_dir.display(), "Dataset extracted");
    Ok(())
}

/// Creates the data directories, downloads, and extracts the dataset.
///
/// Returns the path of the extracted text file.
pub async fn fetch(config: &PowercastConfig) -> Result<PathBuf> {
    let paths = &config.paths;
    create_dirs(&paths.raw_dir, &paths.processed_dir).await?;

    let client = reqwest::Client::new();
    let zip_path = download_dataset(&client, &config.download.url, &paths.raw_dir).await?;
    extract_dataset(&zip_path, &paths.raw_dir).await?;

    tracing::info!("Download and extraction complete");
    Ok(raw_file_path(&paths.raw_dir))
}
