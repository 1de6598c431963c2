//! Download and extraction against a local HTTP server.

use std::io::{Cursor, Write};

use powercast_core::{Error, PowercastConfig};
use powercast_data::download::{ARCHIVE_FILE_NAME, download_dataset, extract_dataset, fetch};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{Workspace, raw_dataset};

fn zipped(name: &str, content: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(name, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(content.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn config_for(ws: &Workspace, url: String) -> PowercastConfig {
    let mut config = ws.config.clone();
    config.download.url = url;
    config
}

#[tokio::test]
async fn test_fetch_downloads_and_extracts() {
    let server = MockServer::start().await;
    let raw = raw_dataset(5, &[]);
    Mock::given(method("GET"))
        .and(path("/household_power_consumption.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(zipped("household_power_consumption.txt", &raw)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ws = Workspace::new();
    let config = config_for(
        &ws,
        format!("{}/household_power_consumption.zip", server.uri()),
    );

    let txt = fetch(&config).await.unwrap();
    assert_eq!(std::fs::read_to_string(&txt).unwrap(), raw);
    assert!(config.paths.processed_dir.is_dir());
    assert!(config.paths.raw_dir.join(ARCHIVE_FILE_NAME).exists());

    // The archive is already present, so no second request is made.
    let again = fetch(&config).await.unwrap();
    assert_eq!(again, txt);
}

#[tokio::test]
async fn test_download_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ws = Workspace::new();
    let client = reqwest::Client::new();
    let err = download_dataset(
        &client,
        &format!("{}/missing.zip", server.uri()),
        &ws.config.paths.raw_dir,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Http { .. }));
    assert!(err.to_string().contains("404"));
    assert!(!ws.config.paths.raw_dir.join(ARCHIVE_FILE_NAME).exists());
}

#[tokio::test]
async fn test_extract_rejects_non_archive() {
    let ws = Workspace::new();
    let bogus = ws.config.paths.raw_dir.join(ARCHIVE_FILE_NAME);
    std::fs::write(&bogus, b"this is not a zip file").unwrap();

    let err = extract_dataset(&bogus, &ws.config.paths.raw_dir)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Archive { .. }));
}
