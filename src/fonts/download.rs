//! Time-bounded download of the fallback font into the local cache.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
enum DownloadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response body is empty")]
    Empty,
    #[error("response is not a TrueType/OpenType font")]
    NotAFont,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to move download into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Tries every mirror in order and stores the first valid font at `destination`.
///
/// Returns `true` when the file was written. Failures are logged and never propagated.
pub(crate) fn fetch(mirrors: &[String], destination: &Path, timeout: Duration) -> bool {
    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!("Unable to set up HTTP client for font download: {}", err);
            return false;
        }
    };

    for url in mirrors {
        debug!("Downloading fallback font from {}", url);
        match fetch_one(&client, url, destination) {
            Ok(size) => {
                info!(
                    "Downloaded fallback font ({} bytes) to {}",
                    size,
                    destination.display()
                );
                return true;
            }
            Err(err) => warn!("Font download from {} failed: {}", url, err),
        }
    }

    false
}

fn fetch_one(
    client: &reqwest::blocking::Client,
    url: &str,
    destination: &Path,
) -> Result<usize, DownloadError> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    if bytes.is_empty() {
        return Err(DownloadError::Empty);
    }
    if !looks_like_font(&bytes) {
        return Err(DownloadError::NotAFont);
    }

    let directory = destination.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(directory)?;

    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(&bytes)?;
    file.as_file().sync_all()?;
    file.persist(destination)?;

    Ok(bytes.len())
}

fn looks_like_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00])
            | Some([b't', b'r', b'u', b'e'])
            | Some([b'O', b'T', b'T', b'O'])
            | Some([b't', b't', b'c', b'f'])
    )
}

/// Serves `body` once over HTTP on a loopback port and returns the URL to fetch it from.
#[cfg(test)]
pub(super) fn serve_once(body: Vec<u8>) -> (String, std::thread::JoinHandle<()>) {
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let address = listener.local_addr().expect("local address");
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        while reader.read_line(&mut line).expect("read request") > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: font/ttf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .expect("write head");
        stream.write_all(&body).expect("write body");
    });
    (format!("http://{}/{}", address, crate::fonts::FALLBACK_FONT_FILE), handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_body() -> Vec<u8> {
        let mut body = vec![0x00, 0x01, 0x00, 0x00];
        body.extend_from_slice(b"glyph tables");
        body
    }

    #[test]
    fn recognizes_font_signatures() {
        assert!(looks_like_font(&[0x00, 0x01, 0x00, 0x00, 0x00]));
        assert!(looks_like_font(b"OTTO...."));
        assert!(!looks_like_font(b"<!DOCTYPE html>"));
        assert!(!looks_like_font(&[0x00]));
    }

    #[test]
    fn unreachable_mirror_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("font.ttf");
        let mirrors = vec!["http://127.0.0.1:9/DejaVuSansCondensed.ttf".to_owned()];

        assert!(!fetch(&mirrors, &destination, Duration::from_millis(500)));
        assert!(!destination.exists());
    }

    #[test]
    fn downloaded_font_is_written_to_destination() {
        let body = font_body();
        let (url, server) = serve_once(body.clone());
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("cache").join("font.ttf");

        assert!(fetch(&[url], &destination, Duration::from_secs(5)));
        server.join().expect("server thread");
        assert_eq!(fs::read(&destination).expect("read download"), body);
    }

    #[test]
    fn later_mirror_is_used_when_the_first_fails() {
        let body = font_body();
        let (url, server) = serve_once(body.clone());
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("font.ttf");
        let mirrors = vec!["http://127.0.0.1:9/DejaVuSansCondensed.ttf".to_owned(), url];

        assert!(fetch(&mirrors, &destination, Duration::from_secs(5)));
        server.join().expect("server thread");
        assert_eq!(fs::read(&destination).expect("read download"), body);
    }

    #[test]
    fn non_font_response_is_rejected() {
        let (url, server) = serve_once(b"<!DOCTYPE html><p>moved</p>".to_vec());
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("font.ttf");

        assert!(!fetch(&[url], &destination, Duration::from_secs(5)));
        server.join().expect("server thread");
        assert!(!destination.exists());
    }
}
