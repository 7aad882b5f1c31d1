// Stub card and deck services, plus a loopback http server for the real
// clients. No test leaves the machine.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use image::ImageFormat;
use image::Rgba;
use image::RgbaImage;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use super::CardSource;
use super::DeckSource;
use super::HandConfiguration;
use super::HandError;
use super::error::Result;
use super::image_cache::canonical_name;

/// Single colored png.
pub fn card_png(color: [u8; 4], width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .unwrap();
    data
}

/// Pipeline configuration writing into `directory`.
pub fn scratch_configuration(directory: &Path) -> HandConfiguration {
    HandConfiguration {
        image_directory: directory.join("images"),
        hand_directory: directory.join("hands"),
        ..HandConfiguration::default()
    }
}

/// Knows a fixed set of cards, each drawn as a single colored image.
#[derive(Default)]
pub struct StubCards {
    colors: HashMap<String, [u8; 4]>,
    delay: Option<Duration>,
    failing_downloads: bool,
    crash_next_lookup: AtomicBool,
    pub lookups: AtomicUsize,
    pub downloads: AtomicUsize
}

impl StubCards {
    pub const CARD_SIZE: (u32, u32) = (4, 6);

    pub fn with_cards(names: &[&str]) -> StubCards {
        let colors = names.iter().enumerate()
            .map(|(index, name)| (canonical_name(name), [(index * 16) as u8, 255 - (index * 16) as u8, 128, 255]))
            .collect();
        StubCards { colors, ..StubCards::default() }
    }

    pub fn delayed(mut self, delay: Duration) -> StubCards {
        self.delay = Some(delay);
        self
    }

    pub fn failing_downloads(mut self) -> StubCards {
        self.failing_downloads = true;
        self
    }

    /// The first lookup panics, later ones behave.
    pub fn crashing_once(self) -> StubCards {
        self.crash_next_lookup.store(true, Ordering::SeqCst);
        self
    }

    pub fn color_of(&self, name: &str) -> Option<[u8; 4]> {
        self.colors.get(&canonical_name(name)).copied()
    }
}

#[async_trait]
impl CardSource for StubCards {
    async fn image_url(&self, name: &str) -> Result<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.crash_next_lookup.swap(false, Ordering::SeqCst) {
            panic!("card service crashed while looking up {}", name);
        }
        match self.color_of(name) {
            Some(_) => Ok(format!("https://cards.test/{}.png", canonical_name(name))),
            None => Err(HandError::CardNotFound { name: name.to_string(), details: format!("No cards found matching “{}”", name) })
        }
    }

    async fn download(&self, name: &str, _: &str) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_downloads {
            return Err(HandError::DownloadFailed { name: name.to_string(), reason: "connection reset".to_string() });
        }
        let color = self.color_of(name).ok_or_else(|| HandError::DownloadFailed { name: name.to_string(), reason: "404".to_string() })?;
        let (width, height) = StubCards::CARD_SIZE;
        Ok(card_png(color, width, height))
    }
}

/// Serves decklists by deck id.
#[derive(Default)]
pub struct StubDecks {
    decklists: HashMap<String, String>,
    pub fetches: AtomicUsize
}

impl StubDecks {
    pub fn with_deck(deck: &str, text: &str) -> StubDecks {
        let mut decks = StubDecks::default();
        decks.decklists.insert(deck.to_string(), text.to_string());
        decks
    }
}

#[async_trait]
impl DeckSource for StubDecks {
    async fn fetch_decklist(&self, deck: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.decklists.get(deck).cloned().ok_or_else(|| HandError::DecklistUnavailable {
            deck: deck.to_string(),
            reason: "status 404 Not Found".to_string()
        })
    }
}

/// Client for the loopback server, ignoring any proxy from the environment.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Answer every request on a loopback port with `status` and `body`.
/// Returns `http://<address>`.
pub async fn canned_http(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                    match stream.read(&mut buffer).await {
                        Ok(0) | Err(_) => return,
                        Ok(size) => request.extend_from_slice(&buffer[..size])
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status, body.len(), body
                );
                stream.write_all(response.as_bytes()).await.ok();
                stream.shutdown().await.ok();
            });
        }
    });
    format!("http://{}", address)
}
