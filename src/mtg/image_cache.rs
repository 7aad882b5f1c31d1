use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use futures_util::future::Shared;
use futures_util::future::try_join_all;
use parking_lot::Mutex;

use super::HandError;
use super::error::Result;

/// Where card images come from when they're not on disk yet.
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Normal size image url of the card named exactly `name`.
    async fn image_url(&self, name: &str) -> Result<String>;
    /// Raw image bytes behind `url`.
    async fn download(&self, name: &str, url: &str) -> Result<Vec<u8>>;
}

type PendingImage = Shared<BoxFuture<'static, Result<PathBuf>>>;

/// Card images on disk, one file per card name.
///
/// Files are never evicted: a card image never changes once printed.
/// Requests for a card which is already being downloaded wait for that
/// download instead of starting another one.
pub struct ImageCache {
    directory: PathBuf,
    source: Arc<dyn CardSource>,
    pending: Arc<Mutex<HashMap<String, PendingImage>>>
}

impl ImageCache {
    pub fn new(directory: impl Into<PathBuf>, source: Arc<dyn CardSource>) -> ImageCache {
        ImageCache { directory: directory.into(), source, pending: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Where the image of `name` lives, whether it's downloaded or not.
    pub fn canonical_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.jpg", canonical_name(name)))
    }

    /// Make sure the image of `name` is on disk and return its path.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self.canonical_path(name);
        if is_file(&path).await {
            trace!("Image of {} found at {}", name, path.display());
            return Ok(path);
        }
        let pending = {
            let mut pending = self.pending.lock();
            pending.entry(canonical_name(name)).or_insert_with(|| self.spawn_fetch(name, path)).clone()
        };
        pending.await
    }

    /// Resolve every card of a hand. Each distinct card is resolved once and
    /// concurrently; the first failure fails the whole hand.
    pub async fn resolve_all(&self, names: &[String]) -> Result<Vec<PathBuf>> {
        let mut distinct: Vec<&str> = Vec::new();
        for name in names.iter() {
            if !distinct.iter().any(|known| canonical_name(known) == canonical_name(name)) {
                distinct.push(name);
            }
        }
        try_join_all(distinct.iter().map(|name| self.resolve(name))).await?;
        Ok(names.iter().map(|name| self.canonical_path(name)).collect())
    }

    // The fetch runs as its own task so it finishes even if the hand that
    // asked for it already failed on another card.
    fn spawn_fetch(&self, name: &str, path: PathBuf) -> PendingImage {
        let source = self.source.clone();
        let pending = self.pending.clone();
        let name = name.to_string();
        let key = canonical_name(&name);
        let task = tokio::spawn({
            let name = name.clone();
            async move {
                let _pending = PendingEntry { pending, key };
                fetch(source.as_ref(), &name, path).await
            }
        });
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(HandError::DownloadFailed { name, reason: format!("download task aborted: {}", e) })
            }
        }.boxed().shared()
    }
}

// Drops the in-flight entry when its fetch task ends, panics included.
struct PendingEntry {
    pending: Arc<Mutex<HashMap<String, PendingImage>>>,
    key: String
}

impl Drop for PendingEntry {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.key);
    }
}

async fn fetch(source: &dyn CardSource, name: &str, path: PathBuf) -> Result<PathBuf> {
    // Someone may have finished the same card between our check and the lock.
    if is_file(&path).await { return Ok(path); }
    let url = source.image_url(name).await?;
    debug!("Downloading image of {} from {}", name, url);
    let data = source.download(name, &url).await?;
    write_atomically(&path, &data).await.map_err(|e| HandError::DownloadFailed {
        name: name.to_string(),
        reason: format!("cannot write {}: {}", path.display(), e)
    })?;
    info!("Image of {} saved to {}", name, path.display());
    Ok(path)
}

/// Write to a sibling file first, so a failure never leaves half an image
/// at `path`.
async fn write_atomically(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".part");
    let temporary = PathBuf::from(temporary);
    if let Err(e) = tokio::fs::write(&temporary, data).await {
        tokio::fs::remove_file(&temporary).await.ok();
        return Err(e);
    }
    tokio::fs::rename(&temporary, path).await
}

async fn is_file(path: &Path) -> bool {
    matches!(tokio::fs::metadata(path).await, Ok(metadata) if metadata.is_file())
}

/// Case-insensitive, path-safe and injective file stem for a card name.
pub fn canonical_name(name: &str) -> String {
    urlencoding::encode(&name.trim().to_lowercase()).into_owned()
}
