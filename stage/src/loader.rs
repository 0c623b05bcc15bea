//! Texture loading
//!
//! Decoding happens on worker threads; the event-loop thread polls for results
//! so that window events keep flowing while images load.

use std::{collections::HashMap, fs, sync::Arc, thread::JoinHandle};

use crossbeam::channel::{self, Receiver, TryRecvError};
use dashmap::DashMap;
use log;

use crate::scene::material::{SamplerInfo, Texture, TextureError};

pub trait TextureLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<Arc<Texture>, TextureError>;
}

/// Already-settled textures handed to the scene builder.
pub trait TextureSource {
    fn texture(&self, path: &str) -> Result<Arc<Texture>, TextureError>;
}

/// Decoded textures keyed by path, shared between loader threads.
#[derive(Clone, Default)]
pub struct TextureCache {
    entries: Arc<DashMap<String, Arc<Texture>>>,
}

impl TextureCache {
    pub fn new() -> TextureCache {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.entries.get(path).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, path: &str, texture: Arc<Texture>) {
        self.entries.insert(path.to_string(), texture);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads image files, or `data:image/*;base64,` URIs, through the `image` crate.
pub struct ImageTextureLoader {
    sampler: SamplerInfo,
    cache: TextureCache,
}

impl ImageTextureLoader {
    pub fn new(sampler: SamplerInfo) -> ImageTextureLoader {
        Self::with_cache(sampler, TextureCache::new())
    }

    pub fn with_cache(sampler: SamplerInfo, cache: TextureCache) -> ImageTextureLoader {
        ImageTextureLoader { sampler, cache }
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    fn read_bytes(path: &str) -> Result<Vec<u8>, TextureError> {
        match path.strip_prefix("data:") {
            Some(uri) => {
                let (meta, payload) = uri
                    .split_once(',')
                    .ok_or_else(|| TextureError::UnsupportedUri(path.chars().take(32).collect()))?;
                if !meta.starts_with("image/") || !meta.ends_with(";base64") {
                    return Err(TextureError::UnsupportedUri(format!("data:{}", meta)));
                }
                Ok(base64::decode(payload.trim())?)
            }
            None => Ok(fs::read(path)?),
        }
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load(&self, path: &str) -> Result<Arc<Texture>, TextureError> {
        if let Some(texture) = self.cache.get(path) {
            log::debug!("Texture cache hit for \"{}\"", path);
            return Ok(texture);
        }
        let bytes = Self::read_bytes(path)?;
        let name = if path.starts_with("data:") {
            None
        } else {
            Some(path.to_string())
        };
        let texture = Arc::new(Texture::decode(name, &bytes, &self.sampler)?);
        log::info!("\"{}\" loaded", path.chars().take(64).collect::<String>());
        self.cache.insert(path, texture.clone());
        Ok(texture)
    }
}

/// Outcome of every requested load. Failures are kept as messages so the
/// builder can report them when it skips the element.
#[derive(Debug, Default)]
pub struct ResolvedTextures {
    entries: HashMap<String, Result<Arc<Texture>, String>>,
}

impl ResolvedTextures {
    pub fn new() -> ResolvedTextures {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, path: S, result: Result<Arc<Texture>, TextureError>) {
        self.entries
            .insert(path.into(), result.map_err(|e| e.to_string()));
    }

    /// Loads every path on the calling thread.
    pub fn load_all<L: TextureLoader + ?Sized>(loader: &L, paths: &[String]) -> ResolvedTextures {
        let mut resolved = Self::new();
        for path in paths {
            resolved.insert(path.as_str(), loader.load(path));
        }
        resolved
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.values().filter(|r| r.is_err()).count()
    }

    fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

impl TextureSource for ResolvedTextures {
    fn texture(&self, path: &str) -> Result<Arc<Texture>, TextureError> {
        match self.entries.get(path) {
            Some(Ok(texture)) => Ok(texture.clone()),
            Some(Err(reason)) => Err(TextureError::Unavailable {
                path: path.to_string(),
                reason: reason.clone(),
            }),
            None => Err(TextureError::NotRequested(path.to_string())),
        }
    }
}

/// Source for scenes that use no textures.
pub struct NoTextures;

impl TextureSource for NoTextures {
    fn texture(&self, path: &str) -> Result<Arc<Texture>, TextureError> {
        Err(TextureError::NotRequested(path.to_string()))
    }
}

type LoadResult = (String, Result<Arc<Texture>, TextureError>);

/// Loads running on worker threads, one per path.
pub struct PendingTextures {
    requested: Vec<String>,
    rx: Receiver<LoadResult>,
    join_handles: Vec<JoinHandle<()>>,
    resolved: ResolvedTextures,
}

impl PendingTextures {
    pub fn spawn(loader: Arc<dyn TextureLoader>, paths: Vec<String>) -> PendingTextures {
        Self::spawn_notifying(loader, paths, || ())
    }

    /// Like [`spawn`](Self::spawn), but every worker calls `notify` once its
    /// result is in the channel, so the owner can sleep until then.
    pub fn spawn_notifying<F>(
        loader: Arc<dyn TextureLoader>,
        paths: Vec<String>,
        notify: F,
    ) -> PendingTextures
    where
        F: Fn() + Send + Clone + 'static,
    {
        let (tx, rx) = channel::unbounded();
        let join_handles = paths
            .iter()
            .cloned()
            .map(|path| {
                let tx = tx.clone();
                let loader = loader.clone();
                let notify = notify.clone();
                std::thread::spawn(move || {
                    let result = loader.load(&path);
                    let _ = tx.send((path, result));
                    notify();
                })
            })
            .collect();
        log::debug!("Started {} texture load(s)", paths.len());
        PendingTextures {
            requested: paths,
            rx,
            join_handles,
            resolved: ResolvedTextures::new(),
        }
    }

    fn settle(&mut self, (path, result): LoadResult) {
        if let Err(e) = &result {
            log::warn!("Texture load failed: {}", e);
        }
        self.resolved.insert(path, result);
    }

    /// Drains finished loads without blocking. Returns `true` once every
    /// requested path has settled.
    pub fn poll(&mut self) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(result) => self.settle(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.abandon_missing();
                    break;
                }
            }
        }
        self.is_settled()
    }

    /// Blocks until every load has settled.
    pub fn wait(mut self) -> ResolvedTextures {
        while !self.is_settled() {
            match self.rx.recv() {
                Ok(result) => self.settle(result),
                Err(_) => self.abandon_missing(),
            }
        }
        self.into_resolved()
    }

    /// Every worker is gone; anything still missing never will arrive.
    fn abandon_missing(&mut self) {
        let missing: Vec<String> = self
            .requested
            .iter()
            .filter(|p| !self.resolved.contains(p.as_str()))
            .cloned()
            .collect();
        for path in missing {
            log::error!("Texture loader for \"{}\" exited without a result", path);
            self.resolved.entries.insert(path, Err("loader thread exited".into()));
        }
    }

    pub fn is_settled(&self) -> bool {
        self.requested.iter().all(|p| self.resolved.contains(p))
    }

    pub fn into_resolved(self) -> ResolvedTextures {
        for handle in self.join_handles {
            if handle.join().is_err() {
                log::error!("Texture loader thread panicked");
            }
        }
        self.resolved
    }
}
