//! Thumbnail Cache
//! Decodes thumbnails on a background thread (rayon fan-out) and keeps egui textures by path.

use crate::config::THUMBNAIL_SIZE;
use egui::{ColorImage, TextureHandle, TextureOptions};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Decoded thumbnail from a worker thread
struct ThumbnailResult {
    path: PathBuf,
    image: Result<ColorImage, String>,
}

/// Texture cache shared by every row showing the same file.
pub struct ThumbnailCache {
    textures: HashMap<PathBuf, TextureHandle>,
    failed: HashSet<PathBuf>,
    pending: HashSet<PathBuf>,
    tx: Sender<ThumbnailResult>,
    rx: Receiver<ThumbnailResult>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailCache {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            textures: HashMap::new(),
            failed: HashSet::new(),
            pending: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Queue decoding for paths not seen before.
    pub fn request(&mut self, paths: &[PathBuf]) {
        let new_paths: Vec<PathBuf> = paths
            .iter()
            .filter(|p| {
                !self.textures.contains_key(*p) && !self.failed.contains(*p) && !self.pending.contains(*p)
            })
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if new_paths.is_empty() {
            return;
        }

        self.pending.extend(new_paths.iter().cloned());
        let tx = self.tx.clone();
        thread::spawn(move || {
            new_paths.par_iter().for_each_with(tx, |tx, path| {
                let image = load_thumbnail(path).map_err(|e| e.to_string());
                let _ = tx.send(ThumbnailResult {
                    path: path.clone(),
                    image,
                });
            });
        });
    }

    /// Upload finished thumbnails. Returns true while work is outstanding.
    pub fn poll(&mut self, ctx: &egui::Context) -> bool {
        while let Ok(result) = self.rx.try_recv() {
            self.pending.remove(&result.path);
            match result.image {
                Ok(image) => {
                    let name = result.path.to_string_lossy().to_string();
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    self.textures.insert(result.path, texture);
                }
                Err(e) => {
                    log::warn!("No thumbnail for {}: {}", result.path.display(), e);
                    self.failed.insert(result.path);
                }
            }
        }
        !self.pending.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&TextureHandle> {
        self.textures.get(path)
    }

    pub fn has_failed(&self, path: &Path) -> bool {
        self.failed.contains(path)
    }
}

/// Decode `path` and shrink it to fit a THUMBNAIL_SIZE square, keeping aspect ratio.
pub fn load_thumbnail(path: &Path) -> Result<ColorImage, image::ImageError> {
    let img = image::open(path)?.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
