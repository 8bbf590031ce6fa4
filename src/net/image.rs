//! Asynchronous image loader for the lightbox.
//!
//! Spawns background threads to read or download images and decode them
//! into RGBA pixel buffers ready for egui texture creation.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use url::Url;

/// Widest image kept after decoding; larger ones are scaled down.
const MAX_WIDTH: u32 = 1600;

/// Decoded image data (RGBA).
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Resolve an `img` `src` against the page URL.
pub fn resolve_image_url(base: &str, src: &str) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    match Url::parse(src) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base).ok()?.join(src).ok(),
        Err(_) => None,
    }
}

/// Manages background image loading and decoding.
#[derive(Default)]
pub struct ImageLoader {
    pending: HashMap<String, mpsc::Receiver<Option<ImageData>>>,
    loaded: HashMap<String, ImageData>,
    failed: HashSet<String>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `src` (relative to `base`) in the background. Returns the key
    /// the image will be stored under, or `None` if it cannot be resolved.
    pub fn request(&mut self, base: &str, src: &str) -> Option<String> {
        let url = resolve_image_url(base, src)?;
        let key = url.to_string();
        if self.loaded.contains_key(&key)
            || self.pending.contains_key(&key)
            || self.failed.contains(&key)
        {
            return Some(key);
        }

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let result = load_and_decode(&url);
            let _ = tx.send(result);
        });

        self.pending.insert(key.clone(), rx);
        Some(key)
    }

    /// Poll for completed loads. Call every frame.
    pub fn poll(&mut self) {
        let mut completed = Vec::new();
        for (url, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Some(data)) => {
                    self.loaded.insert(url.clone(), data);
                    completed.push(url.clone());
                }
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("image failed: {}", url);
                    self.failed.insert(url.clone());
                    completed.push(url.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for url in completed {
            self.pending.remove(&url);
        }
    }

    /// Get a loaded image's data.
    pub fn get(&self, key: &str) -> Option<&ImageData> {
        self.loaded.get(key)
    }

    /// Number of images still loading.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

fn read_bytes(url: &Url) -> Option<Vec<u8>> {
    match url.scheme() {
        "file" => std::fs::read(url.to_file_path().ok()?).ok(),
        "http" | "https" => {
            let resp = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .ok()?
                .get(url.as_str())
                .send()
                .ok()?;
            if !resp.status().is_success() {
                return None;
            }
            resp.bytes().ok().map(|b| b.to_vec())
        }
        _ => None,
    }
}

fn load_and_decode(url: &Url) -> Option<ImageData> {
    let bytes = read_bytes(url)?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if w > MAX_WIDTH {
        let ratio = MAX_WIDTH as f32 / w as f32;
        let new_h = ((h as f32 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            MAX_WIDTH,
            new_h,
            image::imageops::FilterType::Triangle,
        );
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Some(ImageData {
        width: w,
        height: h,
        rgba: pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_sources() {
        let u = resolve_image_url("file:///site/index.html", "img/a.jpg").unwrap();
        assert_eq!(u.as_str(), "file:///site/img/a.jpg");
        let u = resolve_image_url("https://me.dev/portfolio/", "../pics/b.png").unwrap();
        assert_eq!(u.as_str(), "https://me.dev/pics/b.png");
        let u = resolve_image_url("file:///x.html", "https://cdn.dev/c.webp").unwrap();
        assert_eq!(u.host_str(), Some("cdn.dev"));
        assert!(resolve_image_url("file:///x.html", "  ").is_none());
    }

    #[test]
    fn loader_deduplicates() {
        let mut loader = ImageLoader::new();
        let a = loader.request("file:///no-such-site/index.html", "img.png");
        let b = loader.request("file:///no-such-site/", "/no-such-site/img.png");
        assert_eq!(a, b);
        assert_eq!(loader.pending_count(), 1);
    }
}
