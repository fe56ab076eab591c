//! Poster thumbnail cache
//!
//! Downloads poster images, resizes them to card size and keeps them on
//! disk so the grid can display them without refetching on every launch.
use image::{imageops::FilterType, DynamicImage};
use reqwest::Client as HttpClient;
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, CatalogResult};
use crate::state::data::FilmId;

/// Bounding box of cached thumbnails (width, height)
const THUMBNAIL_SIZE: (u32, u32) = (320, 480);

/// Get the default poster cache directory
/// Returns ~/.cache/cinematheque/posters on Linux
pub fn default_cache_dir() -> PathBuf {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("cinematheque");
    path.push("posters");
    path
}

#[derive(Clone, Debug)]
pub struct PosterCache {
    http_client: HttpClient,
    dir: PathBuf,
}

impl PosterCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            http_client: HttpClient::new(),
            dir,
        }
    }

    /// Expected thumbnail path for a film (doesn't fetch, just returns the path)
    pub fn path_for(&self, id: FilmId) -> PathBuf {
        self.dir.join(format!("{}.jpg", id))
    }

    /// Cached thumbnail for a film, if one exists on disk
    pub fn cached(&self, id: FilmId) -> Option<PathBuf> {
        let path = self.path_for(id);
        path.is_file().then_some(path)
    }

    /// Download `url`, resize it and store it as the film's thumbnail
    pub async fn fetch(self, id: FilmId, url: String) -> CatalogResult<PathBuf> {
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::ExternalApi(format!(
                "Poster download returned status {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?.to_vec();
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(id);
        let target = path.clone();

        // Decoding and resizing are CPU-bound
        tokio::task::spawn_blocking(move || save_thumbnail(&bytes, &target)).await??;

        tracing::debug!(film_id = %id, path = %path.display(), "Poster cached");
        Ok(path)
    }
}

/// Decode image bytes, fit them into the thumbnail box and save as JPEG
fn save_thumbnail(bytes: &[u8], path: &Path) -> CatalogResult<()> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = THUMBNAIL_SIZE;

    let thumbnail = if img.width() > width || img.height() > height {
        img.resize(width, height, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(thumbnail.to_rgb8()).save(path)?;
    Ok(())
}
