use image::GenericImageView;

use crate::models::GridImage;

// ── Constants ────────────────────────────────────────────────────────────────

pub const MIN_DIMENSION: u32 = 200;
pub const GRID_COLUMNS: usize = 3;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum ImageFetchError {
    #[error("{0}")]
    Request(String),
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),
    #[error("{0}")]
    Decode(#[from] image::ImageError),
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// Download and decode every candidate, one at a time, then lay out the
/// survivors. Per-item failures are logged and skipped; the batch always
/// completes.
pub async fn build_grid(
    client: &reqwest::Client,
    candidates: impl IntoIterator<Item = String>,
) -> Vec<GridImage> {
    let mut decoded = Vec::new();
    for url in candidates {
        match fetch_dimensions(client, &url).await {
            Ok((width, height)) => {
                tracing::debug!(%url, width, height, "image dimensions");
                decoded.push((url, width, height));
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "error processing the image, skipping");
            }
        }
    }
    layout(decoded)
}

async fn fetch_dimensions(
    client: &reqwest::Client,
    url: &str,
) -> Result<(u32, u32), ImageFetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ImageFetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ImageFetchError::Status(response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageFetchError::Request(e.to_string()))?;

    Ok(decode_dimensions(&bytes)?)
}

/// Fully decode the body as a raster image and read its pixel size.
fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.dimensions())
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Drop images below the minimum size and assign the rest to columns
/// round-robin, in the order they passed the filter.
fn layout(decoded: Vec<(String, u32, u32)>) -> Vec<GridImage> {
    let mut grid = Vec::new();
    for (url, width, height) in decoded {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            tracing::debug!(%url, width, height, "image below minimum dimensions, skipping");
            continue;
        }
        grid.push(GridImage {
            column: grid.len() % GRID_COLUMNS,
            url,
            width,
            height,
        });
    }
    grid
}

// ── Tests ────────────────────────────────────────────────────────────────────
