//! Pixel comparison engine
//!
//! Default `ImageEngine` implementation built on the `image` crate:
//! - tolerance-aware per-channel comparison (strict mode forces exact match)
//! - caret suppression: a residual diff confined to a one-pixel-wide vertical
//!   strip is ignored when the capture may legitimately contain a text caret
//! - diff rendering: the reference image with differing pixels painted in the
//!   configured highlight color
//!
//! Decoding and the pixel walks are CPU-bound, so both operations run under
//! `spawn_blocking` to keep the async contract of `ImageEngine`.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use vizir_core::{ComparePolicy, DiffRequest, EngineError, ImageEngine};

/// Tolerance-aware pixel comparison engine
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelEngine;

impl PixelEngine {
    pub fn new() -> Self {
        Self
    }
}

fn load(path: &Path) -> Result<RgbaImage, EngineError> {
    let img = image::open(path).map_err(EngineError::new)?;
    Ok(img.to_rgba8())
}

fn effective_tolerance(tolerance: f64, strict: bool) -> f64 {
    if strict {
        0.0
    } else {
        tolerance
    }
}

fn pixel_differs(a: Rgba<u8>, b: Rgba<u8>, tolerance: f64) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .any(|(&x, &y)| (f64::from(x) - f64::from(y)).abs() > tolerance)
}

fn differing_pixels(current: &RgbaImage, reference: &RgbaImage, tolerance: f64) -> Vec<(u32, u32)> {
    let mut diffs = Vec::new();
    for y in 0..reference.height() {
        for x in 0..reference.width() {
            if pixel_differs(*current.get_pixel(x, y), *reference.get_pixel(x, y), tolerance) {
                diffs.push((x, y));
            }
        }
    }
    diffs
}

/// A text caret shows up as one vertically contiguous column of pixels
fn is_caret_strip(diffs: &[(u32, u32)]) -> bool {
    let column = diffs[0].0;
    if diffs.iter().any(|&(x, _)| x != column) {
        return false;
    }
    let min_y = diffs.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let max_y = diffs.iter().map(|&(_, y)| y).max().unwrap_or(0);
    // Pixel walk order yields unique coordinates, so contiguity reduces to
    // the span matching the count
    (max_y - min_y + 1) as usize == diffs.len()
}

fn images_equal(current: &RgbaImage, reference: &RgbaImage, policy: ComparePolicy) -> bool {
    if current.dimensions() != reference.dimensions() {
        return false;
    }
    let tolerance = effective_tolerance(policy.tolerance, policy.strict_comparison);
    let diffs = differing_pixels(current, reference, tolerance);
    if diffs.is_empty() {
        return true;
    }
    policy.can_have_caret && is_caret_strip(&diffs)
}

fn render_diff(request: &DiffRequest) -> Result<(), EngineError> {
    let current = load(&request.current)?;
    let reference = load(&request.reference)?;
    let tolerance = effective_tolerance(request.tolerance, request.strict_comparison);
    let highlight = Rgba([
        request.diff_color.r,
        request.diff_color.g,
        request.diff_color.b,
        0xff,
    ]);

    // Rendered on the reference canvas; pixels the current image does not
    // cover count as differences
    let mut out = reference.clone();
    for y in 0..reference.height() {
        for x in 0..reference.width() {
            let covered = x < current.width() && y < current.height();
            let differs = !covered
                || pixel_differs(*current.get_pixel(x, y), *reference.get_pixel(x, y), tolerance);
            if differs {
                out.put_pixel(x, y, highlight);
            }
        }
    }
    out.save(&request.diff).map_err(EngineError::new)
}

#[async_trait]
impl ImageEngine for PixelEngine {
    async fn compare(
        &self,
        current: &Path,
        reference: &Path,
        policy: ComparePolicy,
    ) -> Result<bool, EngineError> {
        let current: PathBuf = current.to_path_buf();
        let reference: PathBuf = reference.to_path_buf();
        let equal = tokio::task::spawn_blocking(move || {
            let cur = load(&current)?;
            let refi = load(&reference)?;
            Ok::<_, EngineError>(images_equal(&cur, &refi, policy))
        })
        .await
        .map_err(EngineError::new)??;
        tracing::debug!(
            component = module_path!(),
            op = "pixel_compare",
            equal,
            tolerance = policy.tolerance,
            strict = policy.strict_comparison,
        );
        Ok(equal)
    }

    async fn build_diff(&self, request: DiffRequest) -> Result<(), EngineError> {
        tokio::task::spawn_blocking(move || render_diff(&request))
            .await
            .map_err(EngineError::new)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vizir_core::DiffColor;

    fn save(dir: &TempDir, name: &str, img: &RgbaImage) -> PathBuf {
        let path = dir.path().join(name);
        img.save(&path).unwrap();
        path
    }

    fn solid(w: u32, h: u32, pixel: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(pixel))
    }

    fn policy(tolerance: f64) -> ComparePolicy {
        ComparePolicy {
            tolerance,
            strict_comparison: false,
            can_have_caret: false,
        }
    }

    #[tokio::test]
    async fn test_identical_images_are_equal() {
        let dir = TempDir::new().unwrap();
        let img = solid(8, 8, [10, 20, 30, 255]);
        let a = save(&dir, "a.png", &img);
        let b = save(&dir, "b.png", &img);

        assert!(PixelEngine::new().compare(&a, &b, policy(0.0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_tolerance_bounds_per_channel_delta() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(4, 4, [100, 100, 100, 255]));
        let current = save(&dir, "cur.png", &solid(4, 4, [103, 100, 100, 255]));
        let engine = PixelEngine::new();

        // Delta of 3 exceeds tolerance 2.5 but sits inside 5
        assert!(!engine.compare(&current, &reference, policy(2.5)).await.unwrap());
        assert!(engine.compare(&current, &reference, policy(5.0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_strict_comparison_ignores_tolerance() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(4, 4, [100, 100, 100, 255]));
        let current = save(&dir, "cur.png", &solid(4, 4, [101, 100, 100, 255]));

        let strict = ComparePolicy {
            tolerance: 10.0,
            strict_comparison: true,
            can_have_caret: false,
        };
        assert!(!PixelEngine::new().compare(&current, &reference, strict).await.unwrap());
    }

    #[tokio::test]
    async fn test_caret_strip_is_ignored_when_allowed() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(16, 16, [255, 255, 255, 255]));
        let mut caret = solid(16, 16, [255, 255, 255, 255]);
        for y in 2..10 {
            caret.put_pixel(5, y, Rgba([0, 0, 0, 255]));
        }
        let current = save(&dir, "cur.png", &caret);
        let engine = PixelEngine::new();

        let with_caret = ComparePolicy {
            tolerance: 0.0,
            strict_comparison: false,
            can_have_caret: true,
        };
        assert!(engine.compare(&current, &reference, with_caret).await.unwrap());
        assert!(!engine.compare(&current, &reference, policy(0.0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_two_columns_are_not_a_caret() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(16, 16, [255, 255, 255, 255]));
        let mut img = solid(16, 16, [255, 255, 255, 255]);
        for y in 2..10 {
            img.put_pixel(5, y, Rgba([0, 0, 0, 255]));
            img.put_pixel(9, y, Rgba([0, 0, 0, 255]));
        }
        let current = save(&dir, "cur.png", &img);

        let with_caret = ComparePolicy {
            tolerance: 0.0,
            strict_comparison: false,
            can_have_caret: true,
        };
        assert!(!PixelEngine::new().compare(&current, &reference, with_caret).await.unwrap());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_unequal() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(8, 8, [10, 20, 30, 255]));
        let current = save(&dir, "cur.png", &solid(8, 9, [10, 20, 30, 255]));

        assert!(!PixelEngine::new().compare(&current, &reference, policy(10.0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_diff_paints_differing_pixels_in_highlight_color() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(8, 8, [200, 0, 0, 255]));
        let mut changed = solid(8, 8, [200, 0, 0, 255]);
        changed.put_pixel(3, 4, Rgba([0, 0, 200, 255]));
        let current = save(&dir, "cur.png", &changed);
        let target = dir.path().join("diff.png");

        PixelEngine::new()
            .build_diff(DiffRequest {
                reference: reference.clone(),
                current: current.clone(),
                diff: target.clone(),
                diff_color: DiffColor::new(0xff, 0x00, 0xff),
                tolerance: 0.0,
                strict_comparison: false,
            })
            .await
            .unwrap();

        let rendered = image::open(&target).unwrap().to_rgba8();
        assert_eq!(*rendered.get_pixel(3, 4), Rgba([0xff, 0x00, 0xff, 0xff]));
        // Untouched pixels keep the reference content
        assert_eq!(*rendered.get_pixel(0, 0), Rgba([200, 0, 0, 255]));
    }

    #[tokio::test]
    async fn test_diff_output_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let reference = save(&dir, "ref.png", &solid(8, 8, [1, 2, 3, 255]));
        let current = save(&dir, "cur.png", &solid(8, 8, [9, 9, 9, 255]));
        let engine = PixelEngine::new();

        let request = |target: PathBuf| DiffRequest {
            reference: reference.clone(),
            current: current.clone(),
            diff: target,
            diff_color: DiffColor::default(),
            tolerance: 0.0,
            strict_comparison: false,
        };

        let first_path = dir.path().join("d1.png");
        let second_path = dir.path().join("d2.png");
        engine.build_diff(request(first_path.clone())).await.unwrap();
        engine.build_diff(request(second_path.clone())).await.unwrap();
        assert_eq!(
            std::fs::read(first_path).unwrap(),
            std::fs::read(second_path).unwrap()
        );
    }

    #[tokio::test]
    async fn test_undecodable_image_surfaces_engine_error() {
        let dir = TempDir::new().unwrap();
        let good = save(&dir, "ref.png", &solid(4, 4, [0, 0, 0, 255]));
        let bad = dir.path().join("garbage.png");
        std::fs::write(&bad, b"not a png at all").unwrap();

        let err = PixelEngine::new().compare(&bad, &good, policy(0.0)).await;
        assert!(err.is_err());
    }
}
