//! Export pipeline: single raster export and per-color batch export.
//!
//! DESIGN
//! ======
//! Export temporarily mutates two pieces of board-level state: overlay
//! visibility (always hidden while capturing) and, for batches, the
//! background color. Both are shared with the live editor, so every export
//! holds a `RestoreGuard` that puts the original settings back and re-renders
//! when it is dropped. That covers success, capture failure, and
//! cancellation (the caller dropping the export future mid-flight).
//!
//! Variants are captured strictly one after another: there is a single
//! surface and a single background value, so a variant's color must be on
//! screen and read back before the next one is set.
//!
//! ERROR HANDLING
//! ==============
//! A failed capture aborts the batch. Rasters already captured are discarded;
//! the caller gets one batch-level error and no archive.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::archive::{self, Archive, ArchiveError};
use crate::compose::compose_frame;
use crate::consts::{DEFAULT_EXPORT_PIXEL_RATIO, DEFAULT_EXPORT_SETTLE_MS, EXPORT_EXTENSION};
use crate::doc::{BoardSettings, Scene};
use crate::error::ErrorCode;
use crate::surface::{CaptureError, CaptureRequest, RasterFormat, RenderSurface};

// =============================================================================
// TYPES
// =============================================================================

/// Tuning for exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Output pixels per board unit.
    pub pixel_ratio: f64,
    /// Extra wait after the frame boundary before each batch capture.
    pub settle_delay: Duration,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: DEFAULT_EXPORT_PIXEL_RATIO,
            settle_delay: Duration::from_millis(DEFAULT_EXPORT_SETTLE_MS),
        }
    }
}

/// One captured, encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// File name, e.g. `poster-ff0000.png`.
    pub name: String,
    pub format: RasterFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Capture(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Capture(e) => e.retryable(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch export has no color variants")]
    NoVariants,
    #[error("variant {index} ({color}) failed: {source}")]
    Variant {
        index: usize,
        color: String,
        #[source]
        source: CaptureError,
    },
    #[error("archive packaging failed: {0}")]
    Archive(#[from] ArchiveError),
}

impl ErrorCode for BatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoVariants => "E_BATCH_NO_VARIANTS",
            Self::Variant { .. } => "E_BATCH_VARIANT_FAILED",
            Self::Archive(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Variant { source, .. } => source.retryable(),
            Self::NoVariants | Self::Archive(_) => false,
        }
    }
}

/// A batch request: the design name and its background-color variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchExportJob {
    design_name: String,
    variants: Vec<String>,
}

impl BatchExportJob {
    /// Build a job. Colors that resolve to the same file name (`#FF0000` and
    /// `#ff0000`, `rgb(0,0,0)` and `rgb(0, 0, 0)`) are dropped after the first,
    /// so every variant maps to a distinct archive entry.
    pub fn new<I, C>(design_name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique: Vec<String> = Vec::new();
        for color in variants {
            let color = color.into();
            if !seen.insert(color_slug(&color)) {
                debug!(%color, "duplicate batch variant dropped");
                continue;
            }
            unique.push(color);
        }
        Self { design_name: design_name.into(), variants: unique }
    }

    #[must_use]
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Download name of the archive, e.g. `poster.zip`.
    #[must_use]
    pub fn archive_name(&self) -> String {
        format!("{}.zip", slug_or(&self.design_name, "design"))
    }
}

/// Result of a successful batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchExport {
    /// One raster per variant, in variant order.
    pub rasters: Vec<Raster>,
    pub archive: Archive,
}

// =============================================================================
// NAMING
// =============================================================================

/// Lowercase `[a-z0-9]` runs joined by single dashes.
fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn slug_or(raw: &str, fallback: &str) -> String {
    let s = slug(raw);
    if s.is_empty() { fallback.to_string() } else { s }
}

/// File name for a single export: `<design>.png`.
#[must_use]
pub fn single_file_name(design_name: &str) -> String {
    format!("{}.{EXPORT_EXTENSION}", slug_or(design_name, "design"))
}

fn color_slug(color: &str) -> String {
    slug_or(color, "color")
}

/// File name for one batch variant: `<design>-<color>.png`.
///
/// `#FF0000` becomes `ff0000`; `rgb(0, 0, 0)` becomes `rgb-0-0-0`.
#[must_use]
pub fn export_file_name(design_name: &str, color: &str) -> String {
    format!("{}-{}.{EXPORT_EXTENSION}", slug_or(design_name, "design"), color_slug(color))
}

// =============================================================================
// RESTORE GUARD
// =============================================================================

/// Holds the scene and surface for the duration of an export and restores the
/// original board settings when dropped.
struct RestoreGuard<'a, S: RenderSurface + ?Sized> {
    scene: &'a mut Scene,
    surface: &'a mut S,
    saved: BoardSettings,
}

impl<'a, S: RenderSurface + ?Sized> RestoreGuard<'a, S> {
    fn new(scene: &'a mut Scene, surface: &'a mut S) -> Self {
        let saved = scene.settings.clone();
        Self { scene, surface, saved }
    }

    /// Submit the current scene and wait for it to reach the surface.
    async fn present(&mut self) {
        self.surface.render(&compose_frame(self.scene));
        self.surface.frame_rendered().await;
    }

    async fn capture(&mut self, name: String, options: &ExportOptions) -> Result<Raster, CaptureError> {
        let request = CaptureRequest::for_pixel_ratio(options.pixel_ratio);
        let bytes = self.surface.capture(request).await?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(Raster { name, format: request.format, width_px: request.width_px, height_px: request.height_px, bytes })
    }
}

impl<S: RenderSurface + ?Sized> Drop for RestoreGuard<'_, S> {
    fn drop(&mut self) {
        self.scene.settings.clone_from(&self.saved);
        self.surface.render(&compose_frame(self.scene));
        debug!(background = %self.saved.background, show_guides = self.saved.show_guides, "export state restored");
    }
}

// =============================================================================
// EXPORT
// =============================================================================

/// Capture the scene once with guide overlays hidden.
///
/// Overlay visibility is restored on every exit path.
///
/// # Errors
///
/// Returns `ExportError::Capture` if the surface fails to produce a raster.
pub async fn export_single<S: RenderSurface + ?Sized>(
    scene: &mut Scene,
    surface: &mut S,
    design_name: &str,
    options: &ExportOptions,
) -> Result<Raster, ExportError> {
    let mut guard = RestoreGuard::new(scene, surface);
    guard.scene.settings.show_guides = false;
    guard.present().await;

    let raster = guard.capture(single_file_name(design_name), options).await.inspect_err(|e| {
        warn!(error = %e, "single export failed");
    })?;

    info!(name = %raster.name, bytes = raster.bytes.len(), "single export finished");
    Ok(raster)
}

/// Capture one raster per background color in `job`, then zip them.
///
/// Fail-fast: the first failed capture aborts the batch and nothing captured
/// so far is returned. Background color and overlay visibility are restored
/// on every exit path, including cancellation by dropping the future.
///
/// # Errors
///
/// Returns `NoVariants` for an empty job, `Variant` for the first failed
/// capture, or `Archive` if packaging fails.
pub async fn export_batch<S: RenderSurface + ?Sized>(
    scene: &mut Scene,
    surface: &mut S,
    job: &BatchExportJob,
    options: &ExportOptions,
) -> Result<BatchExport, BatchError> {
    if job.variants().is_empty() {
        return Err(BatchError::NoVariants);
    }
    info!(design = job.design_name(), variants = job.variants().len(), "batch export started");

    let mut guard = RestoreGuard::new(scene, surface);
    guard.scene.settings.show_guides = false;

    let mut rasters = Vec::with_capacity(job.variants().len());
    for (index, color) in job.variants().iter().enumerate() {
        guard.scene.settings.background.clone_from(color);
        guard.present().await;
        if !options.settle_delay.is_zero() {
            tokio::time::sleep(options.settle_delay).await;
        }

        let name = export_file_name(job.design_name(), color);
        match guard.capture(name, options).await {
            Ok(raster) => {
                debug!(index, %color, name = %raster.name, "variant captured");
                rasters.push(raster);
            }
            Err(source) => {
                warn!(index, %color, error = %source, "variant capture failed; aborting batch");
                return Err(BatchError::Variant { index, color: color.clone(), source });
            }
        }
    }
    drop(guard);

    let archive = archive::pack(job.archive_name(), &rasters)?;
    info!(archive = %archive.file_name, entries = archive.entries.len(), "batch export finished");
    Ok(BatchExport { rasters, archive })
}
