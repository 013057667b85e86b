//! Screenshot capture methods.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::types::CaptureScreenshotResult;
use crate::protocol::{PageCommand, Viewport};

use super::Page;

// ============================================================================
// Types
// ============================================================================

/// Image format for screenshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format with quality (0-100).
    Jpeg(u8),
    /// WebP format with quality (0-100).
    Webp(u8),
}

impl ImageFormat {
    /// Creates JPEG format with quality (0-100).
    #[inline]
    #[must_use]
    pub fn jpeg(quality: u8) -> Self {
        Self::Jpeg(quality.min(100))
    }

    /// Creates WebP format with quality (0-100).
    #[inline]
    #[must_use]
    pub fn webp(quality: u8) -> Self {
        Self::Webp(quality.min(100))
    }

    /// Returns the MIME type for this format.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg(_) => "image/jpeg",
            Self::Webp(_) => "image/webp",
        }
    }

    /// Returns the format string for the protocol.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg(_) => "jpeg",
            Self::Webp(_) => "webp",
        }
    }

    /// Returns the quality of lossy formats.
    #[must_use]
    pub fn quality(&self) -> Option<u8> {
        match self {
            Self::Png => None,
            Self::Jpeg(q) | Self::Webp(q) => Some(*q),
        }
    }
}

// ============================================================================
// ScreenshotBuilder
// ============================================================================

/// Builder for configuring and capturing screenshots.
///
/// Capture always runs on the top-level page of the target.
///
/// # Example
///
/// ```ignore
/// let png = page.screenshot().capture_bytes().await?;
/// page.screenshot().jpeg(80).save("page.jpg").await?;
/// ```
pub struct ScreenshotBuilder<'a> {
    page: &'a Page,
    format: ImageFormat,
    clip: Option<Viewport>,
}

impl<'a> ScreenshotBuilder<'a> {
    pub(crate) fn new(page: &'a Page) -> Self {
        Self {
            page,
            format: ImageFormat::Png,
            clip: None,
        }
    }

    /// Sets PNG format (default).
    #[must_use]
    pub fn png(mut self) -> Self {
        self.format = ImageFormat::Png;
        self
    }

    /// Sets JPEG format with quality (0-100).
    #[must_use]
    pub fn jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::jpeg(quality);
        self
    }

    /// Sets the image format.
    #[must_use]
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Restricts the capture to a region.
    #[must_use]
    pub fn clip(mut self, clip: Viewport) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Captures the screenshot and returns base64-encoded data.
    pub async fn capture(&self) -> Result<String> {
        let root = self.page.root().with_scope(self.page.scope.clone());
        debug!(
            session_id = %root.session_id(),
            format = ?self.format,
            clip = ?self.clip,
            "Capturing screenshot"
        );

        let result: CaptureScreenshotResult = root
            .call(
                PageCommand::CaptureScreenshot {
                    format: self.format.as_str().to_string(),
                    quality: self.format.quality(),
                    clip: self.clip,
                }
                .into(),
            )
            .await?;

        Ok(result.data)
    }

    /// Captures the screenshot and returns raw bytes.
    pub async fn capture_bytes(&self) -> Result<Vec<u8>> {
        let data = self.capture().await?;
        Ok(Base64Standard.decode(data)?)
    }

    /// Captures the screenshot and saves it to a file.
    ///
    /// The format is determined by the builder settings, not the file extension.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.capture_bytes().await?;
        tokio::fs::write(path.as_ref(), bytes).await.map_err(Error::Io)
    }
}

// ============================================================================
// Page - Screenshot
// ============================================================================

impl Page {
    /// Creates a screenshot builder.
    #[must_use]
    pub fn screenshot(&self) -> ScreenshotBuilder<'_> {
        ScreenshotBuilder::new(self)
    }

    /// Captures the page, or `clip` of it, as decoded image bytes.
    pub async fn capture_screenshot(
        &self,
        format: ImageFormat,
        clip: Option<Viewport>,
    ) -> Result<Vec<u8>> {
        let builder = self.screenshot().format(format);
        match clip {
            Some(clip) => builder.clip(clip).capture_bytes().await,
            None => builder.capture_bytes().await,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
