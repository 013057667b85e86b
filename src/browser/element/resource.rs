//! Binary payloads: canvas export, media resources, element screenshots.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use tracing::debug;
use url::Url;

use crate::browser::page::ImageFormat;
use crate::error::{Error, Result};
use crate::protocol::types::ResourceContent;
use crate::protocol::PageCommand;
use crate::scripts::Helper;
use crate::session::Domain;

use super::Element;

// ============================================================================
// Element - Resources
// ============================================================================

impl Element {
    /// Exports a `<canvas>` as image bytes.
    ///
    /// `format` is a MIME type such as `image/png`; `quality` applies to
    /// lossy formats only.
    pub async fn canvas_to_image(&self, format: &str, quality: f64) -> Result<Vec<u8>> {
        let result = self
            .eval(
                true,
                "(format, quality) => this.toDataURL(format, quality)",
                vec![format.into(), quality.into()],
            )
            .await?;
        let url = result
            .as_str()
            .ok_or_else(|| Error::malformed("canvas did not return a data URL"))?;
        decode_data_url(url)
    }

    /// Fetches the bytes of the resource shown by an `<img>`, `<video>` or
    /// similar element.
    ///
    /// Waits for the element to finish loading, then reads the resource
    /// from the page cache with the page agent enabled for the duration of
    /// the fetch.
    pub async fn resource(&self) -> Result<Vec<u8>> {
        let src = self.call_helper(Helper::Resource, vec![]).await?;
        let src = src
            .as_str()
            .ok_or_else(|| Error::malformed("element has no resource URL"))?;
        // The cache is keyed by the exact string the page reported.
        Url::parse(src)?;
        debug!(element_id = %self.inner.id, url = src, "Fetching element resource");

        let page = self.page().with_scope(self.scope.clone());
        let content: ResourceContent = page
            .with_domain(Domain::Page, || async {
                let frame_id = page.frame_id().await?;
                self.call(
                    PageCommand::GetResourceContent {
                        frame_id,
                        url: src.to_string(),
                    }
                    .into(),
                )
                .await
            })
            .await?;

        if content.base64_encoded {
            Ok(Base64Standard.decode(content.content)?)
        } else {
            Ok(content.content.into_bytes())
        }
    }

    /// Captures the element's box as image bytes.
    pub async fn screenshot(&self, format: ImageFormat) -> Result<Vec<u8>> {
        debug!(element_id = %self.inner.id, ?format, "Capturing element screenshot");

        self.wait_visible().await?;
        self.scroll_into_view().await?;
        let clip = self.bounding_box().await?.clip();

        self.page()
            .with_scope(self.scope.clone())
            .capture_screenshot(format, Some(clip))
            .await
    }
}

/// Decodes the payload of a base64 `data:` URL.
fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (_, payload) = url
        .split_once(',')
        .ok_or_else(|| Error::malformed("data URL has no payload"))?;
    Ok(Base64Standard.decode(payload)?)
}

// ============================================================================
// Tests
// ============================================================================
