//! Interaction sequences.
//!
//! Each action is a strictly ordered chain of steps; the first failing step
//! aborts the chain.
//!
//! | Action | Steps |
//! |--------|-------|
//! | `click` | wait visible, scroll, box, move mouse to center, button |
//! | `focus` | scroll, `this.focus()` |
//! | `press` | wait visible, focus, key |
//! | `input` | wait visible, focus, insert text, `input`/`change` events |
//! | `select` | wait visible, `select` helper |
//! | `select_text` | focus, `selectText` helper |
//! | `select_all_text` | focus, `selectAllText` helper |
//! | `set_files` | absolute paths, `DOM.setFileInputFiles` |

use std::path::{self, Path};

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::input::{Key, MouseButton};
use crate::protocol::DomCommand;
use crate::scripts::Helper;

use super::Element;

// ============================================================================
// Element - Actions
// ============================================================================

impl Element {
    /// Scrolls the element into view if it is not already visible.
    pub async fn scroll_into_view(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Scrolling element into view");
        self.traced("scroll into view", async {
            self.slow_motion().await?;
            self.call::<Value>(
                DomCommand::ScrollIntoViewIfNeeded {
                    object_id: self.object_id(),
                }
                .into(),
            )
            .await
            .map(drop)
        })
        .await
    }

    /// Clicks the center of the element with `button`.
    pub async fn click(&self, button: MouseButton) -> Result<()> {
        debug!(element_id = %self.inner.id, button = button.as_str(), "Clicking element");

        self.wait_visible().await?;
        self.scroll_into_view().await?;
        let point = self.bounding_box().await?.click_point();

        self.with_input(move |input| async move { input.move_mouse(point.x, point.y, 1).await })
            .await?;

        self.traced(&format!("{} click", button.as_str()), async {
            self.slow_motion().await?;
            self.with_input(move |input| async move { input.mouse_button(button).await })
                .await
        })
        .await
    }

    /// Focuses the element.
    pub async fn focus(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Focusing element");
        self.scroll_into_view().await?;
        self.eval(true, "this.focus()", vec![]).await.map(drop)
    }

    /// Removes focus from the element.
    pub async fn blur(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Blurring element");
        self.eval(true, "this.blur()", vec![]).await.map(drop)
    }

    /// Presses a key with the element focused.
    ///
    /// # Example
    ///
    /// ```ignore
    /// element.press(Key::Enter).await?;
    /// element.press('a'.into()).await?;
    /// ```
    pub async fn press(&self, key: Key) -> Result<()> {
        debug!(element_id = %self.inner.id, %key, "Pressing key");

        self.wait_visible().await?;
        self.focus().await?;

        self.traced(&format!("press {key}"), async {
            self.slow_motion().await?;
            self.with_input(move |input| async move { input.key(key).await })
                .await
        })
        .await
    }

    /// Types `text` into the element.
    ///
    /// Text is inserted at once, then `input` and `change` events are
    /// dispatched so page listeners observe the change.
    pub async fn input(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.inner.id, text_len = text.len(), "Inputting text");

        self.wait_visible().await?;
        self.focus().await?;

        self.traced(&format!("input {text}"), async {
            self.slow_motion().await?;
            let owned = text.to_string();
            self.with_input(move |input| async move { input.insert_text(&owned).await })
                .await?;
            self.call_helper(Helper::InputEvent, vec![]).await.map(drop)
        })
        .await
    }

    /// Selects the `<option>`s matching any of `selectors`, by text or CSS selector.
    pub async fn select<S>(&self, selectors: &[S]) -> Result<()>
    where
        S: AsRef<str>,
    {
        let selectors: Vec<String> = selectors.iter().map(|s| s.as_ref().to_string()).collect();
        debug!(element_id = %self.inner.id, count = selectors.len(), "Selecting options");

        self.wait_visible().await?;

        self.traced(&format!("select \"{}\"", selectors.join("; ")), async {
            self.slow_motion().await?;
            self.call_helper(Helper::Select, vec![selectors.clone().into()])
                .await
                .map(drop)
        })
        .await
    }

    /// Selects the first match of `pattern` (a JS regex) in the element's value.
    pub async fn select_text(&self, pattern: &str) -> Result<()> {
        debug!(element_id = %self.inner.id, pattern, "Selecting text");

        self.focus().await?;

        self.traced(&format!("select text: {pattern}"), async {
            self.slow_motion().await?;
            self.call_helper(Helper::SelectText, vec![pattern.into()])
                .await
                .map(drop)
        })
        .await
    }

    /// Selects the whole value of the element.
    pub async fn select_all_text(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Selecting all text");

        self.focus().await?;

        self.traced("select all text", async {
            self.slow_motion().await?;
            self.call_helper(Helper::SelectAllText, vec![])
                .await
                .map(drop)
        })
        .await
    }

    /// Assigns files to a file input.
    ///
    /// Relative paths are made absolute against the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if a path cannot be made absolute.
    pub async fn set_files<P>(&self, paths: &[P]) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let files = paths
            .iter()
            .map(|p| path::absolute(p.as_ref()).map(|abs| abs.to_string_lossy().into_owned()))
            .collect::<std::io::Result<Vec<_>>>()?;
        debug!(element_id = %self.inner.id, count = files.len(), "Setting files");

        self.traced(&format!("set files: {files:?}"), async {
            self.slow_motion().await?;
            self.call::<Value>(
                DomCommand::SetFileInputFiles {
                    files: files.clone(),
                    object_id: self.object_id(),
                }
                .into(),
            )
            .await
            .map(drop)
        })
        .await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use crate::error::Error;
    use crate::identifiers::ObjectId;
    use crate::input::{Key, MouseButton};
    use crate::session::Options;
    use crate::testing::{Harness, declaration, interactive};

    fn element(harness: &Harness) -> crate::Element {
        harness.session.page("S1").element_from_object(ObjectId::new("el"))
    }

    #[tokio::test]
    async fn test_click_sequence() {
        let harness = Harness::new(interactive);

        element(&harness).click(MouseButton::Left).await.expect("click");

        assert_eq!(
            harness.journal(),
            vec![
                "Runtime.callFunctionOn",
                "DOM.scrollIntoViewIfNeeded",
                "DOM.getBoxModel",
                "input:move 70,35,1",
                "input:button left",
            ]
        );
    }

    #[tokio::test]
    async fn test_click_aborts_on_failed_scroll() {
        let harness = Harness::new(|method, params| match method {
            "DOM.scrollIntoViewIfNeeded" => Err(Error::protocol(-32000, "Node is detached")),
            _ => interactive(method, params),
        });

        let err = element(&harness).click(MouseButton::Right).await.unwrap_err();

        assert!(err.is_server_error());
        assert!(harness.input.events().is_empty());
        assert_eq!(harness.client.count("DOM.getBoxModel"), 0);
    }

    #[tokio::test]
    async fn test_focus_scrolls_first() {
        let harness = Harness::new(interactive);

        element(&harness).focus().await.expect("focus");

        let calls = harness.client.calls();
        assert_eq!(calls[0].method, "DOM.scrollIntoViewIfNeeded");
        assert_eq!(declaration(&calls[1].params), "function() { return this.focus() }");
    }

    #[tokio::test]
    async fn test_press_after_focus() {
        let harness = Harness::new(interactive);

        element(&harness).press(Key::Enter).await.expect("press");

        let journal = harness.journal();
        assert_eq!(journal.last().map(String::as_str), Some("input:key Enter"));
        assert_eq!(harness.client.count("DOM.scrollIntoViewIfNeeded"), 1);
    }

    #[tokio::test]
    async fn test_input_dispatches_event_after_insert() {
        let harness = Harness::new(interactive);

        element(&harness).input("hello").await.expect("input");

        let journal = harness.journal();
        let insert = journal
            .iter()
            .position(|e| e == "input:text hello")
            .expect("text inserted");
        assert_eq!(journal.len(), insert + 2);
        let last = harness.client.params("Runtime.callFunctionOn");
        assert!(declaration(last.last().expect("event")).contains("new Event('input'"));
    }

    #[tokio::test]
    async fn test_select_passes_selectors_array() {
        let harness = Harness::new(interactive);

        element(&harness).select(&["Apple", "option[value=b]"]).await.expect("select");

        let params = harness.client.params("Runtime.callFunctionOn");
        assert_eq!(
            params.last().expect("select")["arguments"],
            json!([{"value": ["Apple", "option[value=b]"]}])
        );
    }

    #[tokio::test]
    async fn test_select_text_focuses_without_waiting() {
        let harness = Harness::new(interactive);

        element(&harness).select_text("\\d+").await.expect("select text");

        let calls = harness.client.calls();
        assert_eq!(calls[0].method, "DOM.scrollIntoViewIfNeeded");
        assert_eq!(calls.last().expect("helper").params["arguments"], json!([{"value": "\\d+"}]));
    }

    #[tokio::test]
    async fn test_set_files_makes_paths_absolute() {
        let harness = Harness::new(interactive);
        let dir = tempfile::tempdir().expect("tempdir");
        let absolute = dir.path().join("avatar.png");

        element(&harness)
            .set_files(&[absolute.clone(), "notes.txt".into()])
            .await
            .expect("set files");

        let params = &harness.client.params("DOM.setFileInputFiles")[0];
        let files: Vec<_> = params["files"]
            .as_array()
            .expect("files")
            .iter()
            .filter_map(|f| f.as_str())
            .collect();
        assert_eq!(files[0], absolute.to_string_lossy());
        assert!(std::path::Path::new(files[1]).is_absolute());
        assert!(files[1].ends_with("notes.txt"));
        assert_eq!(params["objectId"], "el");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_motion_before_button() {
        let harness = Harness::with_options(
            interactive,
            Options::new().with_slow_motion(Duration::from_millis(100)),
        );
        let started = tokio::time::Instant::now();

        element(&harness).click(MouseButton::Left).await.expect("click");

        // scroll and button each wait once
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_blur() {
        let harness = Harness::new(interactive);
        element(&harness).blur().await.expect("blur");
        assert_eq!(
            declaration(&harness.client.params("Runtime.callFunctionOn")[0]),
            "function() { return this.blur() }"
        );
    }
}
