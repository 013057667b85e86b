//! Bundled helper scripts.
//!
//! Small named functions evaluated with `this` bound to an element. Each
//! takes a fixed positional argument list and is forwarded unchanged.
//!
//! | Helper | Arguments | Returns |
//! |--------|-----------|---------|
//! | `visible` | none | `boolean` |
//! | `invisible` | none | `boolean` |
//! | `text` | none | `string` |
//! | `select` | `selectors: string[]` | nothing |
//! | `selectText` | `pattern: string` | nothing |
//! | `selectAllText` | none | nothing |
//! | `inputEvent` | none | nothing |
//! | `resource` | none | `string` (resolved source URL) |
//! | `overlay` | `id: string, message: string` | nothing |
//! | `removeOverlay` | `id: string` | nothing |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Helper
// ============================================================================

/// A named helper script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// Element is rendered and has a non-empty box.
    Visible,
    /// Negation of [`Helper::Visible`].
    Invisible,
    /// Visible text, or the value of form controls.
    Text,
    /// Select `<option>`s by text or CSS selector.
    Select,
    /// Select the first regex match inside an input's value.
    SelectText,
    /// Select the whole value of an input.
    SelectAllText,
    /// Dispatch `input` and `change` events.
    InputEvent,
    /// Wait for a media element to load and return its source URL.
    Resource,
    /// Draw a trace label next to the element.
    Overlay,
    /// Remove a trace label.
    RemoveOverlay,
}

impl Helper {
    /// Every bundled helper.
    pub const ALL: [Helper; 10] = [
        Helper::Visible,
        Helper::Invisible,
        Helper::Text,
        Helper::Select,
        Helper::SelectText,
        Helper::SelectAllText,
        Helper::InputEvent,
        Helper::Resource,
        Helper::Overlay,
        Helper::RemoveOverlay,
    ];

    /// Looks up a helper by its registry name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|helper| helper.name() == name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown helper script: {name}")))
    }

    /// Returns the registry name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Invisible => "invisible",
            Self::Text => "text",
            Self::Select => "select",
            Self::SelectText => "selectText",
            Self::SelectAllText => "selectAllText",
            Self::InputEvent => "inputEvent",
            Self::Resource => "resource",
            Self::Overlay => "overlay",
            Self::RemoveOverlay => "removeOverlay",
        }
    }

    /// Returns the number of positional arguments the helper expects.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Select | Self::SelectText | Self::RemoveOverlay => 1,
            Self::Overlay => 2,
            _ => 0,
        }
    }

    /// Returns the function source.
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::Visible => VISIBLE,
            Self::Invisible => INVISIBLE,
            Self::Text => TEXT,
            Self::Select => SELECT,
            Self::SelectText => SELECT_TEXT,
            Self::SelectAllText => SELECT_ALL_TEXT,
            Self::InputEvent => INPUT_EVENT,
            Self::Resource => RESOURCE,
            Self::Overlay => OVERLAY,
            Self::RemoveOverlay => REMOVE_OVERLAY,
        }
    }
}

impl fmt::Display for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Function Wrapping
// ============================================================================

/// Matches sources that are already a function (`function`, `async`, arrows).
static FUNCTION_SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(async\b|function\b|\(?[\w\s,]*\)?\s*=>)").expect("valid regex")
});

/// Builds a function declaration that keeps `this` and forwards arguments.
///
/// Function sources are applied with the caller's `this`; bare expressions
/// become the body of a function returning them.
#[must_use]
pub fn function_declaration(script: &str) -> String {
    if FUNCTION_SOURCE.is_match(script) {
        format!("function() {{ return ({script}).apply(this, arguments) }}")
    } else {
        format!("function() {{ return {script} }}")
    }
}

// ============================================================================
// Constants
// ============================================================================

const VISIBLE: &str = r#"function () {
    const box = this.getBoundingClientRect()
    const style = window.getComputedStyle(this)
    return style.display !== 'none' &&
        style.visibility !== 'hidden' &&
        !!(box.top || box.bottom || box.width || box.height)
}"#;

const INVISIBLE: &str = r#"function () {
    const box = this.getBoundingClientRect()
    const style = window.getComputedStyle(this)
    return !(style.display !== 'none' &&
        style.visibility !== 'hidden' &&
        !!(box.top || box.bottom || box.width || box.height))
}"#;

const TEXT: &str = r#"function () {
    switch (this.tagName) {
    case 'INPUT':
    case 'TEXTAREA':
        return this.value
    case 'SELECT':
        return Array.from(this.selectedOptions).map(el => el.innerText).join()
    default:
        return this.innerText
    }
}"#;

const SELECT: &str = r#"function (selectors) {
    selectors.forEach(s => {
        Array.from(this.options).find(el => {
            try {
                if (el.innerText.includes(s) || el.matches(s)) {
                    el.selected = true
                    return true
                }
            } catch (e) {}
        })
    })
    this.dispatchEvent(new Event('input', { bubbles: true }))
    this.dispatchEvent(new Event('change', { bubbles: true }))
}"#;

const SELECT_TEXT: &str = r#"function (pattern) {
    const m = this.value.match(new RegExp(pattern))
    if (m) {
        this.setSelectionRange(m.index, m.index + m[0].length)
    }
}"#;

const SELECT_ALL_TEXT: &str = r#"function () {
    this.select()
}"#;

const INPUT_EVENT: &str = r#"function () {
    this.dispatchEvent(new Event('input', { bubbles: true }))
    this.dispatchEvent(new Event('change', { bubbles: true }))
}"#;

const RESOURCE: &str = r#"function () {
    return new Promise((resolve, reject) => {
        if (this.complete) {
            return resolve(this.currentSrc)
        }
        this.addEventListener('load', () => resolve(this.currentSrc))
        this.addEventListener('error', (e) => reject(e))
    })
}"#;

const OVERLAY: &str = r#"function (id, msg) {
    const box = this.getBoundingClientRect()
    const div = document.createElement('div')
    div.id = id
    div.style = `position: fixed; z-index: 2147483647; pointer-events: none;
        left: ${box.left}px; top: ${box.top}px;
        width: ${box.width}px; height: ${box.height}px;
        border: 1px solid #e94560; background: rgba(233, 69, 96, 0.15);`
    const label = document.createElement('div')
    label.style = `position: absolute; top: -18px; left: 0; white-space: nowrap;
        font: 12px monospace; color: #fff; background: #e94560; padding: 0 4px;`
    label.innerText = msg
    div.appendChild(label)
    document.body.appendChild(div)
}"#;

const REMOVE_OVERLAY: &str = r#"function (id) {
    const el = document.getElementById(id)
    if (el) {
        el.remove()
    }
}"#;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips_every_helper() {
        for helper in Helper::ALL {
            assert_eq!(Helper::from_name(helper.name()).expect("known"), helper);
        }
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        let err = Helper::from_name("scrollIntoView").unwrap_err();
        assert!(err.to_string().contains("scrollIntoView"));
    }

    #[test]
    fn test_helper_sources_are_functions() {
        for helper in Helper::ALL {
            assert!(
                FUNCTION_SOURCE.is_match(helper.source()),
                "{helper} is not a function source"
            );
        }
    }

    #[test]
    fn test_function_declaration_wraps_expression() {
        assert_eq!(
            function_declaration("this.focus()"),
            "function() { return this.focus() }"
        );
    }

    #[test]
    fn test_function_declaration_applies_arrow() {
        assert_eq!(
            function_declaration("(n) => this.getAttribute(n)"),
            "function() { return ((n) => this.getAttribute(n)).apply(this, arguments) }"
        );
    }

    #[test]
    fn test_function_declaration_applies_bare_arrow_param() {
        let wrapped = function_declaration("s => this.matches(s)");
        assert!(wrapped.contains(".apply(this, arguments)"));
    }

    #[test]
    fn test_helper_arity() {
        assert_eq!(Helper::Select.arity(), 1);
        assert_eq!(Helper::Overlay.arity(), 2);
        assert_eq!(Helper::Visible.arity(), 0);
    }
}
