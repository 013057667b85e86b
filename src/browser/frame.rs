//! Frame resolution.
//!
//! A remote handle is only valid in the JS runtime that issued it, and a
//! node id may belong to an element living inside a nested iframe. The
//! search below walks the iframes of a frame context depth-first, in
//! document order, and reports the first context that resolves the node.
//!
//! The walk never mutates anything. It returns a [`Resolution`] that the
//! caller applies once. Every iframe handle it obtains is released before
//! it returns, except the handle owning the matched context.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{NodeId, ObjectId};

// ============================================================================
// FrameContext
// ============================================================================

/// A frame whose runtime can hold remote handles.
#[async_trait]
pub trait FrameContext: Send + Sync + Sized {
    /// Returns `true` if `object_id` belongs to this context's runtime.
    async fn has_object(&self, object_id: &ObjectId) -> Result<bool>;

    /// Handles of the `iframe` elements of this frame, in document order.
    async fn iframes(&self) -> Result<Vec<ObjectId>>;

    /// Context of the frame owned by `iframe`, a handle from [`iframes`](Self::iframes).
    async fn nested(&self, iframe: ObjectId) -> Result<Self>;

    /// Resolves `node_id` to a handle in this context, `None` if it lives elsewhere.
    async fn resolve_node(&self, node_id: NodeId) -> Result<Option<ObjectId>>;

    /// Releases a handle issued by this context.
    async fn release(&self, object_id: &ObjectId) -> Result<()>;

    /// Releases the handles this context cached for itself.
    ///
    /// Called on every nested context the search leaves behind.
    async fn dispose(&self) -> Result<()>;
}

// ============================================================================
// Resolution
// ============================================================================

/// Outcome of locating the frame that owns a node.
#[derive(Debug)]
pub enum Resolution<F> {
    /// The handle is already valid in the current context.
    Current,
    /// The node lives in `frame`, reachable as `object_id`.
    Found {
        /// Context owning the node.
        frame: F,
        /// Handle for the node inside `frame`.
        object_id: ObjectId,
    },
    /// No reachable frame resolves the node.
    NotFound,
}

impl<F> Resolution<F> {
    /// Turns [`Resolution::NotFound`] into [`Error::NotFoundInAnyFrame`].
    ///
    /// Returns `None` for [`Resolution::Current`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFoundInAnyFrame`] when the search was exhausted.
    pub fn require(self, node_id: NodeId) -> Result<Option<(F, ObjectId)>> {
        match self {
            Self::Current => Ok(None),
            Self::Found { frame, object_id } => Ok(Some((frame, object_id))),
            Self::NotFound => Err(Error::not_found_in_any_frame(node_id)),
        }
    }

    /// Returns `true` if a match was found in another context.
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Internal walk result. Kept apart from errors so "stop" never looks like "failed".
enum Walk<F> {
    Found { frame: F, object_id: ObjectId },
    Exhausted,
}

/// Result of examining one iframe.
enum Visit<F> {
    Matched { frame: F, object_id: ObjectId },
    Descended(Walk<F>),
}

// ============================================================================
// Search
// ============================================================================

/// Locates the context owning `node_id`, starting from `current`.
///
/// If `object_id` is already valid in `current`, nothing is searched.
///
/// # Errors
///
/// Propagates protocol failures. A failed release after a failed visit is
/// combined with the visit error.
pub async fn locate<F: FrameContext>(
    current: &F,
    object_id: Option<&ObjectId>,
    node_id: NodeId,
) -> Result<Resolution<F>> {
    if let Some(object_id) = object_id
        && current.has_object(object_id).await?
    {
        return Ok(Resolution::Current);
    }

    match search(current, node_id).await? {
        Walk::Found { frame, object_id } => Ok(Resolution::Found { frame, object_id }),
        Walk::Exhausted => Ok(Resolution::NotFound),
    }
}

fn search<F: FrameContext>(ctx: &F, node_id: NodeId) -> BoxFuture<'_, Result<Walk<F>>> {
    async move {
        let mut pending = ctx.iframes().await?.into_iter();

        while let Some(iframe) = pending.next() {
            trace!(node_id = %node_id, iframe = %iframe, "Visiting iframe");

            match visit(ctx, iframe.clone(), node_id).await {
                Ok(Visit::Matched { frame, object_id }) => {
                    release_quietly(ctx, pending).await;
                    return Ok(Walk::Found { frame, object_id });
                }
                Ok(Visit::Descended(found @ Walk::Found { .. })) => {
                    release_quietly(ctx, std::iter::once(iframe).chain(pending)).await;
                    return Ok(found);
                }
                Ok(Visit::Descended(Walk::Exhausted)) => {
                    if let Err(e) = ctx.release(&iframe).await {
                        release_quietly(ctx, pending).await;
                        return Err(e);
                    }
                }
                Err(e) => {
                    let released = ctx.release(&iframe).await;
                    release_quietly(ctx, pending).await;
                    return Err(match released {
                        Ok(()) => e,
                        Err(release) => Error::release(e, release),
                    });
                }
            }
        }

        Ok(Walk::Exhausted)
    }
    .boxed()
}

async fn visit<F: FrameContext>(ctx: &F, iframe: ObjectId, node_id: NodeId) -> Result<Visit<F>> {
    let nested = ctx.nested(iframe).await?;
    let resolved = nested.resolve_node(node_id).await;
    let outcome = match resolved {
        Ok(Some(object_id)) => {
            return Ok(Visit::Matched {
                frame: nested,
                object_id,
            });
        }
        Ok(None) => search(&nested, node_id).await.map(Visit::Descended),
        Err(e) => Err(e),
    };

    // Only the matched context outlives the walk.
    match (outcome, nested.dispose().await) {
        (outcome, Ok(())) => outcome,
        (Ok(Visit::Descended(Walk::Exhausted)), Err(e)) => Err(e),
        (Ok(found), Err(e)) => {
            warn!(error = %e, "Failed to dispose frame context");
            Ok(found)
        }
        (Err(e), Err(release)) => Err(Error::release(e, release)),
    }
}

/// Releases handles whose failure must not hide the walk's outcome.
async fn release_quietly<F: FrameContext>(ctx: &F, handles: impl Iterator<Item = ObjectId>) {
    for handle in handles {
        if let Err(e) = ctx.release(&handle).await {
            warn!(iframe = %handle, error = %e, "Failed to release iframe handle");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use parking_lot::Mutex;

    /// Frame tree stored as an arena of nodes.
    #[derive(Debug)]
    struct Arena {
        frames: Vec<ArenaFrame>,
        target: Option<usize>,
        visits: Mutex<Vec<&'static str>>,
        releases: Mutex<Vec<String>>,
        disposed: Mutex<Vec<&'static str>>,
        fail_release: Option<&'static str>,
        fail_nested: Option<&'static str>,
    }

    #[derive(Debug)]
    struct ArenaFrame {
        name: &'static str,
        children: Vec<usize>,
    }

    impl Arena {
        /// `top` is index 0.
        fn new(frames: Vec<(&'static str, Vec<usize>)>, target: Option<&str>) -> Arc<Self> {
            let target = target.and_then(|t| frames.iter().position(|(n, _)| *n == t));
            Arc::new(Self {
                frames: frames
                    .into_iter()
                    .map(|(name, children)| ArenaFrame { name, children })
                    .collect(),
                target,
                visits: Mutex::new(Vec::new()),
                releases: Mutex::new(Vec::new()),
                disposed: Mutex::new(Vec::new()),
                fail_release: None,
                fail_nested: None,
            })
        }
    }

    #[derive(Debug)]
    struct Ctx {
        arena: Arc<Arena>,
        index: usize,
    }

    fn handle(arena: &Arena, index: usize) -> ObjectId {
        ObjectId::new(format!("iframe-{}", arena.frames[index].name))
    }

    fn index_of(arena: &Arena, id: &ObjectId) -> usize {
        arena
            .frames
            .iter()
            .position(|f| id.as_str() == format!("iframe-{}", f.name))
            .expect("known handle")
    }

    #[async_trait]
    impl FrameContext for Ctx {
        async fn has_object(&self, object_id: &ObjectId) -> Result<bool> {
            Ok(object_id.as_str() == format!("obj-{}", self.arena.frames[self.index].name))
        }

        async fn iframes(&self) -> Result<Vec<ObjectId>> {
            Ok(self.arena.frames[self.index]
                .children
                .iter()
                .map(|&i| handle(&self.arena, i))
                .collect())
        }

        async fn nested(&self, iframe: ObjectId) -> Result<Self> {
            let index = index_of(&self.arena, &iframe);
            let name = self.arena.frames[index].name;
            self.arena.visits.lock().push(name);
            if self.arena.fail_nested == Some(name) {
                return Err(Error::protocol(-32000, "frame detached"));
            }
            Ok(Ctx {
                arena: Arc::clone(&self.arena),
                index,
            })
        }

        async fn resolve_node(&self, _node_id: NodeId) -> Result<Option<ObjectId>> {
            Ok((self.arena.target == Some(self.index))
                .then(|| ObjectId::new(format!("obj-{}", self.arena.frames[self.index].name))))
        }

        async fn release(&self, object_id: &ObjectId) -> Result<()> {
            self.arena.releases.lock().push(object_id.to_string());
            if self.arena.fail_release.is_some_and(|n| object_id.as_str() == format!("iframe-{n}")) {
                return Err(Error::protocol(-32000, "release failed"));
            }
            Ok(())
        }

        async fn dispose(&self) -> Result<()> {
            self.arena.disposed.lock().push(self.arena.frames[self.index].name);
            Ok(())
        }
    }

    fn top(arena: &Arc<Arena>) -> Ctx {
        Ctx {
            arena: Arc::clone(arena),
            index: 0,
        }
    }

    /// top[A, B], A[A1], B[B1]
    fn two_level() -> Vec<(&'static str, Vec<usize>)> {
        vec![
            ("top", vec![1, 3]),
            ("A", vec![2]),
            ("A1", vec![]),
            ("B", vec![4]),
            ("B1", vec![]),
        ]
    }

    #[tokio::test]
    async fn test_current_context_short_circuits() {
        let arena = Arena::new(two_level(), Some("B1"));
        let resolution = locate(&top(&arena), Some(&ObjectId::new("obj-top")), NodeId::new(9))
            .await
            .expect("locate");

        assert!(matches!(resolution, Resolution::Current));
        assert!(arena.visits.lock().is_empty());
    }

    #[tokio::test]
    async fn test_depth_first_document_order() {
        crate::testing::init_tracing();
        let arena = Arena::new(two_level(), Some("B1"));
        let resolution = locate(&top(&arena), Some(&ObjectId::new("stale")), NodeId::new(9))
            .await
            .expect("locate");

        assert_eq!(*arena.visits.lock(), vec!["A", "A1", "B", "B1"]);
        let Resolution::Found { frame, object_id } = resolution else {
            panic!("Expected Found");
        };
        assert_eq!(arena.frames[frame.index].name, "B1");
        assert_eq!(object_id, ObjectId::new("obj-B1"));
    }

    #[tokio::test]
    async fn test_matched_handle_is_never_released() {
        let arena = Arena::new(two_level(), Some("B1"));
        locate(&top(&arena), None, NodeId::new(9)).await.expect("locate");

        let releases = arena.releases.lock().clone();
        assert_eq!(releases.len(), 3);
        assert!(!releases.contains(&"iframe-B1".to_string()));
        assert_eq!(releases, vec!["iframe-A1", "iframe-A", "iframe-B"]);
    }

    #[tokio::test]
    async fn test_every_context_but_the_match_is_disposed() {
        let arena = Arena::new(two_level(), Some("B1"));
        locate(&top(&arena), None, NodeId::new(9)).await.expect("locate");

        assert_eq!(*arena.disposed.lock(), vec!["A1", "A", "B"]);
    }

    #[tokio::test]
    async fn test_exhausted_search_disposes_all_contexts() {
        let arena = Arena::new(two_level(), None);
        locate(&top(&arena), None, NodeId::new(9)).await.expect("locate");

        assert_eq!(*arena.disposed.lock(), vec!["A1", "A", "B1", "B"]);
    }

    #[tokio::test]
    async fn test_first_match_stops_search() {
        // top[A, B]: A matches, B is never visited but still released.
        let arena = Arena::new(
            vec![("top", vec![1, 2]), ("A", vec![]), ("B", vec![])],
            Some("A"),
        );
        let resolution = locate(&top(&arena), None, NodeId::new(1)).await.expect("locate");

        assert!(resolution.is_found());
        assert_eq!(*arena.visits.lock(), vec!["A"]);
        assert_eq!(*arena.releases.lock(), vec!["iframe-B"]);
    }

    #[tokio::test]
    async fn test_exhausted_search_is_not_found() {
        let arena = Arena::new(two_level(), None);
        let resolution = locate(&top(&arena), None, NodeId::new(5)).await.expect("locate");

        assert!(matches!(resolution, Resolution::NotFound));
        assert_eq!(arena.releases.lock().len(), 4);

        let err = resolution.require(NodeId::new(5)).unwrap_err();
        assert!(matches!(err, Error::NotFoundInAnyFrame { node_id } if node_id == NodeId::new(5)));
    }

    #[tokio::test]
    async fn test_failed_visit_releases_and_combines() {
        let mut arena = Arena::new(
            vec![("top", vec![1, 2]), ("A", vec![]), ("B", vec![])],
            Some("B"),
        );
        {
            let arena = Arc::get_mut(&mut arena).expect("unique");
            arena.fail_nested = Some("A");
            arena.fail_release = Some("A");
        }

        let err = locate(&top(&arena), None, NodeId::new(1)).await.unwrap_err();

        assert!(matches!(err, Error::Release { .. }));
        assert!(err.to_string().contains("frame detached"));
        assert_eq!(*arena.releases.lock(), vec!["iframe-A", "iframe-B"]);
    }

    #[tokio::test]
    async fn test_release_failure_on_found_path_is_logged() {
        let mut arena = Arena::new(two_level(), Some("B1"));
        Arc::get_mut(&mut arena).expect("unique").fail_release = Some("B");

        let resolution = locate(&top(&arena), None, NodeId::new(9)).await.expect("locate");
        assert!(resolution.is_found());
    }
}
