//! Driver: mounting, the control/feed cycle, and the host event loop.
//!
//! [`Driver`] owns the root node. Mounting binds the root's controls to a
//! dispatch that runs each mutation task to completion and then synchronizes
//! the whole tree from the root, performs the initial synchronize, and only
//! then attaches the root under the host primitive, so the first frame the
//! host shows is already populated.
//!
//! Cycles are never queued: every event handler starts its own cycle, and
//! overlapping cycles interleave at their suspension points. Synchronize is
//! idempotent and every node reads the model afresh, so the last pass to
//! finish leaves the view consistent with the model.

use std::cell::Cell;
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, error, trace};

use crate::error::{Error, Result};
use crate::property::Action;
use crate::target::{EventFuture, Handle, RenderTarget};
use crate::view::{Dispatch, Node};

/// Default minimum spacing between viewport-triggered synchronizations.
pub const DEFAULT_SYNC_THROTTLE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// DriverConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Driver`].
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Minimum time between two viewport-triggered synchronizations.
    pub sync_throttle: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sync_throttle: DEFAULT_SYNC_THROTTLE,
        }
    }
}

impl DriverConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport sync throttle (builder).
    pub fn with_sync_throttle(mut self, throttle: Duration) -> Self {
        self.sync_throttle = throttle;
        self
    }
}

// ---------------------------------------------------------------------------
// HostEvent
// ---------------------------------------------------------------------------

/// Work a host hands to [`Driver::run`].
pub enum HostEvent {
    /// A cycle already started by an event handler.
    Cycle(EventFuture),
    /// A mutation task from outside the tree, such as a timer or a reply.
    Dispatch(Action),
    /// The visible region changed; resynchronize if not throttled.
    ViewportChanged,
}

impl std::fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cycle(_) => f.write_str("Cycle(..)"),
            Self::Dispatch(_) => f.write_str("Dispatch(..)"),
            Self::ViewportChanged => f.write_str("ViewportChanged"),
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

struct Inner {
    root: Node,
    config: DriverConfig,
    cycles: Cell<u64>,
    bound: Cell<bool>,
    mounted: Cell<bool>,
    last_viewport_sync: Cell<Option<Instant>>,
}

impl Inner {
    async fn cycle(&self, task: Action) -> Result<()> {
        let cycle = self.cycles.get() + 1;
        self.cycles.set(cycle);
        debug!(cycle, "control cycle started");
        task.run().await?;
        self.root.synchronize().await?;
        trace!(cycle, "control cycle finished");
        Ok(())
    }

    async fn viewport_changed(&self) -> Result<bool> {
        let now = Instant::now();
        if let Some(last) = self.last_viewport_sync.get() {
            if now.duration_since(last) < self.config.sync_throttle {
                trace!("viewport sync throttled");
                return Ok(false);
            }
        }
        self.last_viewport_sync.set(Some(now));
        self.root.synchronize().await?;
        Ok(true)
    }
}

/// Owns a view tree and drives its control/feed cycle.
///
/// Cloning is cheap; clones share the same tree.
#[derive(Clone)]
pub struct Driver {
    inner: Rc<Inner>,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.inner.config)
            .field("cycles", &self.inner.cycles.get())
            .field("mounted", &self.inner.mounted.get())
            .finish()
    }
}

impl Driver {
    pub fn new(root: Node, config: DriverConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                root,
                config,
                cycles: Cell::new(0),
                bound: Cell::new(false),
                mounted: Cell::new(false),
                last_viewport_sync: Cell::new(None),
            }),
        }
    }

    pub fn root(&self) -> &Node {
        &self.inner.root
    }

    pub fn config(&self) -> &DriverConfig {
        &self.inner.config
    }

    /// Number of control cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.inner.cycles.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// A dispatch bound to this driver's tree.
    ///
    /// Holds the tree weakly: once every `Driver` clone is dropped, the
    /// returned dispatch fails with [`Error::Detached`].
    pub fn dispatcher(&self) -> Dispatch {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Dispatch::new(move |task: Action| {
            let weak = weak.clone();
            async move {
                let inner = weak.upgrade().ok_or(Error::Detached)?;
                inner.cycle(task).await
            }
        })
    }

    /// Bind controls, run the initial synchronize, then attach the root
    /// under `host`.
    ///
    /// Controls are bound on the first call only. When the initial
    /// synchronize fails nothing is attached and `mount` may be called again.
    ///
    /// # Panics
    ///
    /// When the driver is already mounted.
    pub async fn mount(&self, target: &dyn RenderTarget, host: Handle) -> Result<()> {
        assert!(!self.inner.mounted.get(), "driver mounted twice");
        if !self.inner.bound.replace(true) {
            self.inner.root.bind_control(&self.dispatcher());
        }
        self.inner.root.synchronize().await?;
        // A concurrent mount may have finished while this one was suspended.
        assert!(!self.inner.mounted.replace(true), "driver mounted twice");
        self.inner.last_viewport_sync.set(Some(Instant::now()));
        self.inner.root.renderable().append_to(target, host);
        debug!(?host, "view tree mounted");
        Ok(())
    }

    /// Run `task` to completion, then synchronize the whole tree.
    pub async fn dispatch(&self, task: Action) -> Result<()> {
        self.inner.cycle(task).await
    }

    /// Synchronize the whole tree without running a task.
    pub async fn synchronize(&self) -> Result<()> {
        self.inner.root.synchronize().await
    }

    /// Resynchronize after a viewport change, at most once per
    /// `sync_throttle`. Returns whether a pass ran.
    pub async fn notify_viewport_changed(&self) -> Result<bool> {
        self.inner.viewport_changed().await
    }

    /// Process host events until the sender side closes.
    ///
    /// Every event becomes its own task via [`tokio::task::spawn_local`], so
    /// this must run inside a [`tokio::task::LocalSet`]. Failed cycles are
    /// logged, not returned.
    pub async fn run(&self, mut events: UnboundedReceiver<HostEvent>) {
        while let Some(event) = events.recv().await {
            trace!(?event, "host event");
            let inner = Rc::clone(&self.inner);
            match event {
                HostEvent::Cycle(cycle) => {
                    tokio::task::spawn_local(report(cycle));
                }
                HostEvent::Dispatch(task) => {
                    tokio::task::spawn_local(report(async move { inner.cycle(task).await }));
                }
                HostEvent::ViewportChanged => {
                    tokio::task::spawn_local(report(async move {
                        inner.viewport_changed().await.map(drop)
                    }));
                }
            }
        }
        debug!("host event stream closed");
    }
}

async fn report(cycle: impl Future<Output = Result<()>>) {
    if let Err(err) = cycle.await {
        error!(%err, "control cycle failed");
    }
}

// ===========================================================================
// Tests
// ===========================================================================
