//! In-memory accessibility provider
//!
//! Serves window trees described as JSON (or built in code) through the same
//! adapter seam a device backend uses. Handle releases and performed actions
//! are recorded so callers can observe what the engine did.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use super::{AccessibilityProvider, NativeNode, PlatformAction, PlatformError, PlatformWindow};
use crate::automation::types::{Bounds, NodeAttributes, NodeFlags, ScreenInfo, WindowInfo};

/// Serializable description of one node.
///
/// Nodes default to enabled and visible when `flags` is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureNode {
    pub class_name: Option<String>,
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub resource_id: Option<String>,
    pub bounds: Bounds,
    pub flags: NodeFlags,
    /// Simulates a child slot the platform fails to produce
    pub unavailable: bool,
    pub children: Vec<FixtureNode>,
}

impl Default for FixtureNode {
    fn default() -> Self {
        Self {
            class_name: None,
            text: None,
            content_description: None,
            resource_id: None,
            bounds: Bounds::default(),
            flags: NodeFlags {
                enabled: true,
                visible: true,
                ..Default::default()
            },
            unavailable: false,
            children: Vec::new(),
        }
    }
}

impl FixtureNode {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: Some(class_name.to_string()),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.content_description = Some(description.to_string());
        self
    }

    pub fn resource_id(mut self, resource_id: &str) -> Self {
        self.resource_id = Some(resource_id.to_string());
        self
    }

    pub fn bounds(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        self.bounds = Bounds::new(left, top, right, bottom);
        self
    }

    pub fn clickable(mut self) -> Self {
        self.flags.clickable = true;
        self
    }

    pub fn long_clickable(mut self) -> Self {
        self.flags.long_clickable = true;
        self
    }

    pub fn focusable(mut self) -> Self {
        self.flags.focusable = true;
        self
    }

    pub fn scrollable(mut self) -> Self {
        self.flags.scrollable = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.flags.editable = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.flags.enabled = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.flags.visible = false;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn child(mut self, child: FixtureNode) -> Self {
        self.children.push(child);
        self
    }

    fn to_attributes(&self) -> NodeAttributes {
        NodeAttributes {
            class_name: self.class_name.clone(),
            text: self.text.clone(),
            content_description: self.content_description.clone(),
            resource_id: self.resource_id.clone(),
            bounds: self.bounds,
            flags: self.flags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureWindow {
    #[serde(flatten)]
    pub info: WindowInfo,
    pub root: Option<FixtureNode>,
}

impl FixtureWindow {
    pub fn new(info: WindowInfo, root: FixtureNode) -> Self {
        Self {
            info,
            root: Some(root),
        }
    }
}

/// Top-level layout of a fixture file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureFile {
    pub screen: Option<ScreenInfo>,
    pub windows: Vec<FixtureWindow>,
    pub fallback: Option<FixtureWindow>,
}

/// Handle into a fixture tree, addressed by child-index path from the root
struct FixtureHandle {
    root: Arc<FixtureNode>,
    path: Vec<usize>,
    is_root: bool,
    released: Arc<AtomicUsize>,
}

impl FixtureHandle {
    fn node(&self) -> &FixtureNode {
        let mut node = self.root.as_ref();
        for &index in &self.path {
            node = &node.children[index];
        }
        node
    }
}

impl NativeNode for FixtureHandle {
    fn attributes(&self) -> NodeAttributes {
        self.node().to_attributes()
    }

    fn child_count(&self) -> usize {
        self.node().children.len()
    }

    fn child(&self, index: usize) -> Option<Box<dyn NativeNode>> {
        let child = self.node().children.get(index)?;
        if child.unavailable {
            return None;
        }
        let mut path = self.path.clone();
        path.push(index);
        Some(Box::new(FixtureHandle {
            root: Arc::clone(&self.root),
            path,
            is_root: false,
            released: Arc::clone(&self.released),
        }))
    }
}

impl Drop for FixtureHandle {
    fn drop(&mut self) {
        if !self.is_root {
            self.released.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Accessibility provider backed by in-memory fixture windows
pub struct FixtureProvider {
    screen: ScreenInfo,
    windows: RwLock<Vec<FixtureWindow>>,
    fallback: RwLock<Option<FixtureWindow>>,
    performed: Mutex<Vec<PlatformAction>>,
    released: Arc<AtomicUsize>,
    permission_denied: AtomicBool,
    node_actions_unsupported: AtomicBool,
    reject_reason: Mutex<Option<String>>,
    action_delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FixtureProvider {
    pub fn new(screen: ScreenInfo, windows: Vec<FixtureWindow>) -> Self {
        Self {
            screen,
            windows: RwLock::new(windows),
            fallback: RwLock::new(None),
            performed: Mutex::new(Vec::new()),
            released: Arc::new(AtomicUsize::new(0)),
            permission_denied: AtomicBool::new(false),
            node_actions_unsupported: AtomicBool::new(false),
            reject_reason: Mutex::new(None),
            action_delay: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Single application window wrapping `root`
    pub fn single_window(package_name: &str, root: FixtureNode) -> Self {
        let info = WindowInfo {
            window_id: 1,
            window_type: crate::automation::types::WindowType::Application,
            package_name: Some(package_name.to_string()),
            focused: true,
            ..Default::default()
        };
        Self::new(ScreenInfo::default(), vec![FixtureWindow::new(info, root)])
    }

    pub fn from_file(file: FixtureFile) -> Self {
        let provider = Self::new(file.screen.unwrap_or_default(), file.windows);
        provider.set_fallback(file.fallback);
        provider
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        let file: FixtureFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse fixture {}", path.display()))?;
        Ok(Self::from_file(file))
    }

    pub fn set_windows(&self, windows: Vec<FixtureWindow>) {
        *write(&self.windows) = windows;
    }

    pub fn set_fallback(&self, window: Option<FixtureWindow>) {
        *write(&self.fallback) = window;
    }

    pub fn set_permission_denied(&self, denied: bool) {
        self.permission_denied.store(denied, Ordering::SeqCst);
    }

    /// Every node action answers `Unsupported`; taps and gestures still succeed
    pub fn set_node_actions_unsupported(&self, unsupported: bool) {
        self.node_actions_unsupported.store(unsupported, Ordering::SeqCst);
    }

    pub fn set_reject_reason(&self, reason: Option<&str>) {
        *lock(&self.reject_reason) = reason.map(str::to_string);
    }

    pub fn set_action_delay(&self, delay: Duration) {
        *lock(&self.action_delay) = delay;
    }

    /// Actions that completed successfully, in order
    pub fn performed(&self) -> Vec<PlatformAction> {
        lock(&self.performed).clone()
    }

    /// Child handles released so far (root handles are never counted)
    pub fn released_handles(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Highest number of actions ever observed running at once
    pub fn max_concurrent_actions(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn check_permission(&self) -> Result<(), PlatformError> {
        if self.permission_denied.load(Ordering::SeqCst) {
            return Err(PlatformError::PermissionDenied(
                "accessibility service is not enabled".to_string(),
            ));
        }
        Ok(())
    }

    fn to_platform_window(&self, window: &FixtureWindow) -> PlatformWindow {
        let root = window.root.as_ref().map(|root| {
            Box::new(FixtureHandle {
                root: Arc::new(root.clone()),
                path: Vec::new(),
                is_root: true,
                released: Arc::clone(&self.released),
            }) as Box<dyn NativeNode>
        });
        PlatformWindow {
            info: window.info.clone(),
            root,
        }
    }
}

#[async_trait]
impl AccessibilityProvider for FixtureProvider {
    fn screen_info(&self) -> ScreenInfo {
        self.screen
    }

    async fn list_windows(&self) -> Result<Vec<PlatformWindow>, PlatformError> {
        self.check_permission()?;
        let windows = read(&self.windows);
        Ok(windows.iter().map(|w| self.to_platform_window(w)).collect())
    }

    async fn active_window(&self) -> Result<Option<PlatformWindow>, PlatformError> {
        self.check_permission()?;
        let fallback = read(&self.fallback);
        Ok(fallback.as_ref().map(|w| self.to_platform_window(w)))
    }

    async fn perform(&self, action: PlatformAction) -> Result<(), PlatformError> {
        self.check_permission()?;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        let delay = *lock(&self.action_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.complete(action)
    }
}

impl FixtureProvider {
    fn complete(&self, action: PlatformAction) -> Result<(), PlatformError> {
        if let Some(reason) = lock(&self.reject_reason).clone() {
            return Err(PlatformError::Rejected(reason));
        }

        if matches!(action, PlatformAction::Node { .. })
            && self.node_actions_unsupported.load(Ordering::SeqCst)
        {
            return Err(PlatformError::Unsupported);
        }

        lock(&self.performed).push(action);
        Ok(())
    }
}

/// Decrements the in-flight count even when the action future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
