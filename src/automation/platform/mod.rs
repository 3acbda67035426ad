use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::gesture::GesturePath;
use super::types::{Node, NodeAttributes, ScreenInfo, WindowInfo};

pub mod fixture;

/// Errors reported by a platform adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("automation capability unavailable: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Rejected(String),

    #[error("action not supported by this adapter")]
    Unsupported,

    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

/// Live handle to one node of the platform tree.
///
/// A boxed handle returned by [`NativeNode::child`] is owned by the walker for
/// exactly as long as it needs the node; dropping the box releases the
/// underlying platform resource. Root handles stay owned by whoever listed
/// the window.
pub trait NativeNode: Send {
    fn attributes(&self) -> NodeAttributes;

    fn child_count(&self) -> usize;

    /// `None` when the platform cannot produce the child at this slot
    fn child(&self, index: usize) -> Option<Box<dyn NativeNode>>;
}

/// Window listed by the adapter, with its root handle if one is available
pub struct PlatformWindow {
    pub info: WindowInfo,
    pub root: Option<Box<dyn NativeNode>>,
}

/// Accessibility action performed directly on a resolved node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    Click,
    LongClick,
    SetText(String),
    ShowOnScreen,
    ScrollForward,
    ScrollBackward,
}

impl NodeAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::LongClick => "long_click",
            Self::SetText(_) => "set_text",
            Self::ShowOnScreen => "show_on_screen",
            Self::ScrollForward => "scroll_forward",
            Self::ScrollBackward => "scroll_backward",
        }
    }
}

/// System-wide navigation actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalAction {
    Back,
    Home,
    Recents,
    Notifications,
}

/// A single device interaction handed to the adapter by the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformAction {
    Node {
        window_id: i32,
        node: Arc<Node>,
        action: NodeAction,
    },
    Tap {
        x: i32,
        y: i32,
        duration_ms: u64,
    },
    Gesture(Vec<GesturePath>),
    Global(GlobalAction),
}

/// Platform-specific accessibility provider.
/// Abstracts the OS accessibility service behind a common interface.
#[async_trait]
pub trait AccessibilityProvider: Send + Sync {
    /// Current display geometry
    fn screen_info(&self) -> ScreenInfo;

    /// All interactive windows, front-most first
    async fn list_windows(&self) -> Result<Vec<PlatformWindow>, PlatformError>;

    /// The active window alone, used when the window list is empty or unusable
    async fn active_window(&self) -> Result<Option<PlatformWindow>, PlatformError>;

    /// Execute one device interaction and wait for it to complete
    async fn perform(&self, action: PlatformAction) -> Result<(), PlatformError>;
}
