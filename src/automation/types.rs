use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stable identifier derived from a node's attributes and tree position
/// (`node_<hex>`), reproducible across snapshots of an unchanged UI.
pub type NodeId = String;

/// Pixel rectangle in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    /// `L,T,R,B`, the form used in stable-id keys and rendered rows
    pub fn to_compact(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

/// Capability flags reported by the platform for a single element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeFlags {
    pub clickable: bool,
    pub long_clickable: bool,
    pub focusable: bool,
    pub scrollable: bool,
    pub editable: bool,
    pub enabled: bool,
    pub visible: bool,
}

impl NodeFlags {
    pub fn is_interactive(&self) -> bool {
        self.clickable || self.long_clickable || self.scrollable || self.editable
    }
}

/// Raw attributes read from one platform node, before an id is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttributes {
    pub class_name: Option<String>,
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub resource_id: Option<String>,
    pub bounds: Bounds,
    pub flags: NodeFlags,
}

/// Immutable snapshot of one UI element and its subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub class_name: Option<String>,
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub resource_id: Option<String>,
    pub bounds: Bounds,
    pub flags: NodeFlags,
    pub children: Vec<Arc<Node>>,
}

impl Node {
    pub fn from_attributes(id: NodeId, attrs: NodeAttributes, children: Vec<Arc<Node>>) -> Self {
        Self {
            id,
            class_name: attrs.class_name,
            text: attrs.text,
            content_description: attrs.content_description,
            resource_id: attrs.resource_id,
            bounds: attrs.bounds,
            flags: attrs.flags,
            children,
        }
    }

    /// Last dotted segment of the class name (`android.widget.Button` -> `Button`)
    pub fn simple_class_name(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .map(|c| c.rsplit('.').next().unwrap_or(c))
    }

    /// A node is meaningful when it carries content or can be interacted with.
    /// Structural containers fail this test but their children are still walked.
    pub fn is_meaningful(&self) -> bool {
        non_empty(&self.text)
            || non_empty(&self.content_description)
            || non_empty(&self.resource_id)
            || self.flags.is_interactive()
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(|c| c.subtree_len()).sum::<usize>()
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Window kind as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Application,
    InputMethod,
    System,
    AccessibilityOverlay,
    SplitScreenDivider,
    #[default]
    Unknown,
}

impl WindowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::InputMethod => "input_method",
            Self::System => "system",
            Self::AccessibilityOverlay => "accessibility_overlay",
            Self::SplitScreenDivider => "split_screen_divider",
            Self::Unknown => "unknown",
        }
    }
}

/// Window metadata, shared by platform windows and snapshot windows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowInfo {
    pub window_id: i32,
    pub window_type: WindowType,
    pub package_name: Option<String>,
    pub title: Option<String>,
    pub activity_name: Option<String>,
    pub layer: i32,
    pub focused: bool,
}

/// One window of a snapshot with its fully materialized tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub info: WindowInfo,
    pub tree: Arc<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

/// Display geometry captured alongside the windows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub width: i32,
    pub height: i32,
    pub density: f32,
    pub orientation: Orientation,
}

impl Default for ScreenInfo {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 2400,
            density: 2.625,
            orientation: Orientation::Portrait,
        }
    }
}

/// All windows captured by one builder pass
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub captured_at: DateTime<Utc>,
    pub windows: Vec<Window>,
    pub screen: ScreenInfo,
}

impl Snapshot {
    pub fn node_count(&self) -> usize {
        self.windows.iter().map(|w| w.tree.subtree_len()).sum()
    }
}

/// Structured view of a node returned by `find` and `resolve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: NodeId,
    pub window_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub bounds: Bounds,
    pub flags: NodeFlags,
}

impl ElementInfo {
    pub fn from_node(node: &Node, window_id: i32) -> Self {
        Self {
            id: node.id.clone(),
            window_id,
            class_name: node.class_name.clone(),
            text: node.text.clone(),
            content_description: node.content_description.clone(),
            resource_id: node.resource_id.clone(),
            bounds: node.bounds,
            flags: node.flags,
        }
    }
}
