//! Single-writer action dispatch
//!
//! Every device interaction goes through one mutex so concurrent callers queue
//! instead of interleaving input. Waiting for the mutex and waiting for the
//! platform are both bounded. Validation runs before either wait.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};

use super::cache::NodeCache;
use super::gesture::{self, GesturePath};
use super::platform::{AccessibilityProvider, GlobalAction, NodeAction, PlatformAction, PlatformError};
use super::types::NodeId;
use crate::error::{AppError, Result};

pub const TAP_DURATION_MS: u64 = 50;
pub const LONG_PRESS_DURATION_MS: u64 = 600;

/// What an action is aimed at: a node from the latest snapshot or a screen point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Element { id: NodeId },
    Point { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// A caller-level UI action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Click {
        target: Target,
    },
    LongClick {
        target: Target,
    },
    SetText {
        id: NodeId,
        text: String,
    },
    ScrollIntoView {
        id: NodeId,
    },
    Scroll {
        id: NodeId,
        direction: ScrollDirection,
    },
    Swipe {
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
        duration_ms: i64,
    },
    Pinch {
        center_x: f64,
        center_y: f64,
        scale: f64,
        duration_ms: i64,
    },
    Gesture {
        paths: Vec<GesturePath>,
    },
    Global {
        global: GlobalAction,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::LongClick { .. } => "long_click",
            Self::SetText { .. } => "set_text",
            Self::ScrollIntoView { .. } => "scroll_into_view",
            Self::Scroll { .. } => "scroll",
            Self::Swipe { .. } => "swipe",
            Self::Pinch { .. } => "pinch",
            Self::Gesture { .. } => "gesture",
            Self::Global { .. } => "global",
        }
    }
}

/// Lifecycle of the most recent action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Idle,
    Dispatching,
    Succeeded,
    Failed,
}

/// Result of a completed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
    /// Element action replaced by a coordinate tap at the element's centre
    pub used_fallback: bool,
    pub duration_ms: u64,
}

/// Validated action, ready to be resolved under the mutex
#[derive(Debug, Clone)]
enum Plan {
    Node {
        id: NodeId,
        action: NodeAction,
        fallback_press_ms: Option<u64>,
    },
    Tap {
        x: i32,
        y: i32,
        duration_ms: u64,
    },
    Gesture(Vec<GesturePath>),
    Global(GlobalAction),
}

fn plan(action: &Action) -> Result<Plan> {
    let plan = match action {
        Action::Click { target } => plan_press(target, NodeAction::Click, TAP_DURATION_MS)?,
        Action::LongClick { target } => {
            plan_press(target, NodeAction::LongClick, LONG_PRESS_DURATION_MS)?
        }
        Action::SetText { id, text } => Plan::Node {
            id: require_id(id)?,
            action: NodeAction::SetText(text.clone()),
            fallback_press_ms: None,
        },
        Action::ScrollIntoView { id } => Plan::Node {
            id: require_id(id)?,
            action: NodeAction::ShowOnScreen,
            fallback_press_ms: None,
        },
        Action::Scroll { id, direction } => Plan::Node {
            id: require_id(id)?,
            action: match direction {
                ScrollDirection::Forward => NodeAction::ScrollForward,
                ScrollDirection::Backward => NodeAction::ScrollBackward,
            },
            fallback_press_ms: None,
        },
        Action::Swipe {
            from_x,
            from_y,
            to_x,
            to_y,
            duration_ms,
        } => Plan::Gesture(gesture::swipe_path(
            (*from_x, *from_y),
            (*to_x, *to_y),
            *duration_ms,
        )?),
        Action::Pinch {
            center_x,
            center_y,
            scale,
            duration_ms,
        } => Plan::Gesture(gesture::pinch_paths(*center_x, *center_y, *scale, *duration_ms)?),
        Action::Gesture { paths } => {
            gesture::validate_paths(paths)?;
            Plan::Gesture(paths.clone())
        }
        Action::Global { global } => Plan::Global(*global),
    };
    Ok(plan)
}

fn plan_press(target: &Target, action: NodeAction, press_ms: u64) -> Result<Plan> {
    match target {
        Target::Element { id } => Ok(Plan::Node {
            id: require_id(id)?,
            action,
            fallback_press_ms: Some(press_ms),
        }),
        Target::Point { x, y } => {
            if *x < 0 || *y < 0 {
                return Err(AppError::InvalidParams(format!(
                    "coordinates must be non-negative, got ({}, {})",
                    x, y
                )));
            }
            Ok(Plan::Tap {
                x: *x,
                y: *y,
                duration_ms: press_ms,
            })
        }
    }
}

fn require_id(id: &str) -> Result<NodeId> {
    if id.trim().is_empty() {
        return Err(AppError::InvalidParams("element id must not be empty".to_string()));
    }
    Ok(id.to_string())
}

/// Marks the action failed if the dispatch task ends without reporting
struct DispatchGuard<'a> {
    state: &'a watch::Sender<ActionState>,
    finished: bool,
}

impl DispatchGuard<'_> {
    fn finish(mut self, state: ActionState) {
        self.state.send_replace(state);
        self.finished = true;
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.send_replace(ActionState::Failed);
        }
    }
}

/// State owned jointly by the dispatcher and its in-flight task
struct Shared {
    provider: Arc<dyn AccessibilityProvider>,
    cache: Arc<NodeCache>,
    slot: Arc<Mutex<()>>,
    state: watch::Sender<ActionState>,
    action_timeout: Duration,
}

/// Executes one UI action at a time against the platform.
///
/// The slot is held by a spawned task, not by the caller. A caller that gives
/// up stops waiting, but the slot stays taken until the device action ends.
pub struct ActionDispatcher {
    shared: Arc<Shared>,
    acquire_timeout: Duration,
}

impl ActionDispatcher {
    pub fn new(
        provider: Arc<dyn AccessibilityProvider>,
        cache: Arc<NodeCache>,
        acquire_timeout: Duration,
        action_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(ActionState::Idle);
        Self {
            shared: Arc::new(Shared {
                provider,
                cache,
                slot: Arc::new(Mutex::new(())),
                state,
                action_timeout,
            }),
            acquire_timeout,
        }
    }

    pub fn state(&self) -> ActionState {
        *self.shared.state.borrow()
    }

    /// Validate, wait for the dispatcher slot, resolve the target, perform.
    pub async fn perform(&self, action: &Action) -> Result<ActionOutcome> {
        let name = action.name();
        let plan = plan(action)?;

        let started = Instant::now();
        let slot = tokio::time::timeout(
            self.acquire_timeout,
            Arc::clone(&self.shared.slot).lock_owned(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                "Dispatcher busy: {} gave up after {:?}",
                name,
                self.acquire_timeout
            );
            AppError::DispatcherBusy {
                waited_ms: self.acquire_timeout.as_millis() as u64,
            }
        })?;

        self.shared.state.send_replace(ActionState::Dispatching);
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let guard = DispatchGuard {
                state: &shared.state,
                finished: false,
            };
            let result = shared.dispatch(name, plan).await;
            guard.finish(if result.is_ok() {
                ActionState::Succeeded
            } else {
                ActionState::Failed
            });
            drop(slot);

            match result {
                Ok((target, used_fallback)) => {
                    let outcome = ActionOutcome {
                        action: name,
                        target,
                        used_fallback,
                        duration_ms: started.elapsed().as_millis() as u64,
                    };
                    tracing::info!(
                        "Performed {} on {} in {}ms",
                        outcome.action,
                        outcome.target.as_deref().unwrap_or("screen"),
                        outcome.duration_ms
                    );
                    Ok(outcome)
                }
                Err(e) => {
                    tracing::error!("Action {} failed: {}", name, e);
                    Err(e)
                }
            }
        });

        task.await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("{} dispatch task failed: {}", name, e)))?
    }
}

impl Shared {
    async fn dispatch(&self, name: &str, plan: Plan) -> Result<(Option<NodeId>, bool)> {
        match plan {
            Plan::Node {
                id,
                action,
                fallback_press_ms,
            } => {
                let resolved = self
                    .cache
                    .lookup(&id)
                    .await
                    .ok_or_else(|| AppError::ElementNotFound(id.clone()))?;

                tracing::debug!("{} {} in window {}", action.name(), id, resolved.window_id);
                let primary = PlatformAction::Node {
                    window_id: resolved.window_id,
                    node: Arc::clone(&resolved.node),
                    action,
                };

                match (self.run(name, primary).await?, fallback_press_ms) {
                    (Ok(()), _) => Ok((Some(id), false)),
                    (Err(PlatformError::Unsupported), Some(duration_ms)) => {
                        let (x, y) = resolved.node.bounds.center();
                        tracing::debug!(
                            "{} unsupported on {}, pressing ({}, {}) for {}ms",
                            name,
                            id,
                            x,
                            y,
                            duration_ms
                        );
                        self.run(name, PlatformAction::Tap { x, y, duration_ms })
                            .await??;
                        Ok((Some(id), true))
                    }
                    (Err(e), _) => Err(e.into()),
                }
            }
            Plan::Tap { x, y, duration_ms } => {
                self.run(name, PlatformAction::Tap { x, y, duration_ms })
                    .await??;
                Ok((None, false))
            }
            Plan::Gesture(paths) => {
                self.run(name, PlatformAction::Gesture(paths)).await??;
                Ok((None, false))
            }
            Plan::Global(global) => {
                self.run(name, PlatformAction::Global(global)).await??;
                Ok((None, false))
            }
        }
    }

    /// Hand one action to the platform; the outer error is the completion timeout
    async fn run(
        &self,
        name: &str,
        action: PlatformAction,
    ) -> Result<std::result::Result<(), PlatformError>> {
        tokio::time::timeout(self.action_timeout, self.provider.perform(action))
            .await
            .map_err(|_| {
                AppError::ActionFailed(format!(
                    "{} timed out after {}ms",
                    name,
                    self.action_timeout.as_millis()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::gesture::GesturePoint;
    use crate::automation::platform::fixture::{FixtureNode, FixtureProvider};
    use crate::automation::platform::PlatformWindow;
    use crate::automation::snapshot::build_snapshot;
    use crate::automation::types::ScreenInfo;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        provider: Arc<FixtureProvider>,
        dispatcher: Arc<ActionDispatcher>,
        button_id: NodeId,
    }

    async fn harness(acquire: Duration, action: Duration) -> Harness {
        let provider = Arc::new(FixtureProvider::single_window(
            "com.example",
            FixtureNode::new("android.widget.FrameLayout")
                .bounds(0, 0, 1080, 2400)
                .child(
                    FixtureNode::new("android.widget.Button")
                        .text("OK")
                        .bounds(50, 800, 250, 1000)
                        .clickable(),
                ),
        ));
        let cache = Arc::new(NodeCache::new());
        let snapshot = build_snapshot(
            &provider.list_windows().await.unwrap(),
            provider.screen_info(),
        );
        cache.populate(&snapshot).await;
        let button_id = snapshot.windows[0].tree.children[0].id.clone();

        let dispatcher = Arc::new(ActionDispatcher::new(
            provider.clone(),
            cache,
            acquire,
            action,
        ));
        Harness {
            provider,
            dispatcher,
            button_id,
        }
    }

    async fn default_harness() -> Harness {
        harness(Duration::from_secs(5), Duration::from_secs(5)).await
    }

    fn click(id: &str) -> Action {
        Action::Click {
            target: Target::Element { id: id.to_string() },
        }
    }

    #[tokio::test]
    async fn test_click_element() {
        let h = default_harness().await;
        let outcome = h.dispatcher.perform(&click(&h.button_id)).await.unwrap();

        assert_eq!(outcome.action, "click");
        assert_eq!(outcome.target.as_deref(), Some(h.button_id.as_str()));
        assert!(!outcome.used_fallback);
        assert_eq!(h.dispatcher.state(), ActionState::Succeeded);

        let performed = h.provider.performed();
        assert_eq!(performed.len(), 1);
        assert!(matches!(
            &performed[0],
            PlatformAction::Node { window_id: 1, action: NodeAction::Click, .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let h = default_harness().await;
        let err = h.dispatcher.perform(&click("node_deadbeef")).await.unwrap_err();
        assert!(matches!(err, AppError::ElementNotFound(id) if id == "node_deadbeef"));
        assert!(h.provider.performed().is_empty());
        assert_eq!(h.dispatcher.state(), ActionState::Failed);
    }

    #[tokio::test]
    async fn test_unsupported_click_falls_back_to_center_tap() {
        let h = default_harness().await;
        h.provider.set_node_actions_unsupported(true);

        let outcome = h.dispatcher.perform(&click(&h.button_id)).await.unwrap();
        assert!(outcome.used_fallback);
        assert_eq!(
            h.provider.performed(),
            vec![PlatformAction::Tap {
                x: 150,
                y: 900,
                duration_ms: TAP_DURATION_MS
            }]
        );
    }

    #[tokio::test]
    async fn test_unsupported_long_click_falls_back_to_press() {
        let h = default_harness().await;
        h.provider.set_node_actions_unsupported(true);

        let action = Action::LongClick {
            target: Target::Element {
                id: h.button_id.clone(),
            },
        };
        h.dispatcher.perform(&action).await.unwrap();
        assert_eq!(
            h.provider.performed(),
            vec![PlatformAction::Tap {
                x: 150,
                y: 900,
                duration_ms: LONG_PRESS_DURATION_MS
            }]
        );
    }

    #[tokio::test]
    async fn test_point_click_taps() {
        let h = default_harness().await;
        let action = Action::Click {
            target: Target::Point { x: 10, y: 20 },
        };
        let outcome = h.dispatcher.perform(&action).await.unwrap();
        assert!(outcome.target.is_none());
        assert_eq!(
            h.provider.performed(),
            vec![PlatformAction::Tap {
                x: 10,
                y: 20,
                duration_ms: TAP_DURATION_MS
            }]
        );
    }

    #[tokio::test]
    async fn test_invalid_gesture_never_dispatched() {
        let h = default_harness().await;
        let action = Action::Gesture {
            paths: vec![GesturePath::new(vec![
                GesturePoint::new(100.0, 100.0, 0),
                GesturePoint::new(200.0, 200.0, 0),
            ])],
        };
        let err = h.dispatcher.perform(&action).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidParams(_)));
        assert!(h.provider.performed().is_empty());
        assert_eq!(h.dispatcher.state(), ActionState::Idle);
    }

    #[tokio::test]
    async fn test_negative_point_rejected() {
        let h = default_harness().await;
        let action = Action::Click {
            target: Target::Point { x: -1, y: 20 },
        };
        assert!(matches!(
            h.dispatcher.perform(&action).await,
            Err(AppError::InvalidParams(_))
        ));
    }

    #[tokio::test]
    async fn test_rejection_reason_passed_through() {
        let h = default_harness().await;
        h.provider.set_reject_reason(Some("node is no longer attached"));

        let err = h.dispatcher.perform(&click(&h.button_id)).await.unwrap_err();
        match err {
            AppError::ActionFailed(reason) => assert_eq!(reason, "node is no longer attached"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let h = default_harness().await;
        h.provider.set_permission_denied(true);
        let action = Action::Global {
            global: GlobalAction::Back,
        };
        assert!(matches!(
            h.dispatcher.perform(&action).await,
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_actions_never_overlap() {
        let h = default_harness().await;
        h.provider.set_action_delay(Duration::from_millis(20));

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let dispatcher = Arc::clone(&h.dispatcher);
                tokio::spawn(async move {
                    let action = Action::Click {
                        target: Target::Point { x: i * 10, y: 10 },
                    };
                    dispatcher.perform(&action).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(h.provider.performed().len(), 4);
        assert_eq!(h.provider.max_concurrent_actions(), 1);
    }

    #[tokio::test]
    async fn test_busy_when_slot_not_acquired_in_time() {
        let h = harness(Duration::from_millis(20), Duration::from_secs(5)).await;
        h.provider.set_action_delay(Duration::from_millis(300));

        let first = {
            let dispatcher = Arc::clone(&h.dispatcher);
            let id = h.button_id.clone();
            tokio::spawn(async move { dispatcher.perform(&click(&id)).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = h.dispatcher.perform(&click(&h.button_id)).await.unwrap_err();
        assert!(matches!(err, AppError::DispatcherBusy { waited_ms: 20 }));
        assert!(first.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_completion_timeout_is_action_failure() {
        let h = harness(Duration::from_secs(5), Duration::from_millis(20)).await;
        h.provider.set_action_delay(Duration::from_millis(300));

        let err = h.dispatcher.perform(&click(&h.button_id)).await.unwrap_err();
        assert!(err.is_action_failure());
        assert!(err.to_string().contains("timed out"));
        assert_eq!(h.dispatcher.state(), ActionState::Failed);
    }

    #[tokio::test]
    async fn test_abandoned_action_still_completes() {
        let h = harness(Duration::from_secs(1), Duration::from_secs(5)).await;
        h.provider.set_action_delay(Duration::from_millis(300));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            h.dispatcher.perform(&click(&h.button_id)),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(h.dispatcher.state(), ActionState::Dispatching);

        tokio::time::timeout(Duration::from_secs(2), async {
            while h.dispatcher.state() != ActionState::Succeeded {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(h.provider.performed().len(), 1);

        h.provider.set_action_delay(Duration::ZERO);
        assert!(h.dispatcher.perform(&click(&h.button_id)).await.is_ok());
        assert_eq!(h.provider.performed().len(), 2);
    }

    /// Device whose work runs on its own task, so it outlives a dropped caller
    #[derive(Default)]
    struct DetachedDevice {
        running: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl AccessibilityProvider for DetachedDevice {
        fn screen_info(&self) -> ScreenInfo {
            ScreenInfo::default()
        }

        async fn list_windows(&self) -> std::result::Result<Vec<PlatformWindow>, PlatformError> {
            Ok(Vec::new())
        }

        async fn active_window(&self) -> std::result::Result<Option<PlatformWindow>, PlatformError> {
            Ok(None)
        }

        async fn perform(&self, _action: PlatformAction) -> std::result::Result<(), PlatformError> {
            let running = Arc::clone(&self.running);
            let peak = Arc::clone(&self.peak);
            let work = tokio::spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(300)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
            work.await
                .map_err(|e| PlatformError::Unavailable(e.to_string()))
        }
    }

    #[tokio::test]
    async fn test_dropped_caller_keeps_slot_until_device_finishes() {
        let device = Arc::new(DetachedDevice::default());
        let dispatcher = ActionDispatcher::new(
            device.clone(),
            Arc::new(NodeCache::new()),
            Duration::from_secs(2),
            Duration::from_secs(2),
        );
        let tap = Action::Click {
            target: Target::Point { x: 10, y: 10 },
        };

        let dropped = tokio::time::timeout(Duration::from_millis(20), dispatcher.perform(&tap)).await;
        assert!(dropped.is_err());
        assert_eq!(dispatcher.state(), ActionState::Dispatching);

        assert!(dispatcher.perform(&tap).await.is_ok());
        assert_eq!(device.peak.load(Ordering::SeqCst), 1);
        assert_eq!(device.running.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.state(), ActionState::Succeeded);
    }

    #[tokio::test]
    async fn test_node_actions_reach_platform() {
        let h = default_harness().await;
        let id = h.button_id.clone();
        let actions = [
            Action::SetText {
                id: id.clone(),
                text: "hello".to_string(),
            },
            Action::ScrollIntoView { id: id.clone() },
            Action::Scroll {
                id: id.clone(),
                direction: ScrollDirection::Forward,
            },
            Action::Scroll {
                id: id.clone(),
                direction: ScrollDirection::Backward,
            },
        ];
        for action in &actions {
            let outcome = h.dispatcher.perform(action).await.unwrap();
            assert_eq!(outcome.target.as_deref(), Some(id.as_str()));
            assert!(!outcome.used_fallback);
        }

        let sent: Vec<NodeAction> = h
            .provider
            .performed()
            .into_iter()
            .map(|performed| match performed {
                PlatformAction::Node { node, action, .. } => {
                    assert_eq!(node.id, id);
                    action
                }
                other => panic!("unexpected action {:?}", other),
            })
            .collect();
        assert_eq!(
            sent,
            vec![
                NodeAction::SetText("hello".to_string()),
                NodeAction::ShowOnScreen,
                NodeAction::ScrollForward,
                NodeAction::ScrollBackward,
            ]
        );
    }

    #[tokio::test]
    async fn test_unsupported_node_action_fails_without_tap() {
        let h = default_harness().await;
        h.provider.set_node_actions_unsupported(true);
        let id = h.button_id.clone();

        let actions = [
            Action::SetText {
                id: id.clone(),
                text: "hello".to_string(),
            },
            Action::ScrollIntoView { id: id.clone() },
            Action::Scroll {
                id,
                direction: ScrollDirection::Forward,
            },
        ];
        for action in &actions {
            let err = h.dispatcher.perform(action).await.unwrap_err();
            assert!(matches!(err, AppError::ActionFailed(_)), "{}: {:?}", action.name(), err);
            assert_eq!(h.dispatcher.state(), ActionState::Failed);
        }
        assert!(h.provider.performed().is_empty());
    }

    #[tokio::test]
    async fn test_blank_id_rejected() {
        let h = default_harness().await;
        let action = Action::ScrollIntoView { id: "  ".to_string() };
        assert!(matches!(
            h.dispatcher.perform(&action).await,
            Err(AppError::InvalidParams(_))
        ));
        assert_eq!(h.dispatcher.state(), ActionState::Idle);
    }

    #[test]
    fn test_action_json_shape() {
        let click: Action =
            serde_json::from_str(r#"{"action":"click","target":{"id":"node_1"}}"#).unwrap();
        assert_eq!(
            click,
            Action::Click {
                target: Target::Element {
                    id: "node_1".to_string()
                }
            }
        );

        let tap: Action =
            serde_json::from_str(r#"{"action":"long_click","target":{"x":5,"y":6}}"#).unwrap();
        assert_eq!(
            tap,
            Action::LongClick {
                target: Target::Point { x: 5, y: 6 }
            }
        );

        let back: Action = serde_json::from_str(r#"{"action":"global","global":"back"}"#).unwrap();
        assert_eq!(back.name(), "global");
    }
}
