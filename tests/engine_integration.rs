//! Integration tests for the snapshot and automation engine.
//!
//! Every test drives the public API against the in-memory fixture provider,
//! either built in code or loaded from `tests/fixtures/`.

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{http::StatusCode, Json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use uitree_sidecar::api::handlers::ui;
use uitree_sidecar::api::state::AppState;
use uitree_sidecar::automation::fingerprint;
use uitree_sidecar::automation::gesture::{GesturePath, GesturePoint};
use uitree_sidecar::automation::platform::fixture::{FixtureNode, FixtureProvider, FixtureWindow};
use uitree_sidecar::automation::platform::{NodeAction, PlatformAction, PlatformWindow};
use uitree_sidecar::automation::serializer::HEADER;
use uitree_sidecar::automation::types::{ScreenInfo, WindowInfo, WindowType};
use uitree_sidecar::automation::{
    AccessibilityProvider, Action, AutomationManager, Criterion, PlatformError, Target,
};
use uitree_sidecar::config::EngineConfig;
use uitree_sidecar::error::AppError;

const OK_BUTTON_ID: &str = "node_41742879";

fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn ok_screen() -> FixtureNode {
    FixtureNode::new("android.widget.FrameLayout")
        .bounds(0, 0, 1080, 2400)
        .child(
            FixtureNode::new("android.widget.Button")
                .text("OK")
                .bounds(50, 800, 250, 1000)
                .clickable(),
        )
}

fn ok_setup() -> (Arc<FixtureProvider>, AutomationManager) {
    let provider = Arc::new(FixtureProvider::single_window("com.example", ok_screen()));
    let manager = AutomationManager::new(provider.clone(), EngineConfig::default());
    (provider, manager)
}

fn settings_setup() -> (Arc<FixtureProvider>, AutomationManager) {
    let provider = Arc::new(
        FixtureProvider::from_json_file(&fixture_path("settings_screen.json"))
            .expect("fixture should load"),
    );
    let manager = AutomationManager::new(provider.clone(), EngineConfig::default());
    (provider, manager)
}

fn data_rows(text: &str) -> Vec<&str> {
    text.lines().skip_while(|l| *l != HEADER).skip(1).collect()
}

// ============================================================================
// Snapshot rendering
// ============================================================================

#[tokio::test]
async fn test_container_without_content_has_no_row() {
    let (_, manager) = ok_setup();
    let snapshot = assert_ok!(manager.snapshot(false).await);

    assert_eq!(
        data_rows(&snapshot.text),
        vec![format!("{}\tButton\tOK\t-\t-\t50,800,250,1000\ton,clk,ena", OK_BUTTON_ID)]
    );
    assert!(!snapshot.text.contains("FrameLayout"));
}

#[tokio::test]
async fn test_settings_fixture_renders() {
    let (provider, manager) = settings_setup();
    let snapshot = assert_ok!(manager.snapshot(false).await);
    let lines: Vec<&str> = snapshot.text.lines().collect();

    assert!(lines.contains(
        &"window: id=12 type=application package=com.example.settings title=Settings \
          activity=com.example.settings.MainActivity layer=1 focused=yes"
    ));
    // The keyboard window has no root and is skipped
    assert_eq!(lines.iter().filter(|l| l.starts_with("window:")).count(), 1);

    let rows = data_rows(&snapshot.text);
    assert_eq!(rows.len(), 7);
    assert_eq!(snapshot.row_count, 7);
    assert!(rows.iter().all(|r| r.split('\t').count() == 7));
    assert!(rows.iter().any(|r| r.contains("\tRecyclerView\t") && r.ends_with("on,foc,scr,ena")));
    assert!(rows.iter().any(|r| r.contains("Airplane mode") && r.ends_with("\ton")));

    // Every child handle was released once, roots never
    assert_eq!(provider.released_handles(), 8);

    let detailed = assert_ok!(manager.snapshot(true).await);
    assert_eq!(detailed.row_count, 9);
    assert_eq!(provider.released_handles(), 16);
}

#[tokio::test]
async fn test_ids_stable_across_snapshots() {
    let (_, manager) = settings_setup();
    let first = assert_ok!(manager.snapshot(true).await);
    let second = assert_ok!(manager.snapshot(true).await);

    let ids = |text: &str| -> Vec<String> {
        data_rows(text)
            .iter()
            .map(|r| r.split('\t').next().unwrap_or_default().to_string())
            .collect()
    };
    assert_ne!(first.snapshot_id, second.snapshot_id);
    assert_eq!(second.generation, first.generation + 1);
    assert_eq!(ids(&first.text), ids(&second.text));
}

// ============================================================================
// Locating and resolving
// ============================================================================

#[tokio::test]
async fn test_find_ok_button() {
    let (_, manager) = ok_setup();
    let found = assert_ok!(manager.find(Criterion::Text, "OK", false).await);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, OK_BUTTON_ID);
    assert_eq!(found[0].window_id, 1);
    assert!(found[0].flags.clickable);
}

#[tokio::test]
async fn test_find_by_resource_id_then_click() {
    let (provider, manager) = settings_setup();
    let found = assert_ok!(manager.find(Criterion::ResourceId, ":id/wifi", false).await);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text.as_deref(), Some("Wi-Fi"));

    let outcome = assert_ok!(
        manager
            .perform(&Action::Click {
                target: Target::Element {
                    id: found[0].id.clone()
                },
            })
            .await
    );
    assert!(!outcome.used_fallback);

    let performed = provider.performed();
    assert_eq!(performed.len(), 1);
    match &performed[0] {
        PlatformAction::Node {
            window_id,
            node,
            action,
        } => {
            assert_eq!(*window_id, 12);
            assert_eq!(node.id, found[0].id);
            assert_eq!(*action, NodeAction::Click);
        }
        other => panic!("unexpected action {:?}", other),
    }
}

#[tokio::test]
async fn test_stale_id_not_found_after_screen_change() {
    let (provider, manager) = ok_setup();
    assert_ok!(manager.snapshot(false).await);
    assert_ok!(manager.resolve(&OK_BUTTON_ID.to_string()).await);

    provider.set_windows(vec![FixtureWindow::new(
        WindowInfo {
            window_id: 1,
            window_type: WindowType::Application,
            package_name: Some("com.example".to_string()),
            ..Default::default()
        },
        FixtureNode::new("android.widget.FrameLayout")
            .bounds(0, 0, 1080, 2400)
            .child(FixtureNode::new("android.widget.TextView").text("Done")),
    )]);
    assert_ok!(manager.snapshot(false).await);

    let err = assert_err!(manager.resolve(&OK_BUTTON_ID.to_string()).await);
    assert!(matches!(err, AppError::ElementNotFound(_)));

    let click = Action::Click {
        target: Target::Element {
            id: OK_BUTTON_ID.to_string(),
        },
    };
    let err = assert_err!(manager.perform(&click).await);
    assert!(matches!(err, AppError::ElementNotFound(_)));
    assert!(provider.performed().is_empty());
}

// ============================================================================
// Fingerprints and idle detection
// ============================================================================

#[tokio::test]
async fn test_unchanged_screen_fingerprints_match() {
    let (_, manager) = settings_setup();
    let a = fingerprint::generate(&assert_ok!(manager.capture().await), 256);
    let b = fingerprint::generate(&assert_ok!(manager.capture().await), 256);
    assert_eq!(fingerprint::compare(&a, &b), 100);
}

#[tokio::test]
async fn test_wait_for_idle_settles_on_static_screen() {
    let (_, manager) = settings_setup();
    let outcome = assert_ok!(manager.wait_for_idle(2_000, 20, 95).await);

    assert!(outcome.settled);
    assert_eq!(outcome.last_similarity, Some(100));
    assert!(outcome.elapsed_ms < 2_000);
}

/// Adds one list item on every window listing, so no two snapshots match
struct ChurningProvider {
    inner: FixtureProvider,
    frames: AtomicUsize,
}

#[async_trait]
impl AccessibilityProvider for ChurningProvider {
    fn screen_info(&self) -> ScreenInfo {
        self.inner.screen_info()
    }

    async fn list_windows(&self) -> Result<Vec<PlatformWindow>, PlatformError> {
        let frame = self.frames.fetch_add(1, Ordering::SeqCst) as i32 + 1;
        let mut root = FixtureNode::new("android.widget.ListView").bounds(0, 0, 1080, 2400);
        for i in 0..frame {
            root = root.child(
                FixtureNode::new("android.widget.TextView")
                    .text(&format!("message {}", i))
                    .bounds(0, i * 10, 1080, i * 10 + 10),
            );
        }
        self.inner.set_windows(vec![FixtureWindow::new(
            WindowInfo {
                window_id: 1,
                ..Default::default()
            },
            root,
        )]);
        self.inner.list_windows().await
    }

    async fn active_window(&self) -> Result<Option<PlatformWindow>, PlatformError> {
        self.inner.active_window().await
    }

    async fn perform(&self, action: PlatformAction) -> Result<(), PlatformError> {
        self.inner.perform(action).await
    }
}

#[tokio::test]
async fn test_wait_for_idle_times_out_on_changing_screen() {
    let provider = Arc::new(ChurningProvider {
        inner: FixtureProvider::new(ScreenInfo::default(), Vec::new()),
        frames: AtomicUsize::new(0),
    });
    let manager = AutomationManager::new(provider.clone(), EngineConfig::default());

    let outcome = assert_ok!(manager.wait_for_idle(200, 20, 100).await);
    assert!(!outcome.settled);
    assert!(outcome.polls > 2);
    assert!(outcome.elapsed_ms >= 200);
    assert!(outcome.last_similarity.is_some_and(|s| s < 100));
    assert_eq!(provider.frames.load(Ordering::SeqCst), outcome.polls as usize);
}

// ============================================================================
// Actions
// ============================================================================

#[tokio::test]
async fn test_equal_timestamp_gesture_rejected_before_dispatch() {
    let (provider, manager) = ok_setup();
    let gesture = Action::Gesture {
        paths: vec![GesturePath::new(vec![
            GesturePoint::new(100.0, 100.0, 0),
            GesturePoint::new(100.0, 100.0, 0),
        ])],
    };

    let err = assert_err!(manager.perform(&gesture).await);
    assert!(matches!(err, AppError::InvalidParams(_)));
    assert!(provider.performed().is_empty());
    assert_eq!(provider.max_concurrent_actions(), 0);
}

#[tokio::test]
async fn test_pinch_and_swipe_reach_provider() {
    let (provider, manager) = ok_setup();
    assert_ok!(
        manager
            .perform(&Action::Pinch {
                center_x: 540.0,
                center_y: 1200.0,
                scale: 2.0,
                duration_ms: 300,
            })
            .await
    );
    assert_ok!(
        manager
            .perform(&Action::Swipe {
                from_x: 540.0,
                from_y: 2000.0,
                to_x: 540.0,
                to_y: 400.0,
                duration_ms: 250,
            })
            .await
    );

    let performed = provider.performed();
    assert_eq!(performed.len(), 2);
    assert!(matches!(&performed[0], PlatformAction::Gesture(paths) if paths.len() == 2));
    assert!(matches!(&performed[1], PlatformAction::Gesture(paths) if paths.len() == 1));
}

#[tokio::test]
async fn test_permission_loss_surfaces() {
    let (provider, manager) = ok_setup();
    assert_ok!(manager.snapshot(false).await);
    provider.set_permission_denied(true);

    let err = assert_err!(manager.snapshot(false).await);
    assert!(matches!(err, AppError::PermissionDenied(_)));
}

// ============================================================================
// HTTP handlers
// ============================================================================

#[tokio::test]
async fn test_handlers_find_and_resolve() {
    let provider = Arc::new(FixtureProvider::single_window("com.example", ok_screen()));
    let state = Arc::new(AppState::new(provider, EngineConfig::default()));

    let request: ui::FindRequest =
        serde_json::from_str(r#"{"criterion":"text","value":"ok"}"#).expect("valid request");
    let Json(found) = assert_ok!(ui::find_elements(State(state.clone()), Json(request)).await);
    assert_eq!(found.count, 1);
    assert_eq!(found.elements[0].id, OK_BUTTON_ID);

    let Json(node) = assert_ok!(ui::get_node(State(state.clone()), Path(OK_BUTTON_ID.to_string())).await);
    assert_eq!(node.package_name.as_deref(), Some("com.example"));

    let missing = assert_err!(ui::get_node(State(state), Path("node_0".to_string())).await);
    assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
}
