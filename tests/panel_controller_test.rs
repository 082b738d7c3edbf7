use std::time::Duration;

use site_panels::config::Layout;
use site_panels::controller::PanelController;
use site_panels::events::{EventScript, UiEvent};
use site_panels::inquiry::InquiryDispatcher;
use site_panels::panels::Rect;
use site_panels::surface::{MemorySurface, StyleProperty};

fn builtin_controller() -> PanelController<MemorySurface> {
    let layout = Layout::builtin().unwrap();
    let surface = MemorySurface::new()
        .with_rect("btn-connect-footer", Rect::new(600.0, 700.0, 80.0, 40.0))
        .with_rect("site-footer", Rect::new(0.0, 720.0, 1280.0, 80.0));
    PanelController::new(&layout, surface, InquiryDispatcher::default()).unwrap()
}

async fn click(controller: &mut PanelController<MemorySurface>, target: &str) {
    controller.dispatch(UiEvent::click(target)).await.unwrap();
}

#[tokio::test]
async fn test_service_dropdowns_are_exclusive() {
    let mut c = builtin_controller();
    click(&mut c, "btn-service-mapping").await;
    click(&mut c, "btn-service-inspection").await;

    assert!(!c.is_open("dropdown-mapping"));
    assert!(c.is_open("dropdown-inspection"));
    assert!(!c.is_trigger_active("btn-service-mapping"));
    assert!(c.is_trigger_active("btn-service-inspection"));

    // 点击下拉框内部不会关闭
    click(&mut c, "dropdown-inspection").await;
    assert!(c.is_open("dropdown-inspection"));

    click(&mut c, "hero").await;
    assert!(c.state().is_empty());
}

#[tokio::test]
async fn test_connect_button_label_round_trip() {
    let mut c = builtin_controller();
    click(&mut c, "btn-connect").await;
    assert!(c.is_open("contact-form"));
    assert_eq!(c.surface().text("btn-connect"), Some("Close"));

    // 表单内的点击保持打开
    click(&mut c, "contact-service").await;
    assert!(c.is_open("contact-form"));

    c.dispatch(UiEvent::key("Escape")).await.unwrap();
    assert!(!c.is_open("contact-form"));
    assert_eq!(c.surface().text("btn-connect"), Some("Connect"));
}

#[tokio::test]
async fn test_footer_menu_survives_nested_panel() {
    let mut c = builtin_controller();
    click(&mut c, "btn-footer-menu").await;
    click(&mut c, "btn-footer-about").await;
    assert!(c.is_open("footer-menu"));
    assert!(c.is_open("footer-about"));

    click(&mut c, "hero").await;
    assert!(c.is_open("footer-menu"));
    assert!(!c.is_open("footer-about"));
}

#[tokio::test]
async fn test_connect_page_launch_sequence() {
    let mut c = builtin_controller();
    click(&mut c, "btn-connect-footer").await;

    let s = c.surface();
    assert_eq!(s.style("hero-buttons", StyleProperty::Display), Some("none"));
    assert_eq!(s.style("connect-page", StyleProperty::Display), Some("flex"));
    // 触发按钮中心 (640, 720)，视口中心 (640, 400)
    assert_eq!(
        s.style("connect-page", StyleProperty::Transform),
        Some("translate(0px, 320px) scale(0.3)")
    );

    c.advance(Duration::from_millis(10));
    assert!(c.surface().has_class("connect-page", "show"));
    c.advance(Duration::from_millis(100));
    assert_eq!(c.surface().focused(), Some("connect-name"));

    // 覆盖页面内的点击不会关闭
    click(&mut c, "connect-name").await;
    assert!(c.is_open("connect-page"));

    c.dispatch(UiEvent::key("Escape")).await.unwrap();
    assert!(!c.is_open("connect-page"));
    assert_eq!(
        c.surface().style("hero-buttons", StyleProperty::Display),
        Some("flex")
    );
    c.advance(Duration::from_millis(300));
    assert_eq!(
        c.surface().style("connect-page", StyleProperty::Display),
        Some("none")
    );
}

#[tokio::test]
async fn test_floating_button_follows_footer() {
    let mut c = builtin_controller();
    c.advance(Duration::from_millis(100));
    assert_eq!(
        c.surface().style("btn-connect-float", StyleProperty::Bottom),
        Some("80px")
    );
}

#[tokio::test]
async fn test_replay_script_from_toml() {
    let script = EventScript::from_toml_str(
        r#"
        [[events]]
        type = "click"
        target = "btn-legal"

        [[events]]
        type = "advance"
        ms = 20

        [[events]]
        type = "key"
        key = "Escape"
        "#,
    )
    .unwrap();

    let mut c = builtin_controller();
    for event in script.events {
        c.dispatch(event).await.unwrap();
    }
    assert!(c.state().is_empty());
    assert_eq!(c.now(), Duration::from_millis(20));
}
