//! End-to-end tests through the message loop.

use umbra_engine::{
    serve, Command, Engine, EngineError, EngineHandle, Reply, SnapshotElement, SnapshotPage,
};
use umbra_render::{dark_mappings, ColorMappings, ACTIVE_CLASS, STYLE_ELEMENT_ID};

fn page() -> SnapshotPage {
    SnapshotPage::from_yaml(
        r##"
url: https://example.com
elements:
  - tag: body
    width: 1280
    height: 2000
    color: rgb(34, 34, 34)
    background_color: rgb(255, 255, 255)
  - tag: div
    width: 600
    height: 80
    color: rgb(34, 34, 34)
    background_color: "#F5F5F5"
    style: "background-color: #F5F5F5"
  - tag: span
    width: 0
    height: 0
    color: rgb(255, 0, 0)
  - tag: iframe
    width: 300
    height: 200
    restricted: true
"##,
    )
    .unwrap()
}

#[tokio::test]
async fn full_cycle_through_handle() {
    let (handle, task) = EngineHandle::spawn(Engine::new(page()));

    let colors = handle.extract_colors().await.unwrap();
    let ranked: Vec<_> = colors.iter().map(|c| (c.color.as_str(), c.count)).collect();
    assert_eq!(ranked, vec![("#222222", 2), ("#ffffff", 1), ("#f5f5f5", 1)]);

    let mappings = dark_mappings(colors.iter().map(|c| c.color.as_str()));
    assert!(handle.apply(true, mappings).await.unwrap());
    assert!(handle.update_color("#F5F5F5", "#303030").await.unwrap());

    drop(handle);
    let engine = task.await.unwrap();
    let page = engine.page();
    assert!(page.has_root_class(ACTIVE_CLASS));
    let css = page.style_text(STYLE_ELEMENT_ID).unwrap();
    assert!(css.contains("color: #303030 !important;"));
    assert_eq!(page.inline_matches("#f5f5f5"), 1);
}

#[tokio::test]
async fn commands_are_served_in_order() {
    let (handle, inbox) = EngineHandle::channel();
    let server = tokio::spawn(serve(Engine::new(SnapshotPage::default()), inbox));

    let first = handle.request(Command::Apply {
        enabled: true,
        color_mappings: ColorMappings::new(),
    });
    let second = handle.request(Command::Apply {
        enabled: false,
        color_mappings: ColorMappings::new(),
    });
    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap(), Reply::Applied { success: true });
    assert_eq!(second.unwrap(), Reply::Applied { success: true });

    drop(handle);
    let engine = server.await.unwrap();
    assert!(!engine.is_enabled());
    assert_eq!(engine.page().style_text(STYLE_ELEMENT_ID), Some(""));
}

#[tokio::test]
async fn restricted_page_reports_false() {
    let mut restricted = SnapshotPage::new(vec![SnapshotElement::default()]);
    restricted.restricted = true;
    let (handle, task) = EngineHandle::spawn(Engine::new(restricted));

    assert!(!handle.apply(true, ColorMappings::new()).await.unwrap());
    drop(handle);
    let engine = task.await.unwrap();
    assert!(engine.is_enabled());
    assert!(engine.page().style_elements().is_empty());
}

#[tokio::test]
async fn handle_errors_once_server_is_gone() {
    let (handle, task) = EngineHandle::spawn(Engine::new(SnapshotPage::default()));
    task.abort();
    let _ = task.await;
    assert_eq!(
        handle.update_color("#fff", "#000").await,
        Err(EngineError::Disconnected)
    );
}
