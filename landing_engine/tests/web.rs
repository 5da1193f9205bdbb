//! Browser tests for the DOM bindings. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use landing_engine::{
    bind_scroll_down, mount_frame_player, mount_landing, mount_scroll_reveal, mount_typewriter,
    HIDDEN_CLASSES,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

/// 1x1 PNG. Frame numbers land in the fragment, which data URLs ignore.
const PNG_FRAMES: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==#";
const BROKEN_FRAMES: &str = "data:image/png;base64,AAAA#";

fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

fn create<T: JsCast>(tag: &str) -> T {
    let document = window().document().unwrap();
    let element = document.create_element(tag).unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element.dyn_into::<T>().unwrap()
}

fn style_of(element: &HtmlElement, property: &str) -> String {
    element.style().get_property_value(property).unwrap()
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

async fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if done() {
            return true;
        }
        sleep(20).await;
    }
    done()
}

fn player_config(frame_count: i64, prefix: &str) -> String {
    format!(
        r#"{{"frame_count":{},"frame_path_prefix":"{}","canvas_width":40,"canvas_height":20,"scroll_budget":500}}"#,
        frame_count, prefix
    )
}

#[wasm_bindgen_test]
fn invalid_frame_count_reports_on_status() {
    let container: HtmlElement = create("div");
    let canvas: HtmlCanvasElement = create("canvas");
    let status: HtmlElement = create("div");

    let result = mount_frame_player(
        container,
        canvas,
        None,
        Some(status.clone()),
        &player_config(0, "/frames/"),
    );

    assert!(result.is_err());
    let text = status.text_content().unwrap();
    assert!(text.contains("frameCount must be a positive number."));
}

#[wasm_bindgen_test]
async fn decoded_frames_reveal_canvas_and_pin_on_scroll() {
    let container: HtmlElement = create("div");
    container.style().set_property("height", "100px").unwrap();
    let canvas: HtmlCanvasElement = create("canvas");
    let status: HtmlElement = create("div");
    let filler: HtmlElement = create("div");
    filler.style().set_property("height", "5000px").unwrap();

    let mut handle = mount_frame_player(
        container.clone(),
        canvas.clone(),
        None,
        Some(status.clone()),
        &player_config(3, PNG_FRAMES),
    )
    .unwrap();
    assert_eq!(canvas.width(), 40);
    assert_eq!(canvas.height(), 20);
    assert_eq!(status.text_content().unwrap(), "Loading animation...");

    assert!(wait_until(|| handle.load_state().unwrap().contains("ready")).await);
    assert!(status.hidden());
    assert_eq!(style_of(&canvas, "opacity"), "1");

    let spacer: HtmlElement = container.parent_element().unwrap().dyn_into().unwrap();
    assert!(spacer.class_list().contains("pin-spacer"));
    assert!(wait_until(|| style_of(&spacer, "height") == "600px").await);

    let top = spacer.get_bounding_client_rect().top() + window().scroll_y().unwrap();
    window().scroll_to_with_x_and_y(0.0, top + 100.0);
    assert!(wait_until(|| style_of(&container, "position") == "fixed").await);

    window().scroll_to_with_x_and_y(0.0, top + 550.0);
    assert!(wait_until(|| style_of(&container, "transform") == "translateY(500px)").await);
    assert_eq!(style_of(&container, "position"), "");

    handle.destroy().unwrap();
    handle.destroy().unwrap();
    assert_eq!(handle.load_state().unwrap(), "null");
    assert_eq!(style_of(&container, "transform"), "");
    assert_eq!(style_of(&container, "position"), "");
    assert!(spacer.parent_node().is_none());
    let body: web_sys::Element = window().document().unwrap().body().unwrap().into();
    assert_eq!(container.parent_element().unwrap(), body);
    window().scroll_to_with_x_and_y(0.0, 0.0);
}

#[wasm_bindgen_test]
async fn failed_frame_shows_error_and_keeps_canvas_hidden() {
    let container: HtmlElement = create("div");
    let canvas: HtmlCanvasElement = create("canvas");
    let status: HtmlElement = create("div");

    let mut handle = mount_frame_player(
        container,
        canvas.clone(),
        None,
        Some(status.clone()),
        &player_config(1, BROKEN_FRAMES),
    )
    .unwrap();

    assert!(wait_until(|| handle.load_state().unwrap().contains("error")).await);
    let text = status.text_content().unwrap();
    assert!(
        text.starts_with("Error: Failed to load frame 48. Check console & path:"),
        "{}",
        text
    );
    assert!(!status.hidden());
    assert!(status.class_list().contains("is-error"));
    assert_eq!(style_of(&canvas, "opacity"), "0");
    handle.destroy().unwrap();
}

#[wasm_bindgen_test]
async fn typewriter_types_whole_string() {
    let target: HtmlElement = create("span");
    target.set_text_content(Some("stale"));

    let mut handle =
        mount_typewriter(target.clone(), r#"{"texts":["Hi"],"typing_speed_ms":10}"#).unwrap();
    assert_eq!(target.text_content().unwrap(), "");

    assert!(wait_until(|| target.text_content().unwrap() == "Hi").await);
    handle.destroy().unwrap();
}

#[wasm_bindgen_test]
fn reveal_starts_hidden_with_delay() {
    let target: HtmlElement = create("div");

    let handle = mount_scroll_reveal(&target, 0.1, Some(200)).unwrap();

    for class in HIDDEN_CLASSES.split_whitespace() {
        assert!(target.class_list().contains(class));
    }
    assert_eq!(style_of(&target, "transition-delay"), "200ms");
    handle.destroy();
}

#[wasm_bindgen_test]
fn scroll_button_gets_label() {
    let button: HtmlElement = create("button");

    let handle = bind_scroll_down(button.clone(), "tech-specs").unwrap();

    assert_eq!(
        button.get_attribute("aria-label").unwrap(),
        "Scroll down to tech specs section"
    );
    // Missing target only warns.
    button.click();
    handle.destroy().unwrap();
}

#[wasm_bindgen_test]
async fn landing_runs_without_frame_player() {
    let typed: HtmlElement = create("span");
    typed.set_id("typewriter-text");
    let revealed: HtmlElement = create("div");
    revealed.set_attribute("data-reveal", "").unwrap();
    revealed.set_attribute("data-delay", "100").unwrap();

    let mut landing = mount_landing(Some(
        r#"{"typewriter":{"texts":["Go"],"typing_speed_ms":10}}"#.to_string(),
    ))
    .unwrap();

    assert_eq!(landing.player_state().unwrap(), "null");
    assert_eq!(style_of(&revealed, "transition-delay"), "100ms");
    assert!(wait_until(|| typed.text_content().unwrap() == "Go").await);

    landing.destroy().unwrap();
    typed.remove();
    revealed.remove();
}
