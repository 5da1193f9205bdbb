// Browser plumbing: frame preloading, canvas painting, pinning, listeners, observers, timers.
// Decisions come from the pure modules. This file only moves values across the DOM boundary.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    console, AddEventListenerOptions, CanvasRenderingContext2d, Document, Element,
    HtmlCanvasElement, HtmlElement, HtmlImageElement, IntersectionObserver, Node,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

use crate::error::EngineError;
use crate::frame_sync::FrameCoalescer;
use crate::page::{
    scroll_button_label, scroll_target_after, LandingConfig, FRAME_CANVAS_ID, FRAME_CAPTION_ID,
    FRAME_CONTAINER_ID, FRAME_STATUS_ID, SECTIONS, TYPEWRITER_ID,
};
use crate::player::{FrameSequencePlayer, ScrollSample};
use crate::render::DrawCommand;
use crate::reveal::{
    reveal_settings, transition_delay, RevealLatch, HIDDEN_CLASSES, VISIBLE_CLASSES,
};
use crate::scroll_map::PinLayout;
use crate::typewriter::Typewriter;
use crate::types::{FrameIndex, LoadState, PixelSize, PlayerConfig, RevealConfig, TypewriterConfig};

const STATUS_TEXT_COLOR: &str = "black";
const SCROLL_EVENTS: [&str; 2] = ["scroll", "resize"];
const PIN_PROPERTIES: [&str; 5] = ["position", "top", "left", "width", "transform"];
const PIN_SPACER_CLASS: &str = "pin-spacer";

fn window() -> Result<Window, EngineError> {
    web_sys::window().ok_or_else(|| EngineError::Dom("no global window".to_string()))
}

fn document() -> Result<Document, EngineError> {
    window()?
        .document()
        .ok_or_else(|| EngineError::Dom("window has no document".to_string()))
}

fn dom_err(context: &'static str) -> impl Fn(JsValue) -> EngineError {
    move |err| EngineError::Dom(format!("{}: {:?}", context, err))
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, EngineError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| EngineError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| EngineError::Dom(format!("element #{} has an unexpected type", id)))
}

fn optional_element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

fn swap_classes(element: &Element, remove: &str, add: &str) -> Result<(), EngineError> {
    let classes = element.class_list();
    for class in remove.split_whitespace() {
        classes.remove_1(class).map_err(dom_err("classList.remove"))?;
    }
    for class in add.split_whitespace() {
        classes.add_1(class).map_err(dom_err("classList.add"))?;
    }
    Ok(())
}

fn set_style(element: &HtmlElement, property: &str, value: &str) -> Result<(), EngineError> {
    element
        .style()
        .set_property(property, value)
        .map_err(dom_err("style.setProperty"))
}

fn clear_styles(element: &HtmlElement, properties: &[&str]) -> Result<(), EngineError> {
    let style = element.style();
    for property in properties {
        style
            .remove_property(property)
            .map_err(dom_err("style.removeProperty"))?;
    }
    Ok(())
}

fn show_status(status: &HtmlElement, message: Option<&str>, is_error: bool) -> Result<(), EngineError> {
    status.set_text_content(message);
    status.set_hidden(message.is_none());
    status
        .class_list()
        .toggle_with_force("is-error", is_error)
        .map_err(dom_err("classList.toggle"))?;
    Ok(())
}

fn schedule_timeout(callback: &Closure<dyn FnMut()>, delay_ms: u32) -> Result<i32, EngineError> {
    window()?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        )
        .map_err(dom_err("setTimeout"))
}

// =============================================================================
// Frame sequence player
// =============================================================================

/// Put `container` inside a fresh spacer element at the same place in the document.
fn wrap_in_spacer(container: &HtmlElement) -> Result<HtmlElement, EngineError> {
    let spacer = document()?
        .create_element("div")
        .map_err(dom_err("createElement"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| EngineError::Dom("spacer is not an HTML element".to_string()))?;
    spacer.set_class_name(PIN_SPACER_CLASS);
    if let Some(parent) = container.parent_node() {
        let anchor: &Node = container;
        parent
            .insert_before(&spacer, Some(anchor))
            .map_err(dom_err("insertBefore"))?;
    }
    spacer
        .append_child(container)
        .map_err(dom_err("appendChild"))?;
    Ok(spacer)
}

struct PlayerView {
    player: FrameSequencePlayer,
    images: Vec<HtmlImageElement>,
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    /// Wraps the container and keeps its flow space while it is fixed.
    spacer: HtmlElement,
    caption: Option<HtmlElement>,
    status: Option<HtmlElement>,
    sync: FrameCoalescer,
    raf_handle: Option<i32>,
    layout: Option<PinLayout>,
    spacer_height: Option<f64>,
}

impl PlayerView {
    fn paint(&self, cmd: &DrawCommand) -> Result<(), EngineError> {
        let surface = self.player.config().canvas_size();
        let (width, height) = (surface.width as f64, surface.height as f64);

        match cmd {
            DrawCommand::Frame {
                index,
                background,
                source,
                destination,
            } => {
                let image = match self.images.get(index.as_usize()) {
                    Some(image) if image.complete() && image.natural_height() != 0 => image,
                    _ => return self.paint(&self.player.loading_placeholder(*index)),
                };
                self.ctx.set_fill_style_str(background);
                self.ctx.fill_rect(0.0, 0.0, width, height);
                self.ctx
                    .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                        image,
                        source.x,
                        source.y,
                        source.width,
                        source.height,
                        destination.x,
                        destination.y,
                        destination.width,
                        destination.height,
                    )
                    .map_err(dom_err("drawImage"))
            }
            DrawCommand::Placeholder { fill, status } => {
                self.ctx.set_fill_style_str(fill);
                self.ctx.fill_rect(0.0, 0.0, width, height);
                if let Some(text) = status {
                    self.ctx.set_fill_style_str(STATUS_TEXT_COLOR);
                    self.ctx
                        .fill_text(text, 10.0, 20.0)
                        .map_err(dom_err("fillText"))?;
                }
                Ok(())
            }
        }
    }

    /// Sync the overlay and canvas visibility with the load state.
    fn show_state(&self) -> Result<(), EngineError> {
        let state = self.player.load_state();
        let message = match &state {
            LoadState::Loading => Some("Loading animation...".to_string()),
            LoadState::Ready => None,
            LoadState::Error { message } => Some(format!("Error: {}", message)),
        };
        set_style(
            &self.canvas,
            "opacity",
            if state.is_ready() { "1" } else { "0" },
        )?;
        if let Some(status) = &self.status {
            show_status(
                status,
                message.as_deref(),
                matches!(state, LoadState::Error { .. }),
            )?;
        }
        Ok(())
    }

    fn on_decoded(&mut self, index: FrameIndex) -> Result<(), EngineError> {
        let natural = match self.images.get(index.as_usize()) {
            Some(image) => PixelSize::new(image.natural_width(), image.natural_height()),
            None => return Ok(()),
        };
        if let Some(first) = self.player.frame_loaded(index, natural) {
            self.paint(&first)?;
            self.show_state()?;
            self.recompute()?;
        }
        Ok(())
    }

    fn on_failed(&mut self, index: FrameIndex) -> Result<(), EngineError> {
        let src = self.player.frame_src(index);
        console::error_1(&JsValue::from_str(&format!("Failed to load image: {}", src)));
        if self.player.frame_failed(index).is_some() {
            self.show_state()?;
        }
        Ok(())
    }

    fn sample(&self) -> Result<ScrollSample, EngineError> {
        let win = window()?;
        let scroll_y = win.scroll_y().map_err(dom_err("scrollY"))?;
        let viewport_height = win
            .inner_height()
            .map_err(dom_err("innerHeight"))?
            .as_f64()
            .unwrap_or(0.0);
        let rect_top = self.spacer.get_bounding_client_rect().top();
        Ok(ScrollSample {
            scroll_y,
            region_top: rect_top + scroll_y,
            viewport_height,
        })
    }

    /// Display refresh callback.
    fn refresh(&mut self) -> Result<(), EngineError> {
        self.raf_handle = None;
        if self.sync.begin_frame() {
            self.recompute()?;
        }
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), EngineError> {
        let sample = self.sample()?;
        let Some(update) = self.player.update(sample) else {
            return Ok(());
        };

        let spacer_height = self.container.offset_height() as f64 + update.pin_spacing;
        if self.spacer_height != Some(spacer_height) {
            set_style(&self.spacer, "height", &format!("{}px", spacer_height))?;
            self.spacer_height = Some(spacer_height);
        }
        self.apply_layout(update.layout)?;
        if let Some(draw) = &update.draw {
            self.paint(draw)?;
        }
        if let Some(caption) = &self.caption {
            set_style(caption, "opacity", &format!("{:.4}", update.caption.opacity))?;
            set_style(caption, "transform", &update.caption.css_transform())?;
        }
        Ok(())
    }

    /// Position the container for one pin layout. Fixed placement tracks the spacer's
    /// horizontal box on every call so resizes are followed.
    fn apply_layout(&mut self, layout: PinLayout) -> Result<(), EngineError> {
        if self.layout == Some(layout) && layout != PinLayout::Fixed {
            return Ok(());
        }
        match layout {
            PinLayout::InFlow => clear_styles(&self.container, &PIN_PROPERTIES)?,
            PinLayout::Fixed => {
                let rect = self.spacer.get_bounding_client_rect();
                set_style(&self.container, "position", "fixed")?;
                set_style(&self.container, "top", "0px")?;
                set_style(&self.container, "left", &format!("{}px", rect.left()))?;
                set_style(&self.container, "width", &format!("{}px", rect.width()))?;
                clear_styles(&self.container, &["transform"])?;
            }
            PinLayout::Released { shift } => {
                clear_styles(&self.container, &PIN_PROPERTIES)?;
                set_style(
                    &self.container,
                    "transform",
                    &format!("translateY({}px)", shift),
                )?;
            }
        }
        self.layout = Some(layout);
        Ok(())
    }

    fn release(&mut self) -> Result<(), EngineError> {
        self.player.teardown();
        self.sync.cancel();
        if let Some(handle) = self.raf_handle.take() {
            window()?
                .cancel_animation_frame(handle)
                .map_err(dom_err("cancelAnimationFrame"))?;
        }
        clear_styles(&self.container, &PIN_PROPERTIES)?;
        if self.spacer.parent_node().is_some() {
            self.spacer
                .replace_with_with_node_1(&self.container)
                .map_err(dom_err("replaceWith"))?;
        }
        self.layout = None;
        self.spacer_height = None;
        Ok(())
    }
}

fn schedule_refresh(
    view: &RefCell<PlayerView>,
    callback: &Closure<dyn FnMut()>,
) -> Result<(), EngineError> {
    let win = window()?;
    let mut view = view.borrow_mut();
    let scheduled = view.sync.schedule(|| {
        win.request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(dom_err("requestAnimationFrame"))
    })?;
    if let Some(handle) = scheduled {
        view.raf_handle = Some(handle);
    }
    Ok(())
}

struct MountedPlayer {
    view: Rc<RefCell<PlayerView>>,
    on_scroll: Closure<dyn FnMut()>,
    _refresh: Rc<Closure<dyn FnMut()>>,
}

impl MountedPlayer {
    fn mount(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        caption: Option<HtmlElement>,
        status: Option<HtmlElement>,
        config: PlayerConfig,
    ) -> Result<Self, EngineError> {
        let player = match FrameSequencePlayer::new(config) {
            Ok(player) => player,
            Err(err) => {
                if let Some(status) = &status {
                    show_status(status, Some(format!("Error: {}", err).as_str()), true)?;
                }
                return Err(err);
            }
        };

        let surface = player.config().canvas_size();
        canvas.set_width(surface.width);
        canvas.set_height(surface.height);
        let ctx = canvas
            .get_context("2d")
            .map_err(dom_err("getContext"))?
            .ok_or_else(|| EngineError::Dom("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::Dom("2d context has an unexpected type".to_string()))?;

        // Every load starts now; decode() resolves once the image is ready to paint.
        let mut images = Vec::with_capacity(player.frame_count() as usize);
        let mut decodes = Vec::with_capacity(player.frame_count() as usize);
        for src in player.frame_sources() {
            let image = HtmlImageElement::new().map_err(dom_err("new Image"))?;
            image.set_src(&src);
            decodes.push(image.decode());
            images.push(image);
        }

        let spacer = wrap_in_spacer(&container)?;
        let view = PlayerView {
            player,
            images,
            ctx,
            canvas,
            container,
            spacer,
            caption,
            status,
            sync: FrameCoalescer::new(),
            raf_handle: None,
            layout: None,
            spacer_height: None,
        };
        let view = Rc::new(RefCell::new(view));

        for (i, decode) in decodes.into_iter().enumerate() {
            let weak = Rc::downgrade(&view);
            let index = FrameIndex::new(i as u32);
            wasm_bindgen_futures::spawn_local(async move {
                let decoded = JsFuture::from(decode).await.is_ok();
                // Loads outliving the player finish silently.
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let mut view = shared.borrow_mut();
                let result = if decoded {
                    view.on_decoded(index)
                } else {
                    view.on_failed(index)
                };
                if let Err(err) = result {
                    warn!(%err, index = index.as_u32(), "frame load handling failed");
                }
            });
        }

        let refresh = Rc::new(Closure::<dyn FnMut()>::new({
            let weak = Rc::downgrade(&view);
            move || {
                if let Some(shared) = weak.upgrade() {
                    if let Err(err) = shared.borrow_mut().refresh() {
                        warn!(%err, "frame refresh failed");
                    }
                }
            }
        }));
        let on_scroll = Closure::<dyn FnMut()>::new({
            let weak = Rc::downgrade(&view);
            let refresh = Rc::clone(&refresh);
            move || {
                if let Some(shared) = weak.upgrade() {
                    if let Err(err) = schedule_refresh(&shared, &refresh) {
                        warn!(%err, "could not schedule frame refresh");
                    }
                }
            }
        });

        let mounted = MountedPlayer {
            view,
            on_scroll,
            _refresh: refresh,
        };
        // Undo the spacer and any listeners already added if the rest of the setup fails.
        if let Err(err) = mounted.start() {
            if let Err(cleanup) = mounted.destroy() {
                warn!(%cleanup, "frame player cleanup failed");
            }
            return Err(err);
        }
        debug!("frame player mounted");
        Ok(mounted)
    }

    fn start(&self) -> Result<(), EngineError> {
        {
            let view = self.view.borrow();
            view.paint(&view.player.placeholder())?;
            view.show_state()?;
        }
        let win = window()?;
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        for event in SCROLL_EVENTS {
            win.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                self.on_scroll.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(dom_err("addEventListener"))?;
        }
        Ok(())
    }

    fn destroy(self) -> Result<(), EngineError> {
        let win = window()?;
        for event in SCROLL_EVENTS {
            win.remove_event_listener_with_callback(event, self.on_scroll.as_ref().unchecked_ref())
                .map_err(dom_err("removeEventListener"))?;
        }
        self.view.borrow_mut().release()
    }
}

/// Handle returned to JS for a mounted frame player.
#[wasm_bindgen]
pub struct FramePlayerHandle {
    inner: Option<MountedPlayer>,
}

#[wasm_bindgen]
impl FramePlayerHandle {
    /// Remove listeners, cancel the pending refresh, and release pinning. Idempotent.
    pub fn destroy(&mut self) -> Result<(), JsValue> {
        if let Some(mounted) = self.inner.take() {
            mounted.destroy()?;
        }
        Ok(())
    }

    /// JSON load state, or `null` once destroyed.
    pub fn load_state(&self) -> Result<String, JsValue> {
        let state = self
            .inner
            .as_ref()
            .map(|mounted| mounted.view.borrow().player.load_state());
        Ok(serde_json::to_string(&state).map_err(EngineError::from)?)
    }
}

impl Drop for FramePlayerHandle {
    fn drop(&mut self) {
        if let Some(mounted) = self.inner.take() {
            if let Err(err) = mounted.destroy() {
                warn!(%err, "frame player teardown failed");
            }
        }
    }
}

/// Mount a scroll-driven frame player.
///
/// `container` is pinned while the animation plays, `canvas` is the drawing surface,
/// `caption` fades in at the end, and `status` shows loading and error text.
#[wasm_bindgen(js_name = mountFramePlayer)]
pub fn mount_frame_player(
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    caption: Option<HtmlElement>,
    status: Option<HtmlElement>,
    config_json: &str,
) -> Result<FramePlayerHandle, JsValue> {
    let config: PlayerConfig = serde_json::from_str(config_json).map_err(EngineError::from)?;
    let mounted = MountedPlayer::mount(container, canvas, caption, status, config)?;
    Ok(FramePlayerHandle {
        inner: Some(mounted),
    })
}

// =============================================================================
// Typewriter
// =============================================================================

struct TypewriterView {
    typewriter: Typewriter,
    target: HtmlElement,
    timer: Option<i32>,
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Handle returned to JS for a running typewriter.
#[wasm_bindgen]
pub struct TypewriterHandle {
    view: Rc<RefCell<TypewriterView>>,
    tick: TickSlot,
}

impl TypewriterHandle {
    fn mount(target: HtmlElement, config: TypewriterConfig) -> Result<Self, EngineError> {
        let typewriter = Typewriter::new(config);
        target.set_text_content(Some(&typewriter.display()));
        let idle = typewriter.is_idle();
        let first_delay = typewriter.initial_delay_ms();

        let view = Rc::new(RefCell::new(TypewriterView {
            typewriter,
            target,
            timer: None,
        }));
        let tick: TickSlot = Rc::new(RefCell::new(None));

        let callback = Closure::<dyn FnMut()>::new({
            let view = Rc::downgrade(&view);
            let tick = Rc::downgrade(&tick);
            move || {
                let (Some(view), Some(tick)) = (view.upgrade(), tick.upgrade()) else {
                    return;
                };
                let mut view = view.borrow_mut();
                view.timer = None;
                let Some(step) = view.typewriter.tick() else {
                    return;
                };
                view.target.set_text_content(Some(&step.text));
                let slot = tick.borrow();
                if let Some(callback) = slot.as_ref() {
                    match schedule_timeout(callback, step.delay_ms) {
                        Ok(handle) => view.timer = Some(handle),
                        Err(err) => warn!(%err, "typewriter stopped"),
                    }
                }
            }
        });

        if !idle {
            let handle = schedule_timeout(&callback, first_delay)?;
            view.borrow_mut().timer = Some(handle);
        }
        *tick.borrow_mut() = Some(callback);

        Ok(TypewriterHandle { view, tick })
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        if let Some(handle) = self.view.borrow_mut().timer.take() {
            window()?.clear_timeout_with_handle(handle);
        }
        self.tick.borrow_mut().take();
        Ok(())
    }
}

#[wasm_bindgen]
impl TypewriterHandle {
    /// Stop typing and clear the pending timer. Idempotent.
    pub fn destroy(&mut self) -> Result<(), JsValue> {
        Ok(self.stop()?)
    }
}

impl Drop for TypewriterHandle {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "typewriter teardown failed");
        }
    }
}

#[wasm_bindgen(js_name = mountTypewriter)]
pub fn mount_typewriter(target: HtmlElement, config_json: &str) -> Result<TypewriterHandle, JsValue> {
    let config: TypewriterConfig = serde_json::from_str(config_json).map_err(EngineError::from)?;
    Ok(TypewriterHandle::mount(target, config)?)
}

// =============================================================================
// Scroll reveal
// =============================================================================

/// Handle returned to JS for one revealed element.
#[wasm_bindgen]
pub struct ScrollRevealHandle {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl ScrollRevealHandle {
    fn mount(target: &HtmlElement, config: RevealConfig) -> Result<Self, EngineError> {
        let mut latch = RevealLatch::new(config.threshold);
        let threshold = latch.threshold();
        swap_classes(target, VISIBLE_CLASSES, HIDDEN_CLASSES)?;
        if let Some(delay) = transition_delay(&config) {
            set_style(target, "transition-delay", &delay)?;
        }

        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if latch.observe(entry.intersection_ratio(), entry.is_intersecting()) {
                        let target = entry.target();
                        if let Err(err) = swap_classes(&target, HIDDEN_CLASSES, VISIBLE_CLASSES) {
                            warn!(%err, "reveal class swap failed");
                        }
                        // Latched: nothing left to watch.
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(dom_err("IntersectionObserver"))?;
        observer.observe(target);

        Ok(ScrollRevealHandle {
            observer,
            _callback: callback,
        })
    }
}

#[wasm_bindgen]
impl ScrollRevealHandle {
    pub fn destroy(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ScrollRevealHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Reveal `target` once `threshold` of it is visible, after an optional transition delay.
#[wasm_bindgen(js_name = mountScrollReveal)]
pub fn mount_scroll_reveal(
    target: &HtmlElement,
    threshold: f64,
    delay_ms: Option<u32>,
) -> Result<ScrollRevealHandle, JsValue> {
    let config = RevealConfig {
        threshold,
        delay_ms: delay_ms.unwrap_or(0),
    };
    Ok(ScrollRevealHandle::mount(target, config)?)
}

// =============================================================================
// Scroll-down buttons
// =============================================================================

fn scroll_to_section(id: &str) -> Result<(), EngineError> {
    let target = document()?
        .get_element_by_id(id)
        .ok_or_else(|| EngineError::MissingElement(id.to_string()))?;
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
    Ok(())
}

/// Handle returned to JS for a bound scroll-down button.
#[wasm_bindgen]
pub struct ScrollDownHandle {
    button: HtmlElement,
    on_click: Closure<dyn FnMut()>,
}

impl ScrollDownHandle {
    fn bind(button: HtmlElement, target_id: &str) -> Result<Self, EngineError> {
        button
            .set_attribute("aria-label", &scroll_button_label(target_id))
            .map_err(dom_err("setAttribute"))?;

        let target_id = target_id.to_string();
        let on_click = Closure::<dyn FnMut()>::new(move || match scroll_to_section(&target_id) {
            Ok(()) => {}
            Err(EngineError::MissingElement(id)) => console::warn_1(&JsValue::from_str(&format!(
                "Scroll target element with ID \"{}\" not found.",
                id
            ))),
            Err(err) => warn!(%err, "scroll to section failed"),
        });
        button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(dom_err("addEventListener"))?;

        Ok(ScrollDownHandle { button, on_click })
    }

    fn unbind(&self) -> Result<(), EngineError> {
        self.button
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref())
            .map_err(dom_err("removeEventListener"))
    }
}

#[wasm_bindgen]
impl ScrollDownHandle {
    pub fn destroy(&self) -> Result<(), JsValue> {
        Ok(self.unbind()?)
    }
}

impl Drop for ScrollDownHandle {
    fn drop(&mut self) {
        if let Err(err) = self.unbind() {
            warn!(%err, "scroll button teardown failed");
        }
    }
}

#[wasm_bindgen(js_name = bindScrollDown)]
pub fn bind_scroll_down(button: HtmlElement, target_id: &str) -> Result<ScrollDownHandle, JsValue> {
    Ok(ScrollDownHandle::bind(button, target_id)?)
}

// =============================================================================
// Whole page
// =============================================================================

/// Every component mounted on the landing page.
#[wasm_bindgen]
pub struct LandingHandle {
    player: Option<FramePlayerHandle>,
    typewriter: Option<TypewriterHandle>,
    reveals: Vec<ScrollRevealHandle>,
    scroll_buttons: Vec<ScrollDownHandle>,
}

impl LandingHandle {
    fn mount(config: LandingConfig) -> Result<Self, EngineError> {
        let document = document()?;

        // A broken player must not take the rest of the page down with it.
        let player = Self::mount_player(&document, config.frame_player)
            .map_err(|err| warn!(%err, "frame player not started"))
            .ok();

        // Each component below fails on its own; the rest of the page keeps working.
        let typewriter = optional_element_by_id::<HtmlElement>(&document, TYPEWRITER_ID)
            .and_then(|target| {
                TypewriterHandle::mount(target, config.typewriter)
                    .map_err(|err| warn!(%err, "typewriter not started"))
                    .ok()
            });

        let mut reveals = Vec::new();
        match document.query_selector_all("[data-reveal]") {
            Ok(nodes) => {
                for i in 0..nodes.length() {
                    let Some(element) = nodes
                        .get(i)
                        .and_then(|node| node.dyn_into::<HtmlElement>().ok())
                    else {
                        continue;
                    };
                    let settings = reveal_settings(
                        config.reveal,
                        element.get_attribute("data-threshold").as_deref(),
                        element.get_attribute("data-delay").as_deref(),
                    );
                    match ScrollRevealHandle::mount(&element, settings) {
                        Ok(reveal) => reveals.push(reveal),
                        Err(err) => warn!(%err, "scroll reveal not started"),
                    }
                }
            }
            Err(err) => warn!(err = ?err, "could not look up reveal elements"),
        }

        let mut scroll_buttons = Vec::new();
        for section in SECTIONS {
            let Some(target) = scroll_target_after(section.id) else {
                continue;
            };
            let selector = format!("#{} [data-scroll-down]", section.id);
            let button = document
                .query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            let Some(button) = button else {
                continue;
            };
            match ScrollDownHandle::bind(button, target) {
                Ok(handle) => scroll_buttons.push(handle),
                Err(err) => warn!(%err, section = section.id, "scroll button not bound"),
            }
        }

        debug!(
            reveals = reveals.len(),
            scroll_buttons = scroll_buttons.len(),
            "landing page mounted"
        );
        Ok(LandingHandle {
            player,
            typewriter,
            reveals,
            scroll_buttons,
        })
    }

    fn mount_player(
        document: &Document,
        config: PlayerConfig,
    ) -> Result<FramePlayerHandle, EngineError> {
        let container = element_by_id::<HtmlElement>(document, FRAME_CONTAINER_ID)?;
        let canvas = element_by_id::<HtmlCanvasElement>(document, FRAME_CANVAS_ID)?;
        let caption = optional_element_by_id::<HtmlElement>(document, FRAME_CAPTION_ID);
        let status = optional_element_by_id::<HtmlElement>(document, FRAME_STATUS_ID);
        let mounted = MountedPlayer::mount(container, canvas, caption, status, config)?;
        Ok(FramePlayerHandle {
            inner: Some(mounted),
        })
    }
}

#[wasm_bindgen]
impl LandingHandle {
    /// JSON load state of the frame player, or `null` if it did not start.
    pub fn player_state(&self) -> Result<String, JsValue> {
        match &self.player {
            Some(player) => player.load_state(),
            None => Ok("null".to_string()),
        }
    }

    /// Tear every component down. Idempotent.
    pub fn destroy(&mut self) -> Result<(), JsValue> {
        let mut result = Ok(());
        if let Some(mut player) = self.player.take() {
            result = result.and(player.destroy());
        }
        if let Some(mut typewriter) = self.typewriter.take() {
            result = result.and(typewriter.destroy());
        }
        for reveal in self.reveals.drain(..) {
            reveal.destroy();
        }
        for button in self.scroll_buttons.drain(..) {
            result = result.and(button.destroy());
        }
        result
    }
}

/// Mount the whole landing page. `config_json` overrides the shipped settings.
#[wasm_bindgen(js_name = mountLanding)]
pub fn mount_landing(config_json: Option<String>) -> Result<LandingHandle, JsValue> {
    let config = LandingConfig::from_json(config_json.as_deref().unwrap_or(""))?;
    Ok(LandingHandle::mount(config)?)
}
