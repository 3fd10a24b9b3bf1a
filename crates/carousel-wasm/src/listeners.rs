//! Canvasのポインタイベント
//!
//! クロージャを保持しておき、teardown時にリスナーごと外す

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, MouseEvent, PointerEvent};

use carousel_interaction::Carousel;

type PointerHandler = Closure<dyn FnMut(PointerEvent)>;
type ClickHandler = Closure<dyn FnMut(MouseEvent)>;

pub struct Listeners {
    target: EventTarget,
    pointer: Vec<(&'static str, PointerHandler)>,
    click: Option<ClickHandler>,
}

impl Listeners {
    /// Canvas にポインタ・クリックのリスナーを登録
    pub fn attach(
        canvas: &HtmlCanvasElement,
        carousel: &Rc<RefCell<Carousel>>,
    ) -> Result<Self, JsValue> {
        let mut listeners = Self {
            target: canvas.clone().unchecked_into(),
            pointer: Vec::new(),
            click: None,
        };

        listeners.on_pointer("pointermove", canvas, carousel, |carousel, event, canvas| {
            let (x, y) = (event.offset_x() as f32, event.offset_y() as f32);
            carousel.pointer_moved_screen(
                x,
                y,
                canvas.client_width() as f32,
                canvas.client_height() as f32,
            );
            carousel.pointer_move(x);
        })?;
        listeners.on_pointer("pointerdown", canvas, carousel, |carousel, event, canvas| {
            // Canvas 外へ出てもドラッグを追えるように
            canvas.set_pointer_capture(event.pointer_id()).ok();
            carousel.pointer_down(event.offset_x() as f32);
        })?;
        listeners.on_pointer("pointerup", canvas, carousel, |carousel, _, _| carousel.pointer_up())?;
        for event in ["pointerleave", "pointercancel"] {
            listeners.on_pointer(event, canvas, carousel, |carousel, _, _| carousel.pointer_up())?;
        }

        let shared = Rc::clone(carousel);
        let click = ClickHandler::new(move |_event: MouseEvent| {
            if let Ok(mut carousel) = shared.try_borrow_mut() {
                carousel.click();
            }
        });
        listeners
            .target
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        listeners.click = Some(click);

        log::debug!("attached {} pointer listeners", listeners.pointer.len() + 1);
        Ok(listeners)
    }

    fn on_pointer<F>(
        &mut self,
        event: &'static str,
        canvas: &HtmlCanvasElement,
        carousel: &Rc<RefCell<Carousel>>,
        handler: F,
    ) -> Result<(), JsValue>
    where
        F: Fn(&mut Carousel, &PointerEvent, &HtmlCanvasElement) + 'static,
    {
        let shared = Rc::clone(carousel);
        let canvas = canvas.clone();
        let closure = PointerHandler::new(move |event: PointerEvent| {
            // 描画中（借用中）のイベントは捨てる
            let Ok(mut carousel) = shared.try_borrow_mut() else {
                return;
            };
            handler(&mut carousel, &event, &canvas);
        });
        self.target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.pointer.push((event, closure));
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        !self.pointer.is_empty() || self.click.is_some()
    }

    /// すべてのリスナーを外す（2回目以降は何もしない）
    pub fn detach(&mut self) {
        for (event, closure) in self.pointer.drain(..) {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove {event} listener: {e:?}");
            }
        }
        if let Some(click) = self.click.take() {
            if let Err(e) = self
                .target
                .remove_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove click listener: {e:?}");
            }
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach();
    }
}
