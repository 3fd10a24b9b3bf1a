//! ブラウザ向けカルーセル
//!
//! WebGPUの初期化・画像テクスチャ・DOMイベントをまとめ、
//! JSからは [`CarouselApp`] だけを操作する

mod audio;
mod listeners;
mod renderer;
mod shaders;
mod utils;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAudioElement, HtmlCanvasElement, ImageData};

use carousel_interaction::{Carousel, CarouselConfig, CarouselContext};
use carousel_renderer::Camera;

use audio::HtmlAudioCue;
use listeners::Listeners;
use renderer::Renderer;

/// wasm初期化時にパニックフックを設定
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// JSへ返す状態（デバッグUI用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateReport {
    stage: String,
    interaction: String,
    driver: String,
    layout: Option<String>,
    hovered: Option<usize>,
    picked: Option<usize>,
    drag_velocity: f32,
}

/// カルーセルアプリケーション
#[wasm_bindgen]
pub struct CarouselApp {
    carousel: Rc<RefCell<Carousel>>,
    renderer: Renderer,
    listeners: Listeners,
}

#[wasm_bindgen]
impl CarouselApp {
    /// WebGPU・テクスチャ・リスナーを用意してカルーセルを作成（非同期）
    ///
    /// - `images`: デコード済み `ImageData` の配列（平面の枚数以上）
    /// - `config`: 設定オブジェクト、JSON文字列、または undefined
    pub async fn create(
        canvas: HtmlCanvasElement,
        images: js_sys::Array,
        config: JsValue,
    ) -> Result<CarouselApp, JsValue> {
        let config = parse_config(config)?;
        utils::init_logging(&config.log_level);

        let images = images
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value
                    .dyn_into::<ImageData>()
                    .map_err(|_| JsValue::from_str(&format!("images[{index}] is not ImageData")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut renderer = Renderer::create(canvas.clone(), config.plane_size).await?;
        let textures = renderer.upload_images(&images)?;
        renderer.prepare(config.plane_count);

        let context = CarouselContext {
            camera: Camera::new(renderer.aspect()),
            textures,
            audio: None,
        };
        let carousel = Carousel::new(config, context).map_err(utils::to_js)?;
        let carousel = Rc::new(RefCell::new(carousel));
        let listeners = Listeners::attach(&canvas, &carousel)?;

        log::info!("carousel app created ({} images)", images.len());

        Ok(Self {
            carousel,
            renderer,
            listeners,
        })
    }

    /// 1フレーム進めて描画（elapsed: 経過秒）
    pub fn frame(&mut self, elapsed: f32) -> Result<(), JsValue> {
        let mut carousel = self
            .carousel
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("carousel is busy"))?;
        carousel.tick(elapsed);
        self.renderer.render(&carousel)
    }

    /// Canvas サイズ変更
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.renderer.resize(width, height) {
            self.carousel
                .borrow_mut()
                .set_aspect(width as f32 / height as f32);
        }
    }

    /// 配置を切り替え（不明な名前は無視して false）
    pub fn switch_layout(&mut self, name: &str) -> bool {
        self.carousel.borrow_mut().switch_layout(name)
    }

    /// ホバー効果音を設定
    pub fn set_audio(&mut self, element: HtmlAudioElement) {
        self.carousel
            .borrow_mut()
            .set_audio(Some(Box::new(HtmlAudioCue::new(element))));
    }

    /// 効果音を外す
    pub fn clear_audio(&mut self) {
        self.carousel.borrow_mut().set_audio(None);
    }

    /// 設定済みの配置名一覧
    pub fn layouts(&self) -> Vec<String> {
        self.carousel
            .borrow()
            .layouts()
            .kinds()
            .map(|kind| kind.name().to_string())
            .collect()
    }

    /// 現在の状態
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let carousel = self.carousel.borrow();
        let report = StateReport {
            stage: format!("{:?}", carousel.stage()),
            interaction: format!("{:?}", carousel.interaction()),
            driver: format!("{:?}", carousel.driver()),
            layout: carousel.current_layout().map(|kind| kind.name().to_string()),
            hovered: carousel.hovered(),
            picked: carousel.picked(),
            drag_velocity: carousel.drag().velocity(),
        };
        serde_wasm_bindgen::to_value(&report).map_err(utils::to_js)
    }

    /// Canvas サイズ取得
    pub fn width(&self) -> u32 {
        self.renderer.size().0
    }

    pub fn height(&self) -> u32 {
        self.renderer.size().1
    }

    /// リスナー・平面・GPUリソースを解放（何度呼んでもよい）
    pub fn teardown(&mut self) {
        if !self.listeners.is_attached() {
            log::warn!("teardown called more than once");
            return;
        }
        self.listeners.detach();
        let released = self.carousel.borrow_mut().teardown();
        self.renderer.destroy();
        log::info!("carousel app torn down ({} planes released)", released.len());
    }
}

/// 設定を読み込む（undefined/null は既定値）
fn parse_config(value: JsValue) -> Result<CarouselConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CarouselConfig::default());
    }
    if let Some(json) = value.as_string() {
        return CarouselConfig::from_json(&json).map_err(utils::to_js);
    }
    serde_wasm_bindgen::from_value(value).map_err(utils::to_js)
}
