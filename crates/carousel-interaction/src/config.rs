use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::CarouselError;
use crate::layout::{LayoutKind, LayoutPreset};

/// カルーセル全体の設定
///
/// JSON（camelCase）から読み込む。省略したフィールドは既定値になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    /// 平面の枚数
    pub plane_count: usize,
    /// 平面の幅・高さ
    pub plane_size: [f32; 2],
    /// 初期化からアンビエント開始までの待ち時間（秒）
    pub settle_delay: f32,
    /// 登場アニメーションで展開する配置
    pub intro_layout: LayoutKind,
    /// シェーダーの常時揺れの振幅
    pub wave_amplitude: f32,
    /// ホバー効果音を巻き戻してよい終端からの残り時間（秒）
    pub audio_tail: f32,
    /// console_log のレベル（"error" | "warn" | "info" | "debug" | "trace"）
    pub log_level: String,
    pub hover: HoverConfig,
    pub pick: PickConfig,
    pub drag: DragConfig,
    pub ambient: AmbientConfig,
    pub layouts: LayoutConfig,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            plane_count: 36,
            plane_size: [1.0, 1.0],
            settle_delay: 1.0,
            intro_layout: LayoutKind::Circular,
            wave_amplitude: 0.1,
            audio_tail: 0.1,
            log_level: "info".to_string(),
            hover: HoverConfig::default(),
            pick: PickConfig::default(),
            drag: DragConfig::default(),
            ambient: AmbientConfig::default(),
            layouts: LayoutConfig::default(),
        }
    }
}

impl CarouselConfig {
    /// JSON文字列から読み込み、検証する
    pub fn from_json(json: &str) -> Result<Self, CarouselError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// 値を検証する
    /// 範囲外の減衰率・負の時間は丸め、平面0枚はエラー
    pub fn validate(mut self) -> Result<Self, CarouselError> {
        if self.plane_count == 0 {
            return Err(CarouselError::Config("planeCount must be at least 1".into()));
        }
        if !(self.plane_size[0] > 0.0 && self.plane_size[1] > 0.0) {
            return Err(CarouselError::Config("planeSize must be positive".into()));
        }

        self.drag.damping = if self.drag.damping.is_finite() {
            self.drag.damping.clamp(0.0, 0.999)
        } else {
            DragConfig::default().damping
        };
        self.drag.ripple_decay = self.drag.ripple_decay.clamp(0.0, 1.0);
        self.drag.epsilon = self.drag.epsilon.max(f32::EPSILON);

        for seconds in [
            &mut self.settle_delay,
            &mut self.audio_tail,
            &mut self.hover.duration,
            &mut self.pick.plane_duration,
            &mut self.pick.camera_duration,
            &mut self.pick.exit_duration,
            &mut self.pick.stagger,
            &mut self.pick.restore_duration,
            &mut self.ambient.spread_duration,
            &mut self.ambient.camera_duration,
            &mut self.ambient.intro_spin_duration,
            &mut self.ambient.seam_overlap,
            &mut self.layouts.switch_duration,
        ] {
            *seconds = seconds.max(0.0);
        }
        // 周期0だと無限回転が1フレームで終わってしまう
        if self.ambient.spin_period <= 0.0 {
            self.ambient.spin_period = AmbientConfig::default().spin_period;
        }

        Ok(self)
    }

    /// 平面の半分の大きさ（当たり判定用）
    pub fn half_extents(&self) -> glam::Vec2 {
        glam::Vec2::new(self.plane_size[0], self.plane_size[1]) * 0.5
    }
}

/// ホバー時の持ち上げ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverConfig {
    pub lift: f32,
    pub duration: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            lift: 0.25,
            duration: 0.5,
        }
    }
}

/// ピック・復帰の演出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickConfig {
    /// 選択平面が原点へ移動する時間
    pub plane_duration: f32,
    /// カメラが寄る時間
    pub camera_duration: f32,
    /// 寄った後のカメラ位置
    pub camera_position: Vec3,
    /// 他の平面の退避先 y
    pub exit_y: f32,
    pub exit_duration: f32,
    /// 1枚ごとの退避遅延
    pub stagger: f32,
    pub restore_duration: f32,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            plane_duration: 2.0,
            camera_duration: 2.5,
            camera_position: Vec3::new(0.0, 0.0, 2.0),
            exit_y: -10.0,
            exit_duration: 1.5,
            stagger: 0.025,
            restore_duration: 1.5,
        }
    }
}

/// ドラッグと慣性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragConfig {
    /// 1フレームあたりの速度減衰率 [0, 1)
    pub damping: f32,
    /// ピクセル → ラジアン
    pub sensitivity: f32,
    /// これ未満の速度は0とみなす
    pub epsilon: f32,
    /// 波紋の1フレームあたりの減衰率
    pub ripple_decay: f32,
    /// 回転量 → 波紋の強さ
    pub ripple_gain: f32,
    /// これ以上動いたらクリックとみなさない（ピクセル）
    pub click_slop: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            damping: 0.95,
            sensitivity: 0.005,
            epsilon: 1e-4,
            ripple_decay: 0.92,
            ripple_gain: 40.0,
            click_slop: 4.0,
        }
    }
}

/// 登場スピンと常時回転
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AmbientConfig {
    pub spread_duration: f32,
    pub camera_duration: f32,
    pub intro_spin_duration: f32,
    /// 常時回転1周の時間
    pub spin_period: f32,
    /// 登場スピンと常時回転を重ねる時間
    pub seam_overlap: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            spread_duration: 2.0,
            camera_duration: 2.0,
            intro_spin_duration: 3.0,
            spin_period: 30.0,
            seam_overlap: 0.1,
        }
    }
}

/// 配置プリセットと配置パラメータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub stack: LayoutPreset,
    pub linear: LayoutPreset,
    pub circular: LayoutPreset,
    /// 積み重ねの奥行き間隔
    pub stack_depth: f32,
    /// 縦並びの間隔
    pub linear_spacing: f32,
    /// 円形配置の半径
    pub circle_radius: f32,
    /// 配置切り替えの時間
    pub switch_duration: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            stack: LayoutPreset {
                camera_position: Vec3::new(0.0, 0.0, 6.0),
                camera_rotation: Vec3::ZERO,
                group_rotation: Vec3::ZERO,
            },
            linear: LayoutPreset {
                camera_position: Vec3::new(3.0, 0.0, 9.0),
                camera_rotation: Vec3::new(0.0, 0.3, 0.0),
                group_rotation: Vec3::new(0.0, -0.4, 0.0),
            },
            circular: LayoutPreset {
                camera_position: Vec3::new(0.0, 0.0, 15.0),
                camera_rotation: Vec3::ZERO,
                group_rotation: Vec3::ZERO,
            },
            stack_depth: 0.1,
            linear_spacing: 1.2,
            circle_radius: 5.0,
            switch_duration: 1.5,
        }
    }
}
