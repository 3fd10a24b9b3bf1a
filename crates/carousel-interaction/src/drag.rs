/// 1フレーム分の慣性の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Momentum {
    /// ドラッグ中（ポインタが回転を握っている）
    Held,
    /// 慣性で回転中: 今フレームに加える回転量
    Coast(f32),
    /// 静止
    Rest,
}

/// 横方向ドラッグと慣性
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    active: bool,
    start_x: f32,
    last_x: f32,
    velocity_x: f32,
    /// 前回の step 以降に move があったか
    moved_since_step: bool,
    damping: f32,
    sensitivity: f32,
}

impl DragState {
    pub fn new(damping: f32, sensitivity: f32) -> Self {
        Self {
            active: false,
            start_x: 0.0,
            last_x: 0.0,
            velocity_x: 0.0,
            moved_since_step: false,
            damping: damping.clamp(0.0, 0.999),
            sensitivity,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn velocity(&self) -> f32 {
        self.velocity_x
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// 押下からの移動量（ピクセル）
    pub fn travel(&self) -> f32 {
        self.last_x - self.start_x
    }

    /// 押下からの移動量を取り出し、0に戻す（ドラッグ直後のクリック判定は1回だけ）
    pub fn take_travel(&mut self) -> f32 {
        let travel = self.travel();
        self.start_x = self.last_x;
        travel
    }

    pub fn begin(&mut self, x: f32) {
        self.active = true;
        self.start_x = x;
        self.last_x = x;
        self.velocity_x = 0.0;
        self.moved_since_step = false;
    }

    /// ドラッグ中ならグループに加える回転量を返す
    pub fn update(&mut self, x: f32) -> Option<f32> {
        if !self.active {
            return None;
        }
        let delta = (x - self.last_x) * self.sensitivity;
        self.last_x = x;
        self.velocity_x = delta;
        self.moved_since_step = true;
        Some(delta)
    }

    /// ドラッグ終了。残った速度は step で消費される
    pub fn end(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// ドラッグも慣性も即座に止める
    pub fn cancel(&mut self) {
        self.active = false;
        self.start_x = self.last_x;
        self.velocity_x = 0.0;
        self.moved_since_step = false;
    }

    /// 1フレーム進める
    /// 速度が epsilon 以下になったら0に丸める
    pub fn step(&mut self, epsilon: f32) -> Momentum {
        if self.active {
            // 押したまま止まっていれば離しても飛ばない
            if !std::mem::take(&mut self.moved_since_step) {
                self.velocity_x = 0.0;
            }
            return Momentum::Held;
        }

        if self.velocity_x.abs() > epsilon {
            let delta = self.velocity_x;
            self.velocity_x *= self.damping;
            Momentum::Coast(delta)
        } else {
            self.velocity_x = 0.0;
            Momentum::Rest
        }
    }
}

impl Default for DragState {
    fn default() -> Self {
        Self::new(0.95, 0.005)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_update_requires_begin() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(100.0), None);
        assert_eq!(drag.velocity(), 0.0);
    }

    #[test]
    fn test_update_scales_by_sensitivity() {
        let mut drag = DragState::new(0.95, 0.01);
        drag.begin(100.0);
        let delta = drag.update(150.0).unwrap();
        assert!((delta - 0.5).abs() < 1e-6);
        assert_eq!(drag.velocity(), delta);
        assert_eq!(drag.travel(), 50.0);

        let delta = drag.update(140.0).unwrap();
        assert!((delta + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_take_travel_resets() {
        let mut drag = DragState::default();
        drag.begin(10.0);
        drag.update(70.0);
        drag.end();
        assert_eq!(drag.take_travel(), 60.0);
        assert_eq!(drag.take_travel(), 0.0);
        assert_eq!(drag.travel(), 0.0);
    }

    #[test]
    fn test_velocity_decays_geometrically() {
        let mut drag = DragState::new(0.9, 0.01);
        drag.begin(0.0);
        drag.update(10.0);
        drag.end();
        let v0 = drag.velocity();

        for n in 1..=5 {
            assert!(matches!(drag.step(EPSILON), Momentum::Coast(_)));
            let expected = v0 * 0.9_f32.powi(n);
            assert!((drag.velocity() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_velocity_snaps_to_zero() {
        let mut drag = DragState::new(0.5, 0.001);
        drag.begin(0.0);
        drag.update(1.0);
        drag.end();

        let mut frames = 0;
        while drag.step(EPSILON) != Momentum::Rest {
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(drag.velocity(), 0.0);
        assert_eq!(drag.step(EPSILON), Momentum::Rest);
    }

    #[test]
    fn test_held_without_motion_drops_velocity() {
        let mut drag = DragState::default();
        drag.begin(0.0);
        drag.update(20.0);
        // move と同じフレームでは速度を保持
        assert_eq!(drag.step(EPSILON), Momentum::Held);
        assert!(drag.velocity() > 0.0);
        // 動かないまま1フレーム
        assert_eq!(drag.step(EPSILON), Momentum::Held);
        assert_eq!(drag.velocity(), 0.0);
    }

    #[test]
    fn test_cancel() {
        let mut drag = DragState::default();
        drag.begin(0.0);
        drag.update(50.0);
        drag.cancel();
        assert!(!drag.is_active());
        assert_eq!(drag.velocity(), 0.0);
        assert!(!drag.end());
    }

    #[test]
    fn test_damping_is_clamped() {
        assert!(DragState::new(1.2, 0.005).damping() < 1.0);
        assert_eq!(DragState::new(-1.0, 0.005).damping(), 0.0);
    }
}
