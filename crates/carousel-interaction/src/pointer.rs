use glam::Vec2;

/// スクリーン座標（ピクセル）→ 正規化デバイス座標
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// ポインタ位置（NDC）
/// 一度でも動けば moved が立ち、以後ホバー判定が有効になる
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    ndc: Vec2,
    moved: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    pub fn update_ndc(&mut self, ndc: Vec2) {
        self.ndc = ndc;
        self.moved = true;
    }

    pub fn update_screen(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.update_ndc(screen_to_ndc(x, y, width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ndc_corners() {
        assert_eq!(screen_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(screen_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_degenerate_viewport() {
        assert_eq!(screen_to_ndc(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_moved_latches() {
        let mut pointer = Pointer::new();
        assert!(!pointer.has_moved());
        pointer.update_screen(200.0, 150.0, 800.0, 600.0);
        assert!(pointer.has_moved());
        assert_eq!(pointer.ndc(), Vec2::new(-0.5, 0.5));
        pointer.update_ndc(Vec2::ZERO);
        assert!(pointer.has_moved());
    }
}
