/// カルーセルのライフサイクル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// 初期化直後、アンビエント開始待ち
    Settling,
    /// 登場スピン中
    Intro,
    /// 常時回転（配置切り替え後は静止）
    Steady,
    /// ピック演出中
    Picking,
    /// ピック演出完了
    Picked,
    /// 復帰中
    Restoring,
    /// 配置切り替え中
    Arranging,
    /// 破棄済み
    Disposed,
}

impl Stage {
    /// ホバー判定を受け付ける状態か
    pub fn is_animated(self) -> bool {
        matches!(self, Stage::Steady)
    }
}

/// 外から見た操作状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionState {
    Idle,
    Hovering(usize),
    Dragging,
    Picked(usize),
}

/// グループ回転の持ち主
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDriver {
    /// アンビエントTimeline（ホバー中は一時停止）
    Ambient,
    /// ドラッグと慣性
    Drag,
    /// ピック・復帰
    Pick,
    /// 配置切り替え
    Layout,
}

impl RotationDriver {
    /// self から next へ持ち主を移せるか
    pub fn can_hand_over(self, next: RotationDriver) -> bool {
        !matches!(
            (self, next),
            (RotationDriver::Pick, RotationDriver::Drag)
                | (RotationDriver::Layout, RotationDriver::Drag)
        )
    }
}

/// Tween完了・遅延コールから戻ってくるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// 初期化後の待ち時間が明けた
    Settled,
    /// 登場スピン完了
    IntroComplete,
    /// ピック時のカメラ移動完了
    PickArrived,
    /// 復帰完了
    Restored,
    /// 配置切り替え完了
    LayoutSettled,
}
