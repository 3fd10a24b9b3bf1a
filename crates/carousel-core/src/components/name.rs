/// Nameコンポーネント
/// シーンノードの表示名（ログ出力用）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    value: String,
}

impl Name {
    /// 新しいNameを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }

    /// 添字つきの名前を作成（例: "plane-07"）
    pub fn indexed(prefix: &str, index: usize) -> Self {
        Self::new(format!("{prefix}-{index:02}"))
    }

    /// 名前を文字列スライスとして取得
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new("Node")
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
