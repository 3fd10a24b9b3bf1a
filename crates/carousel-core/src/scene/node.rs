use std::num::NonZeroU32;

use crate::components::{Name, Transform};

/// ノード識別子（世代番号付き）
/// - index: ノード配列のインデックス
/// - generation: 再利用時の世代番号（削除済みノードとの区別用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: NonZeroU32,
}

impl NodeId {
    /// 世代0は無効値として扱い、1に丸める
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation: NonZeroU32::new(generation).unwrap_or(NonZeroU32::MIN),
        }
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }
}

/// 描画リソースへの参照
/// 平面メッシュは平面インデックスで識別し、GPU側のバッファ・テクスチャと対応付ける
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef {
    pub plane: usize,
}

/// シーンノード
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Name,
    pub transform: Transform,
    pub mesh: Option<MeshRef>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: Name, transform: Transform) -> Self {
        Self {
            name,
            transform,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// 親ノード
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// 子ノード一覧（追加順）
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
