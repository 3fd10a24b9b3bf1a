use crate::components::{Name, Transform};
use crate::math::Mat4;

use super::node::{Node, NodeId};

/// ノード格納スロット
struct Slot {
    /// 現在の世代番号
    generation: u32,
    /// 生存中のノード（削除済みならNone）
    node: Option<Node>,
}

/// シーングラフ
/// ノードの生成・削除、親子関係、ワールド行列の計算を担当
pub struct SceneGraph {
    slots: Vec<Slot>,
    /// 再利用可能なインデックス
    free_list: Vec<u32>,
    /// ルートに接続されたノード（描画対象）
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// 空のシーングラフを作成
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// 新規ノードを生成（どこにも接続されていない状態）
    pub fn spawn(&mut self, name: Name, transform: Transform) -> NodeId {
        let node = Node::new(name, transform);

        if let Some(index) = self.free_list.pop() {
            // 再利用: 世代番号をインクリメント
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(index, 1)
        }
    }

    /// ノードが生存しているか確認
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index() as usize)
            .is_some_and(|slot| slot.node.is_some() && slot.generation == id.generation())
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Transformを取得
    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.get(id).map(|node| &node.transform)
    }

    /// Transformを取得（可変）
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.get_mut(id).map(|node| &mut node.transform)
    }

    /// シーンのルートに接続
    pub fn add_root(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) || self.roots.contains(&id) {
            return false;
        }
        self.detach(id);
        self.roots.push(id);
        true
    }

    /// ルートから切り離す（ノード自体は残る）
    pub fn remove_root(&mut self, id: NodeId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&root| root != id);
        self.roots.len() != before
    }

    /// ルートノード一覧
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// childをparentの子として接続（既存の親からは切り離す）
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> bool {
        if child == parent || !self.is_alive(child) || !self.is_alive(parent) {
            return false;
        }
        // 循環を防ぐ: parentの祖先にchildが含まれていないこと
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return false;
        }

        self.detach(child);
        self.remove_root(child);

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// 親から切り離す
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.get(child).and_then(|node| node.parent) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = None;
        }
    }

    /// ノードと子孫をすべて削除し、削除されたノードを返す
    /// 既に削除済みのIDに対しては空のVecを返す
    pub fn despawn(&mut self, id: NodeId) -> Vec<Node> {
        if !self.is_alive(id) {
            return Vec::new();
        }

        self.detach(id);
        self.remove_root(id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index() as usize) else {
                continue;
            };
            if slot.generation != current.generation() {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children.iter().copied());
                self.free_list.push(current.index());
                removed.push(node);
            }
        }

        log::debug!("despawned {} node(s)", removed.len());
        removed
    }

    /// 祖先ノードを親から順にイテレート
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).and_then(|node| node.parent), |&current| {
            self.get(current).and_then(|node| node.parent)
        })
    }

    /// ワールド行列（親のTransformを合成）
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut matrix = self.get(id)?.transform.to_matrix();
        for ancestor in self.ancestors(id) {
            if let Some(node) = self.get(ancestor) {
                matrix = node.transform.to_matrix() * matrix;
            }
        }
        Some(matrix)
    }

    /// 生存ノード数
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// 生存ノードをイテレート
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeId::new(index as u32, slot.generation), node))
        })
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, TAU};

    fn spawn_at(scene: &mut SceneGraph, name: &str, position: Vec3) -> NodeId {
        scene.spawn(Name::new(name), Transform::from_position(position))
    }

    #[test]
    fn test_spawn_and_reuse() {
        let mut scene = SceneGraph::new();
        let a = spawn_at(&mut scene, "a", Vec3::ZERO);
        assert!(scene.is_alive(a));

        assert_eq!(scene.despawn(a).len(), 1);
        assert!(!scene.is_alive(a));

        // 再利用: 同じindexだが世代が異なる
        let b = spawn_at(&mut scene, "b", Vec3::ZERO);
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), 2);
        assert!(scene.get(a).is_none());
        assert!(scene.is_alive(b));
    }

    #[test]
    fn test_despawn_is_recursive() {
        let mut scene = SceneGraph::new();
        let group = spawn_at(&mut scene, "group", Vec3::ZERO);
        let children: Vec<_> = (0..3)
            .map(|i| spawn_at(&mut scene, "plane", Vec3::X * i as f32))
            .collect();
        for &child in &children {
            assert!(scene.attach(child, group));
        }
        assert!(scene.add_root(group));

        let removed = scene.despawn(group);
        assert_eq!(removed.len(), 4);
        assert_eq!(scene.node_count(), 0);
        assert!(scene.roots().is_empty());
        assert!(children.iter().all(|&c| !scene.is_alive(c)));
    }

    #[test]
    fn test_double_despawn_is_harmless() {
        let mut scene = SceneGraph::new();
        let group = spawn_at(&mut scene, "group", Vec3::ZERO);
        assert_eq!(scene.despawn(group).len(), 1);
        assert!(scene.despawn(group).is_empty());
    }

    #[test]
    fn test_world_matrix_composes_parent() {
        let mut scene = SceneGraph::new();
        let group = spawn_at(&mut scene, "group", Vec3::ZERO);
        let plane = spawn_at(&mut scene, "plane", Vec3::new(5.0, 0.0, 0.0));
        scene.attach(plane, group);

        // グループをY軸90°回転 → +Xの子は-Z方向へ
        scene.transform_mut(group).unwrap().rotation.y = TAU / 4.0;
        let world = scene.world_matrix(plane).unwrap();
        let center = world.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_attach_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = spawn_at(&mut scene, "a", Vec3::ZERO);
        let b = spawn_at(&mut scene, "b", Vec3::ZERO);
        assert!(scene.attach(b, a));
        assert!(!scene.attach(a, b));
        assert!(!scene.attach(a, a));
    }

    #[test]
    fn test_reattach_moves_child() {
        let mut scene = SceneGraph::new();
        let a = spawn_at(&mut scene, "a", Vec3::ZERO);
        let b = spawn_at(&mut scene, "b", Vec3::ZERO);
        let child = spawn_at(&mut scene, "child", Vec3::ZERO);
        scene.attach(child, a);
        scene.attach(child, b);
        assert!(scene.get(a).unwrap().children().is_empty());
        assert_eq!(scene.get(b).unwrap().children(), &[child]);
        assert_eq!(scene.get(child).unwrap().parent(), Some(b));
    }
}
