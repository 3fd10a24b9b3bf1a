use crate::components::Transform;
use crate::math::Vec3;

/// ベクトル成分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Vec3から成分を取り出す
    #[inline]
    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Vec3の成分を書き換える
    #[inline]
    pub fn set(self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Tween可能なプロパティ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Position(Axis),
    Rotation(Axis),
}

impl Property {
    pub const POSITION: [Property; 3] = [
        Property::Position(Axis::X),
        Property::Position(Axis::Y),
        Property::Position(Axis::Z),
    ];
    pub const ROTATION: [Property; 3] = [
        Property::Rotation(Axis::X),
        Property::Rotation(Axis::Y),
        Property::Rotation(Axis::Z),
    ];
}

/// Tweenの書き込み先
/// Kはターゲットの識別子（カメラ、グループ、平面など）
pub trait Animatable<K> {
    /// 現在値を取得（ターゲットが存在しない場合None）
    fn read(&self, target: K, property: Property) -> Option<f32>;
    /// 値を書き込む（存在しないターゲットは無視）
    fn write(&mut self, target: K, property: Property, value: f32);
}

impl Transform {
    /// プロパティ値を取得
    pub fn property(&self, property: Property) -> f32 {
        match property {
            Property::Position(axis) => axis.get(self.position),
            Property::Rotation(axis) => axis.get(self.rotation),
        }
    }

    /// プロパティ値を設定
    pub fn set_property(&mut self, property: Property, value: f32) {
        match property {
            Property::Position(axis) => axis.set(&mut self.position, value),
            Property::Rotation(axis) => axis.set(&mut self.rotation, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_get_set() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::Y.get(v), 2.0);
        Axis::Z.set(&mut v, 9.0);
        assert_eq!(v, Vec3::new(1.0, 2.0, 9.0));
    }

    #[test]
    fn test_transform_property_access() {
        let mut t = Transform::identity();
        t.set_property(Property::Position(Axis::Y), 0.25);
        t.set_property(Property::Rotation(Axis::Y), -1.5);
        assert_eq!(t.position.y, 0.25);
        assert_eq!(t.property(Property::Rotation(Axis::Y)), -1.5);
        assert_eq!(t.property(Property::Position(Axis::X)), 0.0);
    }
}
