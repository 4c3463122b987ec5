//! Plain vector and matrix aggregates.
//!
//! These are layout types: fields are laid out in declaration order with C
//! representation so they can be copied straight into uniform buffers.
//! Matrices are stored as column vectors.

macro_rules! aggregate {
    ($(#[$meta:meta])* $name:ident<$t:ident> { $($field:ident: $ty:ty),+ }) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        pub struct $name<$t> {
            $(pub $field: $ty),+
        }

        impl<$t> $name<$t> {
            #[inline]
            #[must_use]
            pub const fn new($($field: $ty),+) -> Self {
                $name { $($field),+ }
            }
        }
    };
}

aggregate!(
    /// Two-component vector.
    Vector2<T> { x: T, y: T }
);
aggregate!(
    /// Three-component vector.
    Vector3<T> { x: T, y: T, z: T }
);
aggregate!(
    /// Four-component vector.
    Vector4<T> { x: T, y: T, z: T, w: T }
);
aggregate!(
    /// 2x2 matrix of column vectors.
    Matrix2<T> { x: Vector2<T>, y: Vector2<T> }
);
aggregate!(
    /// 3x3 matrix of column vectors.
    Matrix3<T> { x: Vector3<T>, y: Vector3<T>, z: Vector3<T> }
);
aggregate!(
    /// 4x4 matrix of column vectors.
    Matrix4<T> { x: Vector4<T>, y: Vector4<T>, z: Vector4<T>, w: Vector4<T> }
);

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Vec4 = Vector4<f32>;
pub type Mat2 = Matrix2<f32>;
pub type Mat3 = Matrix3<f32>;
pub type Mat4 = Matrix4<f32>;

impl Mat4 {
    /// The identity transform.
    pub const IDENTITY: Mat4 = Matrix4::new(
        Vector4::new(1.0, 0.0, 0.0, 0.0),
        Vector4::new(0.0, 1.0, 0.0, 0.0),
        Vector4::new(0.0, 0.0, 1.0, 0.0),
        Vector4::new(0.0, 0.0, 0.0, 1.0),
    );
}
