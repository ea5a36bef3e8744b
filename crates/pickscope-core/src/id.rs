//! Identifiers for scene objects, composite models, their elements and labels.
//!
//! All identifiers are small copyable newtypes so they can be stored in
//! selection records without borrowing the scene.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw numeric value.
            #[must_use]
            pub fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identity of one renderable object (a mesh) in the scene.
    ObjectId,
    "object"
);

define_id!(
    /// Identity of a composite model made of addressable elements.
    ModelId,
    "model"
);

define_id!(
    /// Stable key of one semantic element inside a composite model.
    ///
    /// Unlike a face index this does not change when the geometry is rebuilt.
    ElementId,
    "element"
);

define_id!(
    /// Identity of a text annotation.
    AnnotationId,
    "annotation"
);
