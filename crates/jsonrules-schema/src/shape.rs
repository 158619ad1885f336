//! # Type Descriptions
//!
//! The schema builder never looks at a live type system. It reads an
//! explicit description of each type, reached through a [`TypeHandle`]:
//!
//! - Rust types implement [`Described`], usually via `#[derive(Record)]`.
//!   This module implements it for scalars, strings, collections, smart
//!   pointers and `serde_json::Value`.
//! - Schema documents loaded at runtime implement [`TypeInfo`] and are
//!   wrapped with [`TypeHandle::new`].
//! - Fields whose type cannot implement [`Described`] (foreign types such
//!   as `uuid::Uuid`) use [`TypeHandle::opaque`], via `#[record(opaque)]`.
//!
//! Handles resolve lazily: a record's shape lists its fields' handles
//! without describing them, so self-referential types are representable.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Serialize, Serializer};

/// A runtime-provided type description.
pub trait TypeInfo: Send + Sync {
    /// Human-readable type name used in errors and logs.
    fn type_name(&self) -> String;

    /// Describe the type one level deep.
    fn shape(&self) -> Shape;
}

/// A Rust type with a static description.
pub trait Described {
    /// Human-readable type name used in errors and logs.
    fn type_name() -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Describe the type one level deep.
    fn shape() -> Shape;
}

/// What a type is, one level deep.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A structured type with named fields.
    Record(RecordShape),
    /// An optional or pointer-like layer around another type.
    Indirect(TypeHandle),
    /// Anything the validator never descends into.
    Leaf(LeafKind),
}

/// Non-record, non-indirect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Bool,
    Number,
    String,
    /// Arrays, vectors and sets. Elements are not validated.
    Sequence,
    /// String-keyed maps without a fixed field set.
    Map,
    /// Any JSON value.
    Any,
}

/// The declared fields of a record, in declaration order.
#[derive(Debug, Clone)]
pub struct RecordShape {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl RecordShape {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// The field's identifier in the declaring type.
    pub ident: String,
    /// Raw annotation, e.g. `"embed,required"`. Parsed by the schema builder.
    pub annotation: Option<String>,
    /// The field's declared type.
    pub ty: TypeHandle,
}

impl FieldDecl {
    pub fn new(ident: impl Into<String>, annotation: Option<&str>, ty: TypeHandle) -> Self {
        Self {
            ident: ident.into(),
            annotation: annotation.map(str::to_string),
            ty,
        }
    }
}

#[derive(Clone)]
enum Repr {
    Static {
        name: fn() -> String,
        shape: fn() -> Shape,
    },
    Dynamic(Arc<dyn TypeInfo>),
}

/// Cheap, clonable reference to a type description.
///
/// `TypeHandle` is `Send + Sync`; validation may run on any thread.
#[derive(Clone)]
pub struct TypeHandle(Repr);

impl TypeHandle {
    /// Handle for a Rust type.
    pub fn of<T: Described + ?Sized>() -> Self {
        Self(Repr::Static {
            name: T::type_name,
            shape: T::shape,
        })
    }

    /// Handle for a type the validator treats as any JSON value.
    pub fn opaque() -> Self {
        Self(Repr::Static {
            name: || "opaque".to_string(),
            shape: || Shape::Leaf(LeafKind::Any),
        })
    }

    /// Handle for a runtime-provided description.
    pub fn new(info: impl TypeInfo + 'static) -> Self {
        Self(Repr::Dynamic(Arc::new(info)))
    }

    pub fn name(&self) -> String {
        match &self.0 {
            Repr::Static { name, .. } => name(),
            Repr::Dynamic(info) => info.type_name(),
        }
    }

    pub fn shape(&self) -> Shape {
        match &self.0 {
            Repr::Static { shape, .. } => shape(),
            Repr::Dynamic(info) => info.shape(),
        }
    }

    /// Peel every `Indirect` layer and return the underlying shape.
    pub fn resolve(&self) -> Shape {
        let mut shape = self.shape();
        while let Shape::Indirect(inner) = shape {
            shape = inner.shape();
        }
        shape
    }

    /// Returns the record shape beneath any indirection layers, if any.
    pub fn record(&self) -> Option<RecordShape> {
        match self.resolve() {
            Shape::Record(record) => Some(record),
            Shape::Indirect(_) | Shape::Leaf(_) => None,
        }
    }

    /// Returns true if the type is a record beneath any indirection layers.
    pub fn is_record(&self) -> bool {
        matches!(self.resolve(), Shape::Record(_))
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name()).finish()
    }
}

impl Serialize for TypeHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

macro_rules! leaf {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Described for $ty {
                fn shape() -> Shape {
                    Shape::Leaf(LeafKind::$kind)
                }
            }
        )+
    };
}

leaf!(Bool => bool);
leaf!(Number => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
leaf!(String => String, str, char, PathBuf, Path, OsString, OsStr);
leaf!(Map => Duration, SystemTime);
leaf!(Any => serde_json::Value, ());
leaf!(Map => serde_json::Map<String, serde_json::Value>);

macro_rules! indirect {
    ($($ty:ident),+) => {
        $(
            impl<T: Described + ?Sized> Described for $ty<T> {
                fn type_name() -> String {
                    format!("{}<{}>", stringify!($ty), T::type_name())
                }

                fn shape() -> Shape {
                    Shape::Indirect(TypeHandle::of::<T>())
                }
            }
        )+
    };
}

indirect!(Box, Rc, Arc, Cell, RefCell);

impl<'a, B: Described + ToOwned + ?Sized> Described for Cow<'a, B> {
    fn type_name() -> String {
        format!("Cow<{}>", B::type_name())
    }

    fn shape() -> Shape {
        Shape::Indirect(TypeHandle::of::<B>())
    }
}

impl<T: Described> Described for Option<T> {
    fn type_name() -> String {
        format!("Option<{}>", T::type_name())
    }

    fn shape() -> Shape {
        Shape::Indirect(TypeHandle::of::<T>())
    }
}

impl<'a, T: Described + ?Sized> Described for &'a T {
    fn type_name() -> String {
        format!("&{}", T::type_name())
    }

    fn shape() -> Shape {
        Shape::Indirect(TypeHandle::of::<T>())
    }
}

impl<'a, T: Described + ?Sized> Described for &'a mut T {
    fn type_name() -> String {
        format!("&mut {}", T::type_name())
    }

    fn shape() -> Shape {
        Shape::Indirect(TypeHandle::of::<T>())
    }
}

macro_rules! sequence {
    ($($ty:ident),+) => {
        $(
            impl<T> Described for $ty<T> {
                fn shape() -> Shape {
                    Shape::Leaf(LeafKind::Sequence)
                }
            }
        )+
    };
}

sequence!(Vec, VecDeque, BTreeSet, HashSet);

impl<T> Described for [T] {
    fn shape() -> Shape {
        Shape::Leaf(LeafKind::Sequence)
    }
}

impl<T, const N: usize> Described for [T; N] {
    fn shape() -> Shape {
        Shape::Leaf(LeafKind::Sequence)
    }
}

macro_rules! tuple {
    ($(($($name:ident),+)),+ $(,)?) => {
        $(
            impl<$($name),+> Described for ($($name,)+) {
                fn shape() -> Shape {
                    Shape::Leaf(LeafKind::Sequence)
                }
            }
        )+
    };
}

tuple!((A), (A, B), (A, B, C), (A, B, C, D), (A, B, C, D, E), (A, B, C, D, E, F));

impl<K, V> Described for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Leaf(LeafKind::Map)
    }
}

impl<K, V, S> Described for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Leaf(LeafKind::Map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point;

    impl Described for Point {
        fn type_name() -> String {
            "Point".into()
        }

        fn shape() -> Shape {
            Shape::Record(RecordShape::new(
                "Point",
                vec![
                    FieldDecl::new("x", Some("x,required"), TypeHandle::of::<i64>()),
                    FieldDecl::new("next", None, TypeHandle::of::<Option<Box<Point>>>()),
                ],
            ))
        }
    }

    #[test]
    fn test_leaves_are_not_records() {
        assert!(!TypeHandle::of::<i64>().is_record());
        assert!(!TypeHandle::of::<String>().is_record());
        assert!(!TypeHandle::of::<Vec<Point>>().is_record());
        assert!(!TypeHandle::of::<Option<u8>>().is_record());
        assert!(!TypeHandle::of::<serde_json::Value>().is_record());
    }

    #[test]
    fn test_std_leaves() {
        assert!(matches!(TypeHandle::of::<PathBuf>().shape(), Shape::Leaf(LeafKind::String)));
        assert!(matches!(TypeHandle::of::<Duration>().shape(), Shape::Leaf(LeafKind::Map)));
        assert!(matches!(TypeHandle::of::<(u8, String)>().shape(), Shape::Leaf(LeafKind::Sequence)));
        assert!(matches!(TypeHandle::of::<Cow<'static, str>>().resolve(), Shape::Leaf(LeafKind::String)));
        assert!(TypeHandle::of::<Cell<Point>>().is_record());
    }

    #[test]
    fn test_opaque_handle() {
        let handle = TypeHandle::opaque();
        assert_eq!(handle.name(), "opaque");
        assert!(matches!(handle.shape(), Shape::Leaf(LeafKind::Any)));
        assert!(!handle.is_record());
    }

    #[test]
    fn test_indirection_unwraps_to_record() {
        assert!(TypeHandle::of::<Point>().is_record());
        assert!(TypeHandle::of::<Option<Point>>().is_record());
        assert!(TypeHandle::of::<Option<Box<Arc<Point>>>>().is_record());
        assert!(TypeHandle::of::<&Point>().is_record());
    }

    #[test]
    fn test_self_reference_is_lazy() {
        let record = TypeHandle::of::<Point>().record().unwrap();
        assert_eq!(record.fields.len(), 2);
        let next = record.fields[1].ty.record().unwrap();
        assert_eq!(next.name, "Point");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TypeHandle::of::<Option<Box<Point>>>().name(), "Option<Box<Point>>");
        assert_eq!(TypeHandle::of::<bool>().name(), "bool");
    }

    #[test]
    fn test_dynamic_handle() {
        struct Named;
        impl TypeInfo for Named {
            fn type_name(&self) -> String {
                "named".into()
            }
            fn shape(&self) -> Shape {
                Shape::Indirect(TypeHandle::of::<Point>())
            }
        }

        let handle = TypeHandle::new(Named);
        assert_eq!(handle.name(), "named");
        assert!(handle.is_record());
        assert_eq!(format!("{handle:?}"), "TypeHandle(\"named\")");
    }
}
