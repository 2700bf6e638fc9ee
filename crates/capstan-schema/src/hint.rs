//! The [`TypeHint`] trait: compile-time type descriptors.
//!
//! Rust has no runtime reflection, so the descriptor a dynamic language
//! would read off an annotation is generated at compile time instead:
//! scalars and containers implement [`TypeHint`] directly, and record/enum
//! types get an implementation from the [`api_record!`](crate::api_record)
//! and [`api_enum!`](crate::api_enum) macros.

use crate::descriptor::TypeDescriptor;

/// Types that can describe themselves as a [`TypeDescriptor`].
///
/// # Example
///
/// ```rust
/// use capstan_schema::{TypeDescriptor, TypeHint};
///
/// assert_eq!(<Option<i64>>::descriptor(),
///            TypeDescriptor::optional(TypeDescriptor::integer()));
/// assert_eq!(<Vec<String>>::descriptor(),
///            TypeDescriptor::list(TypeDescriptor::text()));
/// ```
pub trait TypeHint {
    /// Returns the wire-level descriptor for this type.
    fn descriptor() -> TypeDescriptor;
}

macro_rules! scalar_hint {
    ($kind:ident => $($ty:ty),+) => {
        $(
            impl TypeHint for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Scalar($crate::ScalarKind::$kind)
                }
            }
        )+
    };
}

scalar_hint!(Integer => i16, i32, i64, u16, u32, u64);
scalar_hint!(Float => f32, f64);
scalar_hint!(Boolean => bool);
scalar_hint!(Text => String);
scalar_hint!(Bytes => bytes::Bytes);

impl<T: TypeHint> TypeHint for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }
}

impl<T: TypeHint> TypeHint for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::list(T::descriptor())
    }
}

/// The permissive escape hatch: an unconstrained JSON value.
impl TypeHint for serde_json::Value {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Any
    }
}

/// Declares a structured record type.
///
/// Generates the struct with `serde` derives plus a [`TypeHint`]
/// implementation whose descriptor enumerates the declared fields in order.
///
/// # Example
///
/// ```rust
/// use capstan_schema::{api_record, TypeDescriptor, TypeHint};
///
/// api_record! {
///     /// A user returned by the API.
///     pub struct UserResponse {
///         pub id: i64,
///         pub name: String,
///         pub email: Option<String>,
///     }
/// }
///
/// let descriptor = UserResponse::descriptor();
/// assert_eq!(
///     descriptor,
///     TypeDescriptor::record("UserResponse", vec![
///         ("id", TypeDescriptor::integer()),
///         ("name", TypeDescriptor::text()),
///         ("email", TypeDescriptor::optional(TypeDescriptor::text())),
///     ]),
/// );
/// ```
#[macro_export]
macro_rules! api_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::TypeHint for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::record(
                    stringify!($name),
                    vec![
                        $(
                            (
                                stringify!($field),
                                <$field_ty as $crate::TypeHint>::descriptor(),
                            ),
                        )*
                    ],
                )
            }
        }
    };
}

/// Declares a closed-set (enumerated) type.
///
/// Generates a fieldless enum with `serde` derives (members serialize as
/// their bare names), membership helpers, and a [`TypeHint`] implementation.
///
/// # Example
///
/// ```rust
/// use capstan_schema::{api_enum, TypeDescriptor, TypeHint};
///
/// api_enum! {
///     /// Publication state of a post.
///     pub enum PostStatus {
///         Draft,
///         Published,
///         Archived,
///     }
/// }
///
/// assert_eq!(PostStatus::VARIANTS, &["Draft", "Published", "Archived"]);
/// assert_eq!(PostStatus::parse("Draft"), Some(PostStatus::Draft));
/// assert_eq!(PostStatus::parse("deleted"), None);
/// assert_eq!(
///     PostStatus::descriptor(),
///     TypeDescriptor::enumeration("PostStatus", vec!["Draft", "Published", "Archived"]),
/// );
/// ```
#[macro_export]
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $name {
            /// Valid member names, in declaration order.
            $vis const VARIANTS: &'static [&'static str] = &[
                $(stringify!($variant),)*
            ];

            /// Returns the member's wire name.
            #[must_use]
            $vis fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Parses a wire name into a member, if it is one.
            #[must_use]
            $vis fn parse(value: &str) -> Option<Self> {
                match value {
                    $(stringify!($variant) => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::TypeHint for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::enumeration(
                    stringify!($name),
                    vec![$(stringify!($variant),)*],
                )
            }
        }
    };
}
