/// Store serde types as JSON through the codable pair.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Name {
///     first: String,
///     last: String,
/// }
///
/// stow_bridge::storable_codable!(Name);
/// ```
#[macro_export]
macro_rules! storable_codable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Storable for $ty {
            type Bridge = $crate::JsonBridge<$ty>;
            type ArrayBridge = $crate::JsonBridge<::std::vec::Vec<$ty>>;
        }
    )+};
}

/// Store opaque types as archives.
///
/// `storable_archived!(T)` expects `T: Archive` already. The `serde` form
/// also derives `Archive` from the type's serde impls:
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Avatar(Vec<u8>);
///
/// stow_bridge::storable_archived!(serde Avatar);
/// ```
#[macro_export]
macro_rules! storable_archived {
    (serde $($ty:ty),+ $(,)?) => {$(
        impl $crate::__private::Archive for $ty {
            fn archive(&self) -> $crate::__private::TypeResult<::std::vec::Vec<u8>> {
                $crate::__private::archive::encode(self)
            }

            fn unarchive(bytes: &[u8]) -> $crate::__private::TypeResult<Self> {
                $crate::__private::archive::decode(bytes)
            }
        }
        $crate::storable_archived!($ty);
    )+};
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Storable for $ty {
            type Bridge = $crate::ArchivedBridge<$ty>;
            type ArrayBridge = $crate::ArchivedCollectionBridge<$ty>;
        }
    )+};
}

/// Store enums through their raw value.
///
/// With a case table the macro also implements `RawRepresentable`:
///
/// ```
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum NameType {
///     Given,
///     Family,
/// }
///
/// stow_bridge::storable_raw!(NameType: String {
///     Given => "given",
///     Family => "family",
/// });
/// ```
///
/// Without one, the type must implement `RawRepresentable` itself.
#[macro_export]
macro_rules! storable_raw {
    ($ty:ident : $raw:ty { $($case:ident => $value:expr),+ $(,)? }) => {
        impl $crate::RawRepresentable for $ty {
            type Raw = $raw;

            fn raw_value(&self) -> $raw {
                match self {
                    $(Self::$case => <$raw>::from($value),)+
                }
            }

            fn from_raw(raw: $raw) -> ::std::option::Option<Self> {
                $(
                    if raw == <$raw>::from($value) {
                        return ::std::option::Option::Some(Self::$case);
                    }
                )+
                ::std::option::Option::None
            }
        }
        $crate::storable_raw!($ty);
    };
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Storable for $ty {
            type Bridge = $crate::EnumBridge<$ty>;
            type ArrayBridge = $crate::EnumCollectionBridge<$ty>;
        }
    )+};
}
