/// Declares an enum over a fixed-width wire type together with the
/// conversions needed to move between the two, for protocol constants
/// that arrive as raw integers in received messages.
///
/// # Usage
/// Create an enum named `MyProtoAttrs` backed by `u16`:
///
/// ```
/// stadump::impl_var!(
///     pub MyProtoAttrs, u16,
///     Id => 16u16,
///     Name => 17u16,
///     Size => 18u16
/// );
/// ```
///
/// Every generated enum carries an `UnrecognizedVariant` holding the
/// raw value, so a constant this crate does not know about survives a
/// round trip instead of vanishing or failing the parse.
#[macro_export]
macro_rules! impl_var {
    (
        $( #[$outer:meta] )*
        $vis:vis $name:ident, $ty:ty,
        $(
            $( #[$inner:meta] )*
            $var:ident => $val:expr
        ),* $(,)?
    ) => (
        $(#[$outer])*
        #[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        $vis enum $name {
            $(
                $( #[$inner] )*
                #[allow(missing_docs)]
                $var,
            )*
            /// Variant that signifies a value with no known
            /// counterpart at the time this crate was written
            UnrecognizedVariant($ty),
        }

        impl $name {
            /// Returns true if no variant corresponds to the value
            /// it was parsed from
            pub fn is_unrecognized(&self) -> bool {
                matches!(*self, $name::UnrecognizedVariant(_))
            }
        }

        impl From<$ty> for $name {
            fn from(v: $ty) -> Self {
                match v {
                    $(
                        i if i == $val => $name::$var,
                    )*
                    i => $name::UnrecognizedVariant(i),
                }
            }
        }

        impl From<$name> for $ty {
            fn from(v: $name) -> Self {
                match v {
                    $(
                        $name::$var => $val,
                    )*
                    $name::UnrecognizedVariant(i) => i,
                }
            }
        }

        impl<'a> From<&'a $name> for $ty {
            fn from(v: &'a $name) -> Self {
                match *v {
                    $(
                        $name::$var => $val,
                    )*
                    $name::UnrecognizedVariant(i) => i,
                }
            }
        }
    );
}
