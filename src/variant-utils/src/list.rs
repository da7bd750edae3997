//! Compile-time reflection over alternative lists.
//!
//! An alternative list is a non-empty flat tuple of up to twelve types. The
//! traits here form the type-level lookup table the rest of the crate
//! queries: how many alternatives there are, which position a given type
//! occupies, and which type lives at a given position. All of them are
//! implemented for every supported arity by the dispatch layer; nothing here
//! runs at runtime except the name and `TypeId` accessors.

use std::any::TypeId;

// === Position markers === //

/// Type-level position of an alternative within a list.
///
/// Values of this type are never constructed; it exists purely to key the
/// [`HasAlt`] and [`AltAt`] impls so that trait inference can resolve a type
/// to its unique position.
pub struct Pos<const N: usize>;

// === AltList === //

/// A closed, ordered list of alternative types backing a [`Variant`].
///
/// Implemented for tuples `(A,)` through `(A, ..., L)`. The list is purely a
/// type-level entity: it is never instantiated as a tuple value.
///
/// [`Variant`]: struct@crate::Variant
pub trait AltList: Sized {
    /// Inline storage block sized and aligned for the widest alternative.
    type Data;

    /// The first alternative. A default-constructed variant holds this type.
    type Head;

    /// Number of alternatives in the list.
    const COUNT: usize;

    /// Whether any alternative has drop glue. When this is `false`, dropping
    /// a variant over this list does nothing and compiles down to nothing.
    const NEEDS_DROP: bool;

    /// Type name of the alternative at `tag`, for diagnostics.
    fn alt_name(tag: u8) -> &'static str;

    /// Runs the destructor of the alternative at `tag` in place.
    ///
    /// # Safety
    ///
    /// `data` must hold a live, fully-constructed value of the alternative
    /// at `tag`, and that value must not be read or dropped again afterward.
    unsafe fn drop_alt(data: &mut Self::Data, tag: u8);
}

// === Positional lookup === //

/// Membership of `T` in an alternative list, at position `P`.
///
/// `P` is always inferred: exactly one impl exists per occurrence of a type
/// in a list, so resolving the trait for a type that is absent — or that
/// appears more than once — fails to compile rather than picking a position
/// arbitrarily.
pub trait HasAlt<T, P>: AltList {
    /// Position of `T` within the list.
    const INDEX: u8;
}

/// The alternative type at position `P` of the list.
///
/// Out-of-range positions have no impl and are rejected at compile time.
pub trait AltAt<P>: AltList {
    type Alt;
}

// === Runtime type queries === //

/// Runtime reflection over `'static` alternative lists.
pub trait AnyAlts: AltList + 'static {
    /// `TypeId` of the alternative at `tag`.
    fn alt_type_id(tag: u8) -> TypeId;

    /// Whether `id` names one of the alternatives.
    fn contains(id: TypeId) -> bool;
}
