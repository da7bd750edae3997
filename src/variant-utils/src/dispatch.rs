//! Tag-indexed lifecycle dispatch.
//!
//! For every supported list arity, `impl_alts!` generates one impl of each
//! trait below. Every operation is an exhaustive `match` over the tag with
//! one arm per alternative — the compile-time equivalent of an unrolled jump
//! table — so dispatch costs a single indexed branch regardless of how many
//! alternatives the list has, and a corrupt tag can never fall off the end
//! into undefined behavior.
//!
//! All the `unsafe fn`s here share one precondition: the storage block holds
//! a live, fully-constructed value of the alternative named by `tag`. The
//! [`Variant`](struct@Variant) façade is the only caller and maintains that
//! invariant.

use std::{
    any::{type_name, TypeId},
    fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop},
    ptr,
};

use crate::{
    list::{AltAt, AltList, AnyAlts, HasAlt, Pos},
    storage::{
        AltData1, AltData10, AltData11, AltData12, AltData2, AltData3, AltData4, AltData5,
        AltData6, AltData7, AltData8, AltData9,
    },
    variant::Variant,
};

// === Dispatch traits === //

/// Clone dispatch, available when every alternative is `Clone`.
pub trait CloneAlts: AltList {
    /// Clone-constructs the alternative at `tag` into fresh storage.
    ///
    /// # Safety
    ///
    /// `data` must hold a live value of the alternative at `tag`.
    unsafe fn clone_alt(data: &Self::Data, tag: u8) -> Self::Data;

    /// Clone-assigns between two live values of the *same* alternative,
    /// preserving the destination value's identity.
    ///
    /// # Safety
    ///
    /// Both `dst` and `src` must hold live values of the alternative at
    /// `tag`.
    unsafe fn clone_from_alt(dst: &mut Self::Data, src: &Self::Data, tag: u8);
}

/// Equality dispatch, available when every alternative is `PartialEq`.
pub trait PartialEqAlts: AltList {
    /// Compares two live values of the *same* alternative.
    ///
    /// # Safety
    ///
    /// Both sides must hold live values of the alternative at `tag`.
    unsafe fn eq_alt(lhs: &Self::Data, rhs: &Self::Data, tag: u8) -> bool;
}

/// Marker: every alternative is `Eq`.
pub trait EqAlts: PartialEqAlts {}

/// Hash dispatch, available when every alternative is `Hash`.
pub trait HashAlts: AltList {
    /// Hashes the live value of the alternative at `tag`.
    ///
    /// # Safety
    ///
    /// `data` must hold a live value of the alternative at `tag`.
    unsafe fn hash_alt<__H: Hasher>(data: &Self::Data, tag: u8, state: &mut __H);
}

/// Debug dispatch, available when every alternative is `Debug`.
pub trait DebugAlts: AltList {
    /// Borrows the live value of the alternative at `tag` as `dyn Debug`.
    ///
    /// # Safety
    ///
    /// `data` must hold a live value of the alternative at `tag`.
    unsafe fn debug_alt(data: &Self::Data, tag: u8) -> &dyn fmt::Debug;
}

/// Converting construction: moves the active value of a variant over `Self`
/// into a variant over `L2`, a list containing every alternative of `Self`
/// (in any order).
///
/// The destination tag is never copied verbatim: it is recomputed through the
/// destination list's own [`HasAlt`] lookup, since a type may occupy
/// different positions in the two lists. `M` is the inferred tuple of
/// destination positions.
pub trait EmbedAlts<L2: AltList, M>: AltList {
    fn embed(this: Variant<Self>) -> Variant<L2>;
}

// === Per-arity tables === //

// Positional impls need the whole generic-parameter list alongside each
// element, which a single repetition cannot express; peel one element per
// recursion step instead, carrying the full list in the brackets.
macro_rules! impl_alt_positions {
    ([$($all:ident)*]) => {};
    ([$($all:ident)*] $ty:ident $idx:tt $(, $($rest:tt)*)?) => {
        impl<$($all),*> HasAlt<$ty, Pos<$idx>> for ($($all,)*) {
            const INDEX: u8 = $idx;
        }

        impl<$($all),*> AltAt<Pos<$idx>> for ($($all,)*) {
            type Alt = $ty;
        }

        impl_alt_positions!([$($all)*] $($($rest)*)?);
    };
}

macro_rules! impl_alts {
    (
        $data:ident, $count:tt, $head:ident, [$($all:ident)*],
        $($ty:ident $field:ident $idx:tt $dst:ident),* $(,)?
    ) => {
        impl<$($all),*> AltList for ($($all,)*) {
            type Data = $data<$($all),*>;
            type Head = $head;

            const COUNT: usize = $count;
            const NEEDS_DROP: bool = $(mem::needs_drop::<$ty>())||*;

            fn alt_name(tag: u8) -> &'static str {
                match tag {
                    $($idx => type_name::<$ty>(),)*
                    _ => "<invalid alternative>",
                }
            }

            unsafe fn drop_alt(data: &mut Self::Data, tag: u8) {
                match tag {
                    $($idx => ManuallyDrop::drop(&mut data.$field),)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }
        }

        impl_alt_positions!([$($all)*] $($ty $idx),*);

        impl<$($all: 'static),*> AnyAlts for ($($all,)*) {
            fn alt_type_id(tag: u8) -> TypeId {
                match tag {
                    $($idx => TypeId::of::<$ty>(),)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }

            fn contains(id: TypeId) -> bool {
                $(id == TypeId::of::<$ty>())||*
            }
        }

        impl<$($all),*> CloneAlts for ($($all,)*)
        where
            $($ty: Clone,)*
        {
            unsafe fn clone_alt(data: &Self::Data, tag: u8) -> Self::Data {
                match tag {
                    $($idx => $data {
                        $field: ManuallyDrop::new(<$ty as Clone>::clone(&data.$field)),
                    },)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }

            unsafe fn clone_from_alt(dst: &mut Self::Data, src: &Self::Data, tag: u8) {
                match tag {
                    $($idx => <$ty as Clone>::clone_from(&mut dst.$field, &src.$field),)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }
        }

        impl<$($all),*> PartialEqAlts for ($($all,)*)
        where
            $($ty: PartialEq,)*
        {
            unsafe fn eq_alt(lhs: &Self::Data, rhs: &Self::Data, tag: u8) -> bool {
                match tag {
                    $($idx => <$ty as PartialEq>::eq(&lhs.$field, &rhs.$field),)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }
        }

        impl<$($all),*> EqAlts for ($($all,)*) where $($ty: Eq,)* {}

        impl<$($all),*> HashAlts for ($($all,)*)
        where
            $($ty: Hash,)*
        {
            unsafe fn hash_alt<__H: Hasher>(data: &Self::Data, tag: u8, state: &mut __H) {
                match tag {
                    $($idx => <$ty as Hash>::hash(&data.$field, state),)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }
        }

        impl<$($all),*> DebugAlts for ($($all,)*)
        where
            $($ty: fmt::Debug,)*
        {
            unsafe fn debug_alt(data: &Self::Data, tag: u8) -> &dyn fmt::Debug {
                match tag {
                    $($idx => &*data.$field,)*
                    _ => unreachable!("variant tag {tag} out of range"),
                }
            }
        }

        impl<$($all,)* __L2, $($dst),*> EmbedAlts<__L2, ($($dst,)*)> for ($($all,)*)
        where
            __L2: AltList $(+ HasAlt<$ty, $dst>)*,
        {
            fn embed(this: Variant<Self>) -> Variant<__L2> {
                let this = ManuallyDrop::new(this);
                match this.tag {
                    // Moving the value out bitwise is the construct-move of
                    // the destination; the source is forgotten, not dropped.
                    $($idx => Variant::<__L2>::new::<$ty, $dst>(unsafe {
                        ManuallyDrop::into_inner(ptr::read(&this.data.$field))
                    }),)*
                    _ => unreachable!("variant tag {} out of range", this.tag),
                }
            }
        }
    };
}

impl_alts! {
    AltData1, 1, A, [A],
    A a 0 NA
}
impl_alts! {
    AltData2, 2, A, [A B],
    A a 0 NA, B b 1 NB
}
impl_alts! {
    AltData3, 3, A, [A B C],
    A a 0 NA, B b 1 NB, C c 2 NC
}
impl_alts! {
    AltData4, 4, A, [A B C D],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND
}
impl_alts! {
    AltData5, 5, A, [A B C D E],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE
}
impl_alts! {
    AltData6, 6, A, [A B C D E F],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF
}
impl_alts! {
    AltData7, 7, A, [A B C D E F G],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG
}
impl_alts! {
    AltData8, 8, A, [A B C D E F G H],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG, H h 7 NH
}
impl_alts! {
    AltData9, 9, A, [A B C D E F G H I],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG, H h 7 NH,
    I i 8 NI
}
impl_alts! {
    AltData10, 10, A, [A B C D E F G H I J],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG, H h 7 NH,
    I i 8 NI, J j 9 NJ
}
impl_alts! {
    AltData11, 11, A, [A B C D E F G H I J K],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG, H h 7 NH,
    I i 8 NI, J j 9 NJ, K k 10 NK
}
impl_alts! {
    AltData12, 12, A, [A B C D E F G H I J K L],
    A a 0 NA, B b 1 NB, C c 2 NC, D d 3 ND, E e 4 NE, F f 5 NF, G g 6 NG, H h 7 NH,
    I i 8 NI, J j 9 NJ, K k 10 NK, L l 11 NL
}
