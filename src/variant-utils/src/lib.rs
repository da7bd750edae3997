//! Inline sum-type containers over closed alternative lists.
//!
//! The central type is [`Variant`](struct@Variant): a value that always holds exactly one of
//! a fixed, duplicate-free list of alternative types, stored inline in a
//! single block of memory shared by every alternative — no allocation, no
//! pointer indirection, no empty state. The active alternative is tracked by
//! a small tag, and every lifecycle operation (clone, drop, compare, hash,
//! convert) is routed through per-arity dispatch tables generated at compile
//! time, so each operation costs a single indexed branch rather than a scan.
//!
//! Alternative lists are spelled as flat tuples of one to twelve types; the
//! [`Variant!`](macro@Variant) macro provides the usual sugar:
//!
//! ```
//! use variant_utils::Variant;
//!
//! let mut v: Variant![i32, f64, char] = Variant::new('h');
//! assert_eq!(v.index(), 2);
//! assert_eq!(*v.get::<char, _>(), 'h');
//!
//! v.set(99i32);
//! assert_eq!(v.index(), 0);
//! assert_eq!(*v.get::<i32, _>(), 99);
//! ```
//!
//! Misuse that a sum type must rule out is rejected at compile time wherever
//! possible: looking up a type that is not in the list, a position that is
//! out of range, or a value whose alternative cannot be deduced unambiguously
//! all fail to compile. The only runtime contract is that typed access
//! ([`Variant::get`], [`Variant::at`]) names the *active* alternative;
//! violating it panics rather than reading storage at the wrong type.

mod dispatch;
mod list;
mod storage;
mod variant;

pub use self::{
    dispatch::{CloneAlts, DebugAlts, EmbedAlts, EqAlts, HashAlts, PartialEqAlts},
    list::{AltAt, AltList, AnyAlts, HasAlt, Pos},
    variant::Variant,
};
