//! Inert storage blocks shared by every alternative of a list.
//!
//! Each arity gets a dedicated `#[repr(C)]` union whose fields all start at
//! offset zero, so the block is exactly as large and as aligned as the widest
//! alternative and typed access is a pointer cast. The unions never construct
//! or drop anything on their own: every field is `ManuallyDrop`, leaving all
//! lifecycle decisions to the dispatch layer and the externally-tracked tag.

use std::mem::ManuallyDrop;

macro_rules! define_alt_data {
    ($($name:ident { $($field:ident: $ty:ident),* $(,)? })*) => {$(
        #[doc(hidden)]
        #[repr(C)]
        pub union $name<$($ty),*> {
            $(pub(crate) $field: ManuallyDrop<$ty>,)*
        }
    )*};
}

define_alt_data! {
    AltData1 { a: A }
    AltData2 { a: A, b: B }
    AltData3 { a: A, b: B, c: C }
    AltData4 { a: A, b: B, c: C, d: D }
    AltData5 { a: A, b: B, c: C, d: D, e: E }
    AltData6 { a: A, b: B, c: C, d: D, e: E, f: F }
    AltData7 { a: A, b: B, c: C, d: D, e: E, f: F, g: G }
    AltData8 { a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H }
    AltData9 { a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I }
    AltData10 { a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J }
    AltData11 { a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K }
    AltData12 { a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K, l: L }
}

#[cfg(test)]
mod test {
    use std::mem;

    use super::*;

    #[test]
    fn max_size_max_align() {
        assert_eq!(mem::size_of::<AltData2<u8, u64>>(), 8);
        assert_eq!(mem::align_of::<AltData2<u8, u64>>(), 8);
        assert_eq!(mem::size_of::<AltData3<u8, u16, u32>>(), 4);
        assert_eq!(mem::align_of::<AltData3<u8, u16, u32>>(), 4);
    }

    #[test]
    fn no_implicit_drop() {
        // A storage block going out of scope must not touch its contents.
        let data = AltData2::<String, u32> {
            a: ManuallyDrop::new(String::from("leaked on purpose")),
        };
        let value = unsafe { ManuallyDrop::into_inner(std::ptr::read(&data.a)) };
        assert_eq!(value, "leaked on purpose");
    }
}
