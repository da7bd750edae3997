//! The public sum-container façade.

use std::{
    any::{type_name, TypeId},
    fmt,
    hash::{Hash, Hasher},
    mem::{ManuallyDrop, MaybeUninit},
};

use crate::{
    dispatch::{CloneAlts, DebugAlts, EmbedAlts, EqAlts, HashAlts, PartialEqAlts},
    list::{AltAt, AltList, AnyAlts, HasAlt, Pos},
};

// === Macros === //

/// Names a [`Variant`](struct@Variant) type over the given alternatives.
///
/// `Variant![A, B, C]` is sugar for `Variant<(A, B, C)>`.
#[macro_export]
macro_rules! Variant {
    [$($ty:ty),+ $(,)?] => { $crate::Variant<($($ty,)+)> };
}

// === Variant === //

/// A value holding exactly one of the alternatives in `L` at a time, stored
/// inline in a block of memory shared by every alternative.
///
/// `L` is a flat tuple of one to twelve distinct types; the [`Variant!`]
/// macro provides the usual sugar. The active alternative is tracked by a
/// small tag, and there is no empty state: from construction to destruction,
/// exactly one alternative is live.
///
/// Lists with duplicate entries are not usable: every type-keyed operation on
/// them is ambiguous and rejected at compile time.
///
/// ```compile_fail
/// use variant_utils::Variant;
///
/// // `u32` occupies two positions, so the lookup has no unique answer.
/// let v: Variant![u32, u32] = Variant::new(1u32);
/// ```
///
/// ```
/// use variant_utils::Variant;
///
/// let mut v: Variant![i32, f64, char] = Variant::new('h');
/// assert_eq!(v.index(), 2);
/// assert!(v.is::<char, _>());
/// assert_eq!(*v.get::<char, _>(), 'h');
///
/// v.set(99i32);
/// assert_eq!(v.index(), 0);
/// assert_eq!(*v.get::<i32, _>(), 99);
/// ```
///
/// `Variant` adds no synchronization of its own; it is `Send`/`Sync` exactly
/// when all its alternatives are.
pub struct Variant<L: AltList> {
    pub(crate) tag: u8,
    pub(crate) data: L::Data,
}

impl<L: AltList> Variant<L> {
    // === Construction === //

    /// Constructs a variant holding `value`.
    ///
    /// The alternative is deduced from the argument's type and must be
    /// unambiguous: a value viable for more than one alternative (such as an
    /// untyped integer literal against several integer alternatives) is
    /// rejected at compile time rather than matched to the first candidate.
    ///
    /// ```
    /// use variant_utils::Variant;
    ///
    /// let v: Variant![usize] = Variant::new(99);
    /// assert_eq!(*v.get::<usize, _>(), 99);
    /// ```
    ///
    /// ```compile_fail
    /// use variant_utils::Variant;
    ///
    /// // `1` could be either integer alternative.
    /// let v: Variant![u32, u64] = Variant::new(1);
    /// ```
    pub fn new<T, P>(value: T) -> Self
    where
        L: HasAlt<T, P>,
    {
        let mut data = MaybeUninit::<L::Data>::uninit();
        // Every storage field lives at offset zero (`#[repr(C)]` union), so
        // typed access is a plain cast. The bytes outside `T` stay
        // uninitialized, which a union value permits.
        unsafe { data.as_mut_ptr().cast::<T>().write(value) };
        Self {
            tag: <L as HasAlt<T, P>>::INDEX,
            data: unsafe { data.assume_init() },
        }
    }

    fn with_head(value: L::Head) -> Self {
        let mut data = MaybeUninit::<L::Data>::uninit();
        unsafe { data.as_mut_ptr().cast::<L::Head>().write(value) };
        Self {
            tag: 0,
            data: unsafe { data.assume_init() },
        }
    }

    // === Static queries === //

    /// Number of alternatives in the list.
    pub const fn count() -> usize {
        L::COUNT
    }

    /// Position of `T` within the list.
    ///
    /// Fails to compile if `T` is absent or appears more than once.
    pub const fn index_of<T, P>() -> usize
    where
        L: HasAlt<T, P>,
    {
        <L as HasAlt<T, P>>::INDEX as usize
    }

    /// Whether `T` is one of the alternatives.
    pub fn has<T: 'static>() -> bool
    where
        L: AnyAlts,
    {
        L::contains(TypeId::of::<T>())
    }

    /// Whether `N` is a valid alternative position.
    pub const fn has_at<const N: usize>() -> bool {
        N < L::COUNT
    }

    // === Instance queries === //

    /// Index of the currently active alternative.
    pub fn index(&self) -> usize {
        self.tag as usize
    }

    /// Whether the active alternative is `T`.
    pub fn is<T, P>(&self) -> bool
    where
        L: HasAlt<T, P>,
    {
        self.tag == <L as HasAlt<T, P>>::INDEX
    }

    /// Whether the active alternative is the one at position `N`.
    pub fn is_at<const N: usize>(&self) -> bool
    where
        L: AltAt<Pos<N>>,
    {
        self.tag as usize == N
    }

    /// Type name of the active alternative, for diagnostics.
    pub fn alt_name(&self) -> &'static str {
        L::alt_name(self.tag)
    }

    // === Access === //

    fn alt_ptr<T>(&self) -> *const T {
        (&self.data as *const L::Data).cast()
    }

    fn alt_ptr_mut<T>(&mut self) -> *mut T {
        (&mut self.data as *mut L::Data).cast()
    }

    /// Borrows the active value as `T`, if `T` is the active alternative.
    pub fn try_get<T, P>(&self) -> Option<&T>
    where
        L: HasAlt<T, P>,
    {
        if self.is::<T, P>() {
            Some(unsafe { &*self.alt_ptr::<T>() })
        } else {
            None
        }
    }

    /// Mutably borrows the active value as `T`, if `T` is the active
    /// alternative.
    pub fn try_get_mut<T, P>(&mut self) -> Option<&mut T>
    where
        L: HasAlt<T, P>,
    {
        if self.is::<T, P>() {
            Some(unsafe { &mut *self.alt_ptr_mut::<T>() })
        } else {
            None
        }
    }

    /// Borrows the active value as `T`.
    ///
    /// # Panics
    ///
    /// Panics if the active alternative is not `T`. Requesting a type that is
    /// not in the list at all fails to compile instead:
    ///
    /// ```compile_fail
    /// use variant_utils::Variant;
    ///
    /// let v: Variant![u8, String] = Variant::new(1u8);
    /// v.get::<char, _>(); // `char` is not an alternative
    /// ```
    pub fn get<T, P>(&self) -> &T
    where
        L: HasAlt<T, P>,
    {
        match self.try_get::<T, P>() {
            Some(value) => value,
            None => panic!(
                "variant holds `{}`, not `{}`",
                L::alt_name(self.tag),
                type_name::<T>(),
            ),
        }
    }

    /// Mutably borrows the active value as `T`.
    ///
    /// # Panics
    ///
    /// Panics if the active alternative is not `T`.
    pub fn get_mut<T, P>(&mut self) -> &mut T
    where
        L: HasAlt<T, P>,
    {
        if !self.is::<T, P>() {
            panic!(
                "variant holds `{}`, not `{}`",
                L::alt_name(self.tag),
                type_name::<T>(),
            );
        }
        unsafe { &mut *self.alt_ptr_mut::<T>() }
    }

    /// Borrows the active value by position.
    ///
    /// Out-of-range positions are rejected at compile time:
    ///
    /// ```compile_fail
    /// use variant_utils::Variant;
    ///
    /// let v: Variant![u8, String] = Variant::new(1u8);
    /// v.at::<2>(); // only positions 0 and 1 exist
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the active alternative is not the one at position `N`.
    pub fn at<const N: usize>(&self) -> &<L as AltAt<Pos<N>>>::Alt
    where
        L: AltAt<Pos<N>>,
    {
        if self.tag as usize != N {
            panic!(
                "variant holds `{}` (index {}), not index {}",
                L::alt_name(self.tag),
                self.tag,
                N,
            );
        }
        unsafe { &*self.alt_ptr() }
    }

    /// Mutably borrows the active value by position.
    ///
    /// # Panics
    ///
    /// Panics if the active alternative is not the one at position `N`.
    pub fn at_mut<const N: usize>(&mut self) -> &mut <L as AltAt<Pos<N>>>::Alt
    where
        L: AltAt<Pos<N>>,
    {
        if self.tag as usize != N {
            panic!(
                "variant holds `{}` (index {}), not index {}",
                L::alt_name(self.tag),
                self.tag,
                N,
            );
        }
        unsafe { &mut *self.alt_ptr_mut() }
    }

    // === Mutation === //

    /// Destroys the active value and constructs `T` from `value` in its
    /// place, unconditionally — even when the active alternative already is
    /// `T`. Returns a reference to the new value.
    pub fn emplace<T, P>(&mut self, value: T) -> &mut T
    where
        L: HasAlt<T, P>,
    {
        unsafe { L::drop_alt(&mut self.data, self.tag) };
        // Nothing between the destruction above and the (panic-free) move-in
        // below can fail, so the old value is destroyed exactly once and the
        // tag never names a value that was not fully constructed.
        self.tag = <L as HasAlt<T, P>>::INDEX;
        unsafe {
            let slot = self.alt_ptr_mut::<T>();
            slot.write(value);
            &mut *slot
        }
    }

    /// Assigns `value` to the variant.
    ///
    /// When the active alternative already is `T`, this assigns in place and
    /// the live value's identity is preserved; otherwise the active value is
    /// destroyed and `T` is constructed in its place.
    pub fn set<T, P>(&mut self, value: T) -> &mut T
    where
        L: HasAlt<T, P>,
    {
        if self.is::<T, P>() {
            let slot = unsafe { &mut *self.alt_ptr_mut::<T>() };
            *slot = value;
            slot
        } else {
            self.emplace::<T, P>(value)
        }
    }

    /// Replaces the active value with a default-constructed head alternative,
    /// as if the variant were freshly default-constructed.
    pub fn reset(&mut self)
    where
        L::Head: Default,
    {
        // Construct first: a panicking `Default` leaves the variant intact.
        let value = L::Head::default();
        unsafe { L::drop_alt(&mut self.data, self.tag) };
        self.tag = 0;
        unsafe { self.alt_ptr_mut::<L::Head>().write(value) };
    }

    /// Moves the active value out as `T`, or returns the variant unchanged if
    /// the active alternative is not `T`.
    pub fn into_alt<T, P>(self) -> Result<T, Self>
    where
        L: HasAlt<T, P>,
    {
        if self.is::<T, P>() {
            let this = ManuallyDrop::new(self);
            Ok(unsafe { this.alt_ptr::<T>().read() })
        } else {
            Err(self)
        }
    }

    /// Converts into a variant over a list containing every alternative of
    /// `L`, in any order. The active value is moved and its index recomputed
    /// against the destination list.
    ///
    /// ```
    /// use variant_utils::Variant;
    ///
    /// let small: Variant![String, char] = Variant::new('x');
    /// let big: Variant![u8, String, char] = small.broaden();
    ///
    /// assert!(big.is::<char, _>());
    /// assert_eq!(big.index(), 2);
    /// ```
    pub fn broaden<L2, M>(self) -> Variant<L2>
    where
        L: EmbedAlts<L2, M>,
        L2: AltList,
    {
        L::embed(self)
    }
}

// === Std trait impls === //

impl<L: AltList> Drop for Variant<L> {
    fn drop(&mut self) {
        if L::NEEDS_DROP {
            unsafe { L::drop_alt(&mut self.data, self.tag) };
        }
    }
}

impl<L: AltList> Default for Variant<L>
where
    L::Head: Default,
{
    /// Constructs a variant holding a default-constructed first alternative.
    fn default() -> Self {
        Self::with_head(L::Head::default())
    }
}

impl<L: CloneAlts> Clone for Variant<L> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag,
            data: unsafe { L::clone_alt(&self.data, self.tag) },
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.tag == source.tag {
            // Same alternative on both sides: assign in place, preserving
            // the destination value's identity.
            unsafe { L::clone_from_alt(&mut self.data, &source.data, self.tag) };
        } else {
            // Clone first so that a panicking clone leaves `self` untouched,
            // and update the tag only once the new value is fully built.
            let data = unsafe { L::clone_alt(&source.data, source.tag) };
            unsafe { L::drop_alt(&mut self.data, self.tag) };
            self.data = data;
            self.tag = source.tag;
        }
    }
}

impl<L: PartialEqAlts> PartialEq for Variant<L> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && unsafe { L::eq_alt(&self.data, &other.data, self.tag) }
    }
}

impl<L: EqAlts> Eq for Variant<L> {}

impl<L: HashAlts> Hash for Variant<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.tag);
        unsafe { L::hash_alt(&self.data, self.tag, state) };
    }
}

impl<L: DebugAlts> fmt::Debug for Variant<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variant")
            .field(unsafe { L::debug_alt(&self.data, self.tag) })
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, collections::hash_map::DefaultHasher, mem, rc::Rc};

    use super::*;
    use crate::Variant;

    // === Lifecycle probe === //

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Records every lifecycle event it participates in, so the tests can
    /// observe which operation the dispatch layer actually selected.
    #[derive(Debug)]
    struct Probe {
        log: Log,
        value: i32,
    }

    impl Probe {
        fn new(log: &Log, value: i32) -> Self {
            log.borrow_mut().push("construct");
            Self {
                log: log.clone(),
                value,
            }
        }
    }

    impl Clone for Probe {
        fn clone(&self) -> Self {
            self.log.borrow_mut().push("clone");
            Self {
                log: self.log.clone(),
                value: self.value,
            }
        }

        fn clone_from(&mut self, source: &Self) {
            self.log.borrow_mut().push("clone_from");
            self.value = source.value;
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.log.borrow_mut().push("drop");
        }
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn events(log: &Log) -> Vec<&'static str> {
        log.borrow().clone()
    }

    fn live(log: &Log) -> isize {
        log.borrow().iter().fold(0, |n, ev| match *ev {
            "construct" | "clone" => n + 1,
            "drop" => n - 1,
            _ => n,
        })
    }

    // === Basic state machine === //

    #[test]
    fn default_holds_head() {
        let v = <Variant![i32, String]>::default();
        assert_eq!(v.index(), 0);
        assert_eq!(*v.get::<i32, _>(), 0);
    }

    #[test]
    fn concrete_scenario() {
        let mut v = <Variant![i32, f64, char]>::default();
        v.emplace('h');
        assert_eq!(v.index(), 2);
        assert!(v.is::<char, _>());
        assert_eq!(*v.get::<char, _>(), 'h');

        v.set(99i32);
        assert_eq!(v.index(), 0);
        assert_eq!(*v.get::<i32, _>(), 99);
    }

    #[test]
    fn emplace_round_trip() {
        let mut v: Variant![u8, String, char] = Variant::new(1u8);
        assert_eq!(*v.get::<u8, _>(), 1);

        v.emplace(String::from("mid"));
        assert_eq!(v.get::<String, _>(), "mid");

        v.emplace('z');
        assert_eq!(*v.get::<char, _>(), 'z');
    }

    #[test]
    fn untyped_literal_against_single_alternative() {
        let v: Variant![usize] = Variant::new(99);
        assert_eq!(*v.get::<usize, _>(), 99);
    }

    #[test]
    fn static_queries() {
        type V = Variant![u8, String, char];

        assert_eq!(V::count(), 3);
        assert_eq!(V::index_of::<String, _>(), 1);
        assert!(V::has::<char>());
        assert!(!V::has::<u64>());
        assert!(V::has_at::<0>());
        assert!(V::has_at::<2>());
        assert!(!V::has_at::<3>());
    }

    #[test]
    fn try_get_and_positional_access() {
        let mut v: Variant![u8, String, char] = Variant::new(String::from("pos"));

        assert_eq!(v.try_get::<String, _>().map(String::as_str), Some("pos"));
        assert_eq!(v.try_get::<u8, _>(), None);
        assert!(v.is_at::<1>());
        assert_eq!(v.at::<1>(), "pos");

        v.at_mut::<1>().push('!');
        assert_eq!(v.get::<String, _>(), "pos!");
    }

    #[test]
    #[should_panic(expected = "not `u8`")]
    fn get_wrong_type_panics() {
        let v: Variant![u8, String] = Variant::new(String::from("nope"));
        v.get::<u8, _>();
    }

    #[test]
    #[should_panic(expected = "not index 0")]
    fn at_wrong_index_panics() {
        let v: Variant![u8, String] = Variant::new(String::from("nope"));
        v.at::<0>();
    }

    // === Lifecycle laws === //

    #[test]
    fn destructor_runs_exactly_once() {
        let log = log();
        {
            let _v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));
        }
        assert_eq!(events(&log), ["construct", "drop"]);
    }

    #[test]
    fn emplace_same_type_destroys_then_constructs() {
        let log = log();
        let mut v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));

        v.emplace(Probe::new(&log, 2));
        assert_eq!(v.index(), 1);
        assert_eq!(v.get::<Probe, _>().value, 2);
        // Second construct happens while building the argument; the old
        // value is then dropped exactly once. No assignment is involved.
        assert_eq!(events(&log), ["construct", "construct", "drop"]);

        drop(v);
        assert_eq!(live(&log), 0);
    }

    #[test]
    fn retype_drops_old_exactly_once() {
        let log = log();
        let mut v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));

        v.set(7u8);
        assert_eq!(v.index(), <Variant![u8, Probe]>::index_of::<u8, _>());
        assert_eq!(*v.get::<u8, _>(), 7);
        assert_eq!(events(&log), ["construct", "drop"]);
    }

    #[test]
    fn set_same_alternative_assigns_in_place() {
        let log = log();
        let mut v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));

        v.set(Probe::new(&log, 2));
        assert_eq!(v.index(), 1);
        assert_eq!(v.get::<Probe, _>().value, 2);
        // Plain assignment into the live slot: the replacement is constructed
        // as the argument, moved in, and only the displaced value is dropped.
        assert_eq!(events(&log), ["construct", "construct", "drop"]);

        drop(v);
        assert_eq!(live(&log), 0);
    }

    #[test]
    fn clone_from_same_alternative_assigns_in_place() {
        let log = log();
        let v1: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));
        let mut v2: Variant![u8, Probe] = Variant::new(Probe::new(&log, 2));

        v2.clone_from(&v1);
        assert_eq!(v2.get::<Probe, _>().value, 1);
        // Dispatched to `Probe::clone_from`, not destroy + clone.
        assert_eq!(
            events(&log),
            ["construct", "construct", "clone_from"],
        );

        drop(v1);
        drop(v2);
        assert_eq!(live(&log), 0);
    }

    #[test]
    fn clone_from_different_alternative_replaces() {
        let log = log();
        let v1: Variant![u8, Probe] = Variant::new(Probe::new(&log, 1));
        let mut v2: Variant![u8, Probe] = Variant::new(3u8);

        v2.clone_from(&v1);
        assert_eq!(v2.index(), 1);
        assert_eq!(v2.get::<Probe, _>().value, 1);
        assert_eq!(events(&log), ["construct", "clone"]);

        drop(v1);
        drop(v2);
        assert_eq!(live(&log), 0);
    }

    #[test]
    fn into_alt_moves_or_returns_self() {
        let log = log();
        let v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 5));

        let v = match v.into_alt::<u8, _>() {
            Ok(_) => unreachable!("variant holds a probe"),
            Err(v) => v,
        };
        assert_eq!(events(&log), ["construct"]);

        let probe = v.into_alt::<Probe, _>().ok().unwrap();
        assert_eq!(probe.value, 5);
        drop(probe);
        assert_eq!(live(&log), 0);
    }

    #[test]
    fn reset_returns_to_default_head() {
        let log = log();
        let mut v: Variant![u8, Probe] = Variant::new(Probe::new(&log, 5));

        v.reset();
        assert_eq!(v.index(), 0);
        assert_eq!(*v.get::<u8, _>(), 0);
        assert_eq!(events(&log), ["construct", "drop"]);
    }

    // === Converting construction === //

    #[test]
    fn broaden_remaps_index() {
        let small: Variant![String, char] = Variant::new('c');
        assert_eq!(small.index(), 1);

        let big: Variant![u8, String, char] = small.broaden();
        assert!(big.is::<char, _>());
        assert_eq!(big.index(), <Variant![u8, String, char]>::index_of::<char, _>());
        assert_eq!(*big.get::<char, _>(), 'c');
    }

    #[test]
    fn broaden_moves_without_double_drop() {
        let log = log();
        let small: Variant![Probe, u8] = Variant::new(Probe::new(&log, 9));

        // `Probe` sits at index 0 in the source and index 2 here.
        let big: Variant![u8, String, Probe] = small.broaden();
        assert_eq!(big.index(), 2);
        assert_eq!(big.get::<Probe, _>().value, 9);
        assert_eq!(events(&log), ["construct"]);

        drop(big);
        assert_eq!(live(&log), 0);
    }

    // === Derived impls === //

    #[test]
    fn clone_is_deep() {
        let v1: Variant![u8, String] = Variant::new(String::from("orig"));
        let mut v2 = v1.clone();

        v2.get_mut::<String, _>().push_str("inal");
        assert_eq!(v1.get::<String, _>(), "orig");
        assert_eq!(v2.get::<String, _>(), "original");
    }

    #[test]
    fn eq_compares_tag_then_value() {
        type V = Variant![u8, String];

        let a: V = Variant::new(1u8);
        let b: V = Variant::new(1u8);
        let c: V = Variant::new(2u8);
        let d: V = Variant::new(String::from("1"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn hash_distinguishes_alternatives() {
        fn hash_of(v: &Variant![u32, char]) -> u64 {
            let mut state = DefaultHasher::new();
            v.hash(&mut state);
            state.finish()
        }

        let a: Variant![u32, char] = Variant::new(97u32);
        let b: Variant![u32, char] = Variant::new(97u32);
        let c: Variant![u32, char] = Variant::new('a');

        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn debug_shows_active_value() {
        let v: Variant![i32, char] = Variant::new('h');
        assert_eq!(format!("{v:?}"), "Variant('h')");
    }

    // === Moves and layout === //

    #[test]
    fn whole_variant_swap_is_bitwise() {
        let mut a: Variant![u8, String] = Variant::new(String::from("left"));
        let mut b: Variant![u8, String] = Variant::new(7u8);

        mem::swap(&mut a, &mut b);
        assert_eq!(*a.get::<u8, _>(), 7);
        assert_eq!(b.get::<String, _>(), "left");
    }

    #[test]
    fn twelve_alternatives() {
        type V = Variant![u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, bool, char];

        let mut v = V::default();
        assert_eq!(v.index(), 0);

        v.emplace('@');
        assert_eq!(v.index(), 11);
        assert_eq!(*v.get::<char, _>(), '@');
        assert_eq!(V::count(), 12);
    }
}
