use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_ptr {
    ($ptr:ident) => {
        impl From<$ptr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(ptr: $ptr<'_>) -> Self {
                ptr.0
            }
        }

        impl $ptr<'_> {
            /// Check if the pointer is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Only checks alignment in debug mode.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "pointer is not aligned. Address {:p} does not have alignment {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }

            /// Moves the pointer forward by `count` bytes.
            ///
            /// # Safety
            /// - The result must stay inside the same allocation.
            /// - The resulting pointer must outlive the lifetime of this pointer.
            #[inline]
            pub const unsafe fn byte_add(self, count: usize) -> Self {
                Self(
                    // SAFETY: The caller keeps the result inside the allocation.
                    unsafe { self.0.add(count) },
                    PhantomData,
                )
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A type-erased shared reference, similar to `&'a dyn Any` without the vtable.
///
/// It must always point to a valid value of whatever the pointee type is, and
/// the pointee must not change while this pointer is alive.
///
/// # Examples
///
/// ```
/// # use ee_ptr::Ptr;
/// let health = 100u32;
/// let ptr = Ptr::from_ref(&health);
///
/// ptr.debug_assert_aligned::<u32>();
/// assert_eq!(unsafe { *ptr.as_ref::<u32>() }, 100);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_ptr!(Ptr);

impl<'a> Ptr<'a> {
    /// Create a `Ptr` from a raw pointer.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid object of the intended pointee type.
    /// - The lifetime `'a` must be valid for the pointee.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Creates a `Ptr` from a reference with same lifetime.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Convert this [`Ptr`] into a `&T` with the same lifetime `'a`.
    ///
    /// # Safety
    ///
    /// The pointee must be a valid, aligned `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: The caller guarantees the pointee is a valid `T`.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline(always)]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// A type-erased exclusive reference, similar to `&'a mut dyn Any`.
///
/// Also used to address raw, not yet initialized slots inside an arena; see
/// [`PtrMut::write`].
///
/// # Examples
///
/// ```
/// # use ee_ptr::PtrMut;
/// let mut speed = 1.5f32;
/// let ptr = PtrMut::from_mut(&mut speed);
///
/// unsafe { *ptr.as_mut::<f32>() = 3.0 };
/// assert_eq!(speed, 3.0);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Create a `PtrMut` from a raw pointer.
    ///
    /// # Safety
    ///
    /// - `ptr` must be valid for writes for the lifetime `'a`.
    /// - No other pointer may access the pointee while this one is alive.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Creates a `PtrMut` from a mutable reference with same lifetime.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Convert this [`PtrMut`] into a `&mut T` with the same lifetime `'a`.
    ///
    /// # Safety
    ///
    /// The pointee must be a valid, aligned `T`.
    #[inline(always)]
    pub const unsafe fn as_mut<T>(self) -> &'a mut T {
        // SAFETY: The caller guarantees the pointee is a valid `T`.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Reborrow as a shorter-lived `PtrMut`.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_> {
        PtrMut(self.0, PhantomData)
    }

    /// Reborrow as a shared [`Ptr`].
    #[inline(always)]
    pub const fn as_ref(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Moves `value` into the slot without reading or dropping the old content,
    /// and returns an [`OwningPtr`] to the now initialized value.
    ///
    /// # Safety
    ///
    /// - The slot must be large enough and aligned for `T`.
    /// - Any previous content is overwritten without being dropped.
    #[inline]
    pub unsafe fn write<T>(self, value: T) -> OwningPtr<'a> {
        self.debug_assert_aligned::<T>();
        // SAFETY: The caller guarantees size and alignment.
        unsafe { self.0.as_ptr().cast::<T>().write(value) };
        OwningPtr(self.0, PhantomData)
    }

    /// Treat the pointee as owned by the returned [`OwningPtr`].
    ///
    /// # Safety
    ///
    /// The pointee must be initialized, and must not be used through this
    /// pointer again after the owner drops or reads it.
    #[inline(always)]
    pub const unsafe fn promote(self) -> OwningPtr<'a> {
        OwningPtr(self.0, PhantomData)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline(always)]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// OwningPtr

/// A type-erased pointer that owns its pointee, but not the allocation.
///
/// If the value is neither [read](OwningPtr::read) nor
/// [dropped](OwningPtr::drop_as) it is leaked.
///
/// # Examples
///
/// ```
/// # use core::mem::MaybeUninit;
/// # use ee_ptr::PtrMut;
/// let mut slot = MaybeUninit::<String>::uninit();
/// let owner = unsafe { PtrMut::from_mut(&mut slot).write(String::from("data://a.msh")) };
///
/// let value = unsafe { owner.read::<String>() };
/// assert_eq!(value, "data://a.msh");
/// ```
#[repr(transparent)]
pub struct OwningPtr<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(OwningPtr);

impl<'a> OwningPtr<'a> {
    /// Create an `OwningPtr` from a raw pointer.
    ///
    /// # Safety
    ///
    /// The pointee must be initialized and owned by nobody else.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> OwningPtr<'a> {
        OwningPtr(ptr, PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Borrow the pointee.
    #[inline(always)]
    pub const fn as_ref(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Borrow the pointee mutably.
    #[inline(always)]
    pub const fn as_mut(&mut self) -> PtrMut<'_> {
        PtrMut(self.0, PhantomData)
    }

    /// Give up ownership and keep an exclusive borrow of the same value.
    ///
    /// Whoever holds the memory becomes responsible for dropping the value.
    #[inline(always)]
    pub const fn demote(self) -> PtrMut<'a> {
        PtrMut(self.0, PhantomData)
    }

    /// Move the value out.
    ///
    /// # Safety
    ///
    /// The pointee must be a valid, aligned `T`.
    #[inline]
    pub unsafe fn read<T>(self) -> T {
        self.debug_assert_aligned::<T>();
        // SAFETY: The caller guarantees the pointee is a valid `T`.
        unsafe { self.0.as_ptr().cast::<T>().read() }
    }

    /// Drop the value in place.
    ///
    /// # Safety
    ///
    /// The pointee must be a valid, aligned `T`.
    #[inline]
    pub unsafe fn drop_as<T>(self) {
        self.debug_assert_aligned::<T>();
        // SAFETY: The caller guarantees the pointee is a valid `T`.
        unsafe { self.0.as_ptr().cast::<T>().drop_in_place() }
    }
}

#[cfg(test)]
mod tests {
    use core::mem::MaybeUninit;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Counted(#[expect(dead_code, reason = "only the drop matters")] u64);

    impl Drop for Counted {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn write_then_drop_in_slot() {
        let mut slots = [const { MaybeUninit::<Counted>::uninit() }; 2];
        let [a, b] = &mut slots;

        unsafe {
            let first = PtrMut::from_mut(a).write(Counted(1));
            let second = PtrMut::from_mut(b).write(Counted(2));
            first.drop_as::<Counted>();
            second.drop_as::<Counted>();
        }

        assert_eq!(DROPS.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn shared_view_of_mut() {
        let mut value = [1u16, 2, 3];
        let ptr = PtrMut::from_mut(&mut value);
        let view = ptr.as_ref();

        assert!(view.is_aligned::<u16>());
        let second = unsafe { view.byte_add(2).as_ref::<u16>() };
        assert_eq!(*second, 2);
    }
}
