use smallvec::SmallVec;

use crate::reflection::{PropertyType, PropertyTypeDesc, Reflect, ReflectArray, ReflectMut, ReflectRef};

fn move_in_slice<T>(slice: &mut [T], from: usize, to: usize) -> bool {
    if from >= slice.len() || to >= slice.len() {
        return false;
    }
    if from < to {
        slice[from..=to].rotate_left(1);
    } else {
        slice[to..=from].rotate_right(1);
    }
    true
}

fn slices_eq<T: Reflect>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.reflect_eq(b))
}

macro_rules! impl_reflect_common {
    () => {
        #[inline]
        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Array(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Array(self)
        }

        fn reflect_eq(&self, other: &dyn Reflect) -> bool {
            other
                .downcast_ref::<Self>()
                .is_some_and(|other| slices_eq(&self[..], &other[..]))
        }
    };
}

// -----------------------------------------------------------------------------
// Dynamic arrays

macro_rules! impl_dynamic_array {
    ($(impl[$($generics:tt)*] for $ty:ty;)*) => {$(
        impl<$($generics)*> Reflect for $ty
        where
            T: PropertyType,
        {
            impl_reflect_common!();

            fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
                let Some(other) = other.downcast_ref::<Self>() else {
                    return false;
                };
                self.resize_with(other.len(), T::default);
                for (dst, src) in self.iter_mut().zip(other.iter()) {
                    dst.reflect_set(src);
                }
                true
            }
        }

        impl<$($generics)*> ReflectArray for $ty
        where
            T: PropertyType,
        {
            #[inline]
            fn is_dynamic(&self) -> bool {
                true
            }

            #[inline]
            fn len(&self) -> usize {
                <[T]>::len(self)
            }

            #[inline]
            fn element(&self, index: usize) -> Option<&dyn Reflect> {
                self.get(index).map(|e| e as &dyn Reflect)
            }

            #[inline]
            fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
                self.get_mut(index).map(|e| e as &mut dyn Reflect)
            }

            #[inline]
            fn element_size(&self) -> usize {
                size_of::<T>()
            }

            fn set_len(&mut self, len: usize) -> bool {
                let additional = len.saturating_sub(<[T]>::len(self));
                if additional > 0 && self.try_reserve(additional).is_err() {
                    return false;
                }
                self.resize_with(len, T::default);
                true
            }

            fn insert_default(&mut self, index: usize) -> bool {
                if index > <[T]>::len(self) {
                    return false;
                }
                self.insert(index, T::default());
                true
            }

            fn remove(&mut self, index: usize) -> bool {
                if index >= <[T]>::len(self) {
                    return false;
                }
                // Element is dropped here.
                let _ = <$ty>::remove(self, index);
                true
            }

            #[inline]
            fn move_element(&mut self, from: usize, to: usize) -> bool {
                move_in_slice(self, from, to)
            }

            fn new_default_element(&self) -> Box<dyn Reflect> {
                Box::new(T::default())
            }
        }
    )*};
}

impl_dynamic_array! {
    impl[T] for Vec<T>;
    impl[T, const N: usize] for SmallVec<[T; N]>;
}

impl<T: PropertyType> PropertyType for Vec<T> {
    fn property_type() -> PropertyTypeDesc {
        T::property_type().into_array(size_of::<T>(), None)
    }
}

impl<T: PropertyType, const N: usize> PropertyType for SmallVec<[T; N]> {
    fn property_type() -> PropertyTypeDesc {
        T::property_type().into_array(size_of::<T>(), None)
    }
}

// -----------------------------------------------------------------------------
// Static arrays

impl<T: PropertyType, const N: usize> Reflect for [T; N] {
    impl_reflect_common!();

    fn reflect_set(&mut self, other: &dyn Reflect) -> bool {
        let Some(other) = other.downcast_ref::<Self>() else {
            return false;
        };
        for (dst, src) in self.iter_mut().zip(other.iter()) {
            dst.reflect_set(src);
        }
        true
    }
}

impl<T: PropertyType, const N: usize> ReflectArray for [T; N] {
    #[inline]
    fn is_dynamic(&self) -> bool {
        false
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn element(&self, index: usize) -> Option<&dyn Reflect> {
        self.get(index).map(|e| e as &dyn Reflect)
    }

    #[inline]
    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.get_mut(index).map(|e| e as &mut dyn Reflect)
    }

    #[inline]
    fn element_size(&self) -> usize {
        size_of::<T>()
    }

    #[inline]
    fn set_len(&mut self, len: usize) -> bool {
        len == N
    }

    #[inline]
    fn insert_default(&mut self, _index: usize) -> bool {
        false
    }

    #[inline]
    fn remove(&mut self, _index: usize) -> bool {
        false
    }

    #[inline]
    fn move_element(&mut self, from: usize, to: usize) -> bool {
        move_in_slice(self, from, to)
    }

    fn new_default_element(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }
}

impl<T: PropertyType, const N: usize> PropertyType for [T; N]
where
    [T; N]: Default,
{
    fn property_type() -> PropertyTypeDesc {
        T::property_type().into_array(size_of::<T>(), Some(N))
    }
}
