use std::{
    marker::PhantomData,
    ops::{Index, IndexMut},
    slice::{Iter, IterMut},
};

/// A macro which implements a newtype index.
#[macro_export]
macro_rules! key {
    ($(#[$m:meta])* $v:vis struct $name:ident($data:ty)) => {

        $(#[ $m ])*
        #[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug)]
        #[repr(transparent)]
        $v struct $name($data);

        impl $crate::id::Id for $name {
        }

        impl $name {
            pub fn into_u32(self) -> u32 {
                self.0 as u32
            }
        }

        impl TryFrom<usize> for $name {
            type Error = <$data as TryFrom<usize>>::Error;

            #[inline]
            fn try_from(value: usize) -> ::std::result::Result<Self, Self::Error> {
                Ok($name(value.try_into()?))
            }
        }

        impl TryFrom<$name> for usize {
            type Error = <usize as TryFrom<u32>>::Error;

            #[inline]
            fn try_from(value: $name) -> ::std::result::Result<Self, Self::Error> {
                value.0.try_into()
            }
        }
    };
}

pub trait Id: TryFrom<usize> + TryInto<usize> {}

/// A vector which can only be indexed by its own newtype index.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct KeyedVec<K, T> {
    vec: Vec<T>,
    _marker: PhantomData<K>,
}

// Derived `Default` would require `K: Default`, which keys don't implement.
impl<K, T> Default for KeyedVec<K, T> {
    fn default() -> Self {
        KeyedVec::new()
    }
}

impl<K, T> KeyedVec<K, T> {
    pub fn new() -> Self {
        KeyedVec {
            vec: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.vec.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.vec.iter_mut()
    }

    pub fn as_inner(&self) -> &Vec<T> {
        &self.vec
    }
}

impl<K: Id, T> KeyedVec<K, T> {
    pub fn push(&mut self, value: T) -> K {
        let Ok(res) = K::try_from(self.len()) else {
            panic!("could not convert index to key")
        };
        self.vec.push(value);
        res
    }

    pub fn next_id(&self) -> K {
        let Ok(x) = K::try_from(self.len()) else {
            panic!("could not convert index to key")
        };
        x
    }

    pub fn get(&self, key: K) -> Option<&T> {
        let idx: usize = key.try_into().ok()?;
        self.vec.get(idx)
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        (0..self.len()).map(|x| {
            let Ok(x) = K::try_from(x) else {
                panic!("could not convert index to key")
            };
            x
        })
    }
}

impl<K: Id, T: Clone + Default> KeyedVec<K, T> {
    /// Resizes the vector so it contains values up till the key and then inserts the value.
    pub fn insert_grow_default(&mut self, key: K, value: T) {
        let Ok(idx) = key.try_into() else {
            panic!("could not convert key to usize")
        };
        if self.len() <= idx {
            self.vec.resize(idx, T::default());
            self.vec.push(value);
        } else {
            self.vec[idx] = value;
        }
    }
}

impl<K: Id, T> Index<K> for KeyedVec<K, T> {
    type Output = T;

    fn index(&self, index: K) -> &Self::Output {
        if let Ok(x) = index.try_into() {
            &self.vec[x]
        } else {
            panic!("could not convert index to usize")
        }
    }
}

impl<K: Id, T> IndexMut<K> for KeyedVec<K, T> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        if let Ok(x) = index.try_into() {
            &mut self.vec[x]
        } else {
            panic!("could not convert index to usize")
        }
    }
}
