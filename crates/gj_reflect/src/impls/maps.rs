use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use core::hash::BuildHasher;
use std::collections::HashMap;

use crate::ops::{Map, MapIter, MapKey};
use crate::{Reflect, ReflectRef};

impl<K: MapKey, V: Reflect, S: BuildHasher + 'static> Reflect for HashMap<K, V, S> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }
}

impl<K: MapKey, V: Reflect, S: BuildHasher + 'static> Map for HashMap<K, V, S> {
    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    #[inline]
    fn key_type_name(&self) -> &'static str {
        core::any::type_name::<K>()
    }

    fn iter(&self) -> Option<MapIter<'_>> {
        if !K::STRING_LIKE {
            return None;
        }
        let entries = HashMap::iter(self)
            .filter_map(|(k, v)| Some((k.key_str()?, v.as_reflect())));
        Some(Box::new(entries))
    }
}

impl<K: MapKey, V: Reflect> Reflect for BTreeMap<K, V> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }
}

impl<K: MapKey, V: Reflect> Map for BTreeMap<K, V> {
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    #[inline]
    fn key_type_name(&self) -> &'static str {
        core::any::type_name::<K>()
    }

    fn iter(&self) -> Option<MapIter<'_>> {
        if !K::STRING_LIKE {
            return None;
        }
        let entries = BTreeMap::iter(self)
            .filter_map(|(k, v)| Some((k.key_str()?, v.as_reflect())));
        Some(Box::new(entries))
    }
}
