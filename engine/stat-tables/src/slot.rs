/// One cell of a backing store.
///
/// `Tombstone` only appears in dynamic tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(String, V),
}

impl<V> Slot<V> {
    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&str, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k.as_str(), v)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied(_, v) => Some(v),
            _ => None,
        }
    }
}

/// Fresh all-empty backing store
pub(crate) fn empty_store<V>(capacity: usize) -> Box<[Slot<V>]> {
    std::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Writes one `(key,value)` line per occupied slot, in slot order.
pub(crate) fn fmt_slots<V: std::fmt::Display>(
    slots: &[Slot<V>],
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    for (k, v) in slots.iter().filter_map(Slot::entry) {
        writeln!(f, "({},{})", k, v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_entries() {
        let store: Box<[Slot<u32>]> = empty_store(7);
        assert_eq!(store.len(), 7);
        assert!(store.iter().all(|s| *s == Slot::Empty));
        assert!(store.iter().all(|s| s.entry().is_none()));
    }

    #[test]
    fn tombstone_is_not_an_entry() {
        let mut s: Slot<u32> = Slot::Tombstone;
        assert!(!s.is_occupied());
        assert!(s.value_mut().is_none());

        s = Slot::Occupied("Goals".into(), 3);
        assert_eq!(s.entry(), Some(("Goals", &3)));
        *s.value_mut().unwrap() += 1;
        assert_eq!(s.entry(), Some(("Goals", &4)));
    }
}
