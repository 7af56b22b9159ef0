//! Arena-backed doubly linked list ordered from most to least recently used.
//!
//! Nodes live in a `Vec` of slots and refer to their neighbours by [`Handle`]
//! rather than by pointer. The list owns every node; links are structural
//! only. Vacated slots are recycled through a free list so a full cache
//! stops allocating once it has reached capacity.

/// Stable position of a node inside the list's arena.
///
/// A handle stays valid until its node is popped; after that the slot may be
/// reused by a later `push_front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

// `prev` points toward the head (newer), `next` toward the tail (older).
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<Handle>,
    next: Option<Handle>,
}

pub(crate) struct RecencyList<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<Handle>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    fn node(&self, handle: Handle) -> &Node<K, V> {
        match self.slots.get(handle.0) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling list handle {:?}", handle),
        }
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        match self.slots.get_mut(handle.0) {
            Some(Some(node)) => node,
            _ => unreachable!("dangling list handle {:?}", handle),
        }
    }

    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.node(handle).key
    }

    pub(crate) fn value(&self, handle: Handle) -> &V {
        &self.node(handle).value
    }

    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.node_mut(handle).value
    }

    #[allow(dead_code)]
    pub(crate) fn head(&self) -> Option<Handle> {
        self.head
    }

    #[allow(dead_code)]
    pub(crate) fn tail(&self) -> Option<Handle> {
        self.tail
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Place a detached node at the head
    fn link_front(&mut self, handle: Handle) {
        let old_head = self.head;
        {
            let node = self.node_mut(handle);
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(old) => self.node_mut(old).prev = Some(handle),
            // Empty list case
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        self.len += 1;
    }

    /// Inserts a new entry as the most recently used one.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> Handle {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle.0] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                Handle(self.slots.len() - 1)
            }
        };
        self.link_front(handle);
        handle
    }

    /// Detaches a node from the chain, leaving it allocated.
    ///
    /// Works for the head, the tail, an interior node, and the sole node of
    /// a one-element list. The detached node keeps no links.
    pub(crate) fn unlink(&mut self, handle: Handle) {
        let (prev, next) = {
            let node = self.node_mut(handle);
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }

        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }

        self.len -= 1;
    }

    /// Promotes a node to most recently used.
    pub(crate) fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        self.unlink(handle);
        self.link_front(handle);
    }

    /// Removes the least recently used entry and frees its slot.
    pub(crate) fn pop_back(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        self.unlink(tail);
        let node = self.slots[tail.0].take()?;
        self.free.push(tail);
        Some((node.key, node.value))
    }

    /// Walks the entries from most to least recently used.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Walks both directions and panics if the chain is inconsistent.
    #[cfg(test)]
    pub(crate) fn check_links(&self) {
        match (self.head, self.tail) {
            (None, None) => assert_eq!(self.len, 0, "empty ends with nonzero len"),
            (Some(head), Some(tail)) => {
                assert!(self.node(head).prev.is_none(), "head has a prev link");
                assert!(self.node(tail).next.is_none(), "tail has a next link");
                if self.len == 1 {
                    assert_eq!(head, tail, "single entry must be head and tail");
                }
            }
            ends => panic!("half-empty list ends: {:?}", ends),
        }

        let mut forward = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        let mut last = None;
        while let Some(handle) = cursor {
            assert!(forward.len() < self.len, "forward walk exceeds len");
            let node = self.node(handle);
            assert_eq!(node.prev, last, "prev link does not mirror next link");
            forward.push(handle);
            last = Some(handle);
            cursor = node.next;
        }
        assert_eq!(forward.len(), self.len, "forward walk misses nodes");
        assert_eq!(last, self.tail, "forward walk does not end at tail");

        let mut backward = Vec::with_capacity(self.len);
        let mut cursor = self.tail;
        while let Some(handle) = cursor {
            assert!(backward.len() < self.len, "backward walk exceeds len");
            backward.push(handle);
            cursor = self.node(handle).prev;
        }
        backward.reverse();
        assert_eq!(forward, backward, "backward walk disagrees");
    }

    /// Number of arena slots currently holding a node, linked or not.
    #[cfg(test)]
    pub(crate) fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

pub(crate) struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<Handle>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.list.node(handle);
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
