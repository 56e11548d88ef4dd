//! Fixed-capacity ring buffer
//!
//! `FixedRingBuffer` is the queue behind both directions of the serial
//! port. Storage is a plain array sized at compile time; nothing is ever
//! allocated and a full buffer refuses new elements instead of evicting old
//! ones (compare the log sink, which overwrites).
//!
//! The buffer has no interior synchronization. When it is shared between an
//! interrupt handler and the foreground, the owner serializes access with a
//! critical section.
//!
//! A capacity of zero is allowed: such a buffer is permanently both empty
//! and full, which the serial port uses to mean "transmit unbuffered".

/// Fixed-capacity FIFO queue.
///
/// # Example
///
/// ```
/// use yunibeer_core::ring::FixedRingBuffer;
///
/// let mut buf: FixedRingBuffer<u8, 2> = FixedRingBuffer::new();
/// assert!(buf.push(1));
/// assert!(buf.push(2));
/// assert!(!buf.push(3)); // full, nothing changes
/// assert_eq!(buf.pop(), Some(1));
/// assert_eq!(buf.size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FixedRingBuffer<T, const N: usize> {
    storage: [T; N],
    /// Index of the oldest element
    head: usize,
    /// Number of stored elements, always `<= N`
    count: usize,
}

impl<T: Copy + Default, const N: usize> FixedRingBuffer<T, N> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            storage: [T::default(); N],
            head: 0,
            count: 0,
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for FixedRingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> FixedRingBuffer<T, N> {
    /// Append `value` at the tail.
    ///
    /// Returns `false` and leaves the buffer untouched when it is full.
    pub fn push(&mut self, value: T) -> bool {
        if self.count == N {
            return false;
        }
        let tail = (self.head + self.count) % N;
        self.storage[tail] = value;
        self.count += 1;
        true
    }

    /// Remove and return the oldest element, `None` when empty
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let value = self.storage[self.head];
        self.head = (self.head + 1) % N;
        self.count -= 1;
        Some(value)
    }

    /// Peek at the oldest element without removing it
    pub fn top(&self) -> Option<&T> {
        if self.count == 0 {
            None
        } else {
            Some(&self.storage[self.head])
        }
    }

    /// Return true if no element is stored
    pub fn empty(&self) -> bool {
        self.count == 0
    }

    /// Return true if the next push would fail
    pub fn full(&self) -> bool {
        self.count == N
    }

    /// Number of stored elements
    pub fn size(&self) -> usize {
        self.count
    }

    /// Compile-time capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop all stored elements
    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }

    /// Iterate oldest-first without consuming
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.count).map(move |i| &self.storage[(self.head + i) % N])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty() {
        let buf: FixedRingBuffer<u8, 4> = FixedRingBuffer::new();
        assert!(buf.empty());
        assert!(!buf.full());
        assert_eq!(buf.size(), 0);
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.top(), None);
    }

    #[test]
    fn test_fifo_order_across_wrap() {
        let mut buf: FixedRingBuffer<u8, 3> = FixedRingBuffer::new();
        assert!(buf.push(1));
        assert!(buf.push(2));
        assert_eq!(buf.pop(), Some(1));
        assert!(buf.push(3));
        assert!(buf.push(4)); // wraps around the end of storage
        assert_eq!(buf.top(), Some(&2));
        assert_eq!(buf.pop(), Some(2));
        assert_eq!(buf.pop(), Some(3));
        assert_eq!(buf.pop(), Some(4));
        assert_eq!(buf.pop(), None);
    }

    #[test]
    fn test_push_on_full_is_rejected_without_mutation() {
        let mut buf: FixedRingBuffer<u8, 2> = FixedRingBuffer::new();
        assert!(buf.push(10));
        assert!(buf.push(20));
        assert!(buf.full());

        assert!(!buf.push(30));
        assert_eq!(buf.size(), 2);
        let contents: [u8; 2] = [*buf.iter().next().unwrap(), *buf.iter().nth(1).unwrap()];
        assert_eq!(contents, [10, 20]);
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut buf: FixedRingBuffer<u16, 5> = FixedRingBuffer::new();
        let mut expected = std_like_queue::Queue::new();

        // Deterministic mix of pushes and pops, more pushes than pops
        for step in 0u16..200 {
            if step % 3 == 2 {
                assert_eq!(buf.pop(), expected.pop());
            } else {
                let accepted = buf.push(step);
                assert_eq!(accepted, expected.len() < 5);
                if accepted {
                    expected.push(step);
                }
            }
            assert!(buf.size() <= buf.capacity());
            assert_eq!(buf.size(), expected.len());
        }
    }

    #[test]
    fn test_clear_resets_cursors() {
        let mut buf: FixedRingBuffer<u8, 2> = FixedRingBuffer::new();
        buf.push(1);
        buf.push(2);
        buf.clear();
        assert!(buf.empty());
        assert!(buf.push(3));
        assert_eq!(buf.pop(), Some(3));
    }

    #[test]
    fn test_zero_capacity_is_always_full() {
        let mut buf: FixedRingBuffer<u8, 0> = FixedRingBuffer::new();
        assert!(buf.empty());
        assert!(buf.full());
        assert!(!buf.push(1));
        assert_eq!(buf.pop(), None);
    }

    /// Tiny reference model; the crate is no_std so there is no VecDeque.
    mod std_like_queue {
        pub struct Queue {
            items: [u16; 8],
            len: usize,
        }

        impl Queue {
            pub fn new() -> Self {
                Self { items: [0; 8], len: 0 }
            }

            pub fn len(&self) -> usize {
                self.len
            }

            pub fn push(&mut self, v: u16) {
                self.items[self.len] = v;
                self.len += 1;
            }

            pub fn pop(&mut self) -> Option<u16> {
                if self.len == 0 {
                    return None;
                }
                let v = self.items[0];
                self.items.copy_within(1..self.len, 0);
                self.len -= 1;
                Some(v)
            }
        }
    }
}
