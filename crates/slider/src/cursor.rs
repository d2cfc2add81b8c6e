use crate::error::InitError;

/// Pair of slide indices taking part in the next transition.
///
/// `current` is the slide on screen and `next` is always its successor, so
/// the two never coincide and both stay below `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderCursor {
    current: usize,
    next: usize,
    len: usize,
}

impl SliderCursor {
    pub fn new(len: usize) -> Result<Self, InitError> {
        if len < 2 {
            return Err(InitError::NotEnoughSlides(len));
        }
        Ok(Self {
            current: 0,
            next: 1,
            len,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&self) -> usize {
        self.next
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Highest valid index.
    pub fn total(&self) -> usize {
        self.len - 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len
    }

    pub fn successor(&self, index: usize) -> usize {
        (index + 1) % self.len
    }

    /// Moves the cursor onto `target` and returns the outgoing slide.
    pub fn retarget(&mut self, target: usize) -> usize {
        debug_assert!(self.contains(target));
        let outgoing = self.current;
        self.current = target;
        self.next = self.successor(target);
        outgoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fewer_than_two_slides() {
        assert!(matches!(
            SliderCursor::new(1),
            Err(InitError::NotEnoughSlides(1))
        ));
        assert!(SliderCursor::new(0).is_err());
    }

    #[test]
    fn advancing_len_times_returns_to_start() {
        for len in 2..=9 {
            let mut cursor = SliderCursor::new(len).unwrap();
            let start = cursor.current();
            for _ in 0..len {
                let target = cursor.successor(cursor.current());
                cursor.retarget(target);
                assert_ne!(cursor.current(), cursor.next());
                assert!(cursor.current() <= cursor.total());
                assert!(cursor.next() <= cursor.total());
            }
            assert_eq!(cursor.current(), start);
        }
    }

    #[test]
    fn last_index_wraps_to_zero() {
        let mut cursor = SliderCursor::new(3).unwrap();
        let outgoing = cursor.retarget(2);
        assert_eq!(outgoing, 0);
        assert_eq!((cursor.current(), cursor.next()), (2, 0));
    }
}
