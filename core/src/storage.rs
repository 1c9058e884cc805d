//! Limb storage for arbitrary-precision magnitudes.
//!
//! A [`LimbVec`] keeps zero or one limb inline and anything larger in a
//! reference-counted buffer. Cloning a `LimbVec` only bumps the count; the
//! buffer is copied the first time a shared handle is written to.

use std::rc::Rc;
use std::{error, fmt};

/// One base-2^30 digit. Storage itself does not care about the radix.
pub type Limb = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    OutOfRange { index: usize, len: usize },
    EmptyContainer,
    InvalidRange { lo: usize, hi: usize },
    OutOfMemory,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {} is out of range for {} limbs", index, len)
            }
            Self::EmptyContainer => write!(f, "no limbs"),
            Self::InvalidRange { lo, hi } => {
                write!(f, "invalid range {}..{}: upper bound must exceed lower bound", lo, hi)
            }
            Self::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl error::Error for StorageError {}

#[derive(Clone)]
enum Repr {
    Empty,
    Inline(Limb),
    // `buf.len()` is the capacity; only the first `len` limbs are meaningful
    Shared { buf: Rc<Vec<Limb>>, len: usize },
}

#[derive(Clone)]
pub struct LimbVec {
    repr: Repr,
}

fn allocate(capacity: usize) -> Vec<Limb> {
    vec![0; capacity]
}

fn try_allocate(capacity: usize) -> Result<Vec<Limb>, StorageError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|_| StorageError::OutOfMemory)?;
    buf.resize(capacity, 0);
    Ok(buf)
}

/// Makes `buf` exclusively owned by the caller, copying the first `len`
/// limbs into a fresh buffer of the same capacity if anyone else holds it.
fn detach(buf: &mut Rc<Vec<Limb>>, len: usize) {
    if Rc::strong_count(buf) > 1 {
        let mut copy = allocate(buf.len());
        copy[..len].copy_from_slice(&buf[..len]);
        // replacing the handle drops our share of the old buffer
        *buf = Rc::new(copy);
    }
}

impl LimbVec {
    pub fn new() -> Self {
        Self { repr: Repr::Empty }
    }

    /// `len` zero limbs.
    pub fn with_len(len: usize) -> Self {
        Self::from_elem(len, 0)
    }

    /// `len` copies of `value`. More than one limb allocates twice the
    /// requested size so that later growth is amortized.
    pub fn from_elem(len: usize, value: Limb) -> Self {
        let repr = match len {
            0 => Repr::Empty,
            1 => Repr::Inline(value),
            _ => {
                let mut buf = allocate(len * 2);
                for limb in &mut buf[..len] {
                    *limb = value;
                }
                Repr::Shared {
                    buf: Rc::new(buf),
                    len,
                }
            }
        };
        Self { repr }
    }

    pub fn from_slice(limbs: &[Limb]) -> Self {
        let mut res = Self::with_len(limbs.len());
        res.make_mut_slice().copy_from_slice(limbs);
        res
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Inline(_) => 1,
            Repr::Shared { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.repr {
            Repr::Empty | Repr::Inline(_) => 1,
            Repr::Shared { buf, .. } => buf.len(),
        }
    }

    pub fn is_inline(&self) -> bool {
        !matches!(self.repr, Repr::Shared { .. })
    }

    /// Number of `LimbVec`s currently holding this buffer, or 0 for
    /// inline storage.
    pub fn share_count(&self) -> usize {
        match &self.repr {
            Repr::Shared { buf, .. } => Rc::strong_count(buf),
            _ => 0,
        }
    }

    pub fn as_slice(&self) -> &[Limb] {
        match &self.repr {
            Repr::Empty => &[],
            Repr::Inline(limb) => std::slice::from_ref(limb),
            Repr::Shared { buf, len } => &buf[..*len],
        }
    }

    /// Mutable view of the limbs. A shared buffer is copied first, so the
    /// write is never visible through another handle.
    pub fn make_mut_slice(&mut self) -> &mut [Limb] {
        match &mut self.repr {
            Repr::Empty => Default::default(),
            Repr::Inline(limb) => std::slice::from_mut(limb),
            Repr::Shared { buf, len } => {
                detach(buf, *len);
                &mut Rc::make_mut(buf)[..*len]
            }
        }
    }

    pub fn at(&self, index: usize) -> Result<Limb, StorageError> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(StorageError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Limb, StorageError> {
        let len = self.len();
        if index >= len {
            return Err(StorageError::OutOfRange { index, len });
        }
        Ok(&mut self.make_mut_slice()[index])
    }

    pub fn back(&self) -> Result<Limb, StorageError> {
        self.as_slice()
            .last()
            .copied()
            .ok_or(StorageError::EmptyContainer)
    }

    pub fn back_mut(&mut self) -> Result<&mut Limb, StorageError> {
        self.make_mut_slice()
            .last_mut()
            .ok_or(StorageError::EmptyContainer)
    }

    pub fn push(&mut self, value: Limb) {
        let len = self.len();
        self.resize(len + 1);
        self.make_mut_slice()[len] = value;
    }

    pub fn pop(&mut self) -> Result<Limb, StorageError> {
        let last = self.back()?;
        self.resize(self.len() - 1);
        Ok(last)
    }

    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.resize(len);
        }
    }

    pub fn extend_from_slice(&mut self, limbs: &[Limb]) {
        let start = self.len();
        self.resize(start + limbs.len());
        self.make_mut_slice()[start..].copy_from_slice(limbs);
    }

    /// Grows with zero limbs or shrinks to `new_len`.
    ///
    /// The buffer is kept while `new_len` fits and the buffer would still be
    /// at least half used; otherwise the limbs move to a buffer of twice the
    /// new size, or inline once at most one limb is left.
    pub fn resize(&mut self, new_len: usize) {
        let old_len = self.len();
        if new_len == old_len {
            return;
        }
        if let Repr::Shared { buf, len } = &mut self.repr {
            let capacity = buf.len();
            let grows_in_place = new_len > *len && new_len <= capacity;
            let shrinks_in_place = new_len < *len && new_len > 1 && new_len > capacity / 2;
            if grows_in_place {
                detach(buf, *len);
                for limb in &mut Rc::make_mut(buf)[*len..new_len] {
                    *limb = 0;
                }
                *len = new_len;
                return;
            }
            if shrinks_in_place {
                *len = new_len;
                return;
            }
        }
        let old = self.as_slice();
        let repr = match new_len {
            0 => Repr::Empty,
            1 => Repr::Inline(old.first().copied().unwrap_or(0)),
            _ => {
                let keep = old_len.min(new_len);
                let mut buf = allocate(new_len * 2);
                buf[..keep].copy_from_slice(&old[..keep]);
                Repr::Shared {
                    buf: Rc::new(buf),
                    len: new_len,
                }
            }
        };
        self.repr = repr;
    }

    /// Replaces the contents with `len` copies of `value`.
    pub fn assign(&mut self, len: usize, value: Limb) {
        if self.share_count() > 1 {
            // the old limbs are about to be overwritten, no point copying them
            *self = Self::new();
        }
        self.resize(len);
        for limb in self.make_mut_slice() {
            *limb = value;
        }
    }

    /// Makes room for at least `capacity` limbs without changing the length.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            let buf = allocate(capacity);
            self.move_into(buf);
        }
    }

    /// Like [`LimbVec::reserve`], but reports allocation failure instead of
    /// aborting.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), StorageError> {
        if capacity > self.capacity() {
            let buf = try_allocate(capacity)?;
            self.move_into(buf);
        }
        Ok(())
    }

    fn move_into(&mut self, mut buf: Vec<Limb>) {
        let len = self.len();
        buf[..len].copy_from_slice(self.as_slice());
        self.repr = Repr::Shared {
            buf: Rc::new(buf),
            len,
        };
    }

    /// Inserts `other[lo..hi]` at `dest`. Limbs from `dest` onward move up
    /// by `hi - lo`.
    pub fn copy_range(
        &mut self,
        dest: usize,
        other: &Self,
        lo: usize,
        hi: usize,
    ) -> Result<(), StorageError> {
        if hi <= lo {
            return Err(StorageError::InvalidRange { lo, hi });
        }
        if hi > other.len() {
            return Err(StorageError::OutOfRange {
                index: hi - 1,
                len: other.len(),
            });
        }
        if dest > self.len() {
            return Err(StorageError::OutOfRange {
                index: dest,
                len: self.len(),
            });
        }
        let count = hi - lo;
        let old_len = self.len();
        self.resize(old_len + count);
        let limbs = self.make_mut_slice();
        limbs.copy_within(dest..old_len, dest + count);
        limbs[dest..dest + count].copy_from_slice(&other.as_slice()[lo..hi]);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Limb> {
        self.as_slice().iter()
    }
}

impl Default for LimbVec {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LimbVec {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for LimbVec {}

impl fmt::Debug for LimbVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::{LimbVec, StorageError};

    #[test]
    fn small_values_stay_inline() {
        let mut v = LimbVec::new();
        assert!(v.is_inline());
        assert!(v.is_empty());
        v.push(7);
        assert!(v.is_inline());
        assert_eq!(v.as_slice(), &[7]);
        v.push(8);
        assert!(!v.is_inline());
        assert_eq!(v.as_slice(), &[7, 8]);
        assert_eq!(v.share_count(), 1);
    }

    #[test]
    fn construction_allocates_twice_the_size() {
        let v = LimbVec::from_elem(5, 3);
        assert_eq!(v.as_slice(), &[3, 3, 3, 3, 3]);
        assert_eq!(v.capacity(), 10);
        assert!(LimbVec::with_len(1).is_inline());
        assert_eq!(LimbVec::with_len(0).len(), 0);
    }

    #[test]
    fn clone_shares_the_buffer() {
        let a = LimbVec::from_slice(&[1, 2, 3]);
        let b = a.clone();
        assert_eq!(a.share_count(), 2);
        assert_eq!(b.share_count(), 2);
        drop(b);
        assert_eq!(a.share_count(), 1);
    }

    #[test]
    fn at_mut_copies_shared_buffer() {
        let a = LimbVec::from_slice(&[1, 2, 3]);
        let mut b = a.clone();
        *b.at_mut(1).unwrap() = 20;
        assert_eq!(a.as_slice(), &[1, 2, 3]);
        assert_eq!(b.as_slice(), &[1, 20, 3]);
        assert_eq!(a.share_count(), 1);
        assert_eq!(b.share_count(), 1);
    }

    #[test]
    fn unshared_write_does_not_copy() {
        let mut a = LimbVec::from_slice(&[1, 2, 3]);
        let before = a.as_slice().as_ptr();
        *a.at_mut(0).unwrap() = 9;
        assert_eq!(a.as_slice().as_ptr(), before);
    }

    #[test]
    fn every_mutation_isolates_copies() {
        let original = LimbVec::from_slice(&[5, 6, 7, 8]);

        let mut pushed = original.clone();
        pushed.push(9);
        let mut popped = original.clone();
        popped.pop().unwrap();
        let mut grown = original.clone();
        grown.resize(6);
        let mut assigned = original.clone();
        assigned.assign(4, 1);
        let mut copied = original.clone();
        copied
            .copy_range(0, &LimbVec::from_slice(&[0, 0]), 0, 2)
            .unwrap();
        let mut back = original.clone();
        *back.back_mut().unwrap() = 0;

        assert_eq!(original.as_slice(), &[5, 6, 7, 8]);
        assert_eq!(pushed.as_slice(), &[5, 6, 7, 8, 9]);
        assert_eq!(popped.as_slice(), &[5, 6, 7]);
        assert_eq!(grown.as_slice(), &[5, 6, 7, 8, 0, 0]);
        assert_eq!(assigned.as_slice(), &[1, 1, 1, 1]);
        assert_eq!(copied.as_slice(), &[0, 0, 5, 6, 7, 8]);
        assert_eq!(back.as_slice(), &[5, 6, 7, 0]);
    }

    #[test]
    fn regrowing_a_shrunk_copy_zero_fills_privately() {
        let mut original = LimbVec::from_slice(&[1, 2, 3]);
        original.extend_from_slice(&[4, 5]);
        assert_eq!(original.capacity(), 6);
        let mut copy = original.clone();
        copy.resize(4);
        assert_eq!(copy.share_count(), 2);
        copy.resize(5);
        assert_eq!(copy.as_slice(), &[1, 2, 3, 4, 0]);
        assert_eq!(original.as_slice(), &[1, 2, 3, 4, 5]);
        assert_eq!(original.share_count(), 1);
    }

    #[test]
    fn out_of_range_access() {
        let mut v = LimbVec::from_slice(&[1, 2]);
        assert_eq!(v.at(1), Ok(2));
        assert_eq!(v.at(2), Err(StorageError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(
            v.at_mut(5).map(|l| *l),
            Err(StorageError::OutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            LimbVec::new().at(0),
            Err(StorageError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn pop_and_back_on_empty() {
        let mut v = LimbVec::new();
        assert_eq!(v.pop(), Err(StorageError::EmptyContainer));
        assert_eq!(v.back(), Err(StorageError::EmptyContainer));
        assert_eq!(
            v.back_mut().map(|l| *l),
            Err(StorageError::EmptyContainer)
        );
    }

    #[test]
    fn popping_to_one_limb_releases_the_buffer() {
        let mut v = LimbVec::from_slice(&[4, 5]);
        let other = v.clone();
        assert_eq!(v.pop(), Ok(5));
        assert!(v.is_inline());
        assert_eq!(v.as_slice(), &[4]);
        assert_eq!(other.share_count(), 1);
        assert_eq!(v.pop(), Ok(4));
        assert!(v.is_empty());
    }

    #[test]
    fn resize_keeps_buffer_within_hysteresis() {
        let mut v = LimbVec::with_len(8);
        assert_eq!(v.capacity(), 16);
        v.resize(16);
        assert_eq!(v.capacity(), 16);
        v.resize(9);
        assert_eq!(v.capacity(), 16);
        // below half of the capacity: reallocate
        v.resize(4);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.len(), 4);
        v.resize(17);
        assert_eq!(v.capacity(), 34);
        v.resize(1);
        assert!(v.is_inline());
    }

    #[test]
    fn resize_preserves_prefix() {
        let mut v = LimbVec::from_slice(&[1, 2, 3]);
        v.resize(10);
        assert_eq!(v.as_slice(), &[1, 2, 3, 0, 0, 0, 0, 0, 0, 0]);
        v.resize(2);
        assert_eq!(v.as_slice(), &[1, 2]);
        let mut w = LimbVec::from_elem(1, 42);
        w.resize(3);
        assert_eq!(w.as_slice(), &[42, 0, 0]);
    }

    #[test]
    fn reserve_does_not_change_length() {
        let mut v = LimbVec::from_elem(1, 3);
        v.reserve(100);
        assert_eq!(v.len(), 1);
        assert!(v.capacity() >= 100);
        for i in 0..50 {
            v.push(i);
        }
        assert_eq!(v.capacity(), 100);
        assert_eq!(v.at(0), Ok(3));
        assert_eq!(v.at(50), Ok(49));
        assert_eq!(v.try_reserve(10), Ok(()));
        assert_eq!(v.capacity(), 100);
    }

    #[test]
    fn try_reserve_reports_out_of_memory() {
        let mut v = LimbVec::new();
        assert_eq!(v.try_reserve(usize::MAX), Err(StorageError::OutOfMemory));
        assert!(v.is_empty());
    }

    #[test]
    fn copy_range_inserts() {
        let source = LimbVec::from_slice(&[10, 11, 12, 13]);
        let mut v = LimbVec::from_slice(&[1, 2, 3]);
        v.copy_range(1, &source, 1, 3).unwrap();
        assert_eq!(v.as_slice(), &[1, 11, 12, 2, 3]);
        v.copy_range(0, &source, 3, 4).unwrap();
        assert_eq!(v.as_slice(), &[13, 1, 11, 12, 2, 3]);
        v.copy_range(6, &source, 0, 2).unwrap();
        assert_eq!(v.as_slice(), &[13, 1, 11, 12, 2, 3, 10, 11]);

        let mut empty = LimbVec::new();
        empty.copy_range(0, &source, 3, 4).unwrap();
        assert!(empty.is_inline());
        assert_eq!(empty.as_slice(), &[13]);
    }

    #[test]
    fn copy_range_into_inline() {
        let source = LimbVec::from_slice(&[10, 11]);
        let mut front = LimbVec::from_slice(&[7]);
        assert!(front.is_inline());
        front.copy_range(0, &source, 0, 2).unwrap();
        assert!(!front.is_inline());
        assert_eq!(front.as_slice(), &[10, 11, 7]);

        let mut back = LimbVec::from_slice(&[7]);
        back.copy_range(1, &source, 1, 2).unwrap();
        assert_eq!(back.as_slice(), &[7, 11]);
    }

    #[test]
    fn copy_range_rejects_bad_bounds() {
        let source = LimbVec::from_slice(&[10, 11]);
        let mut v = LimbVec::from_slice(&[1, 2]);
        assert_eq!(
            v.copy_range(0, &source, 1, 1),
            Err(StorageError::InvalidRange { lo: 1, hi: 1 })
        );
        assert_eq!(
            v.copy_range(0, &source, 2, 1),
            Err(StorageError::InvalidRange { lo: 2, hi: 1 })
        );
        assert_eq!(
            v.copy_range(0, &source, 0, 3),
            Err(StorageError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            v.copy_range(3, &source, 0, 1),
            Err(StorageError::OutOfRange { index: 3, len: 2 })
        );
        assert_eq!(v.as_slice(), &[1, 2]);
    }

    #[test]
    fn copy_range_from_a_clone_of_itself() {
        let mut v = LimbVec::from_slice(&[1, 2, 3, 4]);
        let snapshot = v.clone();
        v.copy_range(0, &snapshot, 2, 4).unwrap();
        assert_eq!(v.as_slice(), &[3, 4, 1, 2, 3, 4]);
        assert_eq!(snapshot.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn copy_range_into_a_shared_clone() {
        let original = LimbVec::from_slice(&[1, 2, 3]);
        let mut copy = original.clone();
        assert_eq!(original.share_count(), 2);
        copy.copy_range(2, &LimbVec::from_slice(&[8, 9]), 0, 2).unwrap();
        assert_eq!(copy.as_slice(), &[1, 2, 8, 9, 3]);
        assert_eq!(original.as_slice(), &[1, 2, 3]);
        assert_eq!(original.share_count(), 1);
    }

    #[test]
    fn assign_resets_contents() {
        let mut v = LimbVec::from_slice(&[1, 2, 3]);
        v.assign(2, 9);
        assert_eq!(v.as_slice(), &[9, 9]);
        v.assign(1, 4);
        assert!(v.is_inline());
        assert_eq!(v.as_slice(), &[4]);
        v.assign(0, 4);
        assert!(v.is_empty());
    }

    #[test]
    fn extend_and_truncate() {
        let mut v = LimbVec::from_elem(1, 1);
        v.extend_from_slice(&[2, 3, 4]);
        assert_eq!(v.as_slice(), &[1, 2, 3, 4]);
        v.truncate(10);
        assert_eq!(v.len(), 4);
        v.truncate(2);
        assert_eq!(v.as_slice(), &[1, 2]);
        assert_eq!(format!("{:?}", v), "[1, 2]");
    }
}
