//! Transactional execution context
//!
//! A [`Context`] layers a write buffer over a read-only parent store. Reads
//! see the buffered writes first, so an operation observes its own effects,
//! while the parent stays untouched until [`transact`] applies the buffer.
//! An operation that fails leaves neither writes nor events behind.

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::ops::Bound;

use super::{KvIter, KvPair, KvStore};
use crate::error::Result;
use crate::events::{Event, EventSink};

/// Buffered writes; `None` marks a deletion
type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Write-buffering view over a parent store for one state transition
pub struct Context<'a> {
    parent: &'a dyn KvStore,
    writes: WriteSet,
    height: u64,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    /// Start a transition at block `height` over `parent`
    pub fn new(parent: &'a dyn KvStore, height: u64) -> Self {
        Context {
            parent,
            writes: BTreeMap::new(),
            height,
            events: Vec::new(),
        }
    }

    /// Current block height
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Queue an event for release on commit
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events queued so far
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of buffered writes and deletions
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    fn into_parts(self) -> (WriteSet, Vec<Event>) {
        (self.writes, self.events)
    }
}

impl KvStore for Context<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(buffered) => buffered.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn range<'b>(&'b self, start: &[u8], end: Option<&[u8]>) -> KvIter<'b> {
        if matches!(end, Some(end) if end <= start) {
            return Box::new(std::iter::empty());
        }
        let upper = match end {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let overlay = self
            .writes
            .range::<[u8], _>((Bound::Included(start), upper))
            .peekable();
        Box::new(MergedRange {
            parent: self.parent.range(start, end).peekable(),
            overlay,
        })
    }
}

/// Merges the parent's entries with the write buffer in key order, the
/// buffer winning on equal keys and hiding deleted entries
struct MergedRange<'b> {
    parent: Peekable<KvIter<'b>>,
    overlay: Peekable<btree_map::Range<'b, Vec<u8>, Option<Vec<u8>>>>,
}

impl Iterator for MergedRange<'_> {
    type Item = KvPair;

    fn next(&mut self) -> Option<KvPair> {
        loop {
            let order = match (self.parent.peek(), self.overlay.peek()) {
                (None, None) => return None,
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (Some((parent_key, _)), Some((overlay_key, _))) => {
                    overlay_key.as_slice().cmp(parent_key.as_slice())
                }
            };

            match order {
                Ordering::Greater => return self.parent.next(),
                Ordering::Equal => {
                    self.parent.next();
                }
                Ordering::Less => {}
            }
            match self.overlay.next() {
                Some((key, Some(value))) => return Some((key.clone(), value.clone())),
                Some((_, None)) => continue,
                None => return None,
            }
        }
    }
}

/// Outcome of a committed transition
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<T> {
    /// Value returned by the operation
    pub value: T,

    /// Events emitted by the operation, in emission order
    pub events: Vec<Event>,
}

impl<T> Committed<T> {
    /// Hand the events to `sink` in emission order and return the value
    pub fn publish(self, sink: &mut dyn EventSink) -> T {
        sink.publish_all(&self.events);
        self.value
    }
}

/// Run `op` against a fresh [`Context`] over `store` at `height`
///
/// Buffered writes reach `store` only if `op` succeeds. On error the buffer
/// and the queued events are dropped and the error is returned unchanged.
pub fn transact<T, F>(store: &mut dyn KvStore, height: u64, op: F) -> Result<Committed<T>>
where
    F: FnOnce(&mut Context<'_>) -> Result<T>,
{
    let (value, writes, events) = {
        let mut ctx = Context::new(&*store, height);
        let value = op(&mut ctx)?;
        let (writes, events) = ctx.into_parts();
        (value, writes, events)
    };

    for (key, value) in writes {
        match value {
            Some(value) => store.set(&key, value),
            None => store.delete(&key),
        }
    }
    Ok(Committed { value, events })
}

/// [`transact`], then publish the committed events to `sink`
///
/// A failed operation publishes nothing.
pub fn transact_into<T, F>(
    store: &mut dyn KvStore,
    height: u64,
    sink: &mut dyn EventSink,
    op: F,
) -> Result<T>
where
    F: FnOnce(&mut Context<'_>) -> Result<T>,
{
    Ok(transact(store, height, op)?.publish(sink))
}
