//! Key-ordered paging over a prefix of the store
//!
//! A page continues after the last key it returned; that key is handed back
//! as an opaque [`Cursor`]. Totals are never counted here: the caller
//! supplies them from the counters.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegistryError, Result};
use crate::keys;
use crate::store::KvStore;

/// Default and maximum page size
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 10;

/// Position after the last returned entry, rendered as hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(Vec<u8>);

impl Cursor {
    /// Wrap a raw store key
    pub fn from_key(key: Vec<u8>) -> Self {
        Cursor(key)
    }

    /// The raw store key
    pub fn as_key(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl FromStr for Cursor {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| RegistryError::InvalidPagination(format!("malformed cursor: {e}")))?;
        Ok(Cursor(bytes))
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Page request: either a cursor or an offset, never both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Continue after this position
    pub cursor: Option<Cursor>,

    /// Entries to skip from the start
    pub offset: u64,

    /// Page size; zero means the maximum
    pub limit: u64,

    /// Whether to report the total entry count
    pub count_total: bool,
}

impl PageRequest {
    /// First page of `limit` entries
    pub fn first(limit: u64) -> Self {
        PageRequest {
            limit,
            ..Self::default()
        }
    }

    /// Page of `limit` entries after `cursor`
    pub fn after(cursor: Cursor, limit: u64) -> Self {
        PageRequest {
            cursor: Some(cursor),
            limit,
            ..Self::default()
        }
    }

    /// Request the total alongside the page
    pub fn with_total(mut self) -> Self {
        self.count_total = true;
        self
    }

    /// Reject requests carrying both a cursor and an offset
    pub fn validate(&self) -> Result<()> {
        if self.cursor.is_some() && self.offset > 0 {
            return Err(RegistryError::InvalidPagination(
                "cursor and offset cannot both be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Page size after clamping to `max_page_size`
    pub fn effective_limit(&self, max_page_size: u64) -> u64 {
        if self.limit == 0 || self.limit > max_page_size {
            max_page_size
        } else {
            self.limit
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Entries in key order
    pub items: Vec<T>,

    /// Where the next page starts, `None` on the last page
    pub next_cursor: Option<Cursor>,

    /// Total entries, when requested
    pub total: Option<u64>,
}

/// Page through the entries under `prefix`
///
/// `decode` turns each key-value pair into an item; `total` is only called
/// when the request asks for a count.
pub fn paginate<T, D, C>(
    store: &dyn KvStore,
    prefix: &[u8],
    request: &PageRequest,
    max_page_size: u64,
    mut decode: D,
    total: C,
) -> Result<Page<T>>
where
    D: FnMut(&[u8], &[u8]) -> Result<T>,
    C: FnOnce() -> Result<u64>,
{
    request.validate()?;
    let limit = usize::try_from(request.effective_limit(max_page_size)).unwrap_or(usize::MAX);

    let start = match &request.cursor {
        Some(cursor) => {
            if !cursor.as_key().starts_with(prefix) {
                return Err(RegistryError::InvalidPagination(
                    "cursor does not belong to this listing".to_string(),
                ));
            }
            let mut start = cursor.as_key().to_vec();
            start.push(0);
            start
        }
        None => prefix.to_vec(),
    };
    let end = keys::prefix_end(prefix);
    let skip = usize::try_from(request.offset).unwrap_or(usize::MAX);
    let mut entries = store.range(&start, end.as_deref()).skip(skip);

    let mut items = Vec::with_capacity(limit.min(64));
    let mut last_key = None;
    for (key, value) in entries.by_ref().take(limit) {
        items.push(decode(&key, &value)?);
        last_key = Some(key);
    }
    let next_cursor = match entries.next() {
        Some(_) => last_key.map(Cursor::from_key),
        None => None,
    };

    let total = if request.count_total { Some(total()?) } else { None };
    Ok(Page {
        items,
        next_cursor,
        total,
    })
}
