//! In-memory collaborators for tests and examples.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Mutex;

use nazca_types::{Partition, Tick};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{BarSink, CacheStore, TickSource};

/// Tick source over a pre-sorted in-memory stream.
#[derive(Debug, Default)]
pub struct MemoryTickSource {
    ticks: Vec<Tick>,
}

impl MemoryTickSource {
    /// Creates a source over a stream already sorted by
    /// `(symbol, timestamp, nanoseconds, arrival index)`.
    #[must_use]
    pub const fn new(ticks: Vec<Tick>) -> Self {
        Self { ticks }
    }
}

impl TickSource for MemoryTickSource {
    type Error = Infallible;

    fn fetch(&self, partition: &Partition) -> Result<Vec<Tick>, Self::Error> {
        Ok(self
            .ticks
            .iter()
            .filter(|tick| partition.contains(tick.timestamp))
            .cloned()
            .collect())
    }
}

/// One stored partition document.
#[derive(Debug, Clone, Default)]
struct Document {
    cache: Option<Value>,
    complete: bool,
}

/// Document-style cache store holding JSON values, keyed by partition.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    documents: Mutex<HashMap<String, Document>>,
}

impl MemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a cache value is stored under the key.
    #[must_use]
    pub fn has_cache(&self, key: &str) -> bool {
        let documents = self.documents.lock().expect("cache store lock poisoned");
        documents.get(key).is_some_and(|doc| doc.cache.is_some())
    }
}

impl CacheStore for MemoryCacheStore {
    type Error = serde_json::Error;

    fn get<C: DeserializeOwned>(&self, key: &str) -> Result<Option<C>, Self::Error> {
        let documents = self.documents.lock().expect("cache store lock poisoned");
        documents
            .get(key)
            .and_then(|doc| doc.cache.as_ref())
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    fn set<C: Serialize>(
        &self,
        key: &str,
        cache: Option<&C>,
        complete: bool,
    ) -> Result<(), Self::Error> {
        let cache = cache.map(serde_json::to_value).transpose()?;
        let mut documents = self.documents.lock().expect("cache store lock poisoned");
        documents.insert(key.to_string(), Document { cache, complete });
        Ok(())
    }

    fn is_complete(&self, key: &str) -> Result<bool, Self::Error> {
        let documents = self.documents.lock().expect("cache store lock poisoned");
        Ok(documents.get(key).is_some_and(|doc| doc.complete))
    }
}

/// Bar sink collecting everything written, per partition.
#[derive(Debug)]
pub struct MemoryBarSink<B> {
    written: Mutex<Vec<(String, Vec<B>)>>,
}

impl<B> MemoryBarSink<B> {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            written: Mutex::new(Vec::new()),
        }
    }
}

impl<B> Default for MemoryBarSink<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Clone> MemoryBarSink<B> {
    /// Returns every write in partition order.
    #[must_use]
    pub fn partitions(&self) -> Vec<(String, Vec<B>)> {
        self.written.lock().expect("bar sink lock poisoned").clone()
    }

    /// Returns all written bars, flattened in partition order.
    #[must_use]
    pub fn bars(&self) -> Vec<B> {
        self.written
            .lock()
            .expect("bar sink lock poisoned")
            .iter()
            .flat_map(|(_, bars)| bars.clone())
            .collect()
    }
}

impl<B: Clone> BarSink<B> for MemoryBarSink<B> {
    type Error = Infallible;

    fn write(&self, key: &str, bars: &[B]) -> Result<(), Self::Error> {
        let mut written = self.written.lock().expect("bar sink lock poisoned");
        written.push((key.to_string(), bars.to_vec()));
        Ok(())
    }
}
