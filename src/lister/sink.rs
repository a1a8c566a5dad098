//! Record sinks
//!
//! A sink receives every listed record exactly once, in page order.

use crate::error::{Error, Result};
use crate::source::Item;
use std::io::Write;
use tokio::sync::mpsc::UnboundedSender;

/// Destination for listed records
pub trait RecordSink {
    /// Take ownership of one record. An error aborts the listing.
    fn emit(&mut self, item: Item) -> Result<()>;
}

impl<K: RecordSink + ?Sized> RecordSink for &mut K {
    fn emit(&mut self, item: Item) -> Result<()> {
        (**self).emit(item)
    }
}

impl RecordSink for Vec<Item> {
    fn emit(&mut self, item: Item) -> Result<()> {
        self.push(item);
        Ok(())
    }
}

// ============================================================================
// Closure Sink
// ============================================================================

/// Sink backed by a closure
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(Item) -> Result<()>,
{
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> RecordSink for FnSink<F>
where
    F: FnMut(Item) -> Result<()>,
{
    fn emit(&mut self, item: Item) -> Result<()> {
        (self.f)(item)
    }
}

// ============================================================================
// Counting Sink
// ============================================================================

/// Keeps only the record count and the running sum of amounts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountingSink {
    /// Records seen
    pub records: usize,
    /// Sum of `amount` over all records seen
    pub amount_sum: f64,
}

impl CountingSink {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for CountingSink {
    fn emit(&mut self, item: Item) -> Result<()> {
        self.records += 1;
        self.amount_sum += item.amount;
        Ok(())
    }
}

// ============================================================================
// Channel Sink
// ============================================================================

/// Forwards records to an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<Item>,
}

impl ChannelSink {
    /// Create a sink sending into `sender`
    pub fn new(sender: UnboundedSender<Item>) -> Self {
        Self { sender }
    }
}

impl RecordSink for ChannelSink {
    fn emit(&mut self, item: Item) -> Result<()> {
        self.sender
            .send(item)
            .map_err(|_| Error::sink("receiver dropped"))
    }
}

// ============================================================================
// JSON Lines Sink
// ============================================================================

/// Writes one JSON object per line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and return the writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Flush after a listing run and hand back its outcome.
    ///
    /// A failed run keeps its own error even when the flush fails too.
    pub fn finish<T>(self, result: Result<T>) -> Result<T> {
        let flushed = self.into_inner();
        let value = result?;
        flushed?;
        Ok(value)
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn emit(&mut self, item: Item) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &item)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
