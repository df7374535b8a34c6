//! Collected call results.
//!
//! Workers hold an [`OutputSink`] (the sending half of an unbounded channel);
//! the runner keeps the single [`OutputCollection`] that drains it. Entries
//! arrive in completion order. With `serialize_output` the values travel as
//! JSON text and are decoded on drain.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug)]
enum Entry<T> {
    Value(T),
    Encoded(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoding {
    Native,
    Json,
}

#[derive(Debug)]
pub(crate) struct OutputSink<T> {
    tx: UnboundedSender<Entry<T>>,
    encoding: Encoding,
}

#[derive(Debug)]
pub(crate) struct OutputCollection<T> {
    rx: UnboundedReceiver<Entry<T>>,
    // Keeps the channel open between waves so an idle drain reads as empty.
    _tx: UnboundedSender<Entry<T>>,
}

pub(crate) fn channel<T>(encoding: Encoding) -> (OutputSink<T>, OutputCollection<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = OutputSink {
        tx: tx.clone(),
        encoding,
    };
    (sink, OutputCollection { rx, _tx: tx })
}

impl<T: Serialize> OutputSink<T> {
    /// Store one produced value. Values that cannot be encoded are dropped.
    pub(crate) fn push(&self, call_id: u64, value: T) {
        let entry = match self.encoding {
            Encoding::Native => Entry::Value(value),
            Encoding::Json => match serde_json::to_string(&value) {
                Ok(text) => Entry::Encoded(text),
                Err(e) => {
                    tracing::error!(call_id, error = %e, "Failed to encode call output; dropping it");
                    return;
                }
            },
        };
        // The receiver lives as long as the runner that owns this sink.
        let _ = self.tx.send(entry);
    }
}

impl<T: DeserializeOwned> OutputCollection<T> {
    /// Take everything collected so far, leaving the collection empty.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(entry) = self.rx.try_recv() {
            match entry {
                Entry::Value(value) => items.push(value),
                Entry::Encoded(text) => match serde_json::from_str(&text) {
                    Ok(value) => items.push(value),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to decode collected output; skipping it");
                    }
                },
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn native_entries_drain_in_push_order() {
        let (sink, mut collection) = channel::<u32>(Encoding::Native);
        sink.push(1, 3);
        sink.push(2, 1);
        sink.push(3, 2);
        assert_eq!(collection.drain(), vec![3, 1, 2]);
        assert!(collection.drain().is_empty());
    }

    #[test]
    fn json_entries_round_trip() {
        let (sink, mut collection) = channel::<BTreeMap<String, Vec<u8>>>(Encoding::Json);
        let mut value = BTreeMap::new();
        value.insert("ids".to_string(), vec![1, 2, 3]);
        sink.push(1, value.clone());
        assert_eq!(collection.drain(), vec![value]);
    }

    #[test]
    fn drain_after_sink_dropped_still_returns_entries() {
        let (sink, mut collection) = channel::<String>(Encoding::Native);
        sink.push(1, "done".to_string());
        drop(sink);
        assert_eq!(collection.drain(), vec!["done".to_string()]);
    }
}
