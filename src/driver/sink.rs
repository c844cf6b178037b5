//! Record sink
//!
//! Extracted records leave the kernel through this seam, once per newly
//! deduplicated record. Rendering is the hosting environment's business.

/// Consumes deduplicated output records
pub trait RecordSink {
    fn emit(&mut self, record: &str);
}

/// Writes one record per line to stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl RecordSink for StdoutSink {
    fn emit(&mut self, record: &str) {
        println!("{record}");
    }
}

/// Collects records in memory; used by tests and embedders
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<String>,
}

impl RecordSink for MemorySink {
    fn emit(&mut self, record: &str) {
        self.records.push(record.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_in_order() {
        let mut sink = MemorySink::default();
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.records, vec!["first", "second"]);
    }
}
