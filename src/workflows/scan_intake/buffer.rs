use std::collections::VecDeque;

/// FIFO of raw barcodes awaiting classification. Pop order is scan order.
#[derive(Debug, Default)]
pub struct ScanBuffer {
    barcodes: VecDeque<String>,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, barcode: String) {
        self.barcodes.push_back(barcode);
    }

    pub fn pop(&mut self) -> Option<String> {
        self.barcodes.pop_front()
    }

    /// Drop everything buffered, returning how many scans were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.barcodes.len();
        self.barcodes.clear();
        discarded
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}
