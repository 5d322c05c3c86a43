// Sun Feb 22 2026 - Alex

/// Byte-frequency Shannon entropy accumulator, fed incrementally so heap
/// arenas can be streamed through a bounded buffer.
pub struct Entropy {
    freq: [u64; 256],
    total: u64,
}

impl Entropy {
    pub fn new() -> Self {
        Self { freq: [0; 256], total: 0 }
    }

    pub fn feed(&mut self, data: &[u8]) {
        for &b in data {
            self.freq[b as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    pub fn total_bytes(&self) -> u64 {
        self.total
    }

    /// Entropy in bits per byte, 0.0 for an empty accumulator.
    pub fn value(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let mut entropy = 0.0;
        for &count in &self.freq {
            if count != 0 {
                let p = count as f64 / total;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}

impl Default for Entropy {
    fn default() -> Self {
        Self::new()
    }
}
