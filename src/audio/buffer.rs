/// Chunks of captured mono samples, kept in arrival order
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    chunks: Vec<Vec<f32>>,
}

impl CaptureBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk
    /// Returns false if the chunk was empty and skipped
    pub fn push(&mut self, chunk: Vec<f32>) -> bool {
        if chunk.is_empty() {
            return false;
        }
        self.chunks.push(chunk);
        true
    }

    /// Number of chunks buffered
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of samples across all chunks
    pub fn sample_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Check if nothing has been buffered
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Take all samples in order, leaving the buffer empty
    pub fn take_samples(&mut self) -> Vec<f32> {
        let mut samples = Vec::with_capacity(self.sample_count());
        for chunk in self.chunks.drain(..) {
            samples.extend_from_slice(&chunk);
        }
        samples
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
