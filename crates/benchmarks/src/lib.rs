//! Benchmark utilities for salted-bloom
pub mod utils {
    use rand::Rng;

    /// Random byte strings of the given length
    pub fn generate_elements(count: usize, len: usize) -> Vec<Vec<u8>> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| (0..len).map(|_| rng.gen::<u8>()).collect())
            .collect()
    }
}
