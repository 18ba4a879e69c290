//! Explicit dependency bundle passed to every probe and the driver, in
//! place of the process-wide globals a naive port would reach for.

use crate::http::Client;

/// Default bucket size for `probe_valid_fields`/`probe_args`; configurable
/// over the 64-4096 range.
pub const DEFAULT_BUCKET_SIZE: usize = 512;

/// Immutable-after-construction singletons shared by the probes and driver.
pub struct Oracle {
    pub client: Client,
    pub bucket_size: usize,
    pub infer_input_suffix: bool,
    pub progress: bool,
}

impl Oracle {
    pub fn new(client: Client, bucket_size: usize, infer_input_suffix: bool) -> Self {
        Oracle { client, bucket_size, infer_input_suffix, progress: false }
    }

    /// Shows a progress bar across each round's field fan-out.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
