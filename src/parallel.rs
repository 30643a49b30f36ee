//! Parallel processing configuration
//!
//! The seasonal reduction and the map shading run on Rayon's global thread
//! pool. This module sizes that pool from the command line.

use crate::errors::{ClimError, Result};
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Set up the global Rayon thread pool with the specified configuration.
    ///
    /// Without an explicit thread count Rayon's default pool is left alone.
    pub fn setup_global_pool(&self) -> Result<()> {
        match self.num_threads {
            Some(0) => Err(ClimError::ThreadPoolError(
                "thread count must be at least 1".to_string(),
            )),
            Some(num_threads) => {
                ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build_global()
                    .map_err(|e| {
                        ClimError::ThreadPoolError(format!(
                            "Failed to initialize thread pool with {} threads: {}",
                            num_threads, e
                        ))
                    })?;
                info!(threads = num_threads, "Configured parallel processing");
                Ok(())
            }
            None => {
                debug!(
                    threads = rayon::current_num_threads(),
                    cores = num_cpus::get(),
                    "Using default thread pool configuration"
                );
                Ok(())
            }
        }
    }

    /// Get the current number of threads being used
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}
