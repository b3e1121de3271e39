//! Background driver for signing key rotation.

use std::sync::Arc;
use std::time::Duration;

use session_shared::config::KeyRotationConfig;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::key_manager::KeyManager;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Periodic task that rotates the signing key set and purges expired keys.
///
/// On a rotation failure the task logs and waits for the next tick; it
/// never exits.
pub struct KeyRotationScheduler {
    key_manager: Arc<KeyManager>,
    config: KeyRotationConfig,
}

impl KeyRotationScheduler {
    pub fn new(key_manager: Arc<KeyManager>, config: KeyRotationConfig) -> Self {
        Self {
            key_manager,
            config,
        }
    }

    /// Spawn the rotation loop onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        let interval = Duration::from_secs(self.config.rotation_days * SECONDS_PER_DAY);
        let grace = Duration::from_secs(self.config.grace_days * SECONDS_PER_DAY);
        let key_manager = self.key_manager;

        info!(
            "key rotation scheduled every {} days with {} days grace",
            self.config.rotation_days, self.config.grace_days
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the seed key
            // is not rotated at startup.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let manager = Arc::clone(&key_manager);
                let rotated =
                    tokio::task::spawn_blocking(move || manager.rotate(grace)).await;

                match rotated {
                    Ok(Ok(kid)) => info!("rotated signing keys, new kid {}", kid),
                    Ok(Err(e)) => {
                        error!("failed to rotate signing keys: {}", e);
                        continue;
                    }
                    Err(e) => {
                        error!("key rotation task panicked: {}", e);
                        continue;
                    }
                }

                let removed = key_manager.cleanup();
                if removed > 0 {
                    info!("purged {} expired signing keys", removed);
                }
            }
        })
    }
}
