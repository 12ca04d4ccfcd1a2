pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::config::UpdaterConfig;
pub use crate::core::error::{UpdaterError, UpdaterResult};
pub use crate::core::matcher::{MatchResult, MatchState};
pub use crate::core::mods::{ModDescriptor, ModLoader, UploadedFile};
pub use crate::core::package::UpdatePackage;
pub use crate::core::resolver::{ResolvedRelease, UpdateOutcome, UpdateProgress};
pub use crate::core::session::UpdateSession;

/// Install the structured logger. `RUST_LOG` overrides the default filter.
/// Calling it again once a subscriber is set is a no-op.
pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,modrefresh_lib=debug")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("ModRefresh updater starting...");
    }
}
