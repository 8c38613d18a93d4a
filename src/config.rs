use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Environment-driven defaults for the process-wide logger.
///
/// `SYNCLOG_LEVEL` selects the initial minimum level by name (`debug`,
/// `info`, `warn`, `error`, `panic`, `fatal`, `off`, or `all`).
#[derive(FromEnv)]
#[from_env(prefix = "SYNCLOG")]
#[allow(non_snake_case)]
pub struct SynclogConfig {
    #[from_env(default = "debug")]
    pub LEVEL: String,
}

pub static SYNCLOG_CONFIG: LazyLock<SynclogConfig> =
    LazyLock::new(|| SynclogConfig::from_env().unwrap());
