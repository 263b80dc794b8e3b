use std::str::FromStr;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use kernel::KernelError;

use crate::{env, env_or};

const STORE_BACKEND: &str = "STORE_BACKEND";
pub(crate) const POSTGRES_URL: &str = "POSTGRES_URL";
const STORE_TIMEOUT_MS: &str = "STORE_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Report<KernelError>;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("unknown {STORE_BACKEND} `{other}`"))),
        }
    }
}

/// Store settings read once at startup.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Present whenever `backend` is [`StoreBackend::Postgres`].
    pub postgres_url: Option<String>,
    pub operation_timeout: Duration,
}

impl StoreConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let backend = env_or(STORE_BACKEND, "postgres")?.parse::<StoreBackend>()?;
        Self::for_backend(backend)
    }

    /// Reads the settings `backend` needs, regardless of `STORE_BACKEND`.
    pub fn for_backend(backend: StoreBackend) -> error_stack::Result<Self, KernelError> {
        let postgres_url = match backend {
            StoreBackend::Postgres => Some(env(POSTGRES_URL)?),
            StoreBackend::Memory => None,
        };
        let operation_timeout = parse_timeout(&env_or(
            STORE_TIMEOUT_MS,
            &kernel::interface::database::DEFAULT_OPERATION_TIMEOUT
                .as_millis()
                .to_string(),
        )?)?;
        Ok(Self {
            backend,
            postgres_url,
            operation_timeout,
        })
    }
}

fn parse_timeout(millis: &str) -> error_stack::Result<Duration, KernelError> {
    let millis = millis
        .trim()
        .parse::<u64>()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("{STORE_TIMEOUT_MS} must be a whole number"))?;
    if millis == 0 {
        return Err(Report::new(KernelError::Internal)
            .attach_printable(format!("{STORE_TIMEOUT_MS} must be positive")));
    }
    Ok(Duration::from_millis(millis))
}
