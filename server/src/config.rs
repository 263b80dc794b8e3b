use driver::config::StoreConfig;
use error_stack::{Report, ResultExt};
use kernel::KernelError;

const SERVER_PORT: &str = "SERVER_PORT";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub port: u16,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> error_stack::Result<Self, KernelError> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                return Err(Report::from(error).change_context(KernelError::Internal));
            }
        }
        let port = match dotenvy::var(SERVER_PORT) {
            Ok(port) => port
                .trim()
                .parse::<u16>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("{SERVER_PORT} must be a port number"))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            store: StoreConfig::from_env()?,
            port,
        })
    }
}
