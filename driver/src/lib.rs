use error_stack::Report;
use kernel::KernelError;

use crate::error::ConvertError;

pub mod config;
pub mod database;
pub mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .convert_error()
        .map_err(|report| report.attach_printable(format!("reading {key}")))
}

pub(crate) fn env_or(key: &str, default: &str) -> error_stack::Result<String, KernelError> {
    match dotenvy::var(key) {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default.to_string()),
        Err(error) => Err(Report::from(error)
            .change_context(KernelError::Internal)
            .attach_printable(format!("reading {key}"))),
    }
}
