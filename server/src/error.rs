use std::process::{ExitCode, Termination};

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::{AttachmentKind, FrameKind, Report};
use kernel::KernelError;
use serde::Serialize;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

/// Unreadable JSON bodies fail validation like any other bad input.
impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        ErrorStatus(Report::new(KernelError::Validation).attach_printable(rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    retryable: bool,
}

pub(crate) fn status_of(error: &KernelError) -> StatusCode {
    match error {
        KernelError::NotFound(_) => StatusCode::NOT_FOUND,
        KernelError::OutOfStock | KernelError::AlreadyReturned | KernelError::Validation => {
            StatusCode::BAD_REQUEST
        }
        KernelError::RentalAlreadyOpen | KernelError::Conflict => StatusCode::CONFLICT,
        KernelError::TransactionFailed => StatusCode::SERVICE_UNAVAILABLE,
        KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
        KernelError::ReconciliationRequired | KernelError::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Validation failures carry their reason as the latest printable attachment.
fn message_of(report: &Report<KernelError>) -> String {
    let context = report.current_context();
    if !matches!(context, KernelError::Validation) {
        return context.to_string();
    }
    report
        .frames()
        .find_map(|frame| match frame.kind() {
            FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                Some(printable.to_string())
            }
            _ => None,
        })
        .unwrap_or_else(|| context.to_string())
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        let context = *self.0.current_context();
        match context {
            KernelError::ReconciliationRequired => {
                tracing::error!(target: "reconciliation", "{:?}", self.0)
            }
            KernelError::Internal | KernelError::TransactionFailed => {
                tracing::error!("{:?}", self.0)
            }
            _ => tracing::debug!("{:?}", self.0),
        }
        let body = ErrorBody {
            code: context.code(),
            message: message_of(&self.0),
            retryable: context.is_retryable(),
        };
        (status_of(&context), Json(body)).into_response()
    }
}
