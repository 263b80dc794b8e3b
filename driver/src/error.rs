use error_stack::Report;
use kernel::KernelError;

pub trait ConvertError: 'static {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T: 'static> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                sqlx::Error::PoolTimedOut => KernelError::Timeout,
                sqlx::Error::Database(db) if db.is_unique_violation() => KernelError::Conflict,
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}

impl<T: 'static> ConvertError for Result<T, sqlx::migrate::MigrateError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

impl<T: 'static> ConvertError for Result<T, dotenvy::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use super::ConvertError;

    #[test]
    fn pool_timeout_is_timeout() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = result.convert_error().expect_err("timed out");
        assert_eq!(report.current_context(), &KernelError::Timeout);
    }

    #[test]
    fn missing_row_is_internal() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let report = result.convert_error().expect_err("no row");
        assert_eq!(report.current_context(), &KernelError::Internal);
    }
}
