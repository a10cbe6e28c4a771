//! Error macros for harvest

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::HarvestError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::HarvestError::UsageError($msg.to_string()))
    };
}

/// Macro for mapping store errors with the operation that produced them
#[macro_export]
macro_rules! map_db_err {
    ($op:expr) => {
        |e| $crate::error::HarvestError::db_operation($op, e)
    };
}
