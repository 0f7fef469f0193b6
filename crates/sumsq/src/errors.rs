//! Error handling and exit codes.

use sumsq_core::constants::exit_codes;
use sumsq_core::executor::SumError;

/// Exit code for a strategy or batch error.
pub fn handle_error(err: &SumError) -> i32 {
    match err {
        SumError::Calculation(_) | SumError::WorkerFailed { .. } | SumError::BatchInProgress => {
            exit_codes::ERROR_GENERIC
        }
        SumError::InvalidInput(_) | SumError::Config(_) => exit_codes::ERROR_CONFIG,
        SumError::Interrupted => exit_codes::ERROR_INTERRUPTED,
        SumError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        SumError::Mismatch => exit_codes::ERROR_MISMATCH,
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SumError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
