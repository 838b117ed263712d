//! Unified error handling for covariance estimators.
//!
//! This module defines `CovarianceError`, the error type for the kernel
//! covariance contract check and for the plug-in bandwidth machinery that
//! feeds it. Cluster estimators and the linear-algebra helpers never fail;
//! they let degenerate inputs surface as non-finite numbers instead. An
//! alias `CovResult<T>` standardizes the return type.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Unified error type for covariance estimation.
///
/// `WeightsExceedObservations` is the one contract violation callers can
/// observe. The bandwidth variants are produced while fitting the AR(1)
/// plug-in and are consumed inside `KernelType::optimal_bandwidth`, which
/// falls back to a rule of thumb on any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceError {
    // ---- Kernel contract ----
    /// More kernel weights than observations.
    WeightsExceedObservations {
        weights: usize,
        nobs: usize,
    },

    // ---- Bandwidth selection ----
    /// AR(1) coefficient too close to the unit circle.
    StationarityViolated {
        phi: f64,
    },

    /// Plug-in denominator numerically zero.
    DenominatorTooSmall {
        denominator: f64,
    },

    /// Plug-in order other than 1 or 2.
    OrderNotSupported {
        ord: usize,
    },

    // ---- Anyhow catchall ----
    Anyhow(String),
}

pub type CovResult<T> = Result<T, CovarianceError>;

impl From<anyhow::Error> for CovarianceError {
    fn from(err: anyhow::Error) -> Self {
        CovarianceError::Anyhow(err.to_string())
    }
}

impl std::error::Error for CovarianceError {}

impl std::fmt::Display for CovarianceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Kernel contract ----
            CovarianceError::WeightsExceedObservations { weights, nobs } => write!(
                f,
                "Covariance Error: Length of w ({weights}) is larger than the number of elements in z ({nobs})"
            ),

            // ---- Bandwidth selection ----
            CovarianceError::StationarityViolated { phi } => {
                write!(f, "Covariance Error: Stationarity violated (phi = {phi})")
            }
            CovarianceError::DenominatorTooSmall { denominator } => write!(
                f,
                "Covariance Error: Denominator too small ({denominator}) in bandwidth calculation"
            ),
            CovarianceError::OrderNotSupported { ord } => {
                write!(f, "Covariance Error: Order {ord} not supported for bandwidth calculation")
            }

            // ---- Anyhow catchall ----
            CovarianceError::Anyhow(msg) => write!(f, "Covariance Error: {msg}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CovarianceError> for PyErr {
    fn from(err: CovarianceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The contract-violation message names both lengths.
    //
    // Given
    // -----
    // - `WeightsExceedObservations { weights: 7, nobs: 5 }`.
    //
    // Expect
    // ------
    // - The rendered message contains "7" and "5" in the documented order.
    fn weights_exceed_observations_message_names_both_lengths() {
        let err = CovarianceError::WeightsExceedObservations { weights: 7, nobs: 5 };
        let msg = err.to_string();
        assert!(msg.contains("Length of w (7)"), "unexpected message: {msg}");
        assert!(msg.contains("elements in z (5)"), "unexpected message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // `anyhow` errors are captured as their display string.
    //
    // Given
    // -----
    // - An `anyhow::Error` built from a static message.
    //
    // Expect
    // ------
    // - Conversion yields `Anyhow` holding that message.
    fn anyhow_errors_convert_to_catchall_variant() {
        let err: CovarianceError = anyhow::anyhow!("fit failed").into();
        assert_eq!(err, CovarianceError::Anyhow("fit failed".to_string()));
    }
}
