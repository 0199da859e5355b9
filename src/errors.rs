use reqwest::StatusCode;
use thiserror::Error;

/// Why a single round trip to the prediction service did not yield a price.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service answered {0}")]
    Status(StatusCode),
    #[error("prediction service sent malformed JSON: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("response has no numeric `prediction` field")]
    MissingPrediction,
    #[error("converted price of {base_price} is out of range")]
    PriceOutOfRange { base_price: f64 },
}

/// A form constraint that blocks submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field}: \"{value}\" is not one of the listed options")]
    UnknownOption { field: &'static str, value: String },
    #[error("{field}: \"{value}\" is not a number")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: f64, max: f64 },
    #[error("{field} must be a multiple of {step} starting at {min}")]
    OffStep { field: &'static str, min: f64, step: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRejected {
    #[error("a prediction is already in flight")]
    Busy,
    #[error("form is incomplete ({} problem(s))", .0.len())]
    Invalid(Vec<ValidationError>),
}
