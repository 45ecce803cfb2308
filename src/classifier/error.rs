use std::fmt;

use crate::dataset::DatasetError;

/// Represents the different types of errors that can occur in the category classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// Error occurred while reading or validating training data
    DataError(String),
    /// Error occurred while fitting the pipeline
    TrainingError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataError(msg) => write!(f, "Data error: {}", msg),
            Self::TrainingError(msg) => write!(f, "Training error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<DatasetError> for ClassifierError {
    fn from(err: DatasetError) -> Self {
        ClassifierError::DataError(err.to_string())
    }
}
