//! Per-dataset operations and their outcomes

use std::fmt;

/// A single call made against one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOperation {
    /// Make the calling service principal the owner of the dataset
    TakeOver {
        dataset_id: String,
    },
    /// Bind the dataset to a cloud connection
    BindToGateway {
        dataset_id: String,
        cloud_connection_id: String,
    },
}

impl DatasetOperation {
    pub fn take_over(dataset_id: impl Into<String>) -> Self {
        Self::TakeOver {
            dataset_id: dataset_id.into(),
        }
    }

    pub fn bind_to_gateway(
        dataset_id: impl Into<String>,
        cloud_connection_id: impl Into<String>,
    ) -> Self {
        Self::BindToGateway {
            dataset_id: dataset_id.into(),
            cloud_connection_id: cloud_connection_id.into(),
        }
    }

    pub fn dataset_id(&self) -> &str {
        match self {
            Self::TakeOver { dataset_id } => dataset_id,
            Self::BindToGateway { dataset_id, .. } => dataset_id,
        }
    }

    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::TakeOver { .. } => "take_over",
            Self::BindToGateway { .. } => "bind_to_gateway",
        }
    }
}

impl fmt::Display for DatasetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TakeOver { dataset_id } => write!(f, "take over {}", dataset_id),
            Self::BindToGateway {
                dataset_id,
                cloud_connection_id,
            } => write!(f, "bind {} to connection {}", dataset_id, cloud_connection_id),
        }
    }
}

/// Result of executing a `DatasetOperation`
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub operation: DatasetOperation,
    pub success: bool,
    /// HTTP status, absent when the request never got a response
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl OperationResult {
    pub fn success(operation: DatasetOperation, status_code: u16) -> Self {
        Self {
            operation,
            success: true,
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn error(operation: DatasetOperation, error: String, status_code: Option<u16>) -> Self {
        Self {
            operation,
            success: false,
            status_code,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }
}
