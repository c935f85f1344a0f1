//! Conversions from lower-layer errors

use super::types::RouteError;
use crate::store::StoreError;

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RouteError::not_found(format!("credential '{}'", id)),
            other => RouteError::storage(other.to_string()),
        }
    }
}
