//! Department reference data for the submission form.

use std::sync::Arc;

use crate::domain::department::Department;
use crate::domain::error::Error;
use crate::domain::ports::{DepartmentRepository, DepartmentRepositoryError};

#[derive(Clone)]
pub struct DepartmentService {
    departments: Arc<dyn DepartmentRepository>,
}

impl DepartmentService {
    pub fn new(departments: Arc<dyn DepartmentRepository>) -> Self {
        Self { departments }
    }

    /// All departments, ordered by name.
    pub async fn list(&self) -> Result<Vec<Department>, Error> {
        self.departments.list().await.map_err(|error| match error {
            DepartmentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("department repository unavailable: {message}"))
            }
            DepartmentRepositoryError::Query { message } => {
                Error::internal(format!("department repository error: {message}"))
            }
        })
    }
}
