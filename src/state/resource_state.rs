//! Resource State
//!
//! Holds the allocation and max matrices plus the available vector for a
//! fixed number of processes and resource types. The need matrix is never
//! stored: every read derives it from `max - allocation`, so it cannot drift
//! from the matrices it depends on.

use super::types::*;
use super::validation::{ValidState, ValidationError};
use crate::config::Limits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    process_count: usize,
    resource_count: usize,
    allocation: Matrix,
    max: Matrix,
    available: ResourceVector,
}

impl ResourceState {
    /// Creates a state from declared dimensions and raw matrices.
    ///
    /// Nothing is checked here; call [`ResourceState::validate`] before
    /// running an analysis.
    pub fn new(
        process_count: usize,
        resource_count: usize,
        allocation: Matrix,
        max: Matrix,
        available: ResourceVector,
    ) -> Self {
        ResourceState {
            process_count,
            resource_count,
            allocation,
            max,
            available,
        }
    }

    /// Creates a state whose dimensions are taken from the matrices
    /// themselves (process count from `allocation`, resource count from
    /// `available`).
    pub fn from_matrices(allocation: Matrix, max: Matrix, available: ResourceVector) -> Self {
        let process_count = allocation.len();
        let resource_count = available.len();
        Self::new(process_count, resource_count, allocation, max, available)
    }

    /// All-zero state of the given dimensions.
    pub fn zeroed(process_count: usize, resource_count: usize) -> Self {
        Self::new(
            process_count,
            resource_count,
            vec![vec![0; resource_count]; process_count],
            vec![vec![0; resource_count]; process_count],
            vec![0; resource_count],
        )
    }

    pub fn process_count(&self) -> usize {
        self.process_count
    }

    pub fn resource_count(&self) -> usize {
        self.resource_count
    }

    pub fn allocation(&self) -> &Matrix {
        &self.allocation
    }

    pub fn max(&self) -> &Matrix {
        &self.max
    }

    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Derived need matrix, `need[i][j] = max[i][j] - allocation[i][j]`.
    pub fn need(&self) -> Matrix {
        (0..self.allocation.len().min(self.max.len()))
            .map(|i| self.need_row(i))
            .collect()
    }

    /// Need row for one process. Empty if the process index is out of range.
    pub fn need_row(&self, process: usize) -> ResourceVector {
        match (self.max.get(process), self.allocation.get(process)) {
            (Some(max), Some(allocation)) => max
                .iter()
                .zip(allocation.iter())
                .map(|(m, a)| m - a)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// System-wide supply per resource: allocated units plus available units.
    /// `None` if any column sum overflows `Units`.
    pub fn total_resources(&self) -> Option<ResourceVector> {
        (0..self.available.len())
            .map(|resource| self.supply_of(resource))
            .collect()
    }

    /// Supply of one resource, or `None` if the sum overflows.
    pub(crate) fn supply_of(&self, resource: usize) -> Option<Units> {
        let available = *self.available.get(resource)?;
        self.allocation
            .iter()
            .filter_map(|row| row.get(resource))
            .try_fold(available, |total, held| total.checked_add(*held))
    }

    /// Replaces one process's allocation row.
    pub fn set_allocation_row(
        &mut self,
        process: usize,
        row: ResourceVector,
    ) -> Result<(), ValidationError> {
        self.check_row("allocation", process, &row)?;
        self.allocation[process] = row;
        Ok(())
    }

    /// Replaces one process's max row.
    pub fn set_max_row(&mut self, process: usize, row: ResourceVector) -> Result<(), ValidationError> {
        self.check_row("max", process, &row)?;
        self.max[process] = row;
        Ok(())
    }

    /// Replaces the available vector.
    pub fn set_available(&mut self, available: ResourceVector) -> Result<(), ValidationError> {
        if available.len() != self.resource_count {
            return Err(ValidationError::DimensionMismatch {
                what: "available".to_string(),
                expected: self.resource_count,
                actual: available.len(),
            });
        }
        self.available = available;
        Ok(())
    }

    /// Replaces all three matrices at once while keeping the dimensions.
    /// On a shape error the state is left untouched.
    pub fn replace_matrices(
        &mut self,
        allocation: Matrix,
        max: Matrix,
        available: ResourceVector,
    ) -> Result<(), ValidationError> {
        let candidate = ResourceState::new(
            self.process_count,
            self.resource_count,
            allocation,
            max,
            available,
        );
        candidate.check_shape()?;
        *self = candidate;
        Ok(())
    }

    /// Checks the state against `limits` and returns a view the analyses
    /// accept. The first failing rule is reported.
    pub fn validate(&self, limits: &Limits) -> Result<ValidState<'_>, ValidationError> {
        ValidState::new(self, limits)
    }

    fn check_row(&self, what: &str, process: usize, row: &[Units]) -> Result<(), ValidationError> {
        if process >= self.process_count {
            return Err(ValidationError::DimensionMismatch {
                what: format!("{} process index {}", what, process),
                expected: self.process_count,
                actual: process + 1,
            });
        }
        if row.len() != self.resource_count {
            return Err(ValidationError::DimensionMismatch {
                what: format!("{} row {}", what, process),
                expected: self.resource_count,
                actual: row.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_shape(&self) -> Result<(), ValidationError> {
        for (what, matrix) in [("allocation", &self.allocation), ("max", &self.max)] {
            if matrix.len() != self.process_count {
                return Err(ValidationError::DimensionMismatch {
                    what: format!("{} rows", what),
                    expected: self.process_count,
                    actual: matrix.len(),
                });
            }
            for (i, row) in matrix.iter().enumerate() {
                if row.len() != self.resource_count {
                    return Err(ValidationError::DimensionMismatch {
                        what: format!("{} row {}", what, i),
                        expected: self.resource_count,
                        actual: row.len(),
                    });
                }
            }
        }
        if self.available.len() != self.resource_count {
            return Err(ValidationError::DimensionMismatch {
                what: "available".to_string(),
                expected: self.resource_count,
                actual: self.available.len(),
            });
        }
        Ok(())
    }
}
