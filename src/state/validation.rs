// Resource State Validation
use super::resource_state::ResourceState;
use crate::config::Limits;
use serde::Serialize;
use std::ops::Deref;
use thiserror::Error;

/// Broad category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Value,
    DimensionMismatch,
}

/// Why a resource state was rejected. Indices are zero-based.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ValidationError {
    #[error(
        "{processes} processes and {resources} resources requested; \
         both must be between 1 and {max_processes}/{max_resources}"
    )]
    Configuration {
        processes: usize,
        resources: usize,
        max_processes: usize,
        max_resources: usize,
    },

    #[error("{what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Available units of resource {resource} cannot be negative")]
    NegativeAvailable { resource: usize },

    #[error("Process {process} holds a negative amount of resource {resource}")]
    NegativeAllocation { process: usize, resource: usize },

    #[error("Process {process} declares a negative maximum for resource {resource}")]
    NegativeMax { process: usize, resource: usize },

    #[error("Process {process} has allocated resources exceeding its maximum need (resource {resource})")]
    AllocationExceedsMax { process: usize, resource: usize },

    #[error("Total supply of resource {resource} (allocated plus available) exceeds the representable range")]
    SupplyOverflow { resource: usize },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Configuration { .. } => ErrorKind::Configuration,
            ValidationError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            ValidationError::NegativeAvailable { .. }
            | ValidationError::NegativeAllocation { .. }
            | ValidationError::NegativeMax { .. }
            | ValidationError::AllocationExceedsMax { .. }
            | ValidationError::SupplyOverflow { .. } => ErrorKind::Value,
        }
    }

    /// Offending process, when the failure is tied to one.
    pub fn process(&self) -> Option<usize> {
        match self {
            ValidationError::NegativeAllocation { process, .. }
            | ValidationError::NegativeMax { process, .. }
            | ValidationError::AllocationExceedsMax { process, .. } => Some(*process),
            _ => None,
        }
    }

    /// Offending resource, when the failure is tied to one.
    pub fn resource(&self) -> Option<usize> {
        match self {
            ValidationError::NegativeAvailable { resource }
            | ValidationError::NegativeAllocation { resource, .. }
            | ValidationError::NegativeMax { resource, .. }
            | ValidationError::AllocationExceedsMax { resource, .. }
            | ValidationError::SupplyOverflow { resource } => Some(*resource),
            _ => None,
        }
    }
}

/// A resource state that passed validation.
///
/// The analyses only accept this view, so their loops never see ragged
/// matrices, negative entries, or allocations above the declared maximum.
/// Every work vector they build stays within the per-resource supply, which
/// validation guarantees fits in `Units`.
#[derive(Debug, Clone, Copy)]
pub struct ValidState<'a> {
    state: &'a ResourceState,
}

impl<'a> ValidState<'a> {
    pub(crate) fn new(state: &'a ResourceState, limits: &Limits) -> Result<Self, ValidationError> {
        let processes = state.process_count();
        let resources = state.resource_count();

        if processes == 0
            || resources == 0
            || processes > limits.max_processes
            || resources > limits.max_resources
        {
            return Err(ValidationError::Configuration {
                processes,
                resources,
                max_processes: limits.max_processes,
                max_resources: limits.max_resources,
            });
        }

        state.check_shape()?;

        if let Some(resource) = state.available().iter().position(|&units| units < 0) {
            return Err(ValidationError::NegativeAvailable { resource });
        }

        for (process, (held, max)) in state.allocation().iter().zip(state.max().iter()).enumerate() {
            for resource in 0..resources {
                if held[resource] < 0 {
                    return Err(ValidationError::NegativeAllocation { process, resource });
                }
                if max[resource] < 0 {
                    return Err(ValidationError::NegativeMax { process, resource });
                }
            }
        }

        for (process, (held, max)) in state.allocation().iter().zip(state.max().iter()).enumerate() {
            if let Some(resource) = (0..resources).find(|&r| held[r] > max[r]) {
                return Err(ValidationError::AllocationExceedsMax { process, resource });
            }
        }

        if let Some(resource) = (0..resources).find(|&r| state.supply_of(r).is_none()) {
            return Err(ValidationError::SupplyOverflow { resource });
        }

        Ok(ValidState { state })
    }

    pub fn state(&self) -> &'a ResourceState {
        self.state
    }
}

impl Deref for ValidState<'_> {
    type Target = ResourceState;

    fn deref(&self) -> &ResourceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits::default()
    }

    #[test]
    fn test_accepts_valid_state() {
        let state = ResourceState::from_matrices(vec![vec![1, 0]], vec![vec![2, 1]], vec![0, 3]);
        let valid = state.validate(&limits()).unwrap();
        assert_eq!(valid.process_count(), 1);
        assert!(valid.need().iter().flatten().all(|&n| n >= 0));
    }

    #[test]
    fn test_rejects_out_of_bounds_dimensions() {
        let empty = ResourceState::zeroed(0, 2);
        assert_eq!(empty.validate(&limits()).unwrap_err().kind(), ErrorKind::Configuration);

        let wide = ResourceState::zeroed(2, 21);
        assert_eq!(wide.validate(&limits()).unwrap_err().kind(), ErrorKind::Configuration);

        let tight = Limits { max_processes: 4, max_resources: 4 };
        assert!(ResourceState::zeroed(5, 1).validate(&tight).is_err());
        assert!(ResourceState::zeroed(4, 4).validate(&tight).is_ok());
    }

    #[test]
    fn test_rejects_ragged_matrices() {
        let state = ResourceState::new(2, 2, vec![vec![0, 0], vec![0]], vec![vec![0, 0], vec![0, 0]], vec![0, 0]);
        let err = state.validate(&limits()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert_eq!(
            err,
            ValidationError::DimensionMismatch {
                what: "allocation row 1".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_negative_available_checked_before_matrices() {
        let state = ResourceState::from_matrices(vec![vec![-1]], vec![vec![0]], vec![-2]);
        assert_eq!(
            state.validate(&limits()).unwrap_err(),
            ValidationError::NegativeAvailable { resource: 0 }
        );
    }

    #[test]
    fn test_negative_entries() {
        let state = ResourceState::from_matrices(vec![vec![0, 0], vec![0, -1]], vec![vec![1, 1], vec![1, 1]], vec![0, 0]);
        let err = state.validate(&limits()).unwrap_err();
        assert_eq!(err, ValidationError::NegativeAllocation { process: 1, resource: 1 });
        assert_eq!(err.kind(), ErrorKind::Value);

        let state = ResourceState::from_matrices(vec![vec![0]], vec![vec![-1]], vec![0]);
        assert_eq!(
            state.validate(&limits()).unwrap_err(),
            ValidationError::NegativeMax { process: 0, resource: 0 }
        );
    }

    #[test]
    fn test_allocation_exceeding_max_names_process() {
        let state = ResourceState::from_matrices(
            vec![vec![0, 0], vec![1, 3]],
            vec![vec![1, 1], vec![2, 2]],
            vec![1, 1],
        );
        let err = state.validate(&limits()).unwrap_err();
        assert_eq!(err, ValidationError::AllocationExceedsMax { process: 1, resource: 1 });
        assert_eq!(err.process(), Some(1));
        assert_eq!(err.resource(), Some(1));
        assert!(err.to_string().contains("Process 1"));
    }

    #[test]
    fn test_negative_values_win_over_excess_allocation() {
        // Process 0 exceeds its max, process 1 has a negative max; rule 3 runs first.
        let state = ResourceState::from_matrices(
            vec![vec![5], vec![0]],
            vec![vec![1], vec![-1]],
            vec![0],
        );
        assert_eq!(
            state.validate(&limits()).unwrap_err(),
            ValidationError::NegativeMax { process: 1, resource: 0 }
        );
    }

    #[test]
    fn test_rejects_supply_overflow() {
        let state = ResourceState::from_matrices(vec![vec![1]], vec![vec![1]], vec![i64::MAX]);
        let err = state.validate(&limits()).unwrap_err();
        assert_eq!(err, ValidationError::SupplyOverflow { resource: 0 });
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(err.resource(), Some(0));
        assert_eq!(err.process(), None);

        // Overflow only once the second process's units are added in.
        let state = ResourceState::from_matrices(
            vec![vec![0, i64::MAX / 2 + 1], vec![0, i64::MAX / 2 + 1]],
            vec![vec![0, i64::MAX], vec![0, i64::MAX]],
            vec![3, 0],
        );
        assert_eq!(
            state.validate(&limits()).unwrap_err(),
            ValidationError::SupplyOverflow { resource: 1 }
        );
    }

    #[test]
    fn test_accepts_supply_at_the_limit() {
        let state = ResourceState::from_matrices(vec![vec![5]], vec![vec![5]], vec![i64::MAX - 5]);
        assert!(state.validate(&limits()).is_ok());
        assert_eq!(state.total_resources(), Some(vec![i64::MAX]));
    }
}
