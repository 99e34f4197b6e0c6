//! Unified operator capability surface for inbound adapters.

use super::maintenance::MaintenanceOperator;
use super::runtime::RuntimeOperator;
use super::status::StatusOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: MaintenanceOperator + RuntimeOperator + StatusOperator {}

impl<T> OperatorPort for T where T: MaintenanceOperator + RuntimeOperator + StatusOperator {}
