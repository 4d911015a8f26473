//! Well, reservoir and surface models
//!
//! A `FieldModel` owns `PadModel`s, each pad owns its `WellModel`s, and each
//! well owns exactly one `ReservoirModel` and `FluidModel`. Wells never share
//! state, so every well can be stepped independently.

pub mod esp;
pub mod field;
pub mod fluid;
pub mod gas_lift;
pub mod modifiers;
pub mod pad;
pub mod pcp;
pub mod reservoir;
pub mod srp;
pub mod telemetry;
pub mod well;

pub use esp::EspEquipment;
pub use field::{FieldModel, FieldSummary};
pub use fluid::FluidModel;
pub use gas_lift::GasLiftEquipment;
pub use modifiers::{AnomalyModifiers, CasingHeading};
pub use pad::{Facility, FacilityKind, PadModel, PadProduction};
pub use pcp::PcpEquipment;
pub use reservoir::{DriveMechanism, IprModel, ReservoirModel, ReservoirParams, ReservoirState};
pub use srp::SrpEquipment;
pub use telemetry::{Attributes, Telemetry, TelemetryValue};
pub use well::{
    LiftEquipment, LiftType, WellCounters, WellGeometry, WellIdentity, WellModel, WellStatus,
};

use thiserror::Error;

/// Rejected construction input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid {field} = {value}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

/// Fail with `InvalidParameter` unless `condition` holds
pub(crate) fn ensure(
    condition: bool,
    field: &'static str,
    value: f64,
    reason: &'static str,
) -> Result<(), ModelError> {
    if condition && value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidParameter { field, value, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_rejects_nan() {
        assert!(ensure(true, "x", f64::NAN, "must be finite").is_err());
        assert!(ensure(true, "x", 1.0, "ok").is_ok());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ensure(false, "ipr_qmax_bpd", 0.0, "must be positive").unwrap_err();
        assert_eq!(err.to_string(), "invalid ipr_qmax_bpd = 0: must be positive");
    }
}
