//! Pad ("macolla") model
//!
//! A pad groups wells that share surface facilities and one IoT gateway.
//! Wells are generated from the field's lift distribution and sampling
//! ranges with a pad-level seeded generator, so a pad seed fully determines
//! its wells.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;

use super::esp::EspEquipment;
use super::fluid::FluidModel;
use super::gas_lift::GasLiftEquipment;
use super::pcp::PcpEquipment;
use super::reservoir::{DriveMechanism, IprModel, ReservoirModel, ReservoirParams};
use super::srp::SrpEquipment;
use super::telemetry::Attributes;
use super::well::{LiftEquipment, LiftType, WellGeometry, WellIdentity, WellModel, WellStatus};
use super::ModelError;
use crate::config::defaults::{BASE_DEPTH_RANGE_FT, OOIP_RANGE_STB, QMAX_PER_AVG_RATE, VOGEL_PB_MARGIN};
use crate::config::{FieldConfig, Range};
use crate::noise::uniform;
use crate::physics_engine::correlations::standing_bubble_point;

const SRP_PUMP_BORES_IN: [f64; 5] = [1.5, 1.75, 2.0, 2.25, 2.5];

// ============================================================================
// Facilities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Separator,
    Compressor,
    Tank,
}

impl FacilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Separator => "separator",
            Self::Compressor => "compressor",
            Self::Tank => "tank",
        }
    }

    /// Units installed on every pad
    fn count(self) -> usize {
        match self {
            Self::Separator | Self::Tank => 2,
            Self::Compressor => 1,
        }
    }

    fn specs(self) -> Attributes {
        let entries = match self {
            Self::Separator => vec![("pressure_psi", json!(80)), ("capacity_bpd", json!(10_000))],
            Self::Compressor => vec![("capacity_mscfd", json!(5_000)), ("discharge_psi", json!(1_200))],
            Self::Tank => vec![("capacity_bbl", json!(5_000))],
        };
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Surface facility on a pad
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    pub name: String,
    pub kind: FacilityKind,
    pub pad_name: String,
    pub specs: Attributes,
}

impl Facility {
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("facility_name".to_string(), json!(self.name));
        attrs.insert("facility_type".to_string(), json!(self.kind.as_str()));
        attrs.insert("macolla".to_string(), json!(self.pad_name));
        attrs.extend(self.specs.clone());
        attrs
    }
}

/// Cumulative production summed over a pad's wells
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PadProduction {
    pub total_oil_stb: f64,
    pub total_water_stb: f64,
    pub total_gas_mscf: f64,
    pub active_wells: usize,
    pub total_wells: usize,
}

// ============================================================================
// Pad
// ============================================================================

pub struct PadModel {
    name: String,
    field_name: String,
    gateway_name: String,
    wells: Vec<WellModel>,
    facilities: Vec<Facility>,
}

impl PadModel {
    /// Build `num_wells` wells for pad `name` of `field`
    pub fn build(name: &str, field: &FieldConfig, num_wells: usize, seed: u64) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut lift_types = assign_lift_types(&field.lift_fractions()?, num_wells);
        lift_types.shuffle(&mut rng);

        let field_code: String = field.name.chars().take(2).collect::<String>().to_uppercase();
        let mut wells = Vec::with_capacity(num_wells);
        for (i, lift_type) in lift_types.into_iter().enumerate() {
            let identity = WellIdentity::new(format!("{field_code}-{name}-{:03}", i + 1), &field.name, name);
            wells.push(build_well(&mut rng, field, identity, lift_type)?);
        }

        let facilities = [FacilityKind::Separator, FacilityKind::Compressor, FacilityKind::Tank]
            .into_iter()
            .flat_map(|kind| {
                (1..=kind.count()).map(move |j| Facility {
                    name: format!("{}-{name}-{j:02}", kind.as_str().to_uppercase()),
                    kind,
                    pad_name: name.to_string(),
                    specs: kind.specs(),
                })
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            field_name: field.name.clone(),
            gateway_name: format!("GW-{name}"),
            wells,
            facilities,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn gateway_name(&self) -> &str {
        &self.gateway_name
    }

    pub fn wells(&self) -> &[WellModel] {
        &self.wells
    }

    pub fn wells_mut(&mut self) -> &mut [WellModel] {
        &mut self.wells
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn aggregate_production(&self) -> PadProduction {
        self.wells.iter().fold(
            PadProduction {
                total_wells: self.wells.len(),
                ..PadProduction::default()
            },
            |mut acc, well| {
                let c = well.counters();
                acc.total_oil_stb += c.cumulative_oil_stb;
                acc.total_water_stb += c.cumulative_water_stb;
                acc.total_gas_mscf += c.cumulative_gas_mscf;
                if well.status() == WellStatus::Producing {
                    acc.active_wells += 1;
                }
                acc
            },
        )
    }
}

/// Round each fraction to a well count (at least one per listed type), then
/// trim or pad with the most common type to exactly `num_wells`
fn assign_lift_types(fractions: &[(LiftType, f64)], num_wells: usize) -> Vec<LiftType> {
    let mut lift_types = Vec::with_capacity(num_wells);
    for &(lift_type, fraction) in fractions {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let count = ((num_wells as f64 * fraction).round() as usize).max(1);
        lift_types.extend(std::iter::repeat(lift_type).take(count));
    }
    lift_types.truncate(num_wells);

    let most_common = fractions
        .iter()
        .fold(None::<(LiftType, f64)>, |best, &(t, f)| match best {
            Some((_, bf)) if bf >= f => best,
            _ => Some((t, f)),
        })
        .map_or(LiftType::Esp, |(t, _)| t);
    lift_types.resize(num_wells, most_common);
    lift_types
}

fn sample(rng: &mut StdRng, range: Range) -> f64 {
    uniform(rng, range[0], range[1])
}

fn pick_drive_mechanism(rng: &mut StdRng, template: &str) -> DriveMechanism {
    let template = template.to_lowercase();
    let draw: f64 = rng.gen();
    if template.contains("faja") {
        DriveMechanism::SolutionGas
    } else if template.contains("lago") || template.contains("maracaibo") {
        if draw < 0.7 {
            DriveMechanism::WaterDrive
        } else {
            DriveMechanism::SolutionGas
        }
    } else if draw < 0.4 {
        DriveMechanism::GasCap
    } else if draw < 0.7 {
        DriveMechanism::WaterDrive
    } else {
        DriveMechanism::SolutionGas
    }
}

fn build_well(
    rng: &mut StdRng,
    field: &FieldConfig,
    identity: WellIdentity,
    lift_type: LiftType,
) -> Result<WellModel, ModelError> {
    let rc = &field.reservoir;
    let pressure = sample(rng, rc.pressure_psi);
    let temperature = sample(rng, rc.temperature_f);
    let api = sample(rng, rc.api_gravity);
    let water_cut = sample(rng, rc.water_cut);
    let gor = sample(rng, rc.gor_scf_stb);
    let avg_rate = sample(rng, field.production.avg_rate_bpd);

    let pb = standing_bubble_point(temperature, api, gor, 0.75);
    let bubble_point = pb.min(pressure);

    let params = ReservoirParams {
        initial_pressure_psi: pressure,
        temperature_f: temperature,
        bubble_point_psi: bubble_point,
        api_gravity: api,
        gor_scf_stb: gor,
        water_cut_initial: water_cut,
        ipr_qmax_bpd: avg_rate * QMAX_PER_AVG_RATE,
        ipr_model: if pressure <= pb * VOGEL_PB_MARGIN {
            IprModel::Vogel
        } else {
            IprModel::Darcy
        },
        drive_mechanism: pick_drive_mechanism(rng, &field.template),
        ooip_stb: sample(rng, OOIP_RANGE_STB),
        ..ReservoirParams::default()
    };
    let fluid = FluidModel {
        api_gravity: api,
        reservoir_temperature_f: temperature,
        gor_scf_stb: gor,
        bubble_point_psi: bubble_point,
        ..FluidModel::default()
    };

    let base_depth = sample(rng, BASE_DEPTH_RANGE_FT);
    let geometry = WellGeometry {
        total_depth_md_ft: base_depth * 1.05,
        total_depth_tvd_ft: base_depth,
        pump_depth_ft: base_depth * 0.75,
        perforations_top_ft: base_depth * 0.9,
        perforations_bottom_ft: base_depth,
        ..WellGeometry::default()
    };

    let lift = build_lift(rng, lift_type);

    let reservoir_seed: u64 = rng.gen();
    let well_seed: u64 = rng.gen();
    let reservoir = ReservoirModel::new(params, reservoir_seed)?;
    WellModel::new(identity, geometry, reservoir, fluid, lift, well_seed)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn build_lift(rng: &mut StdRng, lift_type: LiftType) -> LiftEquipment {
    match lift_type {
        LiftType::Esp => LiftEquipment::Esp(EspEquipment {
            pump_stages: uniform(rng, 100.0, 280.0) as u32,
            design_rate_bpd: uniform(rng, 500.0, 2500.0),
            design_head_ft: uniform(rng, 2000.0, 8000.0),
            motor_hp: uniform(rng, 60.0, 300.0),
            motor_voltage_v: uniform(rng, 1000.0, 3500.0),
            motor_amperage_a: uniform(rng, 20.0, 90.0),
            vsd_frequency_hz: uniform(rng, 45.0, 65.0),
            ..EspEquipment::default()
        }),
        LiftType::Srp => LiftEquipment::Srp(SrpEquipment {
            stroke_length_in: uniform(rng, 100.0, 168.0),
            spm: uniform(rng, 4.0, 10.0),
            pump_bore_in: SRP_PUMP_BORES_IN.choose(rng).copied().unwrap_or(2.0),
            beam_load_capacity_lb: uniform(rng, 15_000.0, 36_500.0),
            prime_mover_hp: uniform(rng, 30.0, 75.0),
            ..SrpEquipment::default()
        }),
        LiftType::GasLift => {
            let optimal = uniform(rng, 300.0, 800.0);
            LiftEquipment::GasLift(GasLiftEquipment {
                num_mandrels: uniform(rng, 4.0, 7.0) as u32,
                injection_rate_mscfd: optimal * uniform(rng, 0.8, 1.2),
                injection_pressure_psi: uniform(rng, 800.0, 1800.0),
                optimal_injection_mscfd: optimal,
                max_injection_mscfd: optimal * 2.0,
                choke_size_64ths: uniform(rng, 12.0, 48.0) as u32,
                ..GasLiftEquipment::default()
            })
        }
        LiftType::Pcp => LiftEquipment::Pcp(PcpEquipment {
            pump_stages: uniform(rng, 2.0, 5.0) as u32,
            max_rate_bpd: uniform(rng, 500.0, 3000.0),
            max_differential_psi: uniform(rng, 1500.0, 3000.0),
            drive_rpm: uniform(rng, 80.0, 350.0),
            max_torque_ftlb: uniform(rng, 2000.0, 5000.0),
            motor_hp: uniform(rng, 20.0, 100.0),
            sand_pct: uniform(rng, 0.0, 3.0),
            ..PcpEquipment::default()
        }),
    }
}
