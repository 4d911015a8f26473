//! Field model: the top-level grouping of pads

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::pad::PadModel;
use super::well::{LiftType, WellModel};
use super::ModelError;
use crate::config::FieldConfig;

pub struct FieldModel {
    name: String,
    template: String,
    pads: Vec<PadModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PadSummary {
    pub name: String,
    pub num_wells: usize,
    pub num_facilities: usize,
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field_name: String,
    pub template: String,
    pub num_pads: usize,
    pub total_wells: usize,
    pub wells_by_lift_type: BTreeMap<LiftType, usize>,
    pub pads: Vec<PadSummary>,
}

impl FieldModel {
    /// Build every pad of `config`; pad seeds are drawn from a field generator
    /// seeded with `seed`
    pub fn build(config: &FieldConfig, seed: u64) -> Result<Self, ModelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let prefix = config.pad_prefix();

        let mut pads = Vec::with_capacity(config.num_pads);
        for i in 0..config.num_pads {
            let pad_name = format!("MAC-{prefix}-{:02}", i + 1);
            let pad_seed: u64 = rng.gen();
            pads.push(PadModel::build(&pad_name, config, config.wells_for_pad(i), pad_seed)?);
        }

        Ok(Self {
            name: config.name.clone(),
            template: config.template.clone(),
            pads,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn pads(&self) -> &[PadModel] {
        &self.pads
    }

    pub fn pads_mut(&mut self) -> &mut [PadModel] {
        &mut self.pads
    }

    pub fn wells(&self) -> impl Iterator<Item = &WellModel> {
        self.pads.iter().flat_map(|p| p.wells().iter())
    }

    pub fn wells_mut(&mut self) -> impl Iterator<Item = &mut WellModel> {
        self.pads.iter_mut().flat_map(|p| p.wells_mut().iter_mut())
    }

    pub fn well_count(&self) -> usize {
        self.pads.iter().map(|p| p.wells().len()).sum()
    }

    pub fn summary(&self) -> FieldSummary {
        let mut wells_by_lift_type = BTreeMap::new();
        for well in self.wells() {
            *wells_by_lift_type.entry(well.lift_type()).or_insert(0) += 1;
        }

        FieldSummary {
            field_name: self.name.clone(),
            template: self.template.clone(),
            num_pads: self.pads.len(),
            total_wells: self.well_count(),
            wells_by_lift_type,
            pads: self
                .pads
                .iter()
                .map(|p| PadSummary {
                    name: p.name().to_string(),
                    num_wells: p.wells().len(),
                    num_facilities: p.facilities().len(),
                    gateway: p.gateway_name().to_string(),
                })
                .collect(),
        }
    }
}
