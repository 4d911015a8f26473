//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Unknown keys are found by walking the raw `toml::Value` tree before serde
//! deserialization and only produce warnings. Range checks run on the parsed
//! config and split into errors (impossible values) and warnings.

use std::collections::HashSet;

use super::sim_config::{FieldConfig, Range, SimulationConfig};
use crate::models::reservoir::{MAX_WATER_CUT, MIN_RESERVOIR_PRESSURE_PSI};

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Dotted key paths accepted in a simulation config.
///
/// Array-of-table entries (`[[fields]]`) share the `fields.` prefix. Children
/// of `fields.lift_distribution` are lift type names and are checked when the
/// field is built.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [simulation]
        "simulation",
        "simulation.seed",
        "simulation.days",
        "simulation.samples_per_day",
        "simulation.start_time",
        "simulation.realtime_interval_secs",
        "simulation.time_acceleration",
        // [anomalies]
        "anomalies",
        "anomalies.enabled",
        "anomalies.probability_per_well_per_day",
        "anomalies.max_concurrent",
        "anomalies.types",
        // [[fields]]
        "fields",
        "fields.name",
        "fields.template",
        "fields.num_pads",
        "fields.num_macollas",
        "fields.wells_per_pad",
        "fields.wells_per_macolla",
        "fields.lift_distribution",
        // [fields.reservoir]
        "fields.reservoir",
        "fields.reservoir.pressure_psi",
        "fields.reservoir.temperature_f",
        "fields.reservoir.api_gravity",
        "fields.reservoir.water_cut",
        "fields.reservoir.gor_scf_stb",
        // [fields.production]
        "fields.production",
        "fields.production.avg_rate_bpd",
    ];
    keys.iter().copied().collect()
}

/// Tables whose children are free-form and never reported as unknown
const FREE_FORM_TABLES: &[&str] = &["fields.lift_distribution"];

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// Tables inside arrays are walked under the array's own path, so
/// `[[fields]] name = "x"` yields `["fields", "fields.name"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if FREE_FORM_TABLES.contains(&path.as_str()) {
                continue;
            }
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        keys.extend(walk_toml_keys(item, &path));
                    }
                }
                _ => {}
            }
        }
    }
    keys.sort();
    keys.dedup();
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        // Ties resolve alphabetically so suggestions are stable
        let better = match best {
            Some((best_key, best_dist)) => dist < best_dist || (dist == best_dist && k < best_key),
            None => true,
        };
        if better {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails; parse errors are reported later by serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed config.
///
/// Returns (errors, warnings): errors are impossible values that must stop
/// the run; warnings are suspicious but legal.
pub fn validate_physical_ranges(config: &SimulationConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let spd = config.simulation.samples_per_day;
    if spd > super::defaults::SAMPLES_PER_DAY_WARN {
        warnings.push(ValidationWarning {
            field: "simulation.samples_per_day".to_string(),
            message: format!("simulation.samples_per_day = {spd} produces more than one record per minute"),
            suggestion: None,
        });
    }

    for field in &config.fields {
        check_field(field, &mut errors, &mut warnings);
    }

    (errors, warnings)
}

fn check_field(field: &FieldConfig, errors: &mut Vec<String>, warnings: &mut Vec<ValidationWarning>) {
    let name = &field.name;
    let r = &field.reservoir;

    if field.num_pads == 0 {
        errors.push(format!("{name}: num_pads must be > 0"));
    }
    if field.wells_per_pad.iter().any(|&n| n == 0) {
        errors.push(format!("{name}: wells_per_pad entries must be > 0"));
    }

    if field.lift_distribution.is_empty() {
        errors.push(format!("{name}: lift_distribution must not be empty"));
    }
    for (lift, fraction) in &field.lift_distribution {
        if let Err(e) = lift.parse::<crate::models::LiftType>() {
            errors.push(format!("{name}: {e}"));
        }
        if !fraction.is_finite() || *fraction <= 0.0 {
            errors.push(format!("{name}: lift_distribution.{lift} = {fraction} must be > 0"));
        }
    }
    let total: f64 = field.lift_distribution.values().sum();
    if total.is_finite() && total > 0.0 && (total - 1.0).abs() > 0.05 {
        warnings.push(ValidationWarning {
            field: format!("{name}.lift_distribution"),
            message: format!("{name}: lift_distribution sums to {total:.2}, expected 1.0"),
            suggestion: None,
        });
    }

    check_range(name, "reservoir.pressure_psi", r.pressure_psi, errors);
    check_range(name, "reservoir.temperature_f", r.temperature_f, errors);
    check_range(name, "reservoir.api_gravity", r.api_gravity, errors);
    check_range(name, "reservoir.water_cut", r.water_cut, errors);
    check_range(name, "reservoir.gor_scf_stb", r.gor_scf_stb, errors);
    check_range(name, "production.avg_rate_bpd", field.production.avg_rate_bpd, errors);

    if r.pressure_psi[0] < MIN_RESERVOIR_PRESSURE_PSI {
        errors.push(format!(
            "{name}: reservoir.pressure_psi minimum {:.0} is below the {MIN_RESERVOIR_PRESSURE_PSI} psi abandonment pressure",
            r.pressure_psi[0]
        ));
    }
    if r.water_cut[0] < 0.0 || r.water_cut[1] > MAX_WATER_CUT {
        errors.push(format!(
            "{name}: reservoir.water_cut [{}, {}] must lie within [0, {MAX_WATER_CUT}]",
            r.water_cut[0], r.water_cut[1]
        ));
    }
    if r.api_gravity[0] <= 0.0 {
        errors.push(format!("{name}: reservoir.api_gravity must be > 0"));
    }
    if r.gor_scf_stb[0] < 0.0 {
        errors.push(format!("{name}: reservoir.gor_scf_stb cannot be negative"));
    }
    if field.production.avg_rate_bpd[0] <= 0.0 {
        errors.push(format!("{name}: production.avg_rate_bpd must be > 0"));
    }

    // Typical crude: 5 (bitumen) to 60 (condensate) °API
    if r.api_gravity[0] < 5.0 || r.api_gravity[1] > 60.0 {
        warnings.push(ValidationWarning {
            field: format!("{name}.reservoir.api_gravity"),
            message: format!(
                "{name}: api_gravity [{}, {}] is outside typical range (5-60 °API)",
                r.api_gravity[0], r.api_gravity[1]
            ),
            suggestion: None,
        });
    }
}

fn check_range(field_name: &str, key: &str, range: Range, errors: &mut Vec<String>) {
    let [min, max] = range;
    if !min.is_finite() || !max.is_finite() {
        errors.push(format!("{field_name}: {key} must be finite (got [{min}, {max}])"));
    } else if min > max {
        errors.push(format!("{field_name}: {key} min ({min}) must be <= max ({max})"));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("seed", "seed"), 0);
        assert_eq!(levenshtein("samples_per_dya", "samples_per_day"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_keys_through_field_array() {
        let toml: toml::Value = r#"
[[fields]]
name = "A"
[fields.reservoir]
pressure_psi = [1000, 2000]

[[fields]]
name = "B"
"#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"fields".to_string()));
        assert!(keys.contains(&"fields.name".to_string()));
        assert!(keys.contains(&"fields.reservoir.pressure_psi".to_string()));
        assert_eq!(keys.iter().filter(|k| *k == "fields.name").count(), 1);
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[simulation]
samples_per_dya = 24
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "simulation.samples_per_dya");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("simulation.samples_per_day"));
    }

    #[test]
    fn test_lift_distribution_children_not_flagged() {
        let toml_str = r#"
[[fields]]
name = "A"
[fields.lift_distribution]
ESP = 0.5
gas_lift = 0.5
"#;
        assert!(validate_unknown_keys(toml_str).is_empty());
    }

    #[test]
    fn test_default_config_has_no_range_issues() {
        let (errors, warnings) = validate_physical_ranges(&SimulationConfig::default());
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_inverted_range_is_error() {
        let mut config = SimulationConfig::default();
        config.fields[0].reservoir.temperature_f = [200.0, 150.0];
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("temperature_f")));
    }

    #[test]
    fn test_pressure_below_floor_is_error() {
        let mut config = SimulationConfig::default();
        config.fields[0].reservoir.pressure_psi = [50.0, 2000.0];
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("pressure_psi")));
    }

    #[test]
    fn test_nan_range_is_error() {
        let mut config = SimulationConfig::default();
        config.fields[1].production.avg_rate_bpd = [f64::NAN, 500.0];
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("avg_rate_bpd")));
    }

    #[test]
    fn test_unknown_lift_and_zero_fraction() {
        let mut config = SimulationConfig::default();
        config.fields[0].lift_distribution.insert("plunger".to_string(), 0.0);
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("plunger")));
        assert!(errors.iter().any(|e| e.contains("lift_distribution.plunger")));
    }

    #[test]
    fn test_lopsided_distribution_warns() {
        let mut config = SimulationConfig::default();
        config.fields[0].lift_distribution.insert("PCP".to_string(), 0.5);
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.message.contains("sums to 1.50")));
    }

    #[test]
    fn test_extreme_sampling_rate_warns() {
        let mut config = SimulationConfig::default();
        config.simulation.samples_per_day = 86_400;
        let (_, warnings) = validate_physical_ranges(&config);
        assert!(warnings.iter().any(|w| w.field == "simulation.samples_per_day"));
    }
}
