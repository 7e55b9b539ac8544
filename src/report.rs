//! Plain text summaries of calculator results.

use std::fmt::Write;

use crate::analysis::{MohrAnalysis, Safety};
use crate::drawing::UNDEFINED_LABEL;
use crate::phase::PhaseRelations;
use crate::ruler::RulerTick;

/// Render the results panel of the Mohr's circle page.
///
/// A factor of safety that cannot be computed is printed as undefined together
/// with the reason, never as a number.
#[must_use]
pub fn render_mohr_summary(analysis: &MohrAnalysis) -> String {
    let mut output = String::new();

    writeln!(&mut output, "Calculated Stresses:").expect("writing to string cannot fail");
    writeln!(&mut output, "Normal Stress (σₙ): {:.2}", analysis.sigma_n)
        .expect("writing to string cannot fail");
    writeln!(&mut output, "Shear Stress (τ): {:.2}", analysis.tau)
        .expect("writing to string cannot fail");

    match analysis.safety {
        Safety::Assessed(fos) => {
            writeln!(&mut output, "Factor of Safety (FoS): {:.2}", fos.value())
                .expect("writing to string cannot fail");
            writeln!(&mut output, "{}", fos.verdict()).expect("writing to string cannot fail");
        }
        Safety::Undefined { reason } => {
            writeln!(&mut output, "Factor of Safety (FoS): {UNDEFINED_LABEL} ({reason})")
                .expect("writing to string cannot fail");
        }
    }

    output
}

/// Write a ratio that may be undefined with four decimals.
fn optional_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_LABEL.to_owned(), |value| format!("{value:.4}"))
}

/// Render every phase relation of a sample.
///
/// Volumes and masses use no decimals, ratios four and densities two, matching
/// the precision of the compaction page.
#[must_use]
pub fn render_phase_summary(relations: &PhaseRelations) -> String {
    let mut output = String::new();
    let volumes = relations.volumes;

    writeln!(
        &mut output,
        "Phase volumes: Vw = {}, Va = {}, Vs = {}",
        volumes.water, volumes.air, volumes.solids
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "V = {:.0}, Vv = {:.0}, mw = {:.0}, ms = {:.0}, m = {:.0}",
        relations.total_volume,
        relations.void_volume,
        relations.water_mass,
        relations.solids_mass,
        relations.total_mass
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "mc = {:.4}, e = {:.4}, S = {}, A = {}, ν = {:.4}, n = {:.4}",
        relations.moisture_content,
        relations.void_ratio,
        optional_ratio(relations.saturation),
        optional_ratio(relations.air_content),
        relations.solid_fraction,
        relations.porosity
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "ρd = {:.2}, ρb = {:.2}, ρsat = {:.2}",
        relations.dry_density, relations.bulk_density, relations.saturated_density
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "γd = {:.2}, γb = {:.2}, γsat = {:.2}",
        relations.dry_unit_weight, relations.bulk_unit_weight, relations.saturated_unit_weight
    )
    .expect("writing to string cannot fail");

    output
}

/// Render one ruler as a single line of labels.
#[must_use]
pub fn render_ruler(title: &str, ticks: &[RulerTick]) -> String {
    let labels = ticks
        .iter()
        .map(|tick| tick.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{title:<15} {labels}\n")
}
