use soilx::{no_air_voids_line, PhaseRelations, PhaseVolumes, SoilConstants};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let constants = SoilConstants::default();
    let relations = PhaseRelations::compute(PhaseVolumes::new(15.0, 5.0, 80.0), constants)?;

    println!("void ratio      e  = {:.4}", relations.void_ratio);
    println!("porosity        n  = {:.4}", relations.porosity);
    println!("moisture        mc = {:.4}", relations.moisture_content);
    println!("dry density     ρd = {:.3}", relations.dry_density);

    let line = no_air_voids_line(0.4, constants);
    for (mc, rho) in line.moisture_content.iter().zip(&line.dry_density).step_by(5) {
        println!("zero air voids: mc = {mc:.2}, ρd = {rho:.3}");
    }

    Ok(())
}
