use soilx::{analyse, render_mohr_summary, Safety, StressState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Raise the major principal stress until the sample fails.
    for sigma1 in [100.0, 150.0, 200.0, 250.0, 300.0] {
        let state = StressState::new(sigma1, 50.0, 30.0, 10.0, 30.0);
        let analysis = analyse(&state)?;

        match analysis.safety {
            Safety::Assessed(fos) => {
                println!("σ1 = {sigma1:>5.1}: FoS = {:.3} ({})", fos.value(), fos.verdict());
            }
            Safety::Undefined { reason } => println!("σ1 = {sigma1:>5.1}: undefined ({reason})"),
        }
    }

    println!();
    print!("{}", render_mohr_summary(&analyse(&StressState::default())?));

    Ok(())
}
