//! CLI command implementations.

use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use soilx::{
    analyse, build_view, render_mohr_diagram, render_mohr_summary, render_phase_summary,
    render_rejected, render_ruler, ruler_ticks, sample_lines, CompactionChart, Config,
    PhaseRelations, PhaseVolumes, RulerKind, StressState, SvgCanvas,
};
use tracing::{info, warn};

/// Result of a command, ready to print.
type CommandResult = Result<String, Box<dyn Error>>;

/// Pretty JSON followed by a newline.
fn to_json(value: &impl Serialize) -> CommandResult {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Evaluate the Mohr's circle page and optionally write its diagram.
///
/// Rejected inputs still produce a diagram carrying the reason before the
/// error is returned.
pub fn mohr(config: &Config, svg: Option<&Path>, json: bool) -> CommandResult {
    let state = StressState::from(config.mohr);
    let mut canvas = SvgCanvas::new(config.render);

    let analysis = match analyse(&state) {
        Ok(analysis) => analysis,
        Err(error) => {
            warn!(%error, "stress state rejected");
            if let Some(path) = svg {
                render_rejected(&state, &error, config.render, &mut canvas);
                fs::write(path, canvas.finish())?;
            }
            return Err(error.into());
        }
    };

    if let Some(path) = svg {
        render_mohr_diagram(&analysis, config.render, &mut canvas);
        fs::write(path, canvas.finish())?;
        info!(path = %path.display(), "wrote Mohr diagram");
    }

    if json {
        to_json(&analysis)
    } else {
        Ok(render_mohr_summary(&analysis))
    }
}

/// Evaluate the compaction page.
pub fn compaction(config: &Config, json: bool) -> CommandResult {
    let volumes = PhaseVolumes::from(config.compaction);
    let relations = PhaseRelations::compute(volumes, config.soil)?;

    if json {
        let chart = CompactionChart::new(&relations, config.soil);
        to_json(&json!({ "relations": relations, "chart": chart }))
    } else {
        Ok(render_phase_summary(&relations))
    }
}

/// Sample the critical state model and describe the selected view.
pub fn critical_state(config: &Config, json: bool) -> CommandResult {
    let settings = &config.critical_state;
    let data = sample_lines(&settings.params, settings.scale, settings.sampling.points)?;
    let mut plot = build_view(settings.view, &settings.params, &data, settings.sampling)?;
    if plot.camera.is_some() {
        plot.camera = Some(settings.camera);
    }

    if json {
        return to_json(&plot);
    }

    let mut output = String::new();
    writeln!(&mut output, "{}", plot.title).expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "σ from {:.2} to {:.2} ({} samples, {})",
        data.sigma.first().copied().unwrap_or_default(),
        data.sigma.last().copied().unwrap_or_default(),
        data.sigma.len(),
        settings.scale.axis_type()
    )
    .expect("writing to string cannot fail");
    for trace in &plot.traces {
        writeln!(&mut output, "- {} ({})", trace.name, trace.kind)
            .expect("writing to string cannot fail");
    }
    let describe = |value: Option<&Option<f64>>| match value.copied().flatten() {
        Some(value) => format!("{value:.4}"),
        None => "undefined".to_owned(),
    };
    writeln!(
        &mut output,
        "CSL e: {} .. {}",
        describe(data.e.first()),
        describe(data.e.last())
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "NCL e: {} .. {}",
        describe(data.e_ncl.first()),
        describe(data.e_ncl.last())
    )
    .expect("writing to string cannot fail");

    Ok(output)
}

/// Label the three rulers.
pub fn ruler(config: &Config, json: bool) -> CommandResult {
    let divisions = config.ruler.divisions;

    if json {
        let rulers = RulerKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, ruler_ticks(kind, divisions)?)))
            .collect::<Result<Vec<_>, soilx::RulerError>>()?;
        let value: Vec<_> = rulers
            .into_iter()
            .map(|(kind, ticks)| json!({ "kind": kind, "title": kind.title(), "ticks": ticks }))
            .collect();
        return to_json(&value);
    }

    let mut output = String::new();
    for kind in RulerKind::ALL {
        output.push_str(&render_ruler(kind.title(), &ruler_ticks(kind, divisions)?));
    }
    Ok(output)
}
