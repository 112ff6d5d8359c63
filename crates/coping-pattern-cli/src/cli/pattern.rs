//! Pattern command implementation.

use tracing::info;

use coping_pattern::{NonOverlap, OutputFormat, Refinement};

use super::common::{
    JointArgs, flag_number, flag_value, load_config, output_path_with_extension, write_output,
};

/// Execute the pattern command.
pub fn cmd_pattern(args: &[String]) -> Result<(), String> {
    let mut joint = JointArgs::default();
    let mut output_path: Option<&str> = None;
    let mut format_name: Option<&str> = None;
    let mut config_path: Option<&str> = None;
    let mut step: Option<f64> = None;
    let mut refinement: Option<Refinement> = None;
    let mut non_overlap: Option<NonOverlap> = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        if joint.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "-o")?),
            "-f" | "--format" => format_name = Some(flag_value(args, &mut i, "-f")?),
            "--config" => config_path = Some(flag_value(args, &mut i, "--config")?),
            "--step" => step = Some(flag_number(args, &mut i, "--step")?),
            "--policy" => {
                let name = flag_value(args, &mut i, "--policy")?;
                refinement = Some(Refinement::from_name(name).ok_or_else(|| {
                    format!("Unknown policy: {}. Run 'coping policies' for the list.", name)
                })?);
            }
            "--non-overlap" => {
                let name = flag_value(args, &mut i, "--non-overlap")?;
                non_overlap = Some(NonOverlap::from_name(name).ok_or_else(|| {
                    format!("Unknown non-overlap policy: {}. Use 'flush' or 'full-width'.", name)
                })?);
            }
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    // Format is checked before anything is computed
    let format = match format_name {
        Some(name) => OutputFormat::parse(name).map_err(|e| e.to_string())?,
        None => OutputFormat::Raster,
    };

    let params = joint.params()?;

    let mut config = load_config(config_path)?;
    if let Some(step) = step {
        config.generator.step = step;
    }
    if let Some(refinement) = refinement {
        config.generator.refinement = refinement;
    }
    if let Some(non_overlap) = non_overlap {
        config.generator.non_overlap = non_overlap;
    }

    let generator = config.generator().map_err(|e| e.to_string())?;
    let pattern = generator.generate(&params).map_err(|e| e.to_string())?;

    info!(
        samples = pattern.points.len(),
        policy = pattern.config.refinement.name(),
        width = pattern.layout.width,
        height = pattern.layout.height,
        "generated pattern"
    );

    if json {
        let mut text = serde_json::to_string_pretty(&pattern)
            .map_err(|e| format!("Failed to serialize pattern: {}", e))?;
        text.push('\n');
        return write_output(output_path, text.as_bytes());
    }

    let output = config
        .renderer()
        .render(&pattern, format)
        .map_err(|e| e.to_string())?;
    let path = output_path_with_extension(output_path, output.extension());
    write_output(path.as_deref(), &output.bytes)
}

fn print_usage() {
    eprintln!("Usage: coping pattern -R <dia> -r <dia> --phi <deg> [options]");
    eprintln!();
    eprintln!("Joint:");
    eprintln!("  -R, --other <dia>      Diameter of the tube being fitted against");
    eprintln!("  -r, --cut <dia>        Diameter of the tube being cut");
    eprintln!("  --phi <deg>            Angle between the tube axes, (0, 90]");
    eprintln!("  -t, --thickness <n>    Wall thickness of the cut tube (default: 0)");
    eprintln!();
    eprintln!("Output:");
    eprintln!("  -f, --format <fmt>     text, png or pdf (default: png)");
    eprintln!("  -o, --output <file>    Output file, extension added if missing (- for stdout, default: stdout)");
    eprintln!("  --json                 Dump the sample points as JSON instead");
    eprintln!();
    eprintln!("Generator:");
    eprintln!("  --step <n>             Sampling step along the circumference (default: 0.025)");
    eprintln!("  --policy <name>        unclamped, clamped, edge-offset (default: edge-offset)");
    eprintln!("  --non-overlap <name>   flush, full-width (default: flush)");
    eprintln!("  --config <file.yaml>   Generator/render settings; flags override it");
}
