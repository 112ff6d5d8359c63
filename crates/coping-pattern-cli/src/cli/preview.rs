//! Preview command: export the coped tube end as a Wavefront OBJ mesh.

use tracing::info;

use coping_pattern::build_preview;
use coping_pattern::preview::DEFAULT_SEGMENTS;

use super::common::{JointArgs, flag_value, write_output};

/// Execute the preview command.
pub fn cmd_preview(args: &[String]) -> Result<(), String> {
    let mut joint = JointArgs::default();
    let mut output_path: Option<&str> = None;
    let mut segments = DEFAULT_SEGMENTS;

    let mut i = 0;
    while i < args.len() {
        if joint.accept(args, &mut i)? {
            i += 1;
            continue;
        }
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "-o")?),
            "--segments" => {
                let raw = flag_value(args, &mut i, "--segments")?;
                segments = raw
                    .parse()
                    .map_err(|_| format!("--segments expects a whole number, got '{}'", raw))?;
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let params = joint.params()?;
    let mesh = build_preview(&params, segments).map_err(|e| e.to_string())?;

    info!(vertices = mesh.vertices.len(), faces = mesh.faces.len(), "built preview");
    write_output(output_path, mesh.to_obj("coping").as_bytes())
}
