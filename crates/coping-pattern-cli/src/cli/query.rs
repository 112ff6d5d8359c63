//! Query command: serve a web-form query string through the request adapter.

use super::common::{flag_value, load_config, output_path_with_extension, write_output};

/// Execute the query command.
pub fn cmd_query(args: &[String]) -> Result<(), String> {
    let mut query: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut config_path: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output_path = Some(flag_value(args, &mut i, "-o")?),
            "--config" => config_path = Some(flag_value(args, &mut i, "--config")?),
            arg if !arg.starts_with('-') && query.is_none() => query = Some(arg),
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let query = query.ok_or("Usage: coping query '<f=png&R=..&r=..&phi=..&t=..>' [-o file]")?;

    let service = load_config(config_path)?.service().map_err(|e| e.to_string())?;
    let output = service.handle_query(query).map_err(|e| e.to_string())?;
    let path = output_path_with_extension(output_path, output.extension());
    write_output(path.as_deref(), &output.bytes)
}
