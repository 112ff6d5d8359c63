//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use coping_pattern::{CopingConfig, JointParameters};

/// Take the value following a flag, advancing the cursor.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

/// Take a numeric value following a flag.
pub fn flag_number(args: &[String], i: &mut usize, flag: &str) -> Result<f64, String> {
    let raw = flag_value(args, i, flag)?;
    raw.parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, raw))
}

/// The four joint measurements shared by `pattern` and `preview`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JointArgs {
    pub other_diameter: Option<f64>,
    pub cut_diameter: Option<f64>,
    pub joint_angle: Option<f64>,
    pub wall_thickness: Option<f64>,
}

impl JointArgs {
    /// Consume `args[*i]` if it is a joint flag. Returns false otherwise.
    pub fn accept(&mut self, args: &[String], i: &mut usize) -> Result<bool, String> {
        let flag = args[*i].as_str();
        let slot = match flag {
            "-R" | "--other" => &mut self.other_diameter,
            "-r" | "--cut" => &mut self.cut_diameter,
            "--phi" | "-a" | "--angle" => &mut self.joint_angle,
            "-t" | "--thickness" => &mut self.wall_thickness,
            _ => return Ok(false),
        };
        *slot = Some(flag_number(args, i, flag)?);
        Ok(true)
    }

    /// Validated parameters. Wall thickness defaults to 0 (a solid rod).
    pub fn params(&self) -> Result<JointParameters, String> {
        let other = self.other_diameter.ok_or("missing -R <other tube diameter>")?;
        let cut = self.cut_diameter.ok_or("missing -r <cut tube diameter>")?;
        let angle = self.joint_angle.ok_or("missing --phi <joint angle in degrees>")?;
        let thickness = self.wall_thickness.unwrap_or(0.0);

        JointParameters::from_diameters(cut, other, thickness, angle).map_err(|e| e.to_string())
    }
}

/// Config from `--config`, or the defaults.
pub fn load_config(path: Option<&str>) -> Result<CopingConfig, String> {
    match path {
        Some(path) => CopingConfig::load(path).map_err(|e| e.to_string()),
        None => Ok(CopingConfig::default()),
    }
}

/// Append `.extension` to an output path that has none. Stdout (`-`) is
/// left alone.
pub fn output_path_with_extension(path: Option<&str>, extension: &str) -> Option<String> {
    match path {
        Some(path) if path != "-" && Path::new(path).extension().is_none() => {
            Some(format!("{}.{}", path, extension))
        }
        other => other.map(str::to_string),
    }
}

/// Write bytes to a file, or to stdout for `None` / `-`.
pub fn write_output(output_path: Option<&str>, bytes: &[u8]) -> Result<(), String> {
    match output_path {
        Some("-") | None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
        Some(path) => {
            fs::write(path, bytes).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
            Ok(())
        }
    }
}
