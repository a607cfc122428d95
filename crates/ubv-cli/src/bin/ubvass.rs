//! ubvass - recursive assembler for rendered UBVFF fragments

use std::path::Path;

use anyhow::bail;
use ubv_assemble::Outcome;
use ubv_cli::{init_tracing, numbered_prefix, Detail};

const USAGE: &str = "\
ubvass: assembles multi-layer images from rendered UBVFF Type 2 fragments

usage: ubvass cmdFile outputFile
    cmdFile       Top-level command file of the image, e.g. \"00100.bin\".
    outputFile    File name for SVG output. Can be \"auto\".
";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        print!("{USAGE}");
        return Ok(());
    }
    init_tracing(Detail::DEFAULT);

    let cmd_name = &args[0];
    let prefix = numbered_prefix(cmd_name).unwrap_or("");

    let out_name = if args[1] == "auto" {
        let Some(stem) = cmd_name.strip_suffix(".bin").filter(|s| !s.is_empty()) else {
            bail!("unable to create auto name for outputFile");
        };
        format!("{stem}.svg")
    } else {
        args[1].clone()
    };

    let outcome = ubv_assemble::assemble(Path::new(cmd_name), prefix, Path::new(&out_name))?;
    match outcome {
        Outcome::Assembled { layers, bounds } => {
            tracing::info!(
                "assembled {layers} layers into {out_name} (viewBox {} {} {} {})",
                bounds.min_x,
                bounds.min_y,
                bounds.max_x,
                bounds.max_y
            );
        }
        // the walker already logged the reason; a skip is not a failure
        Outcome::Skipped(_) => {}
    }
    Ok(())
}
