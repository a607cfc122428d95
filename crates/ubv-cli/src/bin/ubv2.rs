//! ubv2 - UBVFF Type 2 analyser and SVG converter

use std::fs;
use std::io::Cursor;

use anyhow::Context;
use ubv_cli::{auto_svg_name, init_tracing, numbered_prefix, sibling_bin, Detail};

const USAGE: &str = "\
ubv2: Unknown Binary Vector File Format Type 2, analyser and SVG converter

usage: ubv2 cmdFile pointsFile [-svgdump outputFile] [-more] [-less]
    cmdFile       File name of input file that contains vector commands.
    pointsFile    File name of input file that contains point data.
                  Can be \"auto\" to guess \"NNNNN.bin\" e.g. \"00123.bin\".
    -svgdump      Create an svg file. File name can be \"auto\".
    -more         Display more analysis information.
    -less         Display less analysis information.
";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        print!("{USAGE}");
        return Ok(());
    }

    let cmd_name = &args[0];
    let points_arg = &args[1];
    let mut detail = Detail::DEFAULT;
    let mut svg_name: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-svgdump" if i + 1 < args.len() => {
                i += 1;
                svg_name = Some(args[i].clone());
            }
            "-more" => detail.more(),
            "-less" => detail.less(),
            _ => {}
        }
        i += 1;
    }
    init_tracing(detail);

    let cmd_data = fs::read(cmd_name)
        .with_context(|| format!("failed to open command input file: {cmd_name}"))?;

    // resolving pointsFile "auto" needs the footer's point-file number
    let footer = ubv_type2::parse_footer(&cmd_data)
        .with_context(|| format!("{cmd_name} rejected"))?;
    let points_name = if points_arg == "auto" {
        let prefix = numbered_prefix(cmd_name).unwrap_or("");
        sibling_bin(prefix, footer.point_file)
    } else {
        points_arg.clone()
    };
    let point_data = fs::read(&points_name)
        .with_context(|| format!("failed to open points input file: {points_name}"))?;

    let summary = match svg_name {
        Some(name) => {
            let name = if name == "auto" { auto_svg_name(cmd_name) } else { name };
            tracing::info!("svg output file: {name}");
            let out = fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .open(&name)
                .with_context(|| format!("unable to open output file: {name}"))?;
            ubv_type2::convert(&cmd_data, &point_data, out)
                .with_context(|| format!("conversion of {cmd_name} failed"))?
        }
        None => ubv_type2::convert(&cmd_data, &point_data, Cursor::new(Vec::new()))
            .with_context(|| format!("conversion of {cmd_name} failed"))?,
    };

    tracing::info!(
        "{} of {} declared commands, {} warnings",
        summary.commands,
        summary.declared_commands,
        summary.warnings
    );
    // the document was still written in full, but the file is suspect
    if summary.count_mismatch {
        anyhow::bail!(
            "command loop stopped early: {} of {} declared commands",
            summary.commands,
            summary.declared_commands
        );
    }
    Ok(())
}
