//! ubv1 - UBVFF Type 1 analyser and SVG converter

use std::fs;
use std::io::Cursor;

use anyhow::Context;
use ubv_cli::{auto_svg_name, init_tracing, Detail};

const USAGE: &str = "\
ubv1: Unknown Binary Vector File Format Type 1, analyser and SVG converter

usage: ubv1 inputFile [-svgdump outputFile] [-more] [-less]
    inputFile     Vector file with interleaved commands and point data.
    -svgdump      Create an svg file. File name can be \"auto\".
    -more         Display more analysis information.
    -less         Display less analysis information.
";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print!("{USAGE}");
        return Ok(());
    }

    let input = &args[0];
    let mut detail = Detail::DEFAULT;
    let mut svg_name: Option<String> = None;

    let mut i = 1;
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

    let data = fs::read(input).with_context(|| format!("failed to open input file: {input}"))?;

    let summary = match svg_name {
        Some(name) => {
            let name = if name == "auto" { auto_svg_name(input) } else { name };
            tracing::info!("dumping SVG to: {name}");
            let out = fs::File::create(&name)
                .with_context(|| format!("unable to open output file: {name}"))?;
            ubv_type1::convert(&data, out)
                .with_context(|| format!("conversion of {input} failed"))?
        }
        // analysis only: decode in full, discard the markup
        None => ubv_type1::convert(&data, Cursor::new(Vec::new()))
            .with_context(|| format!("conversion of {input} failed"))?,
    };

    tracing::info!(
        "{} commands, {} layers, {} warnings",
        summary.commands,
        summary.layers,
        summary.warnings
    );
    Ok(())
}
