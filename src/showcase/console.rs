use std::io::{self, BufRead, Write};

use tracing::info;

use super::session::Showcase;
use crate::display::{render_source, Tokenize};
use crate::highlight::{HighlightOutcome, SourceRef};

const HELP: &str = "\
commands:
  load <file> [--tokens]   render a source file into the code panel
  hl <six integers>        highlight a source reference
  toggle                   move the code panels beside/below the app
  resize <width>           report app sizing for a window width
  show                     print the code panel, markers as ⟦…⟧
  quit";

/// Line-oriented console over a showcase session.
pub fn run_console<R: BufRead, W: Write>(
    showcase: &mut Showcase,
    input: R,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, "{HELP}")?;
    for line in input.lines() {
        let line = line?;
        let Some(words) = shlex::split(&line) else {
            writeln!(out, "unbalanced quotes")?;
            continue;
        };
        let Some((command, rest)) = words.split_first() else {
            continue;
        };
        match command.as_str() {
            "quit" | "exit" => break,
            "help" => writeln!(out, "{HELP}")?,
            "load" => load(showcase, rest, &mut out)?,
            "hl" => highlight(showcase, rest, &mut out)?,
            "toggle" => {
                let relocation = showcase.layout_mut().toggle();
                writeln!(
                    out,
                    "placement {:?}: showing {}",
                    showcase.layout().placement(),
                    relocation.show_host
                )?;
            }
            "resize" => match rest.first().and_then(|w| w.parse::<f64>().ok()) {
                Some(width) => match showcase.layout().on_resize(width) {
                    Some(sizing) => writeln!(
                        out,
                        "app width {:.0}px, zoom {:.2}",
                        sizing.app_width, sizing.zoom
                    )?,
                    None => writeln!(out, "code is inline; nothing to resize")?,
                },
                None => writeln!(out, "usage: resize <width>")?,
            },
            "show" => writeln!(out, "{}", showcase.annotated_code())?,
            other => writeln!(out, "unknown command {other:?}; try help")?,
        }
    }
    info!("console closed");
    Ok(())
}

fn load<W: Write>(showcase: &mut Showcase, args: &[String], out: &mut W) -> io::Result<()> {
    let Some(path) = args.first() else {
        return writeln!(out, "usage: load <file> [--tokens]");
    };
    let mode = if args.iter().any(|a| a == "--tokens") {
        Tokenize::Words
    } else {
        Tokenize::Plain
    };
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => return writeln!(out, "cannot read {path}: {err}"),
    };
    let config = showcase.config();
    match render_source(&source, &config.code_root_id, &config.wrapper_tag, mode) {
        Ok(tree) => {
            showcase.replace_tree(tree);
            writeln!(out, "loaded {} lines", source.lines().count())
        }
        Err(err) => writeln!(out, "cannot render {path}: {err}"),
    }
}

fn highlight<W: Write>(showcase: &mut Showcase, args: &[String], out: &mut W) -> io::Result<()> {
    let srcref = match args.join(" ").parse::<SourceRef>() {
        Ok(srcref) => srcref,
        Err(err) => return writeln!(out, "{err}"),
    };
    match showcase.highlight_srcref(&srcref) {
        Ok(HighlightOutcome::Created(_)) => writeln!(out, "marked {srcref}"),
        Ok(HighlightOutcome::Reused(_)) => writeln!(out, "pulsed {srcref}"),
        Err(err) => writeln!(out, "skipped {srcref}: {err}"),
    }
}
