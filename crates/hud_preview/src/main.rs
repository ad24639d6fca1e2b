//! Command line previewer for HUD layouts
//!
//! Loads settings and layout bundles, runs a reload, optionally writes the
//! generated pack, and prints the glyphs one display renders for a synthetic
//! subject.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use glyph_hud::component::Glyph;
use glyph_hud::foundation::logging;
use glyph_hud::prelude::*;

fn cli() -> Command {
    Command::new("hud_preview")
        .about("Compiles HUD layouts and previews the glyphs they render")
        .arg(
            Arg::new("layouts")
                .short('l')
                .long("layouts")
                .value_name("FILE")
                .help("Layout bundle (.toml or .ron), may be repeated")
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("FILE")
                .help("Engine settings (.toml or .ron)"),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Directory image files are probed from")
                .default_value("."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Write the generated fonts and textures here"),
        )
        .arg(
            Arg::new("hud")
                .long("hud")
                .value_name("NAME")
                .help("HUD to render")
                .conflicts_with("popup"),
        )
        .arg(
            Arg::new("popup")
                .long("popup")
                .value_name("NAME")
                .help("Popup to render"),
        )
        .arg(
            Arg::new("slot")
                .long("slot")
                .value_name("INDEX")
                .help("Popup location slot")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("tick")
                .short('t')
                .long("tick")
                .value_name("TICK")
                .help("Subject tick, also the animation frame")
                .value_parser(clap::value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Subject name")
                .default_value("preview"),
        )
        .arg(
            Arg::new("attr")
                .long("attr")
                .value_name("KEY=VALUE")
                .help("Subject attribute, may be repeated")
                .action(ArgAction::Append),
        )
}

fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::from(true),
        "false" => Value::from(false),
        _ => raw
            .parse::<f64>()
            .map_or_else(|_| Value::from(raw), Value::from),
    }
}

fn subject(matches: &ArgMatches) -> Result<SubjectState> {
    let name = matches
        .get_one::<String>("name")
        .map_or("preview", String::as_str);
    let tick = matches.get_one::<u64>("tick").copied().unwrap_or(0);
    let mut subject = SubjectState::new(name).with_tick(tick);
    for attr in matches.get_many::<String>("attr").into_iter().flatten() {
        let Some((key, value)) = attr.split_once('=') else {
            bail!("attribute '{attr}' is not KEY=VALUE");
        };
        subject.set_attribute(key.trim(), parse_value(value.trim()));
    }
    Ok(subject)
}

fn describe(glyph: &Glyph) -> String {
    match glyph {
        Glyph::Space(n) => format!("space({n})"),
        Glyph::Char { codepoint, style } => {
            let font = style
                .font
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string);
            let color = style
                .color
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            format!("U+{codepoint:05X} {font} {color}")
        }
    }
}

fn main() -> Result<()> {
    logging::init();
    let matches = cli().get_matches();

    let settings = match matches.get_one::<String>("settings") {
        Some(path) => HudSettings::load_from_file(path)
            .with_context(|| format!("loading settings from {path}"))?,
        None => HudSettings::default(),
    };

    let mut bundle = LayoutBundle::default();
    for path in matches.get_many::<String>("layouts").into_iter().flatten() {
        let loaded = LayoutBundle::load_tagged(path)
            .with_context(|| format!("loading layouts from {path}"))?;
        bundle.merge(loaded);
    }

    let assets = matches
        .get_one::<String>("assets")
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    let engine = HudEngine::new(
        settings,
        PlaceholderRegistry::with_builtins(),
        DirectoryProbe::new(assets),
    );
    let report = engine.reload(&bundle);
    println!(
        "{} displays, {} fonts, {} codepoints",
        report.displays, report.fonts, report.codepoints
    );
    for warning in &report.warnings {
        println!("skipped {warning}");
    }

    let generation = engine.current();
    if let Some(output) = matches.get_one::<String>("output") {
        let mut writer = DirectoryPackWriter::new(output);
        let files = generation
            .write_pack(&mut writer)
            .with_context(|| format!("writing pack to {output}"))?;
        println!("wrote {files} files to {output}");
    }

    let subject = subject(&matches)?;
    let skins = AttributeSkinProvider::default();
    let directory = SubjectMap::new();
    let ctx = RenderContext::new(&directory, &skins);
    let rendered = if let Some(name) = matches.get_one::<String>("hud") {
        generation
            .render_hud(name, &ctx, &subject)
            .with_context(|| format!("no HUD called '{name}'"))?
    } else if let Some(name) = matches.get_one::<String>("popup") {
        let slot = matches.get_one::<usize>("slot").copied().unwrap_or(0);
        generation
            .render_popup(name, &ctx, &subject, slot, subject.tick())
            .with_context(|| format!("no popup called '{name}'"))?
    } else {
        return Ok(());
    };

    println!("width {}", rendered.width());
    for glyph in rendered.glyphs() {
        println!("  {}", describe(glyph));
    }
    log::debug!("rendered {} glyphs", rendered.glyphs().len());
    Ok(())
}
