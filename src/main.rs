use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use similar::{ChangeTag, TextDiff};

use rjlink::dom::html;
use rjlink::{Config, Document, Linkifier, PassReport, parse};

mod cli;
use cli::{Cli, Commands};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: &Option<PathBuf>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = rjlink::config::load(explicit, &start_dir)?;

    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn linkifier_for(cfg: &Config) -> io::Result<Linkifier> {
    Linkifier::new(cfg).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

fn print_diff(file_path: &str, original: &str, converted: &str) {
    let diff = TextDiff::from_lines(original, converted);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("---");
        }

        println!("Diff in {}:{}:", file_path, group[0].old_range().start + 1);

        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"), // red
                    ChangeTag::Insert => ("+", "\x1b[32m"), // green
                    ChangeTag::Equal => (" ", "\x1b[0m"),   // normal
                };

                print!("{}{}{}", style, sign, change.value());

                if change.tag() != ChangeTag::Equal {
                    print!("\x1b[0m");
                }
                if change.missing_newline() {
                    println!();
                }
            }
        }
    }
}

fn convert(linkifier: &Linkifier, doc: &mut Document, fragment: bool) -> PassReport {
    if fragment {
        return linkifier.process_subtree(doc, Document::ROOT);
    }
    match linkifier.process_page(doc) {
        Some(report) => report,
        None => {
            eprintln!("Warning: no <body> found, nothing converted (use --fragment for snippets)");
            PassReport::default()
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            file,
            check,
            write,
            fragment,
        } => {
            if write && file.is_none() {
                eprintln!("Error: --write needs an input file");
                std::process::exit(2);
            }

            let cfg = load_config(cli.config.as_deref(), &file)?;
            let linkifier = linkifier_for(&cfg)?;

            let input = read_all(file.as_ref())?;
            let mut doc = parse(&input);
            let report = convert(&linkifier, &mut doc, fragment);
            let output = html::serialize(&doc, Document::ROOT);

            log::info!(
                "{} candidate(s), {} converted, {} link(s), {} skipped, {} failed",
                report.candidates,
                report.converted,
                report.links,
                report.skipped,
                report.failed
            );

            if check {
                if report.converted > 0 {
                    let file_name = file.as_ref().and_then(|p| p.to_str()).unwrap_or("<stdin>");
                    print_diff(file_name, &input, &output);
                    std::process::exit(1);
                }
                if file.is_some() {
                    println!("Nothing to convert");
                }
            } else if write {
                if let Some(file_path) = &file {
                    fs::write(file_path, &output)?;
                    println!("Converted {}", file_path.display());
                }
            } else {
                print!("{output}");
            }

            Ok(())
        }
        Commands::Tokens {
            file,
            json,
            fragment,
        } => {
            let cfg = load_config(cli.config.as_deref(), &file)?;
            let linkifier = linkifier_for(&cfg)?;

            let input = read_all(file.as_ref())?;
            let doc = parse(&input);
            let hits = if fragment {
                linkifier.find_tokens(&doc, Document::ROOT)
            } else {
                linkifier.find_page_tokens(&doc).unwrap_or_else(|| {
                    eprintln!("Warning: no <body> found (use --fragment for snippets)");
                    Vec::new()
                })
            };

            if json {
                let out = serde_json::to_string_pretty(&hits).map_err(io::Error::other)?;
                println!("{out}");
                return Ok(());
            }

            for hit in &hits {
                match &hit.skipped {
                    None => println!("{}\t{}\t{}", hit.token, hit.path, hit.url),
                    Some(reason) => {
                        println!("{}\t{}\tskipped: {}", hit.token, hit.path, reason)
                    }
                }
            }
            if hits.is_empty() {
                eprintln!("No RJ numbers found");
            }
            Ok(())
        }
    }
}
