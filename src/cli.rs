use crate::{
    app::App,
    collection::{EntryCollection, ExportFilter},
    config::AppConfig,
    storage, ui,
};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Ui { list: Option<PathBuf> },
    Command(CliCommand),
}

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Show {
        list: PathBuf,
        format: OutputFormat,
        enabled_only: bool,
    },
    Export {
        list: PathBuf,
        out: Option<PathBuf>,
    },
    Import {
        list: PathBuf,
        file: PathBuf,
    },
    Help,
    Version,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        CliAction::Ui { list } => {
            let mut app = App::initialize()?;
            if let Some(list) = list {
                let path = working_dir()?.join(list);
                if let Err(err) = app.open_list(&path.display().to_string()) {
                    app.report_error("Open", &err);
                }
            }
            ui::run(&mut app)
        }
        CliAction::Command(CliCommand::Help) => {
            print_help();
            Ok(())
        }
        CliAction::Command(CliCommand::Version) => {
            println!("bingolist v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::Command(command) => {
            let config = AppConfig::load_or_create()?;
            run_command(&config, command)
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliAction> {
    let Some(head) = args.first() else {
        return Ok(CliAction::Ui { list: None });
    };

    match head.as_str() {
        "--help" | "-h" | "help" => Ok(CliAction::Command(CliCommand::Help)),
        "--version" | "-V" | "version" => Ok(CliAction::Command(CliCommand::Version)),
        "show" => parse_show(&args[1..]),
        "export" => {
            let positional = positional_args(&args[1..])?;
            let list = positional
                .first()
                .ok_or_else(|| anyhow::anyhow!("export requires a list file"))?;
            if positional.len() > 2 {
                bail!("export takes a list file and an optional output path");
            }
            Ok(CliAction::Command(CliCommand::Export {
                list: PathBuf::from(list),
                out: positional.get(1).map(PathBuf::from),
            }))
        }
        "import" => {
            let positional = positional_args(&args[1..])?;
            let [list, file] = positional.as_slice() else {
                bail!("import requires a list file and a names file");
            };
            Ok(CliAction::Command(CliCommand::Import {
                list: PathBuf::from(list),
                file: PathBuf::from(file),
            }))
        }
        value if value.starts_with('-') => bail!("Unknown option: {value} (see --help)"),
        _ => {
            if args.len() > 1 {
                bail!("Only one list file can be opened (see --help)");
            }
            Ok(CliAction::Ui {
                list: Some(PathBuf::from(head)),
            })
        }
    }
}

fn parse_show(args: &[String]) -> Result<CliAction> {
    let mut format = OutputFormat::Text;
    let mut enabled_only = false;
    let mut list = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--format=") {
            format = parse_format(value)?;
            continue;
        }
        match arg.as_str() {
            "--format" => {
                let Some(value) = iter.next() else {
                    bail!("--format requires a value");
                };
                format = parse_format(value)?;
            }
            "--enabled" => enabled_only = true,
            value if value.starts_with('-') => bail!("Unknown show option: {value}"),
            value => {
                if list.replace(PathBuf::from(value)).is_some() {
                    bail!("show takes a single list file");
                }
            }
        }
    }
    let Some(list) = list else {
        bail!("show requires a list file");
    };
    Ok(CliAction::Command(CliCommand::Show {
        list,
        format,
        enabled_only,
    }))
}

fn parse_format(value: &str) -> Result<OutputFormat> {
    OutputFormat::parse(value)
        .ok_or_else(|| anyhow::anyhow!("Unknown format: {value} (use 'text' or 'json')"))
}

fn positional_args(args: &[String]) -> Result<Vec<String>> {
    let mut values = Vec::new();
    for arg in args {
        if arg.starts_with('-') && arg != "-" {
            bail!("Unknown option: {arg}");
        }
        values.push(arg.to_string());
    }
    Ok(values)
}

fn run_command(config: &AppConfig, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Show {
            list,
            format,
            enabled_only,
        } => {
            let collection = load_collection(config, &list)?;
            print!("{}", render_show(&collection, format, enabled_only)?);
            Ok(())
        }
        CliCommand::Export { list, out } => {
            let collection = load_collection(config, &list)?;
            match out {
                Some(out) => {
                    let out = storage::resolve_json_path(&working_dir()?, &out.to_string_lossy());
                    storage::write_export_file(&out, &collection)?;
                    println!(
                        "Exported {} enabled entries to {}",
                        collection.enabled_count(),
                        out.display()
                    );
                }
                None => println!("{}", collection.serialize_for_export()?),
            }
            Ok(())
        }
        CliCommand::Import { list, file } => {
            let mut collection = if list.exists() {
                load_collection(config, &list)?
            } else {
                EntryCollection::new(config.auto_sort_on_insert)
            };
            let lines = storage::read_import_lines(&file)?;
            let summary = collection.import_names(&lines);
            storage::write_list_file(&list, &collection)
                .with_context(|| format!("save {}", list.display()))?;
            println!(
                "Imported {} entries ({} skipped) into {}",
                summary.added,
                summary.skipped,
                list.display()
            );
            Ok(())
        }
        CliCommand::Help | CliCommand::Version => Ok(()),
    }
}

fn load_collection(config: &AppConfig, path: &Path) -> Result<EntryCollection> {
    let mut collection = EntryCollection::new(config.auto_sort_on_insert);
    storage::load_list_file(path, &mut collection)
        .with_context(|| format!("load {}", path.display()))?;
    Ok(collection)
}

struct ShowItem<'a> {
    position: usize,
    name: &'a str,
    enabled: bool,
}

fn render_show(
    collection: &EntryCollection,
    format: OutputFormat,
    enabled_only: bool,
) -> Result<String> {
    if format == OutputFormat::Json {
        let filter = if enabled_only {
            ExportFilter::EnabledOnly
        } else {
            ExportFilter::All
        };
        return Ok(format!("{}\n", collection.to_json(filter)?));
    }

    let items: Vec<ShowItem> = collection
        .iter()
        .enumerate()
        .filter(|(_, entry)| !enabled_only || entry.enabled)
        .map(|(index, entry)| ShowItem {
            position: index + 1,
            name: &entry.name,
            enabled: entry.enabled,
        })
        .collect();

    let mut out = String::new();
    for item in &items {
        let enabled = if item.enabled { "x" } else { " " };
        out.push_str(&format!("{:>3} [{enabled}] {}\n", item.position, item.name));
    }
    out.push_str(&format!(
        "{} entries, {} enabled\n",
        collection.len(),
        collection.enabled_count()
    ));
    Ok(out)
}

fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("resolve working directory")
}

fn print_help() {
    println!("bingolist v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  bingolist [LIST]                      Launch TUI, optionally opening LIST");
    println!("  bingolist show <LIST>                 Print entries");
    println!("  bingolist export <LIST> [OUT]         Print or write JSON of enabled entries");
    println!("  bingolist import <LIST> <FILE>        Add names from FILE (one per line) and save");
    println!();
    println!("Show options:");
    println!("  --format <json|text>                  Output format (default text)");
    println!("  --enabled                             Only enabled entries");
    println!();
    println!("Global options:");
    println!("  -h, --help                            Show help");
    println!("  -V, --version                         Show version");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_launch_ui() {
        assert_eq!(parse_args(&[]).unwrap(), CliAction::Ui { list: None });
        assert_eq!(
            parse_args(&args(&["race.json"])).unwrap(),
            CliAction::Ui {
                list: Some(PathBuf::from("race.json"))
            }
        );
    }

    #[test]
    fn show_parses_format_in_either_position() {
        let expected = CliAction::Command(CliCommand::Show {
            list: PathBuf::from("race.json"),
            format: OutputFormat::Json,
            enabled_only: false,
        });
        assert_eq!(
            parse_args(&args(&["show", "--format", "json", "race.json"])).unwrap(),
            expected
        );
        assert_eq!(
            parse_args(&args(&["show", "race.json", "--format=json"])).unwrap(),
            expected
        );
        assert!(parse_args(&args(&["show", "race.json", "--format", "xml"])).is_err());
    }

    #[test]
    fn import_needs_two_paths() {
        assert!(parse_args(&args(&["import", "race.json"])).is_err());
        assert_eq!(
            parse_args(&args(&["import", "race.json", "names.csv"])).unwrap(),
            CliAction::Command(CliCommand::Import {
                list: PathBuf::from("race.json"),
                file: PathBuf::from("names.csv"),
            })
        );
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["export", "a.json", "--pretty"])).is_err());
    }

    #[test]
    fn show_text_lists_entries_with_checkboxes() {
        let mut collection = EntryCollection::new(false);
        collection.add("Boots", true).unwrap();
        collection.add("Cape", false).unwrap();
        assert_eq!(
            render_show(&collection, OutputFormat::Text, false).unwrap(),
            "  1 [x] Boots\n  2 [ ] Cape\n2 entries, 1 enabled\n"
        );
        assert_eq!(
            render_show(&collection, OutputFormat::Text, true).unwrap(),
            "  1 [x] Boots\n2 entries, 1 enabled\n"
        );
    }

    #[test]
    fn import_command_creates_and_extends_list() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("race.json");
        let names = dir.path().join("names.txt");
        std::fs::write(&names, "b\na\n\nb\n").unwrap();
        let config = AppConfig::load_or_create_in(&dir.path().join("data")).unwrap();

        run_command(
            &config,
            CliCommand::Import {
                list: list.clone(),
                file: names,
            },
        )
        .unwrap();
        let collection = load_collection(&config, &list).unwrap();
        assert_eq!(collection.names(), vec!["a", "b"]);
    }
}
