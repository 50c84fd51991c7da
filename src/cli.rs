//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum, ValueHint};

use porytools::executor::{self, BatchReport, BuildLog, ConvertMode, DedupeTarget, RefTarget};
use porytools::maps::MapSelection;
use porytools::{Project, Result};

/// Maintenance tools for Pokémon decomp map data.
#[derive(Debug, Parser)]
#[command(name = "porytools", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Project root
    #[arg(long, global = true, env = "PORYTOOLS_ROOT", default_value = ".", value_hint = ValueHint::DirPath)]
    pub root: PathBuf,

    /// Path to configuration file
    #[arg(long, global = true, env = "PORYTOOLS_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Write a JSON report of processed, changed and failed items
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DryRun {
    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Convert one file instead of every map
    #[arg(long, num_args = 2, value_names = ["INC", "PORY"])]
    pub single: Option<Vec<PathBuf>>,

    /// Source file name inside each map folder
    #[arg(long)]
    pub source: Option<String>,

    #[command(flatten)]
    pub dry: DryRun,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("build_log").args(["log", "make_args"])))]
pub struct LinkerArgs {
    /// Read linker output from a saved build log instead of running make
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log: Option<PathBuf>,

    /// Arguments for make, as one shell-quoted string
    #[arg(long, allow_hyphen_values = true)]
    pub make_args: Option<String>,
}

impl LinkerArgs {
    fn build_log(&self) -> BuildLog {
        match &self.log {
            Some(path) => BuildLog::File(path.clone()),
            None => BuildLog::Make(self.make_args.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DedupeKind {
    Layouts,
    MapSections,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RefKind {
    Scripts,
    MapJson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert scripts.inc files to scripts.pory
    Convert(ConvertArgs),

    /// Extract text blocks only, as format() texts
    Texts(ConvertArgs),

    /// Add missing sign scripts to scripts.pory
    Signs {
        /// Script source inside each map folder
        #[arg(long, default_value = "scripts.inc")]
        source: String,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Replace music ids that the songs header does not define
    FixMusic {
        /// Music id to use instead of the configured default
        #[arg(long = "default")]
        default_music: Option<String>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Replace music ids reported as undefined by the linker
    ///
    /// When make runs, a non-zero make exit status is logged as a warning and does
    /// not change the exit code. Only the linker output is used.
    ReplaceMusic {
        #[command(flatten)]
        linker: LinkerArgs,
        /// Music id to use instead of the configured replacement
        #[arg(long)]
        replacement: Option<String>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Point Pokémon Center maps at the shared layouts
    PokecenterLayouts(DryRun),

    /// Remove duplicate ids from a JSON table
    Dedupe {
        #[arg(value_enum)]
        table: DedupeKind,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Disable references the linker cannot resolve
    ///
    /// When make runs, a non-zero make exit status is logged as a warning and does
    /// not change the exit code. Only the linker output is used.
    UndefinedRefs {
        #[arg(long, value_enum, default_value = "scripts")]
        target: RefKind,
        #[command(flatten)]
        linker: LinkerArgs,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Put back "script" fields in front of orphaned "script_comment" fields
    RestoreScripts(DryRun),

    /// Drop script lines using local ids the map does not declare
    CleanLocalids(DryRun),

    /// Remove scripts that shadow a mapscripts block of the same name
    DedupeMapscripts {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Regenerate the maps include list
    Includes(DryRun),

    /// Add missing map sections to the popup theme tables
    PopupThemes(DryRun),

    /// Empty the events and scripts of selected maps
    #[command(group(ArgGroup::new("selection").args(["patterns", "baseline"]).required(true)))]
    ClearMaps {
        /// Folder names or globs to clear
        #[arg(long, num_args = 1..)]
        patterns: Vec<String>,
        /// Clear every map missing from this repository
        #[arg(long, value_hint = ValueHint::DirPath)]
        baseline: Option<PathBuf>,
        #[command(flatten)]
        dry: DryRun,
    },

    /// Remove non-ASCII characters from .pory and .inc files
    StripUnicode(DryRun),
}

impl ConvertArgs {
    /// `--single` paths, resolved against the project root.
    fn single_paths(&self, project: &Project) -> Option<(PathBuf, PathBuf)> {
        match self.single.as_deref() {
            Some([inc, pory]) => Some((project.path(inc), project.path(pory))),
            _ => None,
        }
    }
}

fn convert(project: &Project, args: &ConvertArgs, mode: ConvertMode, default_source: &str) -> Result<BatchReport> {
    match args.single_paths(project) {
        Some((inc, pory)) => Ok(executor::convert_single(&inc, &pory, mode, args.dry.dry_run)),
        None => {
            let source = args.source.as_deref().unwrap_or(default_source);
            executor::convert_maps(project, source, mode, args.dry.dry_run)
        }
    }
}

impl Cli {
    pub fn load_project(&self) -> Result<Project> {
        Project::load(&self.root, self.config.as_deref())
    }

    /// `--report` path, resolved against the project root.
    pub fn report_path(&self, project: &Project) -> Option<PathBuf> {
        self.report.as_deref().map(|path| project.path(path))
    }

    pub fn execute(&self, project: &Project) -> Result<BatchReport> {
        match &self.command {
            Command::Convert(args) => convert(project, args, ConvertMode::Full, "scripts.inc"),
            Command::Texts(args) => convert(project, args, ConvertMode::TextsOnly, "scripts.inc.orig"),
            Command::Signs { source, dry } => executor::add_sign_scripts(project, source, dry.dry_run),
            Command::FixMusic { default_music, dry } => {
                executor::fix_music(project, default_music.as_deref(), dry.dry_run)
            }
            Command::ReplaceMusic {
                linker,
                replacement,
                dry,
            } => {
                let output = executor::build_output(project, &linker.build_log())?;
                let missing = executor::missing_music(&output);
                executor::replace_music(project, &missing, replacement.as_deref(), dry.dry_run)
            }
            Command::PokecenterLayouts(dry) => executor::normalize_pokecenters(project, dry.dry_run),
            Command::Dedupe { table, dry } => {
                let target = match table {
                    DedupeKind::Layouts => DedupeTarget::Layouts,
                    DedupeKind::MapSections => DedupeTarget::MapSections,
                };
                Ok(executor::dedupe_table(project, target, dry.dry_run))
            }
            Command::UndefinedRefs { target, linker, dry } => {
                let output = executor::build_output(project, &linker.build_log())?;
                let target = match target {
                    RefKind::Scripts => RefTarget::Scripts,
                    RefKind::MapJson => RefTarget::MapJson,
                };
                Ok(executor::disable_undefined_refs(project, &output, target, dry.dry_run))
            }
            Command::RestoreScripts(dry) => executor::restore_map_scripts(project, dry.dry_run),
            Command::CleanLocalids(dry) => executor::clean_local_ids(project, dry.dry_run),
            Command::DedupeMapscripts { file, dry } => {
                Ok(executor::dedupe_mapscripts(&project.path(file), dry.dry_run))
            }
            Command::Includes(dry) => Ok(executor::write_maps_includes(project, dry.dry_run)),
            Command::PopupThemes(dry) => Ok(executor::add_popup_themes(project, dry.dry_run)),
            Command::ClearMaps {
                patterns,
                baseline,
                dry,
            } => {
                let selection = match baseline {
                    Some(dir) => MapSelection::Baseline(project.path(dir)),
                    None => MapSelection::Patterns(patterns.clone()),
                };
                executor::clear_maps(project, &selection, dry.dry_run)
            }
            Command::StripUnicode(dry) => Ok(executor::strip_unicode(project, dry.dry_run)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["porytools", "fix-music", "--dry-run", "-vv", "--root", "/tmp/x"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Command::FixMusic { dry: DryRun { dry_run: true }, .. }));
    }

    #[test]
    fn clear_maps_needs_a_selection() {
        assert!(Cli::try_parse_from(["porytools", "clear-maps"]).is_err());
        assert!(Cli::try_parse_from(["porytools", "clear-maps", "--patterns", "Route*", "--baseline", "b"]).is_err());
    }

    #[test]
    fn file_arguments_resolve_against_root() {
        let cli = Cli::try_parse_from([
            "porytools",
            "--root",
            "/work/pokeemerald",
            "--report",
            "out/report.json",
            "convert",
            "--single",
            "data/a.inc",
            "/tmp/a.pory",
        ])
        .unwrap();
        let project = Project::new(cli.root.clone(), porytools::Config::default());

        assert_eq!(
            cli.report_path(&project),
            Some(PathBuf::from("/work/pokeemerald/out/report.json"))
        );
        let Command::Convert(args) = &cli.command else {
            panic!("expected convert");
        };
        assert_eq!(
            args.single_paths(&project),
            Some((
                PathBuf::from("/work/pokeemerald/data/a.inc"),
                PathBuf::from("/tmp/a.pory")
            ))
        );
    }

    #[test]
    fn build_commands_document_make_status() {
        let cmd = Cli::command();
        for name in ["replace-music", "undefined-refs"] {
            let sub = cmd.find_subcommand(name).unwrap();
            let help = sub.get_long_about().map(ToString::to_string).unwrap_or_default();
            assert!(help.contains("not change the exit code"), "{name}: {help}");
        }
    }

    #[test]
    fn single_takes_two_paths() {
        let cli = Cli::try_parse_from(["porytools", "convert", "--single", "a.inc", "a.pory"]).unwrap();
        match cli.command {
            Command::Convert(args) => assert_eq!(args.single.unwrap().len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
