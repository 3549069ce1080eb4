//! Main CLI application for the Karnaugh map loop visualizer

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kmap_loops::{
    config::{CliOverrides, OutputFormat, Settings},
    expression::{self, BitPattern},
    grouping::LoopRenderer,
    kmap::{
        create_example_inputs, decode_share_query, encode_share_query, load_grid_from_file,
        load_problems_from_file, parse_minterm_list, save_grid_to_file, GridLayout, KmapGrid,
        ProblemSpec,
    },
    session::{save_csv, solve_batch, KmapProblem},
    solver::ImplicantRecord,
    utils::{ColorOutput, KmapFormatter},
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "kmap")]
#[command(about = "Karnaugh map minimizer with wraparound-aware loop geometry")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Svg,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Svg => OutputFormat::Svg,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Minimize a function and draw its loops
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Number of variables (2-6)
        #[arg(short = 'n', long, default_value_t = 4)]
        variables: u32,

        /// Comma separated minterms
        #[arg(short, long, conflicts_with_all = ["grid", "expression"])]
        minterms: Option<String>,

        /// Comma separated don't-cares
        #[arg(short, long, default_value = "")]
        dont_cares: String,

        /// Grid file to read the function from
        #[arg(short, long)]
        grid: Option<PathBuf>,

        /// Sum-of-products expression to read the function from
        #[arg(short, long, conflicts_with = "grid")]
        expression: Option<String>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exhaustive cover search limit (overrides config)
        #[arg(long)]
        exact_cover_limit: Option<usize>,

        /// Draw solver implicants without checking them against their patterns
        #[arg(long)]
        no_cross_check: bool,

        /// Write the result to the output directory
        #[arg(short, long)]
        save: bool,
    },

    /// Expand an expression into its minterms
    Parse {
        /// Sum-of-products expression, e.g. "A'BC + AB'"
        expression: String,

        /// Number of variables (2-6)
        #[arg(short = 'n', long, default_value_t = 4)]
        variables: u32,
    },

    /// Validate explicit groups and print their loop shapes
    Render {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Number of variables (2-4)
        #[arg(short = 'n', long, default_value_t = 4)]
        variables: u32,

        /// Bit pattern over 0, 1 and '-' such as "-0-0"; repeatable
        #[arg(short, long)]
        pattern: Vec<String>,

        /// Comma separated minterm group; repeatable
        #[arg(short, long)]
        group: Vec<String>,
    },

    /// Solve every problem in a YAML or JSON file in parallel
    Batch {
        /// Problem list file
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// CSV file to write
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Encode a problem as a share query, or decode one
    Share {
        /// Query to decode, e.g. "v=3&m=1,2&d=5"
        query: Option<String>,

        /// Number of variables when encoding
        #[arg(short = 'n', long, default_value_t = 4)]
        variables: u32,

        /// Comma separated minterms when encoding
        #[arg(short, long, default_value = "")]
        minterms: String,

        /// Comma separated don't-cares when encoding
        #[arg(short, long, default_value = "")]
        dont_cares: String,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            config,
            variables,
            minterms,
            dont_cares,
            grid,
            expression,
            format,
            output,
            exact_cover_limit,
            no_cross_check,
            save,
        } => {
            let overrides = CliOverrides {
                exact_cover_limit,
                no_cross_check,
                format: format.map(OutputFormat::from),
                output_dir: output,
            };
            let input = ProblemInput {
                variables,
                minterms,
                dont_cares,
                grid,
                expression,
            };
            solve_command(config, input, overrides, save)
        }
        Commands::Parse { expression, variables } => parse_command(&expression, variables),
        Commands::Render {
            config,
            variables,
            pattern,
            group,
        } => render_command(config, variables, pattern, group),
        Commands::Batch { input, config, csv } => batch_command(config, input, csv),
        Commands::Share {
            query,
            variables,
            minterms,
            dont_cares,
        } => share_command(query, variables, &minterms, &dont_cares),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
        Ok(Settings::default())
    }
}

/// Where the function to solve comes from
struct ProblemInput {
    variables: u32,
    minterms: Option<String>,
    dont_cares: String,
    grid: Option<PathBuf>,
    expression: Option<String>,
}

impl ProblemInput {
    fn into_problem(self, settings: Settings) -> Result<KmapProblem> {
        if let Some(grid_path) = self.grid {
            let grid = load_grid_from_file(&grid_path, self.variables)?;
            return Ok(KmapProblem::from_grid(settings, &grid)?);
        }
        if let Some(expr) = self.expression {
            return Ok(KmapProblem::from_expression(settings, &expr, self.variables)?);
        }

        let minterms = parse_minterm_list(self.minterms.as_deref().unwrap_or(""))?;
        let dont_cares = parse_minterm_list(&self.dont_cares)?;
        Ok(KmapProblem::new(
            settings,
            ProblemSpec::new(self.variables, minterms, dont_cares),
        )?)
    }
}

fn solve_command(config_path: PathBuf, input: ProblemInput, overrides: CliOverrides, save: bool) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let problem = input
        .into_problem(settings.clone())
        .context("Failed to build problem")?;

    let start_time = Instant::now();
    let visualization = problem
        .solve(&settings.solver())
        .context("Failed to solve problem")?;
    let elapsed = start_time.elapsed();

    match settings.output.format {
        OutputFormat::Json => println!("{}", visualization.to_json()?),
        OutputFormat::Text | OutputFormat::Svg => {
            println!("{}", KmapFormatter::format_visualization(&visualization));
        }
    }

    if let Some(render) = &visualization.render {
        if !render.is_clean() {
            eprintln!(
                "{}",
                ColorOutput::warning(&format!("{} implicant(s) could not be drawn", render.diagnostics.len()))
            );
        }
    }

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Solved in {:.3}ms ({} prime implicants)",
            elapsed.as_secs_f64() * 1000.0,
            visualization.statistics.prime_count
        ))
    );
    println!("Share: ?{}", encode_share_query(&visualization.spec()));

    if save {
        let name = format!("kmap_{}var", visualization.num_vars);
        let path = KmapFormatter::save_visualization(
            &visualization,
            &settings,
            &settings.output.output_directory,
            &name,
        )?;
        println!("{}", ColorOutput::success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}

fn parse_command(expr: &str, variables: u32) -> Result<()> {
    let minterms = expression::parse(expr, variables).context("Failed to parse expression")?;

    println!("Minterms: {:?}", minterms);
    let spec = ProblemSpec::new(variables, minterms, Vec::new());
    println!("Share: ?{}", encode_share_query(&spec));
    Ok(())
}

fn render_command(config_path: PathBuf, variables: u32, patterns: Vec<String>, groups: Vec<String>) -> Result<()> {
    let settings = load_settings(&config_path)?;
    let layout = GridLayout::new(variables)?;

    let mut records = Vec::new();
    for text in &patterns {
        let pattern: BitPattern = text.parse().with_context(|| format!("Invalid pattern '{}'", text))?;
        records.push(ImplicantRecord::from_pattern(pattern));
    }

    // Raw groups are not tied to a pattern, so there is nothing to cross-check
    let cross_check = groups.is_empty() && settings.solver.cross_check;
    for text in &groups {
        let minterms = parse_minterm_list(text)?;
        records.push(ImplicantRecord {
            pattern: BitPattern::tautology(variables)?,
            covered_minterms: minterms,
        });
    }

    if records.is_empty() {
        anyhow::bail!("Nothing to render: pass --pattern or --group");
    }

    let geometry = settings.geometry_for(&layout);
    let renderer = LoopRenderer::new(layout, &geometry, settings.loop_style())
        .with_palette(settings.loops.palette.clone())
        .with_cross_check(cross_check);
    let pass = renderer.render(&records)?;

    for implicant_loop in &pass.loops {
        let label = if implicant_loop.index < patterns.len() {
            implicant_loop.term.clone()
        } else {
            format!("group {:?}", implicant_loop.minterms)
        };
        println!(
            "{} {}: {}",
            ColorOutput::info(&format!("#{}", implicant_loop.index + 1)),
            label,
            implicant_loop.region.kind()
        );
        println!("{}", serde_json::to_string_pretty(&implicant_loop.shapes)?);
    }

    for diagnostic in &pass.diagnostics {
        println!(
            "{}",
            ColorOutput::error(&format!("#{} rejected: {}", diagnostic.implicant_index + 1, diagnostic.message))
        );
    }
    Ok(())
}

fn batch_command(config_path: PathBuf, input: PathBuf, csv: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(&config_path)?;
    let specs = load_problems_from_file(&input)?;
    println!("{}", ColorOutput::info(&format!("Solving {} problem(s)...", specs.len())));

    let outcomes = solve_batch(&settings, &specs, &settings.solver());
    println!("{}", KmapFormatter::format_batch_summary(&outcomes));

    if let Some(csv_path) = csv {
        save_csv(&outcomes, &csv_path)?;
        println!("{}", ColorOutput::success(&format!("CSV written to {}", csv_path.display())));
    }
    Ok(())
}

fn share_command(query: Option<String>, variables: u32, minterms: &str, dont_cares: &str) -> Result<()> {
    match query {
        Some(query) => match decode_share_query(&query)? {
            Some(spec) => {
                println!("Variables: {}", spec.num_vars);
                println!("Minterms: {:?}", spec.minterms);
                println!("Don't cares: {:?}", spec.dont_cares);
            }
            None => println!("{}", ColorOutput::warning("Query has no problem (needs v and m)")),
        },
        None => {
            let spec = ProblemSpec::new(variables, parse_minterm_list(minterms)?, parse_minterm_list(dont_cares)?);
            KmapProblem::new(Settings::default(), spec.clone())?;
            println!("?{}", encode_share_query(&spec));
        }
    }
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_inputs(&input_dir).context("Failed to create example inputs")?;

    // A blank four-variable grid to edit by hand
    let blank = KmapGrid::new(GridLayout::new(4)?);
    save_grid_to_file(&blank, input_dir.join("blank.txt"))?;
    println!("Created example inputs in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    let mut svg_config = Settings::default();
    svg_config.output.format = OutputFormat::Svg;
    svg_config.to_file(&examples_dir.join("svg.yaml"))?;

    let mut compact_config = Settings::default();
    compact_config.geometry.cell_width = 32.0;
    compact_config.geometry.cell_height = 32.0;
    compact_config.geometry.gap = 2.0;
    compact_config.loops.padding = 3.0;
    compact_config.loops.corner_radius = 6.0;
    compact_config.to_file(&examples_dir.join("compact.yaml"))?;
    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Run: kmap solve -n 4 --grid input/corners.txt");
    println!("2. Run: kmap batch input/batch.yaml --csv output/batch.csv");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "kmap", "solve", "-n", "4", "--minterms", "0,2,8,10", "--format", "json",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["kmap", "--verbose", "parse", "A'BC + AB'", "-n", "3"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Parse { variables: 3, .. }));
    }

    #[test]
    fn test_cli_rejects_conflicting_inputs() {
        let cli = Cli::try_parse_from(["kmap", "solve", "--minterms", "1", "--expression", "A"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_problem_input_sources() {
        let from_list = ProblemInput {
            variables: 3,
            minterms: Some("3, 4, 5".to_string()),
            dont_cares: String::new(),
            grid: None,
            expression: None,
        };
        let problem = from_list.into_problem(Settings::default()).unwrap();
        assert_eq!(problem.spec().minterms, vec![3, 4, 5]);

        let from_expression = ProblemInput {
            variables: 3,
            minterms: None,
            dont_cares: String::new(),
            grid: None,
            expression: Some("A'BC + AB'".to_string()),
        };
        let problem = from_expression.into_problem(Settings::default()).unwrap();
        assert_eq!(problem.spec().minterms, vec![3, 4, 5]);
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("config/examples/svg.yaml").exists());
        assert!(temp_dir.path().join("input/corners.txt").exists());
        assert!(temp_dir.path().join("input/batch.yaml").exists());

        // Files written by setup load back
        let grid = load_grid_from_file(temp_dir.path().join("input/corners.txt"), 4).unwrap();
        assert_eq!(grid.extract().0, vec![0, 2, 8, 10]);
        assert_eq!(load_problems_from_file(temp_dir.path().join("input/batch.yaml")).unwrap().len(), 4);
    }
}
