use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_form_core::{CommandDescriptor, Context};
use command_form_widgets::{Form, FormValues};
use tracing_subscriber::EnvFilter;

mod input;
mod invocation;
mod output;
mod prompt;

use invocation::Invocation;
use output::{OutputFormat, ResolutionReport};
use prompt::{AssumeYes, TerminalPrompter};

#[derive(Debug, Parser)]
#[command(name = "command-form")]
#[command(about = "Fill, resolve and run commands through forms generated from their descriptors")]
#[command(version)]
struct Cli {
    /// Log widget construction and resolution to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the controls generated for each parameter.
    Inspect(InspectArgs),
    /// Fill the form, resolve it and print every value or error.
    Resolve(ResolveArgs),
    /// Fill the form, resolve it and execute the resulting command line.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Command descriptor file (YAML or JSON).
    descriptor: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct FillArgs {
    /// Command descriptor file (YAML or JSON).
    descriptor: PathBuf,
    /// Enter VALUE into parameter NAME; repeat for multiple parameters.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = input::parse_assignment)]
    set: Vec<(String, String)>,
    /// Answer yes to every confirmation question.
    #[arg(long)]
    yes: bool,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    fill: FillArgs,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    fill: FillArgs,
    /// Print the command line instead of executing it.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Inspect(args) => run_inspect(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Run(args) => run_run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_descriptor(path: &Path) -> Result<CommandDescriptor, String> {
    CommandDescriptor::load(path).map_err(|e| format!("failed to load '{}': {e}", path.display()))
}

/// Builds the form, applies the assignments and resolves it.
fn fill_and_resolve(args: &FillArgs) -> Result<(CommandDescriptor, FormValues), String> {
    let command = load_descriptor(&args.descriptor)?;
    let ctx = Context::for_command(&command);
    let ctx = if args.yes {
        ctx.with_prompter(AssumeYes)
    } else {
        ctx.with_prompter(TerminalPrompter)
    };

    let mut form = Form::new(&command, &ctx);
    input::apply_assignments(&mut form, &args.set)?;
    let values = form.resolve(&ctx);
    Ok((command, values))
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let command = load_descriptor(&args.descriptor)?;
    let form = Form::new(&command, &Context::for_command(&command));
    let output = output::format_form(&command.name, &form.summaries(), args.format)?;
    println!("{output}");
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let (command, values) = fill_and_resolve(&args.fill)?;
    let report = ResolutionReport::new(&command.name, &values);
    println!("{}", output::format_report(&report, args.format)?);

    if values.is_aborted() {
        eprintln!("Aborted!");
        return Ok(());
    }
    let errors = values.errors();
    if !errors.is_empty() {
        return Err(format!("{} parameter(s) failed to resolve", errors.len()));
    }
    Ok(())
}

fn run_run(args: RunArgs) -> Result<(), String> {
    let (command, values) = fill_and_resolve(&args.fill)?;
    if values.is_aborted() {
        eprintln!("Aborted!");
        return Ok(());
    }
    let values = values.into_values().map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    })?;

    let invocation = Invocation::build(&command, &values);
    if args.dry_run {
        println!("{invocation}");
        return Ok(());
    }
    let status = invocation.run()?;
    if !status.success() {
        return Err(format!("'{}' exited with {status}", invocation.program));
    }
    Ok(())
}
