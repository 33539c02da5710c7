use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use apistub::classfile::{flag, opcodes, read_class};
use apistub::{stub_bytes, stub_tree, InitializerPolicy, StubConfig};

#[derive(Parser)]
#[command(name = "apistub")]
#[command(about = "Generate API stubs from compiled JVM classes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stub a single .class file
    Class {
        /// Input .class file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <input>.stub.class next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Give <clinit> an empty body instead of a throwing one
        #[arg(long)]
        empty_clinit: bool,

        /// Skip structural verification of the stub
        #[arg(long)]
        no_verify: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Stub every .class file under a directory
    Tree {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory; the input layout is mirrored
        #[arg(value_name = "DIR")]
        output: PathBuf,

        /// Worker threads
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Give <clinit> an empty body instead of a throwing one
        #[arg(long)]
        empty_clinit: bool,

        /// Skip structural verification of the stubs
        #[arg(long)]
        no_verify: bool,
    },

    /// Print the declarations and method bodies of a .class file
    Inspect {
        /// Input .class file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Class { input, output, empty_clinit, no_verify, verbose } => {
            let config = make_config(*empty_clinit, *no_verify, None);
            stub_file(input, output.as_deref(), &config, *verbose)?;
        }
        Commands::Tree { input, output, threads, empty_clinit, no_verify } => {
            let config = make_config(*empty_clinit, *no_verify, *threads);
            let report = stub_tree(input, output, &config)?;
            println!("Stubbed {} classes into {}", report.stubbed.len(), output.display());
            if !report.is_success() {
                for failure in &report.failures {
                    eprintln!("error: {}", failure);
                }
                anyhow::bail!("{} classes failed", report.failures.len());
            }
        }
        Commands::Inspect { input } => {
            inspect_file(input)?;
        }
    }

    Ok(())
}

fn make_config(empty_clinit: bool, no_verify: bool, threads: Option<usize>) -> StubConfig {
    let policy = if empty_clinit { InitializerPolicy::Empty } else { InitializerPolicy::Stub };
    StubConfig::default()
        .with_initializer_policy(policy)
        .with_verify(!no_verify)
        .with_threads(threads)
}

fn stub_file(input: &Path, output: Option<&Path>, config: &StubConfig, verbose: bool) -> Result<()> {
    if verbose {
        println!("Stubbing {}...", input.display());
    }

    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let stub = stub_bytes(&bytes, config).with_context(|| format!("stubbing {}", input.display()))?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("stub.class"),
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, stub).with_context(|| format!("writing {}", output.display()))?;

    if verbose {
        println!("Stub written to {}", output.display());
    }
    Ok(())
}

fn inspect_file(input: &Path) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let class = read_class(&bytes)?;
    let pool = &class.constant_pool;

    println!("class {} (major {})", class.class_name()?, class.major_version);
    if let Some(super_name) = class.super_name()? {
        println!("  extends {}", super_name);
    }
    for interface in class.interface_names()? {
        println!("  implements {}", interface);
    }
    if let Some(signature) = class.signature()? {
        println!("  signature {}", signature);
    }
    for field in &class.fields {
        println!("  field {} {}", field.name(pool)?, field.descriptor(pool)?);
    }
    for method in &class.methods {
        let modifiers = flag::method_modifiers(method.access_flags).join(" ");
        println!("  method {} {}{}", modifiers, method.name(pool)?, method.descriptor(pool)?);
        let exceptions = method.exceptions(pool)?;
        if !exceptions.is_empty() {
            println!("    throws {}", exceptions.join(", "));
        }
        if let Some(code) = method.code(pool)? {
            let ops = opcodes::disassemble(&code.code);
            println!("    stack={} locals={} [{}]", code.max_stack, code.max_locals, ops.join("; "));
        }
    }
    Ok(())
}
