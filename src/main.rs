//  src/main.rs

use anyhow::Context;
use clap::Parser as ClapParser;
use enumgen::logging::init_tracing;
use enumgen::{Generator, GeneratorConfig};
use std::path::PathBuf;

/// Generates an exported Go enum type from a private type's constants.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Private type name, e.g. `status` (must start lower-case)
    #[arg(long = "type", value_name = "TYPE")]
    type_name: String,
    /// Output directory (default: the source directory)
    #[arg(long, value_name = "DIR")]
    path: Option<PathBuf>,
    /// Directory holding the Go package to read
    #[arg(long, value_name = "DIR", default_value = ".")]
    source: PathBuf,
    /// Use lower case for marshaled/unmarshaled values
    #[arg(long)]
    lower: bool,
    /// Generate a Get<Type>ByID lookup (values must be unique)
    #[arg(long)]
    getter: bool,
    /// Generate database/sql Value and Scan methods
    #[arg(long)]
    sql: bool,
    /// Generate MongoDB BSON marshaling methods
    #[arg(long)]
    bson: bool,
    /// Generate YAML marshaling methods
    #[arg(long)]
    yaml: bool,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new(&self.type_name)
            .lower_case(self.lower)
            .getter(self.getter)
            .sql(self.sql)
            .bson(self.bson)
            .yaml(self.yaml);
        if let Some(path) = &self.path {
            config = config.output_dir(path);
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    if let Err(e) = run(&cli) {
        eprintln!("enum generation failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut generator = Generator::new(cli.config())?;
    generator
        .parse(&cli.source)
        .with_context(|| format!("reading package in {}", cli.source.display()))?;
    let path = generator.generate()?;
    println!("{}", path.display());
    Ok(())
}
