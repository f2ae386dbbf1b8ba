use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use formfill_store::field_names_or_default;
use tracing_subscriber::EnvFilter;

mod display;
mod form;
mod generate;

use form::MissingPolicy;
use generate::{GenerateArgs, SingleArgs};

#[derive(Parser)]
#[command(name = "formfill", version, about = "Fill document templates from tabular records")]
struct Cli {
    /// Directory containing the `template` (or `模板`) folder.
    #[arg(long, env = "FORMFILL_TEMPLATE_ROOT", default_value = ".")]
    root: PathBuf,

    /// JSON file overriding the field names (id, name, category, key, ...).
    #[arg(long, env = "FORMFILL_FIELDS")]
    fields: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the placeholders the template references.
    Scan,

    /// Show derived and missing fields for each row without writing.
    Preview {
        /// CSV or JSON data file.
        #[arg(long)]
        data: PathBuf,

        /// 1-based rows to include, comma separated. Defaults to all.
        #[arg(long, value_delimiter = ',')]
        rows: Option<Vec<usize>>,
    },

    /// Generate one document per row.
    Generate {
        #[arg(long)]
        data: PathBuf,

        #[arg(long, env = "FORMFILL_OUTPUT")]
        output: PathBuf,

        #[arg(long, value_delimiter = ',')]
        rows: Option<Vec<usize>>,

        #[arg(long, value_enum, default_value_t = MissingPolicy::Ask)]
        on_missing: MissingPolicy,
    },

    /// Generate a single document from values given on the command line.
    Single {
        /// Field assignment, repeatable: --set 姓名=张三
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Fill year, month and day from today's date when not given.
        #[arg(long)]
        today: bool,

        #[arg(long, env = "FORMFILL_OUTPUT")]
        output: PathBuf,

        #[arg(long, value_enum, default_value_t = MissingPolicy::Ask)]
        on_missing: MissingPolicy,
    },
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty field name in {s:?}"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("formfill v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let fields = field_names_or_default(cli.fields.as_deref()).context("loading field names")?;

    match cli.command {
        Command::Scan => {
            let loaded = generate::load_template(&cli.root)?;
            display::print_identifiers(loaded.template.identifiers(), &fields);
        }
        Command::Preview { data, rows } => {
            generate::run_preview(&cli.root, &data, rows.as_deref(), &fields)?;
        }
        Command::Generate {
            data,
            output,
            rows,
            on_missing,
        } => {
            let report = generate::run_generate(GenerateArgs {
                root: &cli.root,
                data: &data,
                output,
                rows: rows.as_deref(),
                policy: on_missing,
                fields,
            })
            .await?;
            println!("{} documents generated", report.succeeded);
        }
        Command::Single {
            values,
            today,
            output,
            on_missing,
        } => {
            let path = generate::run_single(SingleArgs {
                root: &cli.root,
                values,
                today,
                output,
                policy: on_missing,
                fields,
            })?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
