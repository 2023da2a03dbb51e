use std::io::Write;

use clap::Args;

use crate::cli::report;
use crate::cli::OutputFormat;
use crate::config::{ClassifierArgs, Settings};
use crate::utils::validation::{validate_description, validate_invoice_value};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Free-text shipment or product description (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,

    /// Invoice value to estimate duty on
    #[arg(short, long)]
    pub invoice_value: Option<f64>,

    /// Also list up to N ranked catalog candidates
    #[arg(short = 'n', long, default_value = "0")]
    pub alternatives: usize,

    #[command(flatten)]
    pub classifier: ClassifierArgs,
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if the input or configuration is invalid, or the catalog
/// cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let query = args.description.join(" ");
    validate_description(&query)?;
    let invoice_value = args.invoice_value.map(validate_invoice_value).transpose()?;

    let settings = Settings::from_args(&args.classifier)?;
    let classifier = settings.build_classifier()?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} entries (matching on {})",
            classifier.engine().catalog().len(),
            classifier.engine().catalog().reference_field()
        );
        if let Some(remote) = &settings.remote {
            eprintln!("Remote classification enabled: {}", remote.endpoint);
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(classifier.classify(&query));

    let estimate = match (result.as_match(), invoice_value) {
        (Some(matched), Some(value)) => Some(classifier.estimate_duty(matched, value)?),
        _ => None,
    };

    let alternatives = classifier.engine().find_matches(&query, args.alternatives);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            report::write_text(&mut out, &query, &result, estimate.as_ref())?;
            report::write_alternatives_text(&mut out, &alternatives)?;
        }
        OutputFormat::Json => {
            let json = report::to_json(&query, &result, estimate.as_ref(), &alternatives);
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "{}", report::TSV_HEADER)?;
            report::write_tsv_row(&mut out, &query, &result, estimate.as_ref())?;
        }
    }

    Ok(())
}
