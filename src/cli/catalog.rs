use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::{CatalogSource, ProductCatalog};
use crate::cli::report::tsv_field;
use crate::cli::OutputFormat;
use crate::core::entry::CatalogEntry;
use crate::core::types::ReferenceField;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all entries in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Catalog field used as the matching reference text
        #[arg(long, value_enum, default_value = "product")]
        match_on: ReferenceField,

        /// Only show entries whose name, description, or code contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show details of a specific classification code
    Show {
        /// Classification code (e.g., "8541.40")
        #[arg(required = true)]
        code: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Catalog field used as the matching reference text
        #[arg(long, value_enum, default_value = "product")]
        match_on: ReferenceField,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the code is not found,
/// or the export file cannot be written.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List {
            catalog,
            match_on,
            filter,
        } => run_list(catalog, match_on, filter.as_deref(), format, verbose),
        CatalogCommands::Show {
            code,
            catalog,
            match_on,
        } => run_show(&code, catalog, match_on, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
    }
}

fn load(catalog_path: Option<PathBuf>, match_on: ReferenceField) -> anyhow::Result<ProductCatalog> {
    Ok(ProductCatalog::load(&CatalogSource::from(catalog_path), match_on)?)
}

fn entry_matches(entry: &CatalogEntry, filter: &str) -> bool {
    let needle = filter.to_lowercase();
    [
        Some(entry.reference_text.as_str()),
        entry.product.as_deref(),
        entry.description.as_deref(),
        Some(entry.classification_code.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|text| text.to_lowercase().contains(&needle))
}

fn run_list(
    catalog_path: Option<PathBuf>,
    match_on: ReferenceField,
    filter: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load(catalog_path, match_on)?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} entries (matching on {})",
            catalog.len(),
            catalog.reference_field()
        );
    }

    let filtered: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|e| filter.map_or(true, |f| entry_matches(e, f)))
        .collect();

    match format {
        OutputFormat::Text => {
            let code_width = filtered
                .iter()
                .map(|e| e.classification_code.len())
                .max()
                .unwrap_or(7)
                .max(7);
            let name_width = filtered
                .iter()
                .map(|e| e.display_name().len().min(30))
                .max()
                .unwrap_or(7)
                .max(7);
            let desc_width = 40;

            let total_width = code_width + name_width + desc_width + 8 + 3;

            println!("Product Catalog ({} entries)\n", filtered.len());
            println!(
                "{:<code_w$} {:<name_w$} {:>8} {:<desc_w$}",
                "HS Code",
                "Product",
                "Duty %",
                "Description",
                code_w = code_width,
                name_w = name_width,
                desc_w = desc_width
            );
            println!("{}", "-".repeat(total_width));

            for e in &filtered {
                println!(
                    "{:<code_w$} {:<name_w$} {:>8} {:<desc_w$}",
                    e.classification_code,
                    truncate(e.display_name(), name_width),
                    e.duty_percent,
                    truncate(e.display_description(), desc_width),
                    code_w = code_width,
                    name_w = name_width,
                    desc_w = desc_width
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Tsv => {
            println!("hs_code\tproduct\tduty_percent\tdescription");
            for e in &filtered {
                println!("{}", tsv_row(e));
            }
        }
    }

    Ok(())
}

fn run_show(
    code: &str,
    catalog_path: Option<PathBuf>,
    match_on: ReferenceField,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalog = load(catalog_path, match_on)?;
    let entry = catalog
        .get_by_code(code)
        .ok_or_else(|| anyhow::anyhow!("Classification code '{}' not found", code.trim()))?;

    match format {
        OutputFormat::Text => {
            println!("Product: {}\n", entry.display_name());
            println!("HS Code:     {}", entry.classification_code);
            println!("Duty rate:   {}%", entry.duty_percent);
            println!("Matched on:  {} (\"{}\")", catalog.reference_field(), entry.reference_text);
            if let Some(desc) = &entry.description {
                println!("\nDescription: {desc}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entry)?);
        }
        OutputFormat::Tsv => {
            println!("hs_code\tproduct\tduty_percent\tdescription");
            println!("{}", tsv_row(entry));
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load(catalog_path, ReferenceField::default())?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!("Exported {} entries to {}", catalog.len(), output.display());

    Ok(())
}

fn tsv_row(entry: &CatalogEntry) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        tsv_field(&entry.classification_code),
        tsv_field(entry.display_name()),
        entry.duty_percent,
        tsv_field(entry.description.as_deref().unwrap_or(""))
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("solar panels", 20), "solar panels");
        assert_eq!(truncate("photovoltaic cells", 10), "photovo...");
        assert_eq!(truncate("café crème brûlée", 8), "café ...");
    }

    #[test]
    fn test_filter_matches_any_field() {
        let entry = CatalogEntry::new("solar panels", "8541.40", 5.0)
            .with_product("solar panels")
            .with_description("Photovoltaic cells");

        assert!(entry_matches(&entry, "SOLAR"));
        assert!(entry_matches(&entry, "photovoltaic"));
        assert!(entry_matches(&entry, "8541"));
        assert!(!entry_matches(&entry, "wine"));
    }

    #[test]
    fn test_tsv_row_keeps_four_columns() {
        let entry = CatalogEntry::new("solar\tpanels", "8541\t40", 5.0)
            .with_product("solar\tpanels")
            .with_description("Photovoltaic\ncells");
        let row = tsv_row(&entry);

        assert_eq!(row, "8541 40\tsolar panels\t5\tPhotovoltaic cells");
    }
}
