use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/hs_lookup.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let entries = catalog.get("entries").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'entries' field\n\
             The catalog must have a top-level 'entries' array.\n"
        );
    });

    let entries = entries.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'entries' must be an array\n\
             Got: {entries}\n"
        );
    });

    assert!(
        !entries.is_empty(),
        "\n\nCATALOG BUILD ERROR: 'entries' is empty\n\
         The embedded catalog needs at least one product.\n"
    );

    for (i, entry) in entries.iter().enumerate() {
        validate_entry_fields(entry, i);
    }

    println!(
        "cargo:warning=Validated catalog: {} entries",
        entries.len()
    );
}

fn validate_entry_fields(entry: &serde_json::Value, index: usize) {
    let product = entry
        .get("product")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!("\n\nCATALOG BUILD ERROR: Entry at index {index} missing 'product' string\n")
        });

    assert!(
        !product.trim().is_empty(),
        "\n\nCATALOG BUILD ERROR: Entry at index {index} has an empty 'product'\n"
    );

    let code = entry.get("hs_code").and_then(|v| v.as_str());
    assert!(
        code.is_some_and(|c| !c.trim().is_empty()),
        "\n\nCATALOG BUILD ERROR: Entry '{product}' (index {index}) missing 'hs_code'\n"
    );

    let rate = entry.get("tariff_percent").and_then(serde_json::Value::as_f64);
    assert!(
        rate.is_some_and(|r| r.is_finite() && !r.is_sign_negative()),
        "\n\nCATALOG BUILD ERROR: Entry '{product}' (index {index}) needs a non-negative 'tariff_percent'\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/hs_lookup.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
