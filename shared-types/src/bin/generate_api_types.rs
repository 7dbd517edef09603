use shared_types::*;
use std::fs;
use std::path::PathBuf;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let types = vec![
        // Contact types
        clean_type(Contact::export_to_string()?),
        clean_type(ContactStatus::export_to_string()?),
        clean_type(Temperature::export_to_string()?),
        clean_type(ReferralType::export_to_string()?),
        clean_type(GoodFit::export_to_string()?),
        clean_type(NewContact::export_to_string()?),
        clean_type(ContactChange::export_to_string()?),
        clean_type(ContactQuery::export_to_string()?),
        clean_type(ImportContactsResponse::export_to_string()?),
        // Settings types
        clean_type(Theme::export_to_string()?),
        clean_type(Preferences::export_to_string()?),
        clean_type(LoginRequest::export_to_string()?),
        clean_type(ErrorResponse::export_to_string()?),
    ];

    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("../web/src/api-types"));
    fs::create_dir_all(&output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// All types land in one file, so per-type imports and banners are dropped.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
