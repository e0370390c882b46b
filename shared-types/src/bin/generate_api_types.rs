use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the dashboard front end
    let mut types = Vec::new();

    // Company types
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(CompanyPatch::export_to_string()?));
    types.push(clean_type(EnrichRequest::export_to_string()?));
    types.push(clean_type(InsightsRequest::export_to_string()?));
    types.push(clean_type(InsightsResponse::export_to_string()?));

    // Search types
    types.push(clean_type(SearchForm::export_to_string()?));
    types.push(clean_type(SearchParams::export_to_string()?));

    // CRM types
    types.push(clean_type(CrmLead::export_to_string()?));
    types.push(clean_type(CrmContact::export_to_string()?));
    types.push(clean_type(CrmConfirmation::export_to_string()?));
    types.push(clean_type(LocationParts::export_to_string()?));
    types.push(clean_type(ContactParts::export_to_string()?));

    // Scrape types
    types.push(clean_type(ScrapeRequest::export_to_string()?));
    types.push(clean_type(ScrapedLead::export_to_string()?));

    // Analytics types
    types.push(clean_type(AnalyticsSnapshot::export_to_string()?));
    types.push(clean_type(LeadAnalytics::export_to_string()?));
    types.push(clean_type(MonthlyProjection::export_to_string()?));
    types.push(clean_type(Trend::export_to_string()?));
    types.push(clean_type(TopLead::export_to_string()?));
    types.push(clean_type(DetailedAnalytics::export_to_string()?));
    types.push(clean_type(AnalyticsTrends::export_to_string()?));
    types.push(clean_type(DailyLeadCount::export_to_string()?));
    types.push(clean_type(PotentialTrendPoint::export_to_string()?));

    // Auth and session types
    types.push(clean_type(Credentials::export_to_string()?));
    types.push(clean_type(ErrorDetail::export_to_string()?));
    types.push(clean_type(AuthOutcome::export_to_string()?));
    types.push(clean_type(Session::export_to_string()?));
    types.push(clean_type(MessageResponse::export_to_string()?));

    let output_dir = Path::new("../frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Every type lands in one file, so cross-type imports are dropped
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
