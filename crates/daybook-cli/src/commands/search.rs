//! Search command
//!
//! Case-insensitive search over tasks, files and links.

use anyhow::Result;
use daybook_core::services::{filter_files, link_hostname, search, SearchScope};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_file_size, truncate};
use super::Context;
use crate::output::{print_header, print_info, print_json, print_output, print_section, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct HitRow {
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

pub async fn execute(ctx: &Context, query: String, scope: String, file_type: Option<String>) -> Result<()> {
    let scope: SearchScope = scope.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let records = ctx.records().await?;

    let mut results = search(&query, scope, &records.tasks, &records.files, &records.links);
    if file_type.is_some() {
        // Narrow file hits to the requested type
        let narrowed: Vec<_> = filter_files(&results.files, "", file_type.as_deref())
            .into_iter()
            .cloned()
            .collect();
        results.files = narrowed;
    }

    if ctx.format == OutputFormat::Json {
        return print_json(&results);
    }

    print_header(&format!("Search: \"{}\"", query), Some(&format!("{} results", results.total())));
    if results.is_empty() {
        print_info("No matches", ctx.quiet);
        return Ok(());
    }

    let mut rows: Vec<HitRow> = Vec::with_capacity(results.total());
    rows.extend(results.tasks.iter().map(|t| HitRow {
        kind: "task".to_string(),
        title: truncate(&t.title, 40),
        detail: t.status.to_string(),
    }));
    rows.extend(results.files.iter().map(|f| HitRow {
        kind: "file".to_string(),
        title: truncate(&f.file_name, 40),
        detail: format!("{} · {}", f.file_type, format_file_size(f.file_size)),
    }));
    rows.extend(results.links.iter().map(|l| HitRow {
        kind: "link".to_string(),
        title: truncate(l.display_title(), 40),
        detail: link_hostname(&l.url),
    }));

    print_section("Matches");
    print_output(&rows, ctx.format)?;

    Ok(())
}
