use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use heurist_core::{SchemaCatalog, rows_to_frame};
use heurist_ingest::{load_records, load_structure};
use heurist_model::{
    DateStrictness, ProcessingOptions, RawRecord, RecordTypeSchema, ValidatedRow,
};

use crate::cli::{FlattenArgs, SchemaArgs};
use crate::summary::schema_table;
use crate::types::{FlattenResult, RecordTypeSummary};

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let catalog = load_catalog(&args.structure)?;
    for schema in catalog.schemas() {
        println!(
            "{} (record type {}: {})",
            schema.table_name, schema.record_type_id, schema.record_type_name
        );
        println!("{}", schema_table(schema));
    }
    Ok(())
}

pub fn run_flatten(args: &FlattenArgs) -> Result<FlattenResult> {
    let span = info_span!("flatten", records = %args.records.display());
    let _guard = span.enter();

    let catalog = load_catalog(&args.structure)?;
    let record_set = load_records(&args.records)
        .with_context(|| format!("load records {}", args.records.display()))?;
    if let Some(record_type_id) = args.record_type
        && catalog.get(record_type_id).is_none()
    {
        bail!("record type {record_type_id} is not in the structure export");
    }

    let options = processing_options(args);
    let mut writer = open_output(args.output.as_deref())?;
    let mut result = FlattenResult {
        output: args.output.clone(),
        rejected_records: record_set.rejected_count(),
        ..FlattenResult::default()
    };

    for (record_type_id, records) in group_by_record_type(record_set.records, args.record_type) {
        let Some(pipeline) = catalog.pipeline(record_type_id, options.clone()) else {
            warn!(
                record_type_id,
                records = records.len(),
                "no schema for record type; records skipped"
            );
            result.unmatched_records += records.len();
            continue;
        };

        let outcome = pipeline.process_batch(&records);
        write_rows(&mut writer, &outcome.rows)
            .with_context(|| format!("write rows of record type {record_type_id}"))?;
        if let Some(limit) = args.preview {
            print_preview(pipeline.schema(), &outcome.rows, limit)?;
        }

        let schema = pipeline.schema();
        result.summaries.push(RecordTypeSummary {
            record_type_id,
            record_type_name: schema.record_type_name.clone(),
            table_name: schema.table_name.clone(),
            records: records.len(),
            rows: outcome.row_count(),
            warnings: outcome.report.warning_count(),
            failures: outcome.failures,
        });
    }
    writer.flush().context("flush output")?;

    info!(
        rows = result.total_rows(),
        record_types = result.summaries.len(),
        unmatched = result.unmatched_records,
        rejected = result.rejected_records,
        "flatten finished"
    );
    Ok(result)
}

/// Options for a flatten run. `--strict` and `--reject-flagged` are
/// independent switches.
pub fn processing_options(args: &FlattenArgs) -> ProcessingOptions {
    let strictness = if args.strict {
        DateStrictness::RequireCompound
    } else {
        DateStrictness::Relaxed
    };
    ProcessingOptions::new()
        .with_date_strictness(strictness)
        .with_reject_flagged(args.reject_flagged)
}

/// Write one JSON object per row, each on its own line.
pub fn write_rows<W: Write>(writer: &mut W, rows: &[ValidatedRow]) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn load_catalog(path: &Path) -> Result<SchemaCatalog> {
    let metadata = load_structure(path)
        .with_context(|| format!("load structure {}", path.display()))?;
    SchemaCatalog::build(&metadata).context("build record type schemas")
}

/// Records grouped by record type, keeping input order inside each group.
fn group_by_record_type(
    records: Vec<RawRecord>,
    only: Option<i64>,
) -> BTreeMap<i64, Vec<RawRecord>> {
    let mut groups: BTreeMap<i64, Vec<RawRecord>> = BTreeMap::new();
    for record in records {
        if only.is_some_and(|id| id != record.record_type_id) {
            continue;
        }
        groups.entry(record.record_type_id).or_default().push(record);
    }
    groups
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn print_preview(schema: &RecordTypeSchema, rows: &[ValidatedRow], limit: usize) -> Result<()> {
    let shown = &rows[..rows.len().min(limit)];
    let frame = rows_to_frame(schema, shown)
        .with_context(|| format!("build preview of {}", schema.table_name))?;
    eprintln!("{} ({} of {} rows)", schema.table_name, shown.len(), rows.len());
    eprintln!("{frame}");
    Ok(())
}
