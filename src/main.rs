mod assemble;
mod db;
mod error;
mod export;
mod fields;
mod logs;
mod subjects;
mod transfer;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::assemble::RunPaths;
use crate::logs::SubjectLogs;
use crate::subjects::vocab::Vocabulary;

const AUDIT_LOG: &str = "subject-processing-log.csv";
const REJECTED_LOG: &str = "rejected-subjects.log";

#[derive(Parser)]
#[command(
    name = "etd_extractor",
    about = "Extract thesis records from the legacy EAV store into a repository import CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full run: resolve fields, normalize subjects, transfer files, write the import CSV
    Extract {
        /// SQLite snapshot of the source store
        #[arg(long, default_value = "data/etd.sqlite")]
        database: PathBuf,
        /// Destination directory for transferred files (recreated clean each run)
        #[arg(long, default_value = "files")]
        destination: PathBuf,
        /// Root the stored file URIs resolve under
        #[arg(long, default_value = transfer::DEFAULT_STORAGE_ROOT)]
        storage_root: PathBuf,
        /// The ID for the parent collection in the target repository, from the URL
        #[arg(long, default_value = "XXXXXXXX")]
        parent_collection_id: String,
        /// Path of the import CSV
        #[arg(long, default_value = "hyrax_import.csv")]
        output: PathBuf,
    },
    /// Subjects-only audit pass: writes the subject logs, no file transfer or export
    Subjects {
        #[arg(long, default_value = "data/etd.sqlite")]
        database: PathBuf,
    },
    /// Snapshot statistics
    Stats {
        #[arg(long, default_value = "data/etd.sqlite")]
        database: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            database,
            destination,
            storage_root,
            parent_collection_id,
            output,
        } => {
            let vocab = Vocabulary::builtin();
            vocab.verify()?;
            let conn = db::connect(&database)?;

            // Each run starts from an empty destination so the collision
            // check only ever flags duplicate filenames within the run.
            if destination.exists() {
                fs::remove_dir_all(&destination)?;
            }
            fs::create_dir_all(&destination)?;

            let mut logs = SubjectLogs::create(AUDIT_LOG.as_ref(), REJECTED_LOG.as_ref())?;
            let etds = db::fetch_etds(&conn)?;
            if etds.is_empty() {
                println!("No ETD records in the snapshot.");
                return Ok(());
            }
            println!("Extracting {} records...", etds.len());

            let paths = RunPaths {
                storage_root: &storage_root,
                destination: &destination,
            };
            let pb = progress_bar(etds.len());
            let mut records = Vec::with_capacity(etds.len());
            for etd in &etds {
                records.push(assemble::assemble(&conn, &vocab, &mut logs, etd, &paths)?);
                pb.inc(1);
            }
            pb.finish_and_clear();
            logs.flush()?;

            export::write_csv(&output, &records, &parent_collection_id)?;

            let missing = records.iter().filter(|r| r.subject.is_empty()).count();
            println!("Total:            {}", records.len());
            println!("Missing subjects: {}", missing);
            println!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Subjects { database } => {
            let vocab = Vocabulary::builtin();
            vocab.verify()?;
            let conn = db::connect(&database)?;
            let mut logs = SubjectLogs::create(AUDIT_LOG.as_ref(), REJECTED_LOG.as_ref())?;
            let etds = db::fetch_etds(&conn)?;
            if etds.is_empty() {
                println!("No ETD records in the snapshot.");
                return Ok(());
            }
            println!("Auditing subjects for {} records...", etds.len());

            let pb = progress_bar(etds.len());
            let mut missing = 0usize;
            for etd in &etds {
                let subject = assemble::subjects_only(&conn, &vocab, &mut logs, etd)?;
                if subject.is_empty() {
                    missing += 1;
                }
                pb.inc(1);
            }
            pb.finish_and_clear();
            logs.flush()?;

            println!("Total:            {}", etds.len());
            println!("Missing subjects: {}", missing);
            println!("Wrote {} and {}", AUDIT_LOG, REJECTED_LOG);
            Ok(())
        }
        Commands::Stats { database } => {
            let conn = db::connect(&database)?;
            let s = db::get_stats(&conn)?;
            println!("Records:      {}", s.total);
            println!("  open:       {}", s.open);
            println!("  restricted: {}", s.restricted);
            println!("Field values: {}", s.field_values);
            println!("Attachments:  {}", s.attachments);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
