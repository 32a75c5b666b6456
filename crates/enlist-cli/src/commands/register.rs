use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{now_utc, read_email_list};
use anyhow::{Context as _, Result};
use clap::Args;
use enlist_config::AppConfig;
use enlist_core::registration::{ParticipantStore, RegistrationMeta};
use enlist_core::BulkResult;
use enlist_store::memory::MemoryParticipantStore;
use enlist_store::{paths, Store};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Email addresses, registered after any read from --file
    pub emails: Vec<String>,
    /// File with one email per line, or `-` for stdin
    #[arg(long, short)]
    pub file: Option<PathBuf>,
    /// Report what would be registered without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct RegisterReport<'a> {
    #[serde(flatten)]
    result: &'a BulkResult,
    dry_run: bool,
}

pub fn register(ctx: &Context<'_>, args: RegisterArgs) -> Result<()> {
    execute(ctx.store, ctx.config, ctx.json, &args)
}

/// Dry run: the database is only read, and only when it already exists.
pub fn preview(
    config: &AppConfig,
    json: bool,
    db_path: Option<PathBuf>,
    args: RegisterArgs,
) -> Result<()> {
    let db_path = paths::locate_db_path(db_path).with_context(|| "locate database")?;
    let preview = MemoryParticipantStore::new();
    if db_path.exists() {
        let store = Store::open_read_only(&db_path)
            .with_context(|| format!("open database {}", db_path.display()))?;
        store
            .ensure_migrated()
            .with_context(|| "database schema is not current, run without --dry-run first")?;
        preview.seed(store.participants().list()?);
    } else {
        debug!(path = %db_path.display(), "database missing, previewing against empty store");
    }
    execute(&preview, config, json, &args)
}

fn execute<S>(store: &S, config: &AppConfig, json: bool, args: &RegisterArgs) -> Result<()>
where
    S: ParticipantStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let emails = collect_emails(args, config)?;
    debug!(count = emails.len(), dry_run = args.dry_run, "email list collected");

    if !json {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "Starting bulk participant registration")?;
        writeln!(stdout, "Participants to register: {}", emails.len())?;
    }

    let meta = RegistrationMeta {
        now_utc: now_utc(),
        source: Some(config.source.as_str()),
    };
    let result = run_batch(store, meta, &emails)?;

    if json {
        return print_json(&RegisterReport {
            result: &result,
            dry_run: args.dry_run,
        });
    }

    let mut stdout = io::stdout().lock();
    write_summary(&mut stdout, &result, args.dry_run)?;
    Ok(())
}

fn run_batch<S>(store: &S, meta: RegistrationMeta<'_>, emails: &[String]) -> Result<BulkResult>
where
    S: ParticipantStore,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let result = store
        .bulk_add_registered_emails(meta, emails)
        .with_context(|| "bulk registration failed")?;
    for error in &result.errors {
        debug!(error = %error, "entry not registered");
    }
    Ok(result)
}

fn collect_emails(args: &RegisterArgs, config: &AppConfig) -> Result<Vec<String>> {
    let file = match &args.file {
        Some(path) => Some(path.clone()),
        None if args.emails.is_empty() => config.input.file.clone(),
        None => None,
    };
    let mut emails = match file {
        Some(path) => read_input(&path)?,
        None => Vec::new(),
    };
    emails.extend(args.emails.iter().cloned());
    Ok(emails)
}

fn read_input(path: &Path) -> Result<Vec<String>> {
    if path == Path::new("-") {
        return read_email_list(io::stdin().lock()).with_context(|| "read email list from stdin");
    }
    if !path.exists() {
        return Err(not_found(format!("email list {}", path.display())));
    }
    let file = File::open(path).with_context(|| format!("open email list {}", path.display()))?;
    read_email_list(BufReader::new(file))
        .with_context(|| format!("read email list {}", path.display()))
}

fn write_summary(out: &mut impl Write, result: &BulkResult, dry_run: bool) -> io::Result<()> {
    if dry_run {
        writeln!(out, "Dry run, nothing was written")?;
    } else {
        writeln!(out, "Bulk registration succeeded")?;
    }
    writeln!(out, "  added:   {}", result.added)?;
    writeln!(out, "  skipped: {}", result.skipped)?;
    if result.has_errors() {
        writeln!(out, "Errors ({}):", result.errors.len())?;
        for error in &result.errors {
            writeln!(out, "  - {}", error)?;
        }
    }
    writeln!(out, "Bulk registration complete")
}

#[cfg(test)]
mod tests {
    use super::{collect_emails, run_batch, write_summary, RegisterArgs};
    use crate::error::{exit_status_for, EXIT_FAILURE};
    use enlist_config::AppConfig;
    use enlist_core::registration::RegistrationMeta;
    use enlist_core::BulkResult;
    use enlist_store::error::StoreError;
    use enlist_store::memory::MemoryParticipantStore;
    use std::fs;
    use tempfile::TempDir;

    const META: RegistrationMeta<'static> = RegistrationMeta {
        now_utc: 1_700_000_000,
        source: None,
    };

    fn args(emails: &[&str], file: Option<std::path::PathBuf>) -> RegisterArgs {
        RegisterArgs {
            emails: emails.iter().map(|value| value.to_string()).collect(),
            file,
            dry_run: false,
        }
    }

    #[test]
    fn collect_emails_reads_file_then_arguments() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("emails.txt");
        fs::write(&path, "ada@example.com\n# skip\ngrace@example.com\n").expect("write");

        let emails =
            collect_emails(&args(&["linus@example.org"], Some(path)), &AppConfig::default())
                .expect("collect");
        assert_eq!(
            emails,
            vec!["ada@example.com", "grace@example.com", "linus@example.org"]
        );
    }

    #[test]
    fn collect_emails_falls_back_to_config_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("emails.txt");
        fs::write(&path, "ada@example.com\n").expect("write");
        let mut config = AppConfig::default();
        config.input.file = Some(path);

        let emails = collect_emails(&args(&[], None), &config).expect("collect");
        assert_eq!(emails, vec!["ada@example.com"]);

        let emails = collect_emails(&args(&["grace@example.com"], None), &config).expect("collect");
        assert_eq!(emails, vec!["grace@example.com"]);
    }

    #[test]
    fn collect_emails_missing_file_is_not_found() {
        let temp = TempDir::new().expect("tempdir");
        let err = collect_emails(
            &args(&[], Some(temp.path().join("missing.txt"))),
            &AppConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn run_batch_surfaces_store_failure() {
        let store = MemoryParticipantStore::unavailable("quota exceeded");
        let err = run_batch(&store, META, &["ada@example.com".to_string()]).unwrap_err();
        assert!(err.to_string().contains("bulk registration failed"));
        assert!(err
            .chain()
            .any(|cause| cause.downcast_ref::<StoreError>().is_some()));
        assert_eq!(exit_status_for(&err), EXIT_FAILURE);
    }

    #[test]
    fn summary_lists_errors() {
        let result = BulkResult {
            added: 2,
            skipped: 1,
            errors: vec!["invalid email address: nope".to_string()],
        };
        let mut out = Vec::new();
        write_summary(&mut out, &result, false).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("Bulk registration succeeded\n"));
        assert!(text.contains("  added:   2\n"));
        assert!(text.contains("  skipped: 1\n"));
        assert!(text.contains("Errors (1):\n  - invalid email address: nope\n"));
        assert!(text.ends_with("Bulk registration complete\n"));
    }

    #[test]
    fn summary_omits_empty_error_list() {
        let mut out = Vec::new();
        write_summary(&mut out, &BulkResult::default(), true).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("Dry run, nothing was written\n"));
        assert!(!text.contains("Errors"));
    }
}
