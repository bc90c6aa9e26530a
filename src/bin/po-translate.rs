// Copyright 2026 OpenStack i18n contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Command line interface for reconciling catalogs in a machine
//! translation pipeline.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use po_translate_helpers::batch::{collect, read_batches, split, write_batches};
use po_translate_helpers::config::Config;
use po_translate_helpers::extract::{new_entries, remaining_work};
use po_translate_helpers::files::{read_catalog, read_catalog_if_exists, write_catalog};
use po_translate_helpers::glossary::Glossary;
use po_translate_helpers::logger::setup_logger;
use po_translate_helpers::merge::{merge_with_options, MergeOptions};
use po_translate_helpers::preflight::ensure_catalog_file;
use po_translate_helpers::runlog::{append_run_record, RunRecord};
use po_translate_helpers::stats::CatalogStats;
use po_translate_helpers::Catalog;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Show progress (-v) or per-entry details (-vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Configuration file, defaults to po-translate.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Append a record of this run to the given JSON file.
    #[arg(long, global = true)]
    run_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the entries of a new template which an old template lacks.
    ExtractNew {
        #[arg(long)]
        old: PathBuf,
        #[arg(long)]
        new: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the entries of a template which are not translated yet.
    ExtractRemaining {
        /// The template, or the `template` path of the configuration.
        #[arg(long)]
        source: Option<PathBuf>,
        /// The translated catalog, or the `translated` path of the
        /// configuration.
        #[arg(long)]
        translated: Option<PathBuf>,
        /// Language used to expand configured paths.
        #[arg(long)]
        lang: Option<String>,
        /// Catalog to take the work from when the translated catalog is
        /// missing.
        #[arg(long)]
        fallback_source: Option<PathBuf>,
        /// Create a missing translated catalog before extracting.
        #[arg(long)]
        materialize: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Merge translation results into a catalog.
    Merge {
        #[arg(long)]
        base: PathBuf,
        /// Catalog listing the entries which may be updated.
        #[arg(long)]
        scope: PathBuf,
        #[arg(long)]
        result: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Language written to a missing `Language` header field.
        #[arg(long)]
        lang: Option<String>,
        /// Replace existing translations which differ from the result.
        #[arg(long)]
        overwrite_translated: bool,
        /// Report counts without writing the output.
        #[arg(long)]
        dry_run: bool,
    },
    /// Replace source terms left untranslated by their glossary term.
    GlossaryApply {
        /// Glossary as JSON or PO, or the configured `glossary`.
        #[arg(long)]
        glossary: Option<PathBuf>,
        input: PathBuf,
        #[arg(short, long, required_unless_present = "dry_run")]
        output: Option<PathBuf>,
        /// Language written to a missing `Language` header field.
        #[arg(long)]
        lang: Option<String>,
        /// Report how many entries would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Warn about translations which do not use the glossary terms.
    GlossaryVerify {
        #[arg(long)]
        glossary: Option<PathBuf>,
        input: PathBuf,
    },
    /// Convert the translated entries of a catalog into a JSON glossary.
    GlossaryCache {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Split a template into JSON batch files.
    Split {
        template: PathBuf,
        outdir: PathBuf,
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Collect answered JSON batch files into a result catalog.
    Collect {
        template: PathBuf,
        batch_dir: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Language written to a missing `Language` header field.
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print translation statistics, by default for the configured
    /// languages.
    Stats { files: Vec<PathBuf> },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose).context("Could not set up logging")?;
    let config = Config::discover(cli.config.as_deref()).context("Could not load configuration")?;
    let run_log = cli.run_log.clone().or_else(|| config.run_log.clone());

    let record = match cli.command {
        Command::ExtractNew { old, new, output } => extract_new(&old, &new, &output)?,
        Command::ExtractRemaining {
            source,
            translated,
            lang,
            fallback_source,
            materialize,
            output,
        } => {
            let lang = lang.as_deref();
            let layout = &config.files;
            let Some(source) = configured(source, lang, |lang| layout.template_path(lang)) else {
                bail!("No template given, use --source or --lang with a configured template");
            };
            let Some(translated) = configured(translated, lang, |lang| layout.translated_path(lang))
            else {
                bail!("No translated catalog given, use --translated or --lang with a configured path");
            };
            let fallback = configured(fallback_source, lang, |lang| layout.fallback_path(lang));
            extract_remaining(&source, &translated, fallback.as_deref(), materialize, &output)?
        }
        Command::Merge {
            base,
            scope,
            result,
            output,
            lang,
            overwrite_translated,
            dry_run,
        } => {
            let options = MergeOptions {
                overwrite_translated,
            };
            let lang = output_language(lang, &config);
            merge_catalogs(&base, &scope, &result, &output, lang.as_deref(), options, dry_run)?
        }
        Command::GlossaryApply {
            glossary,
            input,
            output,
            lang,
            dry_run,
        } => {
            let glossary = glossary_path(glossary, &config)?;
            let lang = output_language(lang, &config);
            glossary_apply(&glossary, &input, output.as_deref(), lang.as_deref(), dry_run)?
        }
        Command::GlossaryVerify { glossary, input } => {
            let glossary = glossary_path(glossary, &config)?;
            glossary_verify(&glossary, &input)?
        }
        Command::GlossaryCache { input, output } => glossary_cache(&input, &output)?,
        Command::Split {
            template,
            outdir,
            batch_size,
        } => {
            let batch_size = batch_size.unwrap_or(config.batch_size);
            split_template(&template, &outdir, batch_size)?
        }
        Command::Collect {
            template,
            batch_dir,
            output,
            lang,
        } => {
            let lang = output_language(lang, &config);
            collect_batches(&template, &batch_dir, &output, lang.as_deref())?
        }
        Command::Stats { files } => {
            let files = if files.is_empty() {
                config
                    .files
                    .languages
                    .iter()
                    .filter_map(|lang| config.files.translated_path(lang))
                    .collect()
            } else {
                files
            };
            if files.is_empty() {
                bail!("No catalogs given and no languages configured");
            }
            print_stats(&files)?
        }
    };

    if let Some(run_log) = run_log {
        append_run_record(&run_log, &record)
            .with_context(|| format!("Could not append to run log {}", run_log.display()))?;
    }
    Ok(())
}

/// The path given on the command line, or the configured one for `lang`.
fn configured(
    flag: Option<PathBuf>,
    lang: Option<&str>,
    expand: impl FnOnce(&str) -> Option<PathBuf>,
) -> Option<PathBuf> {
    flag.or_else(|| lang.and_then(expand))
}

/// The language given on the command line, or the only configured one.
fn output_language(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| match config.files.languages.as_slice() {
        [lang] => Some(lang.clone()),
        _ => None,
    })
}

/// Fill in the header fields every written catalog should carry.
fn ensure_header(catalog: &mut Catalog, language: Option<&str>, output: &Path) {
    if catalog.ensure_default_metadata(language) {
        log::info!("Added default header fields to {}", output.display());
    }
}

fn load(path: &Path) -> anyhow::Result<Catalog> {
    read_catalog(path).with_context(|| format!("Could not read {}", path.display()))
}

fn save(path: &Path, catalog: &Catalog) -> anyhow::Result<()> {
    write_catalog(path, catalog).with_context(|| format!("Could not write {}", path.display()))
}

#[allow(clippy::print_stdout)]
fn extract_new(old: &Path, new: &Path, output: &Path) -> anyhow::Result<RunRecord> {
    let diff = new_entries(&load(old)?, &load(new)?);
    save(output, &diff)?;
    println!("Extracted {} new entries to {}", diff.len(), output.display());
    Ok(RunRecord::new("extract-new")
        .with_input(old)
        .with_input(new)
        .with_output(output)
        .with_count("entries", diff.len()))
}

#[allow(clippy::print_stdout)]
fn extract_remaining(
    source: &Path,
    translated: &Path,
    fallback: Option<&Path>,
    materialize: bool,
    output: &Path,
) -> anyhow::Result<RunRecord> {
    let mut record = RunRecord::new("extract-remaining").with_output(output);
    let source_catalog = match fallback {
        Some(fallback) if !materialize && !translated.exists() => {
            log::warn!(
                "{} does not exist, taking the work from {}",
                translated.display(),
                fallback.display()
            );
            record = record.with_input(fallback);
            load(fallback)?
        }
        _ => {
            record = record.with_input(source);
            load(source)?
        }
    };

    if materialize {
        ensure_catalog_file(translated, &source_catalog)
            .with_context(|| format!("Could not create {}", translated.display()))?;
    }
    let translated_catalog = read_catalog_if_exists(translated)
        .with_context(|| format!("Could not read {}", translated.display()))?;
    if translated_catalog.is_some() {
        record = record.with_input(translated);
    }

    let remaining = remaining_work(&source_catalog, translated_catalog.as_ref());
    save(output, &remaining)?;
    println!(
        "Extracted {} remaining entries to {}",
        remaining.len(),
        output.display()
    );
    Ok(record.with_count("entries", remaining.len()))
}

#[allow(clippy::print_stdout)]
fn merge_catalogs(
    base: &Path,
    scope: &Path,
    result: &Path,
    output: &Path,
    lang: Option<&str>,
    options: MergeOptions,
    dry_run: bool,
) -> anyhow::Result<RunRecord> {
    let mut merged = merge_with_options(&load(base)?, &load(scope)?, &load(result)?, options);
    ensure_header(&mut merged.catalog, lang, output);
    let report = &merged.report;
    if dry_run {
        println!(
            "Would update {} entries, {} still missing",
            report.updated_count(),
            report.missing_count()
        );
    } else {
        save(output, &merged.catalog)?;
        println!(
            "Updated {} entries, {} still missing, wrote {}",
            report.updated_count(),
            report.missing_count(),
            output.display()
        );
    }
    Ok(RunRecord::new("merge")
        .with_input(base)
        .with_input(scope)
        .with_input(result)
        .with_output(output)
        .with_dry_run(dry_run)
        .with_count("updated", report.updated_count())
        .with_count("missing", report.missing_count())
        .with_count("inconsistent", report.inconsistent.len()))
}

fn glossary_path(flag: Option<PathBuf>, config: &Config) -> anyhow::Result<PathBuf> {
    match flag.or_else(|| config.glossary.clone()) {
        Some(path) => Ok(path),
        None => bail!("No glossary given, use --glossary or set `glossary` in the configuration"),
    }
}

/// Load a JSON glossary, or build one from a translated catalog.
fn load_glossary(path: &Path) -> anyhow::Result<Glossary> {
    let is_catalog = path
        .extension()
        .is_some_and(|ext| ext == "po" || ext == "pot");
    let glossary = if is_catalog {
        Glossary::from_catalog(&load(path)?)
    } else {
        Glossary::load_json(path)
    };
    glossary.with_context(|| format!("Could not load glossary {}", path.display()))
}

#[allow(clippy::print_stdout)]
fn glossary_apply(
    glossary_file: &Path,
    input: &Path,
    output: Option<&Path>,
    lang: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<RunRecord> {
    let glossary = load_glossary(glossary_file)?;
    let mut catalog = load(input)?;
    let changed = glossary.apply(&mut catalog);
    let mut record = RunRecord::new("glossary-apply")
        .with_input(glossary_file)
        .with_input(input)
        .with_dry_run(dry_run)
        .with_count("changed", changed.len());
    match output {
        Some(output) if !dry_run => {
            ensure_header(&mut catalog, lang, output);
            save(output, &catalog)?;
            println!("Changed {} entries, wrote {}", changed.len(), output.display());
            record = record.with_output(output);
        }
        _ => println!("Would change {} entries", changed.len()),
    }
    Ok(record)
}

#[allow(clippy::print_stdout)]
fn glossary_verify(glossary_file: &Path, input: &Path) -> anyhow::Result<RunRecord> {
    let glossary = load_glossary(glossary_file)?;
    let violations = glossary.verify(&load(input)?);
    println!("{} glossary violations in {}", violations.len(), input.display());
    Ok(RunRecord::new("glossary-verify")
        .with_input(glossary_file)
        .with_input(input)
        .with_count("violations", violations.len()))
}

#[allow(clippy::print_stdout)]
fn glossary_cache(input: &Path, output: &Path) -> anyhow::Result<RunRecord> {
    let glossary = load_glossary(input)?;
    glossary
        .save_json(output)
        .with_context(|| format!("Could not write {}", output.display()))?;
    println!("Cached {} glossary terms in {}", glossary.len(), output.display());
    Ok(RunRecord::new("glossary-cache")
        .with_input(input)
        .with_output(output)
        .with_count("terms", glossary.len()))
}

#[allow(clippy::print_stdout)]
fn split_template(template: &Path, outdir: &Path, batch_size: usize) -> anyhow::Result<RunRecord> {
    let batches = split(&load(template)?, batch_size);
    let paths = write_batches(outdir, &batches)
        .with_context(|| format!("Could not write batches to {}", outdir.display()))?;
    println!(
        "Split into {} files in {} (batch size {batch_size})",
        paths.len(),
        outdir.display()
    );
    Ok(RunRecord::new("split")
        .with_input(template)
        .with_output(outdir)
        .with_count("batches", paths.len()))
}

#[allow(clippy::print_stdout)]
fn collect_batches(
    template: &Path,
    batch_dir: &Path,
    output: &Path,
    lang: Option<&str>,
) -> anyhow::Result<RunRecord> {
    let items = read_batches(batch_dir)
        .with_context(|| format!("Could not read batches from {}", batch_dir.display()))?;
    let mut result = collect(&load(template)?, &items);
    ensure_header(&mut result, lang, output);
    save(output, &result)?;
    let stats = CatalogStats::for_catalog(&result);
    println!("Collected {}", stats);
    Ok(RunRecord::new("collect")
        .with_input(template)
        .with_input(batch_dir)
        .with_output(output)
        .with_count("items", items.len())
        .with_count("missing", stats.missing()))
}

/// Prints translation statistics for each given catalog.
#[allow(clippy::print_stdout)]
fn print_stats(files: &[PathBuf]) -> anyhow::Result<RunRecord> {
    let mut record = RunRecord::new("stats");
    let mut missing = 0;
    println!("Counts are \"translated (fuzzy, fuzzy untranslated) / total\"");
    for file in files {
        let stats = CatalogStats::for_catalog(&load(file)?);
        println!("{}: {}", file.display(), stats);
        missing += stats.missing();
        record = record.with_input(file);
    }
    Ok(record.with_count("missing", missing))
}
