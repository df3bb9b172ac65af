//! dorkkit - search dork templates and query composer
//!
//! CLI entry point for listing categories, resolving dorks and composing
//! custom queries.

use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use futures::future::join_all;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use dorkkit::catalog::{Catalog, Category};
use dorkkit::cli::{Cli, Command, OutputFormat};
use dorkkit::compose::{CustomDorkSpec, compose};
use dorkkit::config::Config;
use dorkkit::filter::filter;
use dorkkit::render;
use dorkkit::repl;
use dorkkit::source::create_source;
use dorkkit::substitute::substitute;
use dorkkit::templates::TemplateLoader;

const DEFAULT_LOG_LEVEL: &str = "warn";

fn setup_logging(level: &str) -> Result<()> {
    let directive: Directive = level
        .parse()
        .context(format!("Invalid log level '{}'", level))?;

    // stderr only; stdout carries query output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI flag > config file > default
    let level = cli
        .log_level
        .clone()
        .or_else(|| Config::load_log_level(cli.config.as_ref()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    setup_logging(&level).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(source = ?config.source.kind, search = %config.search.base_url, "main: config loaded");

    match cli.command {
        Some(Command::Categories { format }) => cmd_categories(format),
        Some(Command::Dorks {
            categories,
            all,
            subject,
            filter,
            urls,
            format,
        }) => cmd_dorks(&config, &categories, all, subject.as_deref(), filter.as_deref(), urls, format).await,
        Some(Command::Compose {
            site,
            inurl,
            intext,
            intitle,
            filetype,
            url,
        }) => {
            let spec = CustomDorkSpec {
                site,
                inurl,
                intext,
                intitle,
                filetype,
            };
            cmd_compose(&config, &compose(&spec), url)
        }
        Some(Command::Shell { category, subject }) => repl::run_interactive(&config, category, subject).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// List categories
fn cmd_categories(format: OutputFormat) -> Result<()> {
    let catalog = Catalog::builtin();
    match format {
        OutputFormat::Text => {
            for category in catalog.all() {
                println!("{}", render::category_line(category));
            }
        }
        OutputFormat::Json => {
            let items: Vec<_> = catalog.all().iter().map(render::category_json).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}

/// Resolve dorks for one or more categories
async fn cmd_dorks(
    config: &Config,
    ids: &[String],
    all: bool,
    subject: Option<&str>,
    keyword: Option<&str>,
    urls: bool,
    format: OutputFormat,
) -> Result<()> {
    let catalog = Catalog::builtin();
    let categories: Vec<&'static Category> = if all {
        catalog.all().iter().collect()
    } else {
        ids.iter()
            .map(|id| {
                catalog
                    .get(id)
                    .ok_or_else(|| eyre::eyre!("Unknown category: {} (see `dk categories`)", id))
            })
            .collect::<Result<_>>()?
    };

    let subject = subject.unwrap_or_default();
    if subject.trim().is_empty()
        && let Some(category) = categories.iter().find(|c| c.requires_input)
    {
        return Err(eyre::eyre!(
            "Category '{}' needs a subject: {} (pass --subject)",
            category.id,
            category.prompt
        ));
    }

    let source = create_source(&config.source).context("Failed to create template source")?;
    let loader = TemplateLoader::new(source);
    let target = config.search.target();
    let target = urls.then_some(&target);
    let keyword = keyword.unwrap_or_default();

    // Load concurrently; results come back in request order
    let loads = categories.iter().map(|&category| {
        let loader = &loader;
        async move { (category, loader.load(category.source_id).await) }
    });
    let results = join_all(loads).await;

    let mut failed = 0;
    let mut documents = Vec::new();
    for (category, result) in results {
        let templates = match result {
            Ok(templates) => templates,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), category.id, e);
                failed += 1;
                continue;
            }
        };

        let resolved = substitute(&templates, subject);
        let visible = filter(&resolved, keyword);
        match format {
            OutputFormat::Text => {
                println!("{}", render::category_heading(category, visible.len(), resolved.len()));
                for (i, query) in visible.iter().enumerate() {
                    println!("{}", render::query_block(i, query, target));
                }
                println!();
            }
            OutputFormat::Json => documents.push(render::queries_json(category, subject, &visible, target)),
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }

    if failed > 0 {
        return Err(eyre::eyre!("{} of {} categories failed to load", failed, categories.len()));
    }
    Ok(())
}

/// Print a composed query, or its search URL
fn cmd_compose(config: &Config, query: &str, url: bool) -> Result<()> {
    if query.is_empty() {
        return Err(eyre::eyre!("Nothing to compose: give at least one operator value"));
    }

    if url {
        let url = config.search.target().url_for(query)?;
        println!("{}", url);
    } else {
        println!("{}", query);
    }
    Ok(())
}
