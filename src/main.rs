use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use release_notes::boundary::{check_release_data, BoundaryWarning};
use release_notes::config::{self, Config};
use release_notes::domain::{parse_releases_with_label, TagPolicy};
use release_notes::export::{self, ExportOptions};
use release_notes::git::Git2Repository;
use release_notes::render::{self, Theme, TypeFilter, ViewMode, ViewState};
use release_notes::{markdown, server, ui};

#[derive(Parser)]
#[command(
    name = "release-notes",
    version,
    about = "Export git history as release notes and render them as a static site"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Which tags mark a release: semver-strict or prefix-only"
    )]
    tag_policy: Option<TagPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a git repository and write release_notes.json (and markdown)
    Export(ExportArgs),
    /// Render release_notes.json into a static HTML page
    Render(RenderArgs),
    /// Serve a directory over HTTP and collect CSP reports
    Serve(ServeArgs),
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long, default_value = ".", help = "Path to the repository")]
    repo_path: String,

    #[arg(short, long, help = "Branch to analyze")]
    branch: Option<String>,

    #[arg(short, long, help = "Number of commits to export")]
    num_commits: Option<usize>,

    #[arg(short, long, help = "Output JSON file path")]
    output: Option<String>,

    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "RELEASE_NOTES.md",
        help = "Markdown output path"
    )]
    markdown: Option<String>,

    #[arg(long, conflicts_with = "markdown", help = "Skip markdown generation")]
    no_markdown: bool,

    #[arg(long, help = "Markdown for the latest tagged release only")]
    latest_release_only: bool,
}

#[derive(Args)]
struct RenderArgs {
    #[arg(short, long, help = "Release data file")]
    input: Option<String>,

    #[arg(long, help = "Output directory")]
    out_dir: Option<String>,

    #[arg(long, help = "commit or release")]
    view: Option<ViewMode>,

    #[arg(long, help = "Show only this release (implies --view release)")]
    release: Option<String>,

    #[arg(long, default_value = "all", help = "all, tags or a commit type")]
    filter: TypeFilter,

    #[arg(long, help = "Search query")]
    search: Option<String>,

    #[arg(long, default_value = "light", help = "light or dark")]
    theme: Theme,

    #[arg(long, help = "Copy release_notes.json next to the page")]
    copy_data: bool,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, help = "Document root")]
    root: Option<String>,

    #[arg(long, help = "Address to listen on")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Load configuration
    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };
    if let Some(policy) = cli.tag_policy {
        config.releases.tag_policy = policy;
    }

    let result = match cli.command {
        Command::Export(args) => run_export(args, &config),
        Command::Render(args) => run_render(args, &config),
        Command::Serve(args) => run_serve(args, &config).await,
    };

    if let Err(e) = result {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if env_bool("RELEASE_NOTES_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}

fn run_export(args: ExportArgs, config: &Config) -> Result<()> {
    let options = ExportOptions {
        branch: args.branch.unwrap_or_else(|| config.export.branch.clone()),
        num_commits: args.num_commits.unwrap_or(config.export.num_commits),
    };
    let output = args.output.unwrap_or_else(|| config.export.output.clone());
    let markdown_path = if args.no_markdown {
        None
    } else {
        args.markdown.or_else(|| config.export.markdown.clone())
    };
    let policy = config.releases.tag_policy;

    ui::display_status(&format!(
        "Extracting {} commits from branch '{}'...",
        options.num_commits, options.branch
    ));

    let repo = Git2Repository::open(&args.repo_path)
        .with_context(|| format!("Cannot open repository at {}", args.repo_path))?;
    let data = export::collect_release_data(&repo, &options)?;

    for warning in check_release_data(&data, policy) {
        ui::display_boundary_warning(&warning);
    }

    export::write_release_data(&output, &data)?;
    ui::display_success(&format!(
        "Exported {} commits to {}",
        data.commits.len(),
        output
    ));

    if let Some(path) = markdown_path {
        let content = markdown::generate_markdown_with_label(
            &data,
            policy,
            &config.releases.incoming_label,
            args.latest_release_only,
        );
        fs::write(&path, content).with_context(|| format!("Cannot write {}", path))?;
        ui::display_success(&format!("Generated markdown file: {}", path));
    }

    let groups = parse_releases_with_label(&data.commits, policy, &config.releases.incoming_label);
    ui::display_release_summary(&groups);
    Ok(())
}

fn run_render(args: RenderArgs, config: &Config) -> Result<()> {
    let input = args.input.unwrap_or_else(|| config.render.input.clone());
    let out_dir = PathBuf::from(args.out_dir.unwrap_or_else(|| config.render.out_dir.clone()));
    let policy = config.releases.tag_policy;

    let data = export::load_release_data(&input)?;
    let groups = parse_releases_with_label(&data.commits, policy, &config.releases.incoming_label);

    for warning in check_release_data(&data, policy) {
        ui::display_boundary_warning(&warning);
    }

    let mode = match (args.view, &args.release) {
        (Some(mode), _) => mode,
        (None, Some(_)) => ViewMode::Release,
        (None, None) => ViewMode::Commit,
    };
    let state = ViewState {
        mode,
        selected_release: args.release,
        filter: args.filter,
        query: args.search.unwrap_or_default(),
        theme: args.theme,
    };

    if let Some(label) = &state.selected_release {
        if !groups.iter().any(|g| &g.label == label) {
            ui::display_boundary_warning(&BoundaryWarning::ReleaseNotFound {
                label: label.clone(),
            });
        }
    }

    let written = render::write_site(&out_dir, &data, &groups, &state, args.copy_data)?;
    ui::display_success(&format!(
        "Rendered {} commits in {} releases to {}",
        data.commits.len(),
        groups.len(),
        out_dir.display()
    ));
    ui::display_written_files(&written);
    ui::display_release_summary(&groups);
    Ok(())
}

async fn run_serve(args: ServeArgs, config: &Config) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(root) = args.root {
        server_config.root = root;
    }
    if let Some(bind) = args.bind {
        server_config.bind = bind;
    }

    ui::display_status(&format!(
        "Serving {} at http://{}",
        server_config.root, server_config.bind
    ));
    server::serve(&server_config).await?;
    Ok(())
}
