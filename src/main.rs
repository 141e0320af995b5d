use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use blogdesk::config::{ClientConfig, ConfigError, normalize_base_url};
use blogdesk::nav::{Route, RouteAccess, nav_links, route_access};
use blogdesk::net::types::{Post, PostDraft};
use blogdesk::net::{ApiError, BlogApi};
use blogdesk::notice::Notice;
use blogdesk::services::{auth, posts};
use blogdesk::state::{FileTokenStorage, Session, SessionStore};
use clap::{Args, Parser, Subcommand};

const EXCERPT_CHARS: usize = 100;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("--base-url must not be empty")]
    EmptyBaseUrl,
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
}

#[derive(Parser, Debug)]
#[command(name = "blogdesk", about = "Blog API client")]
struct Cli {
    #[arg(long, env = "BLOG_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "BLOG_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current session.
    Whoami,
    /// List the navigation links for the current session.
    Nav,
    /// Show what navigating to a path does for the current session.
    Open { path: String },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Posts(PostsCommand),
    /// Comment on a post.
    Comment {
        post_id: String,
        #[arg(long)]
        content: String,
    },
}

#[derive(Args, Debug)]
struct PostsCommand {
    #[command(subcommand)]
    command: PostsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PostsSubcommand {
    List,
    Show { post_id: String },
    Create(DraftArgs),
    Update {
        post_id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    Delete { post_id: String },
}

#[derive(Args, Debug)]
struct DraftArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    author: Option<String>,
    /// Creation date, `YYYY-MM-DD`.
    #[arg(long)]
    created_at: Option<String>,
}

impl From<DraftArgs> for PostDraft {
    fn from(args: DraftArgs) -> Self {
        Self { title: args.title, content: args.content, author: args.author, created_at: args.created_at }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(raw) = cli.base_url.as_deref() {
        config.base_url = normalize_base_url(raw).ok_or(CliError::EmptyBaseUrl)?;
    }
    if let Some(path) = cli.token_file {
        config.token_file = path;
    }

    let api = Arc::new(BlogApi::from_config(&config)?);
    let storage = Arc::new(FileTokenStorage::new(config.token_file.clone()));
    let store = SessionStore::new(api.clone(), storage);

    let outcome = store.resolve().await;
    tracing::debug!(?outcome, base_url = %config.base_url, "startup session resolution finished");

    let code = match cli.command {
        Command::Whoami => {
            println!("{}", describe(&store.current()));
            ExitCode::SUCCESS
        }
        Command::Nav => {
            for link in nav_links(&store.current()) {
                println!("{:<16} {}", link.label(), link.route().path());
            }
            ExitCode::SUCCESS
        }
        Command::Open { path } => open(&path, &store.current()),
        Command::Login { email, password } => {
            if let RouteAccess::Redirect(to) = route_access(&Route::Login, &store.current()) {
                println!("already logged in as {}; continue at {}", describe(&store.current()), to.path());
                ExitCode::SUCCESS
            } else {
                report(&auth::login(&*api, &store, &email, &password).await)
            }
        }
        Command::Logout => {
            let next = auth::logout(&store);
            println!("logged out; continue at {}", next.path());
            ExitCode::SUCCESS
        }
        Command::Posts(cmd) => run_posts(cmd.command, &api, &store).await,
        Command::Comment { post_id, content } => report(&posts::add_comment(&api, &store, &post_id, &content).await),
    };
    Ok(code)
}

async fn run_posts(cmd: PostsSubcommand, api: &BlogApi, store: &SessionStore) -> ExitCode {
    match cmd {
        PostsSubcommand::List => match posts::list_posts(api, store).await {
            Ok(list) if list.is_empty() => {
                println!("No posts yet.");
                ExitCode::SUCCESS
            }
            Ok(list) => {
                for post in &list {
                    print_summary(post);
                }
                ExitCode::SUCCESS
            }
            Err(notice) => report(&notice),
        },
        PostsSubcommand::Show { post_id } => match posts::show_post(api, store, &post_id).await {
            Ok(post) => {
                print_post(&post, &store.current());
                ExitCode::SUCCESS
            }
            Err(notice) => report(&notice),
        },
        PostsSubcommand::Create(draft) => report(&posts::create_post(api, store, &draft.into()).await),
        PostsSubcommand::Update { post_id, draft } => {
            report(&posts::update_post(api, store, &post_id, &draft.into()).await)
        }
        PostsSubcommand::Delete { post_id } => report(&posts::delete_post(api, store, &post_id).await),
    }
}

fn describe(session: &Session) -> String {
    match session.user_id() {
        Some(id) if session.is_admin() => format!("{id} (admin)"),
        Some(id) => id.to_owned(),
        None => "anonymous".to_owned(),
    }
}

fn open(path: &str, session: &Session) -> ExitCode {
    match route_access(&Route::parse(path), session) {
        RouteAccess::Render(route) => {
            println!("render {}", route.path());
            ExitCode::SUCCESS
        }
        RouteAccess::Redirect(route) => {
            println!("redirect {}", route.path());
            ExitCode::SUCCESS
        }
        RouteAccess::NotFound => {
            println!("not found: {path}");
            ExitCode::FAILURE
        }
    }
}

fn report(notice: &Notice) -> ExitCode {
    println!("{notice}");
    if notice.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn print_summary(post: &Post) {
    let date = post.created_at.as_deref().map_or("", |d| d.get(..10).unwrap_or(d));
    println!("{}  {}  by {}  {}", post.id, post.title, post.author_name(), date);
    println!("    {}", post.excerpt(EXCERPT_CHARS));
}

fn print_post(post: &Post, session: &Session) {
    println!("{}", post.title);
    println!("By: {}", post.author_name());
    if let Some(image) = &post.image {
        println!("Image: {image}");
    }
    println!();
    println!("{}", post.content);
    println!();
    println!("Comments");
    if post.comments.is_empty() {
        println!("  No comments yet.");
    }
    for comment in &post.comments {
        println!("  {}: {}", comment.commenter_name(), comment.content);
    }
    if blogdesk::nav::can_comment(session) {
        println!();
        println!("Add a comment with: blogdesk comment {} --content <text>", post.id);
    }
}
