use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gamelog_client::{
    AuthResponse, CategorySummary, GameLogClient, GameLogClientError, GameStatus, ListPostsQuery,
    ListPostsResponse, Post, PostDetail, PostInput, Stats,
};

const TOKEN_FILE: &str = ".gamelog_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "gamelog-cli", version, about = "CLI for a gamelog server")]
struct Cli {
    /// Server address, e.g. `127.0.0.1:8080`.
    #[arg(long, global = true, env = "GAMELOG_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and store its token.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Game entries.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Platform and genre tags.
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Play diary.
    #[command(subcommand)]
    Log(LogCommand),
    /// Library statistics.
    Stats,
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// List posts, newest first.
    List {
        #[arg(long)]
        status: Option<GameStatus>,
        /// Text searched in title and notes.
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category: Option<i64>,
        /// First creation day, YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,
        /// Last creation day, YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,
    },
    /// Show a post with its play logs.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Create a post (requires token).
    Create(PostFields),
    /// Update a post (requires token).
    ///
    /// Fields that are not given keep their current value.
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: PostPatch,
    },
    /// Delete a post and its play logs (requires token).
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Args)]
struct PostFields {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    content: String,
    #[arg(long)]
    cover: Option<String>,
    #[arg(long, default_value_t = GameStatus::Unplayed)]
    status: GameStatus,
    /// Minutes played.
    #[arg(long, default_value_t = 0)]
    play_time: i64,
    #[arg(long, default_value_t = 0)]
    rating: i64,
    /// Comma-separated category ids.
    #[arg(long, value_delimiter = ',')]
    categories: Vec<i64>,
}

#[derive(Debug, Args)]
struct PostPatch {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long, conflicts_with = "clear_cover")]
    cover: Option<String>,
    #[arg(long)]
    clear_cover: bool,
    #[arg(long)]
    status: Option<GameStatus>,
    /// Minutes played.
    #[arg(long)]
    play_time: Option<i64>,
    #[arg(long)]
    rating: Option<i64>,
    /// Comma-separated category ids; replaces the whole set.
    #[arg(long, value_delimiter = ',')]
    categories: Option<Vec<i64>>,
}

#[derive(Debug, Subcommand)]
enum CategoriesCommand {
    /// List categories with post counts.
    List,
    /// Create a category (requires token).
    Create {
        #[arg(long)]
        name: String,
    },
    /// Rename a category (requires token).
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Delete a category; posts are kept (requires token).
    Delete {
        #[arg(long)]
        id: i64,
        /// Confirm deleting a category that still has posts.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum LogCommand {
    /// Add a diary entry to a post (requires token).
    Add {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()));
    let mut client = GameLogClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token().context("failed to read .gamelog_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register { email, password } => {
            let auth = client
                .register(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("failed to store token")?;
            print_auth("Registered", &auth);
        }
        Command::Login { email, password } => {
            let auth = client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("failed to store token")?;
            print_auth("Logged in", &auth);
        }
        Command::Logout => {
            client.clear_token();
            remove_token().context("failed to remove token")?;
            println!("Logged out");
        }
        Command::Posts(command) => run_posts(&client, command).await?,
        Command::Categories(command) => run_categories(&client, command).await?,
        Command::Log(LogCommand::Add { post_id, content }) => {
            let log = client
                .add_play_log(post_id, &content)
                .await
                .map_err(map_client_error)?;
            println!("Play log added: id={} post_id={}", log.id, log.post_id);
        }
        Command::Stats => {
            let stats = client.stats().await.map_err(map_client_error)?;
            print_stats(&stats);
        }
    }

    Ok(())
}

async fn run_posts(client: &GameLogClient, command: PostsCommand) -> Result<()> {
    match command {
        PostsCommand::List {
            status,
            q,
            category,
            from,
            to,
        } => {
            let query = ListPostsQuery {
                status,
                q,
                category_id: category,
                from,
                to,
            };
            let list = client.list_posts(&query).await.map_err(map_client_error)?;
            print_list(&list);
        }
        PostsCommand::Get { id } => {
            let detail = client.get_post(id).await.map_err(map_client_error)?;
            print_detail(&detail);
        }
        PostsCommand::Create(fields) => {
            let post = client
                .create_post(&fields.into_input())
                .await
                .map_err(map_client_error)?;
            print_post("Post created", &post);
        }
        PostsCommand::Update { id, fields } => {
            let current = client.get_post(id).await.map_err(map_client_error)?;
            let input = fields.apply(PostInput::from(&current.post));
            let post = client
                .update_post(id, &input)
                .await
                .map_err(map_client_error)?;
            print_post("Post updated", &post);
        }
        PostsCommand::Delete { id } => {
            let message = client.delete_post(id).await.map_err(map_client_error)?;
            println!("{message}");
        }
    }
    Ok(())
}

async fn run_categories(client: &GameLogClient, command: CategoriesCommand) -> Result<()> {
    match command {
        CategoriesCommand::List => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            print_categories(&categories);
        }
        CategoriesCommand::Create { name } => {
            let category = client
                .create_category(&name)
                .await
                .map_err(map_client_error)?;
            println!("Category created: [{}] {}", category.id, category.name);
        }
        CategoriesCommand::Rename { id, name } => {
            let category = client
                .rename_category(id, &name)
                .await
                .map_err(map_client_error)?;
            println!("Category renamed: [{}] {}", category.id, category.name);
        }
        CategoriesCommand::Delete { id, yes } => {
            let categories = client.list_categories().await.map_err(map_client_error)?;
            let Some(category) = categories.iter().find(|category| category.id == id) else {
                bail!("resource not found");
            };
            confirm_category_delete(category, yes)?;

            let message = client
                .delete_category(id)
                .await
                .map_err(map_client_error)?;
            println!("{message}");
        }
    }
    Ok(())
}

impl PostFields {
    fn into_input(self) -> PostInput {
        PostInput {
            title: self.title,
            content: self.content,
            cover_image_url: self.cover,
            status: self.status,
            play_time: self.play_time,
            rating: self.rating,
            category_ids: self.categories,
        }
    }
}

impl PostPatch {
    fn apply(self, mut input: PostInput) -> PostInput {
        if let Some(title) = self.title {
            input.title = title;
        }
        if let Some(content) = self.content {
            input.content = content;
        }
        if self.clear_cover {
            input.cover_image_url = None;
        } else if let Some(cover) = self.cover {
            input.cover_image_url = Some(cover);
        }
        if let Some(status) = self.status {
            input.status = status;
        }
        if let Some(play_time) = self.play_time {
            input.play_time = play_time;
        }
        if let Some(rating) = self.rating {
            input.rating = rating;
        }
        if let Some(categories) = self.categories {
            input.category_ids = categories;
        }
        input
    }
}

/// Deleting a category drops its links from every post, so a used category
/// needs an explicit `--yes`.
fn confirm_category_delete(category: &CategorySummary, yes: bool) -> Result<()> {
    if category.post_count > 0 && !yes {
        bail!(
            "category \"{}\" is attached to {} post(s); pass --yes to delete it",
            category.name,
            category.post_count
        );
    }
    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &GameLogClient) -> io::Result<()> {
    if let Some(token) = client.get_token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn remove_token() -> io::Result<()> {
    match fs::remove_file(TOKEN_FILE) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn map_client_error(err: GameLogClientError) -> anyhow::Error {
    let message = match err {
        GameLogClientError::Unauthorized => {
            "authorization required: run `gamelog-cli login ...` or `gamelog-cli register ...`"
                .to_string()
        }
        GameLogClientError::Forbidden(message) => format!("forbidden: {message}"),
        GameLogClientError::NotFound => "resource not found".to_string(),
        GameLogClientError::Conflict(message) => format!("conflict: {message}"),
        GameLogClientError::InvalidRequest(message) => format!("invalid request: {message}"),
        GameLogClientError::Server(message) => format!("server error: {message}"),
        GameLogClientError::Http(err) => format!("http error: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthResponse) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    println!("user:");
    println!("  id: {}", auth.user.id);
    println!("  email: {}", auth.user.email);
    println!("  created_at: {}", auth.user.created_at);
}

fn category_names(post: &Post) -> String {
    post.categories
        .iter()
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("status: {}", post.status);
    println!("play_time: {} min", post.play_time);
    println!("rating: {}/5", post.rating);
    println!("categories: {}", category_names(post));
    if let Some(cover) = &post.cover_image_url {
        println!("cover: {cover}");
    }
    println!("content: {}", post.content);
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_detail(detail: &PostDetail) {
    print_post("Post", &detail.post);
    println!("play_logs: {}", detail.play_logs.len());
    for log in &detail.play_logs {
        println!("- {} {}", log.created_at.format("%Y-%m-%d"), log.content);
    }
}

fn print_list(list: &ListPostsResponse) {
    println!("Posts: {}", list.total);

    for post in &list.posts {
        println!(
            "- [{}] {} ({}, {} min, {}/5) {}",
            post.id,
            post.title,
            post.status,
            post.play_time,
            post.rating,
            category_names(post)
        );
    }
}

fn print_categories(categories: &[CategorySummary]) {
    println!("Categories: {}", categories.len());
    for category in categories {
        println!(
            "- [{}] {} ({} posts)",
            category.id, category.name, category.post_count
        );
    }
}

fn print_stats(stats: &Stats) {
    println!("total: {}", stats.total);
    println!("unplayed: {}", stats.unplayed);
    println!("playing: {}", stats.playing);
    println!("completed: {}", stats.completed);
    println!("perfect: {}", stats.perfect);
    println!(
        "play time: {} h ({} min)",
        stats.total_play_hours, stats.total_play_minutes
    );
    println!("clear rate: {}%", stats.clear_rate);
    if stats.backlog_warning {
        println!("backlog warning: {} games still unplayed", stats.unplayed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(post_count: i64) -> CategorySummary {
        let now = "2026-01-01T00:00:00Z".parse().expect("valid timestamp");
        CategorySummary {
            id: 1,
            name: "RPG".to_string(),
            post_count,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8080".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        let token = parse_token_content("   ");
        assert!(token.is_none());
    }

    #[test]
    fn category_with_posts_needs_confirmation() {
        assert!(confirm_category_delete(&summary(3), false).is_err());
        assert!(confirm_category_delete(&summary(3), true).is_ok());
        assert!(confirm_category_delete(&summary(0), false).is_ok());
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let current = PostInput {
            title: "Hades".to_string(),
            content: "roguelike".to_string(),
            cover_image_url: Some("https://placehold.jp/h.png".to_string()),
            status: GameStatus::Playing,
            play_time: 300,
            rating: 4,
            category_ids: vec![1, 2],
        };
        let patch = PostPatch {
            title: None,
            content: None,
            cover: None,
            clear_cover: true,
            status: Some(GameStatus::Perfect),
            play_time: Some(5400),
            rating: None,
            categories: None,
        };

        let input = patch.apply(current);
        assert_eq!(input.title, "Hades");
        assert_eq!(input.status, GameStatus::Perfect);
        assert_eq!(input.play_time, 5400);
        assert_eq!(input.rating, 4);
        assert_eq!(input.category_ids, vec![1, 2]);
        assert!(input.cover_image_url.is_none());
    }

    #[test]
    fn cli_parses_nested_subcommands() {
        let cli = Cli::try_parse_from([
            "gamelog-cli",
            "posts",
            "create",
            "--title",
            "Celeste",
            "--status",
            "playing",
            "--categories",
            "1,2",
        ])
        .expect("valid arguments");

        match cli.command {
            Command::Posts(PostsCommand::Create(fields)) => {
                let input = fields.into_input();
                assert_eq!(input.status, GameStatus::Playing);
                assert_eq!(input.category_ids, vec![1, 2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
