use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amicooked::auth::CredentialStore;
use amicooked::models::{
    Credentials, ImageAttachment, NewComment, NewPost, Post, SortMode, VoteAxis,
};
use amicooked::services::feed;
use amicooked::services::thread::ThreadTree;
use amicooked::{ApiClient, Config};

const MAX_PREVIEW_LENGTH: usize = 280;

#[derive(Parser)]
#[command(name = "amicooked", about = "Anonymous situations board", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the top-level feed
    Feed {
        #[arg(short, long, default_value = "newest", value_parser = parse_sort_mode)]
        sort: SortMode,
    },
    /// Show one thread with its replies and comments
    Thread { id: i64 },
    /// Create a new top-level post
    Post {
        text: String,
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Reply to an existing post
    Reply {
        id: i64,
        text: String,
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Vote on a post (cooked | gmi)
    Vote {
        id: i64,
        #[arg(value_parser = parse_vote_axis)]
        axis: VoteAxis,
    },
    /// List comments on a post
    Comments { id: i64 },
    /// Comment on a post
    Comment { id: i64, text: String },
    /// Sign in and print the session's stable pseudonym and token
    Login { email: String, password: String },
}

fn parse_sort_mode(s: &str) -> Result<SortMode, String> {
    s.parse()
}

fn parse_vote_axis(s: &str) -> Result<VoteAxis, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amicooked=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Feed { sort } => {
            let client = ApiClient::new(&config)?;
            let posts = client.list_posts().await?;
            let top_level: Vec<Post> = posts.into_iter().filter(Post::is_top_level).collect();
            let sorted = feed::sort_posts(&top_level, sort, chrono::Utc::now());
            if sorted.is_empty() {
                println!("No posts yet. Be the first to share something!");
            }
            for post in &sorted {
                print_post(post, 0);
            }
        }
        Command::Thread { id } => {
            let client = ApiClient::new(&config)?;
            let posts = client.list_posts().await?;
            let tree = ThreadTree::build(&posts);
            let Some(walk) = tree.walk_from(id) else {
                return Err(amicooked::AppError::NotFound(format!("post {}", id)).into());
            };
            for node in walk {
                print_post(node.post, node.depth);
                for comment in &node.post.comments {
                    println!(
                        "{}  > {} · {}",
                        "  ".repeat(node.depth),
                        comment.code,
                        preview(&comment.text)
                    );
                }
                if !tree.can_reply(node.post.id) {
                    println!("{}  (reply limit reached)", "  ".repeat(node.depth));
                }
            }
        }
        Command::Post { text, image } => {
            let client = ApiClient::new(&config)?;
            let post = client
                .create_post(NewPost {
                    text,
                    image: image.map(ImageAttachment::from_path).transpose()?,
                    reply_to: None,
                })
                .await?;
            println!("Posted #{} as {}", post.id, post.code);
        }
        Command::Reply { id, text, image } => {
            let client = ApiClient::new(&config)?;
            // Refuse at the cap before anything is sent.
            let posts = client.list_posts().await?;
            let tree = ThreadTree::build(&posts);
            if !tree.can_reply(id) {
                return Err(
                    amicooked::AppError::BadRequest("Reply depth limit reached".to_string()).into(),
                );
            }
            let post = client
                .create_post(NewPost {
                    text,
                    image: image.map(ImageAttachment::from_path).transpose()?,
                    reply_to: Some(id),
                })
                .await?;
            println!("Replied to #{} with #{} as {}", id, post.id, post.code);
        }
        Command::Vote { id, axis } => {
            let client = ApiClient::new(&config)?;
            let tally = client.vote(id, axis).await?;
            println!(
                "#{} now at cooked {} / wagmi {}",
                id, tally.cooked, tally.going_to_make_it
            );
        }
        Command::Comments { id } => {
            let client = ApiClient::new(&config)?;
            let comments = client.list_comments(id).await?;
            if comments.is_empty() {
                println!("No comments on #{} yet.", id);
            }
            for comment in &comments {
                println!(
                    "{} · {} · {}",
                    comment.code,
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    preview(&comment.text)
                );
            }
        }
        Command::Comment { id, text } => {
            let client = ApiClient::new(&config)?;
            let comment = client.add_comment(id, NewComment { text }).await?;
            println!("Commented on #{} as {}", id, comment.code);
        }
        Command::Login { email, password } => {
            let store = CredentialStore::with_demo_user(config.jwt_secret.clone());
            let session = store.sign_in(&Credentials { email, password })?;
            println!("Signed in as {}", session.user.anonymous_name);
            println!("token: {}", session.token);
        }
    }

    Ok(())
}

fn print_post(post: &Post, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{}{} · #{} · {} · cooked {} / wagmi {} · {} comments",
        indent,
        post.code,
        post.id,
        post.created_at.format("%Y-%m-%d %H:%M"),
        post.votes.cooked,
        post.votes.going_to_make_it,
        post.comments.len()
    );
    println!("{}{}", indent, preview(&post.text));
    if let Some(image_path) = &post.image_path {
        println!("{}[image: {}]", indent, image_path);
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > MAX_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(MAX_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
