// hubseek binary entry point.
// One-shot driver: suggestions for a query, then the top hit's profile
// and most recently updated repositories.

use clap::Parser;

use hubseek::github::{Repository, UserProfile};
use hubseek::{HubseekError, Lookup, Result, SearchSession, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "hubseek")]
#[command(about = "Search GitHub users: suggestions, profiles, and top repositories")]
#[command(version)]
struct Args {
    /// Search query (a username or part of one)
    query: String,

    /// Only print suggestions, skip the profile and repositories
    #[arg(long)]
    suggestions_only: bool,

    /// How many repositories to show for the top hit
    #[arg(long, default_value_t = 10)]
    repos: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        match &e {
            HubseekError::RateLimited { reset_at } => {
                eprintln!("hubseek: GitHub rate limit exhausted, resets at {}", reset_at);
                eprintln!("hubseek: set GITHUB_TOKEN to raise the quota ceiling");
            }
            _ => eprintln!("hubseek: {}", e),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = SessionConfig {
        repos_per_fetch: args.repos,
        ..SessionConfig::default()
    };
    let session = SearchSession::from_env(config)?;

    let suggestions = match session.suggestions(&args.query).await? {
        Lookup::Hit(items) | Lookup::Fetched(items) => items,
        Lookup::Superseded => Vec::new(),
    };

    if suggestions.is_empty() {
        println!("no users matching {:?}", args.query);
        return Ok(());
    }

    println!("users matching {:?}:", args.query);
    for suggestion in &suggestions {
        println!(
            "  {:<24} {:<8} score {:.2}",
            suggestion.login,
            suggestion.user_type.label(),
            suggestion.score
        );
    }

    if args.suggestions_only {
        return Ok(());
    }

    let top = &suggestions[0];

    if let Some(profile) = session.user(&top.login).await?.value() {
        println!();
        print_profile(&profile);
    }

    if let Some(repos) = session.repos(&top.login).await?.value() {
        if !repos.is_empty() {
            println!();
            println!("recently updated repositories:");
            for repo in &repos {
                print_repo(repo);
            }
        }
    }

    let rate_limit = session.rate_limit();
    if rate_limit.remaining == 0 && rate_limit.limit > 0 {
        eprintln!("hubseek: warning: rate limit quota exhausted");
    }

    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!(
        "{} ({})",
        profile.login,
        profile.name.as_deref().unwrap_or("no display name")
    );
    if let Some(bio) = &profile.bio {
        println!("  {}", bio);
    }
    println!(
        "  {} followers / {} following / {} public repos",
        profile.followers, profile.following, profile.public_repos
    );
    println!("  joined {}", profile.created_at.format("%Y-%m-%d"));
    if let Some(company) = &profile.company {
        println!("  company: {}", company);
    }
    if let Some(location) = &profile.location {
        println!("  location: {}", location);
    }
    if let Some(blog) = &profile.blog {
        if !blog.is_empty() {
            println!("  blog: {}", blog);
        }
    }
}

fn print_repo(repo: &Repository) {
    println!(
        "  {:<32} ★ {:<6} {}",
        repo.name,
        repo.stargazers_count,
        repo.language.as_deref().unwrap_or("-")
    );
    if let Some(description) = &repo.description {
        println!("      {}", description);
    }
}
