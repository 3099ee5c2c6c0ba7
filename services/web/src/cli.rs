//! Command line arguments of the `blog` binary

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::models::{PostId, UserId};

use web::Route;

#[derive(Parser, Debug)]
#[command(name = "blog", about = "Terminal client for the blog API")]
pub struct Cli {
    /// Base URL of the API (overrides BLOG_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the credential
    Login { email: String, password: String },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the signed-in user's profile
    Whoami,
    /// List recent posts
    Feed,
    /// Show a post with its comments
    Show { id: PostId },
    /// Publish a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Comment on a post
    Comment { id: PostId, content: String },
    /// Like a post, or unlike it if already liked
    Like { id: PostId },
    /// Delete a post
    Delete { id: PostId },
    Follow { user_id: UserId },
    Unfollow { user_id: UserId },
    /// Admin dashboard
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// List every user
    Users,
    /// List every post
    Posts,
    DeleteUser { id: UserId },
    DeletePost { id: PostId },
}

impl Command {
    /// Screen whose guard applies to this command
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::Whoami => Route::Dashboard,
            Command::Feed | Command::Follow { .. } | Command::Unfollow { .. } => Route::Feed,
            Command::Create { .. } => Route::CreatePost,
            Command::Show { id }
            | Command::Comment { id, .. }
            | Command::Like { id }
            | Command::Delete { id } => Route::Post(*id),
            Command::Admin(_) => Route::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_admin_command() {
        let cli = Cli::try_parse_from(["blog", "--api-url", "http://api", "admin", "delete-user", "4"])
            .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://api"));
        assert!(matches!(cli.command, Command::Admin(AdminCommand::DeleteUser { id: 4 })));
        assert_eq!(cli.command.route(), Route::Admin);
    }

    #[test]
    fn post_commands_guard_the_post_route() {
        let cli = Cli::try_parse_from(["blog", "like", "9"]).unwrap();
        assert_eq!(cli.command.route(), Route::Post(9));
    }
}
