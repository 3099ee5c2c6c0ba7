use anyhow::{Result, bail};
use auth::guard::{Access, LOGIN_PATH};
use clap::Parser;
use common::config::ClientConfig;
use common::models::RegisterRequest;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

use crate::cli::{AdminCommand, Cli, Command};
use web::likes::ToggleOutcome;
use web::views::{
    AdminView, CreatePostView, DashboardView, FeedView, FollowView, LoginView, PostDetailView,
    RegisterView, ViewState,
};
use web::{AppState, Route};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for command output
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    let state = AppState::from_config(&config)?;
    let session = state.session.initialize().await;
    debug!("Session at startup: {:?}", session.status());

    let route = cli.command.route();
    match route.resolve(&session) {
        Access::Allow => {}
        Access::Pending => bail!("Session is still loading"),
        Access::Redirect(LOGIN_PATH) => {
            bail!("Not logged in. Run `blog login <email> <password>` first.")
        }
        Access::Redirect(path) => bail!("{} is not available to you (redirected to {})", route, path),
    }

    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let next = LoginView::new(state.clone())
                .submit(&email, &password)
                .await
                .map_err(anyhow::Error::msg)?;
            info!("Logged in, landing on {}", next);
            println!("Logged in as {}", email);
            if next == Route::Admin {
                println!("Admin dashboard: blog admin users");
            }
        }
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            let request = RegisterRequest {
                email,
                password,
                name,
                phone,
            };
            RegisterView::new(state.clone())
                .submit(&request)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("Registered {}. You can now log in.", request.email);
        }
        Command::Logout => {
            state.session.logout();
            println!("Logged out");
        }
        Command::Whoami => match DashboardView::from_session(&state.session.current()) {
            Some(view) => print!("{}", view.render()),
            None => bail!("Not logged in"),
        },
        Command::Feed => {
            let mut view = FeedView::new(state.clone());
            view.load().await;
            print!("{}", view.render());
        }
        Command::Show { id } => {
            let mut view = PostDetailView::new(state.clone(), id);
            view.load().await;
            print!("{}", view.render());
        }
        Command::Create { title, content } => {
            let mut view = CreatePostView::new(state.clone());
            view.submit(&title, &content)
                .await
                .map_err(anyhow::Error::msg)?;
            if let Some(post) = view.created() {
                println!("Created post #{} {}", post.id, post.title);
            }
        }
        Command::Comment { id, content } => {
            let mut view = PostDetailView::new(state.clone(), id);
            view.submit_comment(&content)
                .await
                .map_err(anyhow::Error::msg)?;
            print!("{}", view.render());
        }
        Command::Like { id } => {
            let mut view = PostDetailView::new(state.clone(), id);
            if let ViewState::Failed(message) = view.load().await {
                bail!("{}", message);
            }
            match view.toggle_like().await {
                ToggleOutcome::Committed(likes) => {
                    let verb = if likes.liked { "Liked" } else { "Unliked" };
                    println!("{} post #{} ({})", verb, id, likes.label());
                }
                ToggleOutcome::RolledBack { state: likes, error } => {
                    state.report(&error);
                    bail!("Could not update like ({}): {}", likes.label(), error);
                }
                ToggleOutcome::Disabled => bail!("Log in to like posts"),
                ToggleOutcome::InFlight => bail!("A like request for this post is still pending"),
            }
        }
        Command::Delete { id } => {
            let mut view = PostDetailView::new(state.clone(), id);
            if let ViewState::Failed(message) = view.load().await {
                bail!("{}", message);
            }
            if !view.can_delete() {
                bail!("You can only delete your own posts");
            }
            view.delete().await.map_err(anyhow::Error::msg)?;
            println!("Deleted post #{}", id);
        }
        Command::Follow { user_id } => {
            FollowView::new(state.clone())
                .follow(user_id)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("Following user #{}", user_id);
        }
        Command::Unfollow { user_id } => {
            FollowView::new(state.clone())
                .unfollow(user_id)
                .await
                .map_err(anyhow::Error::msg)?;
            println!("Unfollowed user #{}", user_id);
        }
        Command::Admin(command) => run_admin(state, command).await?,
    }
    Ok(())
}

async fn run_admin(state: &AppState, command: AdminCommand) -> Result<()> {
    let mut view = AdminView::new(state.clone());
    view.load().await;

    match command {
        AdminCommand::Users => print!("{}", view.render_users()),
        AdminCommand::Posts => print!("{}", view.render_posts()),
        AdminCommand::DeleteUser { id } => {
            let user = view.delete_user(id).await.map_err(anyhow::Error::msg)?;
            println!("Deleted user #{} {}", user.id, user.email);
        }
        AdminCommand::DeletePost { id } => {
            view.delete_post(id).await.map_err(anyhow::Error::msg)?;
            println!("Deleted post #{}", id);
        }
    }
    Ok(())
}
