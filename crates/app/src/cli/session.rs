use clap::{Args, Subcommand};
use printshop_app::{api::Session, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct SessionCommand {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionSubcommand {
    /// Show whether a session is stored
    Show,

    /// Store tokens issued by the storefront login
    Set(SetSessionArgs),

    /// Forget the stored tokens and user
    Clear,
}

#[derive(Debug, Args)]
pub(crate) struct SetSessionArgs {
    /// Bearer access token
    #[arg(long, env = "PRINTSHOP_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Refresh token used when the access token expires
    #[arg(long, env = "PRINTSHOP_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: Option<String>,
}

pub(crate) async fn run(command: SessionCommand, context: &mut AppContext) -> Result<(), String> {
    match command.command {
        SessionSubcommand::Show => {
            let auth = &context.state.auth;

            match (&auth.session, &auth.user) {
                (Some(_), Some(user)) => println!("signed in as {} <{}>", user.name, user.email),
                (Some(session), None) => println!(
                    "session stored ({} refresh token)",
                    if session.refresh_token.is_some() {
                        "with"
                    } else {
                        "without"
                    }
                ),
                (None, _) => println!("not signed in"),
            }

            Ok(())
        }
        SessionSubcommand::Set(args) => {
            if args.access_token.trim().is_empty() {
                return Err("access token cannot be empty".to_string());
            }

            context
                .client
                .set_session(Some(Session::new(args.access_token, args.refresh_token)))
                .await;

            println!("session stored");

            Ok(())
        }
        SessionSubcommand::Clear => {
            context.client.set_session(None).await;
            context.state.clear_session();

            println!("session cleared");

            Ok(())
        }
    }
}
