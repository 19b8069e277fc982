use clap::{Args, Subcommand};
use printshop_app::{context::AppContext, state::Theme};

#[derive(Debug, Args)]
pub(crate) struct ThemeCommand {
    #[command(subcommand)]
    command: ThemeSubcommand,
}

#[derive(Debug, Subcommand)]
enum ThemeSubcommand {
    /// Print the current theme
    Show,

    /// Set the theme (light, dark)
    Set { theme: Theme },

    /// Switch between light and dark
    Toggle,
}

pub(crate) fn run(command: ThemeCommand, context: &mut AppContext) -> Result<(), String> {
    match command.command {
        ThemeSubcommand::Show => {}
        ThemeSubcommand::Set { theme } => context.state.theme = theme,
        ThemeSubcommand::Toggle => context.state.theme = context.state.theme.toggled(),
    }

    println!("{}", context.state.theme);

    Ok(())
}
