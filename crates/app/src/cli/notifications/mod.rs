use clap::{Args, Subcommand};

mod list;
mod read;
mod sweep;
mod unread;

#[derive(Debug, Args)]
pub(crate) struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NotificationsSubcommand {
    List(list::ListNotificationsArgs),
    Unread(unread::UnreadArgs),
    Read(read::MarkReadArgs),
    Sweep(sweep::SweepArgs),
}

pub(crate) async fn run(command: NotificationsCommand) -> Result<(), String> {
    match command.command {
        NotificationsSubcommand::List(args) => list::run(args).await,
        NotificationsSubcommand::Unread(args) => unread::run(args).await,
        NotificationsSubcommand::Read(args) => read::run(args).await,
        NotificationsSubcommand::Sweep(args) => sweep::run(args).await,
    }
}
