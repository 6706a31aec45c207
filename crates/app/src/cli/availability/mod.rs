use clap::{Args, Subcommand};

mod coach;
mod court;
mod equipment;
mod grid;

#[derive(Debug, Args)]
pub(crate) struct AvailabilityCommand {
    #[command(subcommand)]
    command: AvailabilitySubcommand,
}

#[derive(Debug, Subcommand)]
enum AvailabilitySubcommand {
    Court(court::CourtArgs),
    Coach(coach::CoachArgs),
    Equipment(equipment::EquipmentArgs),
    Grid(grid::GridArgs),
}

pub(crate) async fn run(command: AvailabilityCommand) -> Result<(), String> {
    match command.command {
        AvailabilitySubcommand::Court(args) => court::run(args).await,
        AvailabilitySubcommand::Coach(args) => coach::run(args).await,
        AvailabilitySubcommand::Equipment(args) => equipment::run(args).await,
        AvailabilitySubcommand::Grid(args) => grid::run(args).await,
    }
}
