use clap::{Parser, Subcommand};
use courtside_app::{
    config::{DatabaseConfig, LoggingConfig},
    context::AppContext,
    observability,
};
use serde::Serialize;

mod availability;
mod cancel;
mod db;
mod notifications;
mod quote;
mod reserve;
mod waitlist;

#[derive(Debug, Parser)]
#[command(name = "courtside", about = "Courtside booking CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Reserve(reserve::ReserveArgs),
    Cancel(cancel::CancelArgs),
    Quote(quote::QuoteArgs),
    Waitlist(waitlist::WaitlistCommand),
    Notifications(notifications::NotificationsCommand),
    Availability(availability::AvailabilityCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.logging).map_err(|error| error.to_string())?;

        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Reserve(args) => reserve::run(args).await,
            Commands::Cancel(args) => cancel::run(args).await,
            Commands::Quote(args) => quote::run(args).await,
            Commands::Waitlist(command) => waitlist::run(command).await,
            Commands::Notifications(command) => notifications::run(command).await,
            Commands::Availability(command) => availability::run(command).await,
        }
    }
}

pub(crate) async fn connect(config: &DatabaseConfig) -> Result<AppContext, String> {
    AppContext::connect(config)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

pub(crate) fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|error| format!("failed to render output: {error}"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use courtside::reservations::ReservationStatus;
    use courtside_app::domain::reservations::models::{NewReservation, Reservation};
    use jiff::{Timestamp, civil::time};
    use rust_decimal::Decimal;

    /// The confirmed reservation a successful booking of `request` would produce.
    pub(crate) fn confirmed(request: &NewReservation, total_price: Decimal) -> Reservation {
        Reservation {
            uuid: request.uuid,
            user: request.user,
            court: request.court,
            coach: request.coach,
            slot: Default::default(),
            date: request.date,
            start_time: request.start_time,
            end_time: time(19, 0, 0, 0),
            equipment: Vec::new(),
            total_price,
            status: ReservationStatus::Confirmed,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
