use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::reservations::{ReservationsService, models::ReservationUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CancelArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Reservation UUID to cancel
    #[arg(long)]
    reservation: Uuid,
}

pub(crate) async fn run(args: CancelArgs) -> Result<(), String> {
    let context = super::connect(&args.database).await?;
    let output = execute(context.reservations.as_ref(), args.reservation.into()).await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn ReservationsService,
    reservation: ReservationUuid,
) -> Result<String, String> {
    let cancellation = service
        .cancel(reservation)
        .await
        .map_err(|error| format!("failed to cancel reservation {reservation}: {error}"))?;

    super::render(&cancellation)
}
