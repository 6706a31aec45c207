use clap::Args;
use courtside_app::{
    config::DatabaseConfig,
    domain::{availability::AvailabilityService, catalog::models::EquipmentUuid},
};
use jiff::civil::{Date, Time};
use rustc_hash::FxHashSet;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::cli;

#[derive(Debug, Args)]
pub(crate) struct EquipmentArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    /// Equipment UUID; repeat to ask for several units
    #[arg(long = "equipment", required = true)]
    equipment: Vec<Uuid>,

    /// Slot date (YYYY-MM-DD)
    #[arg(long)]
    date: Date,

    /// Slot start time (HH:MM)
    #[arg(long)]
    start: Time,
}

pub(crate) async fn run(args: EquipmentArgs) -> Result<(), String> {
    let context = cli::connect(&args.database).await?;

    let output = execute(
        context.availability.as_ref(),
        args.equipment.into_iter().map(Into::into).collect(),
        args.date,
        args.start,
    )
    .await?;

    println!("{output}");

    Ok(())
}

async fn execute(
    service: &dyn AvailabilityService,
    equipment: Vec<EquipmentUuid>,
    date: Date,
    start_time: Time,
) -> Result<String, String> {
    let mut distinct: Vec<EquipmentUuid> = equipment
        .iter()
        .copied()
        .collect::<FxHashSet<_>>()
        .into_iter()
        .collect();
    distinct.sort_unstable();

    let free = service
        .is_equipment_free(equipment, date, start_time)
        .await
        .map_err(|error| format!("failed to check equipment availability: {error}"))?;

    let mut remaining = Vec::with_capacity(distinct.len());

    for uuid in distinct {
        let units = service
            .equipment_remaining(uuid, date, start_time)
            .await
            .map_err(|error| format!("failed to count remaining units of {uuid}: {error}"))?;

        remaining.push(json!({ "equipment": uuid, "remaining": units }));
    }

    cli::render(&json!({
        "date": date,
        "start_time": start_time,
        "free": free,
        "remaining": Value::Array(remaining),
    }))
}
