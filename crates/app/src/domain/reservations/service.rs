//! Reservations service.
//!
//! Every booking transaction acquires row locks in one global order: court, slot, coach, then
//! equipment by ascending identity, before the reservation row is written. Cancellation locks
//! the slot before the reservation.

use async_trait::async_trait;
use courtside::{
    inventory::{EquipmentDemand, can_hold},
    notifications::offer_expires_at,
    pricing::{PricingRule, compute_breakdown},
    reservations::ReservationStatus,
    slots::slot_end,
};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::{
        Resource,
        availability::repository::PgAvailabilityRepository,
        catalog::repository::PgCatalogRepository,
        notifications::offers::{OfferWindow, SlotOffers},
        reservations::{
            errors::ReservationsServiceError,
            models::{
                Cancellation, EquipmentHolding, NewReservation, PriceQuote, QuoteRequest,
                Reservation, ReservationSummary, ReservationUuid,
            },
            repository::{PgReservationsRepository, ReservationRow},
        },
        slots::repository::PgSlotsRepository,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgReservationsService {
    db: Db,
    catalog: PgCatalogRepository,
    slots: PgSlotsRepository,
    availability: PgAvailabilityRepository,
    offers: SlotOffers,
    repository: PgReservationsRepository,
}

impl PgReservationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            catalog: PgCatalogRepository::new(),
            slots: PgSlotsRepository::new(),
            availability: PgAvailabilityRepository::new(),
            offers: SlotOffers::new(),
            repository: PgReservationsRepository::new(),
        }
    }

    /// Active rule snapshot, or the built-in defaults when none is configured.
    async fn pricing_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<PricingRule, sqlx::Error> {
        match self.catalog.get_active_pricing_rule(tx).await? {
            Some(record) => Ok(record.rule),
            None => {
                debug!("no active pricing rule; using defaults");

                Ok(PricingRule::default())
            }
        }
    }
}

#[async_trait]
impl ReservationsService for PgReservationsService {
    #[tracing::instrument(
        name = "reservations.service.reserve",
        skip(self, reservation),
        fields(
            reservation = %reservation.uuid,
            user = %reservation.user,
            court = %reservation.court,
            date = %reservation.date,
            start_time = %reservation.start_time,
            coach = tracing::field::Empty,
            equipment_units = reservation.equipment.len()
        ),
        err
    )]
    async fn reserve(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, ReservationsServiceError> {
        let NewReservation {
            uuid,
            user,
            court,
            date,
            start_time,
            equipment,
            coach,
        } = reservation;

        if let Some(coach) = coach {
            tracing::Span::current().record("coach", tracing::field::display(coach));
        }

        let end_time = slot_end(start_time)?;
        let demand = EquipmentDemand::tally(equipment);

        let mut tx = self.db.begin_transaction().await?;

        let court = self
            .catalog
            .lock_court(&mut tx, court)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(Resource::Court))?;

        if !court.is_active {
            return Err(ReservationsServiceError::InactiveResource(Resource::Court));
        }

        let slot = self
            .slots
            .resolve_slot(&mut tx, court.uuid, date, start_time, end_time)
            .await?;
        let slot = self.slots.lock_slot(&mut tx, slot.uuid).await?;

        if slot.is_booked {
            return Err(ReservationsServiceError::SlotAlreadyBooked);
        }

        let coach_rate = match coach {
            Some(coach) => {
                let coach = self
                    .catalog
                    .lock_coach(&mut tx, coach)
                    .await?
                    .ok_or(ReservationsServiceError::ResourceNotFound(Resource::Coach))?;

                let booked = self
                    .availability
                    .coach_has_confirmed(&mut tx, coach.uuid, date, start_time)
                    .await?;

                if booked || !coach.availability.permits(date, start_time) {
                    return Err(ReservationsServiceError::CoachUnavailable);
                }

                Some(coach.hourly_rate)
            }
            None => None,
        };

        let mut equipment_rates = Vec::new();

        for (equipment, wanted) in demand.iter() {
            let item = self
                .catalog
                .lock_equipment(&mut tx, equipment)
                .await?
                .ok_or(ReservationsServiceError::EquipmentUnavailable(equipment))?;

            let held = self
                .availability
                .units_held(&mut tx, equipment, date, start_time)
                .await?;

            if !can_hold(item.stock, held, wanted) {
                debug!(%equipment, stock = item.stock, held, wanted, "equipment exhausted");

                return Err(ReservationsServiceError::EquipmentUnavailable(equipment));
            }

            equipment_rates.extend((0..wanted).map(|_| item.hourly_rate));
        }

        let rule = self.pricing_rule(&mut tx).await?;
        let breakdown = compute_breakdown(
            &rule,
            court.kind,
            date,
            start_time,
            &equipment_rates,
            coach_rate,
        );

        let holdings = demand
            .iter()
            .map(|(equipment, quantity)| EquipmentHolding {
                equipment,
                quantity,
            })
            .collect();

        let created = self
            .repository
            .create_reservation(
                &mut tx,
                ReservationRow {
                    uuid,
                    user,
                    court: court.uuid,
                    coach,
                    slot: slot.uuid,
                    total_price: breakdown.total,
                },
                holdings,
            )
            .await?;

        self.slots.set_booked(&mut tx, slot.uuid, true).await?;

        tx.commit().await?;

        info!(
            slot = %created.slot,
            total_price = %created.total_price,
            rule = %rule.name,
            "reservation confirmed"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "reservations.service.cancel",
        skip(self),
        fields(reservation = %reservation, promoted = tracing::field::Empty),
        err
    )]
    async fn cancel(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Cancellation, ReservationsServiceError> {
        let point_in_time = Timestamp::now();
        let window = OfferWindow {
            created_at: point_in_time,
            expires_at: offer_expires_at(point_in_time)?,
        };

        let mut tx = self.db.begin_transaction().await?;

        let slot = self
            .repository
            .get_reservation(&mut tx, reservation)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(
                Resource::Reservation,
            ))?
            .slot;

        let slot = self.slots.lock_slot(&mut tx, slot).await?;

        let mut current = self
            .repository
            .lock_reservation(&mut tx, reservation)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(
                Resource::Reservation,
            ))?;

        match current.status {
            ReservationStatus::Confirmed => {}
            ReservationStatus::Cancelled => {
                tx.commit().await?;

                debug!("reservation already cancelled");

                return Ok(Cancellation {
                    reservation: current,
                    notification: None,
                });
            }
            status @ ReservationStatus::Completed => {
                return Err(ReservationsServiceError::NotCancellable(status));
            }
        }

        let slot = self.slots.set_booked(&mut tx, slot.uuid, false).await?;

        current.updated_at = self
            .repository
            .set_status(&mut tx, current.uuid, ReservationStatus::Cancelled)
            .await?;
        current.status = ReservationStatus::Cancelled;

        let court = self
            .catalog
            .get_court(&mut tx, slot.court)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(Resource::Court))?;

        let notification = self
            .offers
            .offer_to_head(&mut tx, &slot, &court.name, window)
            .await?;

        tx.commit().await?;

        tracing::Span::current().record("promoted", notification.is_some());

        info!(slot = %slot.uuid, "reservation cancelled");

        Ok(Cancellation {
            reservation: current,
            notification,
        })
    }

    #[tracing::instrument(
        name = "reservations.service.quote",
        skip(self, request),
        fields(court = %request.court, date = %request.date, start_time = %request.start_time),
        err
    )]
    async fn quote(&self, request: QuoteRequest) -> Result<PriceQuote, ReservationsServiceError> {
        slot_end(request.start_time)?;

        let demand = EquipmentDemand::tally(request.equipment);

        let mut tx = self.db.begin_transaction().await?;

        let court = self
            .catalog
            .get_court(&mut tx, request.court)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(Resource::Court))?;

        let keys: Vec<_> = demand.keys().collect();
        let rates: FxHashMap<_, Decimal> = self
            .catalog
            .find_equipment(&mut tx, &keys)
            .await?
            .into_iter()
            .map(|item| (item.uuid, item.hourly_rate))
            .collect();

        let mut equipment_rates = Vec::new();

        for (equipment, units) in demand.iter() {
            match rates.get(&equipment) {
                Some(rate) => equipment_rates.extend((0..units).map(|_| *rate)),
                None => warn!(%equipment, "quoted equipment does not exist; not charged"),
            }
        }

        let coach_rate = match request.coach {
            Some(coach) => {
                let found = self.catalog.get_coach(&mut tx, coach).await?;

                if found.is_none() {
                    warn!(%coach, "quoted coach does not exist; not charged");
                }

                found.map(|coach| coach.hourly_rate)
            }
            None => None,
        };

        let rule = self.pricing_rule(&mut tx).await?;

        tx.commit().await?;

        let breakdown = compute_breakdown(
            &rule,
            court.kind,
            request.date,
            request.start_time,
            &equipment_rates,
            coach_rate,
        );

        Ok(PriceQuote {
            court: court.uuid,
            date: request.date,
            start_time: request.start_time,
            rule_name: rule.name,
            breakdown,
        })
    }

    async fn get_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Reservation, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let reservation = self
            .repository
            .get_reservation(&mut tx, reservation)
            .await?
            .ok_or(ReservationsServiceError::ResourceNotFound(
                Resource::Reservation,
            ))?;

        tx.commit().await?;

        Ok(reservation)
    }

    async fn list_reservations(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let reservations = self.repository.list_user_reservations(&mut tx, user).await?;

        tx.commit().await?;

        Ok(reservations)
    }

    async fn summary(&self, user: UserUuid) -> Result<ReservationSummary, ReservationsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let summary = self
            .repository
            .summarize_user_reservations(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait ReservationsService: Send + Sync {
    /// Books a court slot with optional coach and equipment in one all-or-nothing transaction.
    ///
    /// The price is computed from the active pricing rule and frozen on the reservation.
    async fn reserve(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, ReservationsServiceError>;

    /// Cancels a confirmed reservation, frees its slot and offers the slot to the head of the
    /// waitlist. Cancelling an already cancelled reservation returns it unchanged.
    async fn cancel(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Cancellation, ReservationsServiceError>;

    /// Prices a prospective booking without reserving anything.
    async fn quote(&self, request: QuoteRequest) -> Result<PriceQuote, ReservationsServiceError>;

    /// Retrieve a single reservation.
    async fn get_reservation(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Reservation, ReservationsServiceError>;

    /// The user's reservations, newest first.
    async fn list_reservations(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Reservation>, ReservationsServiceError>;

    /// The user's confirmed count and total spend.
    async fn summary(&self, user: UserUuid) -> Result<ReservationSummary, ReservationsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use courtside::{courts::CourtKind, notifications::NotificationKind, pricing::PricingRule};
    use jiff::civil::{date, time};
    use sqlx::query;
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::{
            availability::AvailabilityService,
            catalog::{
                CatalogService,
                models::{
                    CoachUuid, CourtUuid, EquipmentUuid, NewCourt, NewEquipment, NewPricingRule,
                    PricingRuleUuid,
                },
            },
            notifications::NotificationsService,
            slots::SlotsService,
            waitlist::{
                WaitlistService,
                models::{NewWaitlistEntry, WaitlistEntryUuid},
            },
        },
        test::{TestContext, helpers::new_reservation},
    };

    use super::*;

    fn money(minor: i64) -> Decimal {
        Decimal::new(minor, 2)
    }

    #[tokio::test]
    async fn booking_waitlist_and_cancellation_scenario() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(18, 0, 0, 0);
        let (first, second) = (UserUuid::new(), UserUuid::new());

        let booked = ctx
            .reservations
            .reserve(new_reservation(first, ctx.indoor_court, day, start))
            .await?;

        assert_eq!(booked.status, ReservationStatus::Confirmed);
        assert_eq!(booked.total_price, money(1050_00));
        assert!(ctx.slots.get_slot(booked.slot).await?.is_booked);

        let result = ctx
            .reservations
            .reserve(new_reservation(second, ctx.indoor_court, day, start))
            .await;

        assert!(
            matches!(result, Err(ReservationsServiceError::SlotAlreadyBooked)),
            "expected SlotAlreadyBooked, got {result:?}"
        );

        let entry = ctx
            .waitlist
            .join(NewWaitlistEntry {
                uuid: WaitlistEntryUuid::new(),
                user: second,
                court: ctx.indoor_court,
                date: day,
                start_time: start,
            })
            .await?;

        assert_eq!(entry.position, 1);

        let cancellation = ctx.reservations.cancel(booked.uuid).await?;
        let offer = cancellation.notification.ok_or("expected a waitlist offer")?;

        assert_eq!(
            cancellation.reservation.status,
            ReservationStatus::Cancelled
        );
        assert!(!ctx.slots.get_slot(booked.slot).await?.is_booked);
        assert_eq!(offer.user, second);
        assert_eq!(offer.slot, booked.slot);
        assert_eq!(offer.kind, NotificationKind::SlotAvailable);

        let inbox = ctx.notifications.list(second, Timestamp::now()).await?;

        assert!(inbox.iter().any(|notification| notification.uuid == offer.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_reservations_admit_exactly_one() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(19, 0, 0, 0);

        let mut attempts = JoinSet::new();

        for _ in 0..8 {
            let reservations = ctx.reservations.clone();
            let court = ctx.indoor_court;

            attempts.spawn(async move {
                reservations
                    .reserve(new_reservation(UserUuid::new(), court, day, start))
                    .await
            });
        }

        let mut confirmed = 0;
        let mut rejected = 0;

        while let Some(joined) = attempts.join_next().await {
            match joined? {
                Ok(_) => confirmed += 1,
                Err(ReservationsServiceError::SlotAlreadyBooked) => rejected += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(confirmed, 1);
        assert_eq!(rejected, 7);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_bookings_of_one_coach_admit_exactly_one() -> TestResult {
        let ctx = TestContext::new().await;
        let tuesday = date(2025, 12, 16);
        let start = time(17, 0, 0, 0);

        let mut attempts = JoinSet::new();

        for court in [ctx.indoor_court, ctx.outdoor_court] {
            let reservations = ctx.reservations.clone();
            let mut booking = new_reservation(UserUuid::new(), court, tuesday, start);
            booking.coach = Some(ctx.coach);

            attempts.spawn(async move { reservations.reserve(booking).await });
        }

        let mut confirmed = 0;
        let mut rejected = 0;

        while let Some(joined) = attempts.join_next().await {
            match joined? {
                Ok(_) => confirmed += 1,
                Err(ReservationsServiceError::CoachUnavailable) => rejected += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(confirmed, 1);
        assert_eq!(rejected, 1);
        assert!(
            !ctx.availability
                .is_coach_free(ctx.coach, tuesday, start)
                .await?,
            "the winning booking holds the coach"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_bookings_cannot_oversell_the_last_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(15, 0, 0, 0);

        let ball_machine = EquipmentUuid::new();
        ctx.catalog
            .create_equipment(NewEquipment {
                uuid: ball_machine,
                name: "Ball Machine".to_string(),
                category: "Training".to_string(),
                stock: 1,
                hourly_rate: money(200_00),
            })
            .await?;

        let mut courts = vec![ctx.indoor_court, ctx.outdoor_court];

        for number in 0..4 {
            let court = CourtUuid::new();
            ctx.catalog
                .create_court(NewCourt {
                    uuid: court,
                    name: format!("Court {}", number + 3),
                    kind: CourtKind::Outdoor,
                    is_active: true,
                })
                .await?;
            courts.push(court);
        }

        let mut attempts = JoinSet::new();

        for court in courts.iter().copied() {
            let reservations = ctx.reservations.clone();
            let mut booking = new_reservation(UserUuid::new(), court, day, start);
            booking.equipment = vec![ball_machine];

            attempts.spawn(async move { reservations.reserve(booking).await });
        }

        let mut confirmed = 0;
        let mut rejected = 0;

        while let Some(joined) = attempts.join_next().await {
            match joined? {
                Ok(_) => confirmed += 1,
                Err(ReservationsServiceError::EquipmentUnavailable(uuid)) if uuid == ball_machine => {
                    rejected += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(confirmed, 1);
        assert_eq!(rejected, courts.len() - 1);
        assert_eq!(
            ctx.availability
                .equipment_remaining(ball_machine, day, start)
                .await?,
            0
        );

        Ok(())
    }

    #[tokio::test]
    async fn reused_reservation_uuid_is_not_reported_as_a_taken_slot() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);

        let first = new_reservation(UserUuid::new(), ctx.outdoor_court, day, time(10, 0, 0, 0));
        let uuid = first.uuid;
        ctx.reservations.reserve(first).await?;

        let mut second = new_reservation(UserUuid::new(), ctx.indoor_court, day, time(11, 0, 0, 0));
        second.uuid = uuid;

        let result = ctx.reservations.reserve(second).await;

        assert!(
            matches!(result, Err(ReservationsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
        assert!(
            ctx.availability
                .is_court_free(ctx.indoor_court, day, time(11, 0, 0, 0))
                .await?,
            "the rejected booking must leave the slot free"
        );

        Ok(())
    }

    #[tokio::test]
    async fn equipment_units_are_conserved() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(10, 0, 0, 0);

        let mut indoor = new_reservation(UserUuid::new(), ctx.indoor_court, day, start);
        indoor.equipment = vec![ctx.racket];
        let indoor = ctx.reservations.reserve(indoor).await?;

        let mut greedy = new_reservation(UserUuid::new(), ctx.outdoor_court, day, start);
        greedy.equipment = vec![ctx.racket, ctx.racket];
        let result = ctx.reservations.reserve(greedy).await;

        assert!(
            matches!(result, Err(ReservationsServiceError::EquipmentUnavailable(uuid)) if uuid == ctx.racket),
            "expected EquipmentUnavailable, got {result:?}"
        );
        assert!(
            ctx.availability
                .is_court_free(ctx.outdoor_court, day, start)
                .await?,
            "failed booking must not leave the slot flagged"
        );

        let mut outdoor = new_reservation(UserUuid::new(), ctx.outdoor_court, day, start);
        outdoor.equipment = vec![ctx.racket];
        ctx.reservations.reserve(outdoor).await?;

        assert_eq!(
            ctx.availability
                .equipment_remaining(ctx.racket, day, start)
                .await?,
            0
        );

        ctx.reservations.cancel(indoor.uuid).await?;

        assert_eq!(
            ctx.availability
                .equipment_remaining(ctx.racket, day, start)
                .await?,
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_twice_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(11, 0, 0, 0);

        let mut booking = new_reservation(UserUuid::new(), ctx.indoor_court, day, start);
        booking.equipment = vec![ctx.racket, ctx.racket];
        let booked = ctx.reservations.reserve(booking).await?;

        let first = ctx.reservations.cancel(booked.uuid).await?;
        let second = ctx.reservations.cancel(booked.uuid).await?;

        assert_eq!(first.reservation.status, ReservationStatus::Cancelled);
        assert_eq!(second.reservation.status, ReservationStatus::Cancelled);
        assert!(second.notification.is_none());
        assert_eq!(
            ctx.availability
                .equipment_remaining(ctx.racket, day, start)
                .await?,
            2
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_unknown_reservation_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.reservations.cancel(ReservationUuid::new()).await;

        assert!(
            matches!(
                result,
                Err(ReservationsServiceError::ResourceNotFound(
                    Resource::Reservation
                ))
            ),
            "expected ResourceNotFound(Reservation), got {result:?}"
        );
    }

    #[tokio::test]
    async fn completed_reservation_cannot_be_cancelled() -> TestResult {
        let ctx = TestContext::new().await;

        let booked = ctx
            .reservations
            .reserve(new_reservation(
                UserUuid::new(),
                ctx.indoor_court,
                date(2025, 12, 16),
                time(12, 0, 0, 0),
            ))
            .await?;

        query("UPDATE reservations SET status = 'COMPLETED' WHERE uuid = $1")
            .bind(booked.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx.reservations.cancel(booked.uuid).await;

        assert!(
            matches!(
                result,
                Err(ReservationsServiceError::NotCancellable(
                    ReservationStatus::Completed
                ))
            ),
            "expected NotCancellable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn inactive_and_unknown_courts_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 16);
        let start = time(9, 0, 0, 0);

        ctx.catalog
            .set_court_active(ctx.outdoor_court, false)
            .await?;

        let inactive = ctx
            .reservations
            .reserve(new_reservation(UserUuid::new(), ctx.outdoor_court, day, start))
            .await;
        let unknown = ctx
            .reservations
            .reserve(new_reservation(UserUuid::new(), CourtUuid::new(), day, start))
            .await;

        assert!(
            matches!(
                inactive,
                Err(ReservationsServiceError::InactiveResource(Resource::Court))
            ),
            "expected InactiveResource(Court), got {inactive:?}"
        );
        assert!(
            matches!(
                unknown,
                Err(ReservationsServiceError::ResourceNotFound(Resource::Court))
            ),
            "expected ResourceNotFound(Court), got {unknown:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn start_in_last_hour_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .reservations
            .reserve(new_reservation(
                UserUuid::new(),
                ctx.indoor_court,
                date(2025, 12, 16),
                time(23, 0, 0, 0),
            ))
            .await;

        assert!(
            matches!(result, Err(ReservationsServiceError::InvalidSlot(_))),
            "expected InvalidSlot, got {result:?}"
        );
    }

    #[tokio::test]
    async fn coach_must_be_listed_and_unbooked() -> TestResult {
        let ctx = TestContext::new().await;
        let tuesday = date(2025, 12, 16);

        let mut unlisted = new_reservation(
            UserUuid::new(),
            ctx.indoor_court,
            tuesday,
            time(12, 0, 0, 0),
        );
        unlisted.coach = Some(ctx.coach);

        let result = ctx.reservations.reserve(unlisted).await;

        assert!(
            matches!(result, Err(ReservationsServiceError::CoachUnavailable)),
            "expected CoachUnavailable, got {result:?}"
        );

        let mut first = new_reservation(
            UserUuid::new(),
            ctx.indoor_court,
            tuesday,
            time(18, 0, 0, 0),
        );
        first.coach = Some(ctx.coach);
        ctx.reservations.reserve(first).await?;

        let mut double = new_reservation(
            UserUuid::new(),
            ctx.outdoor_court,
            tuesday,
            time(18, 0, 0, 0),
        );
        double.coach = Some(ctx.coach);

        let result = ctx.reservations.reserve(double).await;

        assert!(
            matches!(result, Err(ReservationsServiceError::CoachUnavailable)),
            "expected CoachUnavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_coach_fails_the_booking() {
        let ctx = TestContext::new().await;

        let mut booking = new_reservation(
            UserUuid::new(),
            ctx.indoor_court,
            date(2025, 12, 16),
            time(18, 0, 0, 0),
        );
        booking.coach = Some(CoachUuid::new());

        let result = ctx.reservations.reserve(booking).await;

        assert!(
            matches!(
                result,
                Err(ReservationsServiceError::ResourceNotFound(Resource::Coach))
            ),
            "expected ResourceNotFound(Coach), got {result:?}"
        );
    }

    #[tokio::test]
    async fn price_includes_flat_equipment_and_coach() -> TestResult {
        let ctx = TestContext::new().await;

        let mut booking = new_reservation(
            UserUuid::new(),
            ctx.indoor_court,
            date(2025, 12, 16),
            time(18, 0, 0, 0),
        );
        booking.equipment = vec![ctx.racket, ctx.shoes];
        booking.coach = Some(ctx.coach);

        let booked = ctx.reservations.reserve(booking).await?;

        // 1050 court + 50 racket + 100 shoes + 300 coach
        assert_eq!(booked.total_price, money(1500_00));
        assert_eq!(booked.equipment.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn price_is_frozen_when_the_rule_changes() -> TestResult {
        let ctx = TestContext::new().await;

        let booked = ctx
            .reservations
            .reserve(new_reservation(
                UserUuid::new(),
                ctx.outdoor_court,
                date(2025, 12, 16),
                time(10, 0, 0, 0),
            ))
            .await?;

        ctx.catalog
            .create_pricing_rule(NewPricingRule {
                uuid: PricingRuleUuid::new(),
                rule: PricingRule {
                    name: "Increase".to_string(),
                    base_price: money(900_00),
                    ..PricingRule::default()
                },
                activate: true,
            })
            .await?;

        let reloaded = ctx.reservations.get_reservation(booked.uuid).await?;

        assert_eq!(reloaded.total_price, money(500_00));

        let later = ctx
            .reservations
            .reserve(new_reservation(
                UserUuid::new(),
                ctx.outdoor_court,
                date(2025, 12, 16),
                time(11, 0, 0, 0),
            ))
            .await?;

        assert_eq!(later.total_price, money(900_00));

        Ok(())
    }

    #[tokio::test]
    async fn quote_charges_nothing_for_unknown_coach() -> TestResult {
        let ctx = TestContext::new().await;

        let quote = ctx
            .reservations
            .quote(QuoteRequest {
                court: ctx.indoor_court,
                date: date(2025, 12, 20),
                start_time: time(18, 0, 0, 0),
                equipment: vec![ctx.racket, EquipmentUuid::new()],
                coach: Some(CoachUuid::new()),
            })
            .await?;

        assert_eq!(quote.breakdown.weekend_surcharge, money(315_00));
        assert_eq!(quote.breakdown.equipment, money(50_00));
        assert_eq!(quote.breakdown.coach, Decimal::ZERO);
        assert_eq!(quote.breakdown.total, money(1415_00));

        Ok(())
    }

    #[tokio::test]
    async fn quote_for_unknown_court_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .reservations
            .quote(QuoteRequest {
                court: CourtUuid::new(),
                date: date(2025, 12, 16),
                start_time: time(18, 0, 0, 0),
                equipment: Vec::new(),
                coach: None,
            })
            .await;

        assert!(
            matches!(
                result,
                Err(ReservationsServiceError::ResourceNotFound(Resource::Court))
            ),
            "expected ResourceNotFound(Court), got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_and_summary_reflect_cancellations() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let day = date(2025, 12, 16);

        let morning = ctx
            .reservations
            .reserve(new_reservation(user, ctx.outdoor_court, day, time(9, 0, 0, 0)))
            .await?;
        let evening = ctx
            .reservations
            .reserve(new_reservation(user, ctx.indoor_court, day, time(18, 0, 0, 0)))
            .await?;

        ctx.reservations.cancel(morning.uuid).await?;

        let listed = ctx.reservations.list_reservations(user).await?;
        let summary = ctx.reservations.summary(user).await?;

        assert_eq!(
            listed.iter().map(|r| r.uuid).collect::<Vec<_>>(),
            vec![evening.uuid, morning.uuid]
        );
        assert_eq!(summary.active, 1);
        assert_eq!(summary.total_spent, evening.total_price);

        Ok(())
    }

    #[tokio::test]
    async fn opposite_equipment_orders_do_not_deadlock() -> TestResult {
        let ctx = TestContext::new().await;
        let day = date(2025, 12, 18);

        for hour in 9..14 {
            let start = time(hour, 0, 0, 0);

            let mut forward = new_reservation(UserUuid::new(), ctx.indoor_court, day, start);
            forward.equipment = vec![ctx.racket, ctx.shoes];

            let mut backward = new_reservation(UserUuid::new(), ctx.outdoor_court, day, start);
            backward.equipment = vec![ctx.shoes, ctx.racket];

            let (left, right) = tokio::join!(
                ctx.reservations.reserve(forward),
                ctx.reservations.reserve(backward)
            );

            left?;
            right?;
        }

        Ok(())
    }

    #[tokio::test]
    async fn lock_wait_beyond_timeout_reports_busy() -> TestResult {
        let ctx = TestContext::new().await;

        let mut holder = ctx.db.pool().begin().await?;

        query("SELECT uuid FROM courts WHERE uuid = $1 FOR UPDATE")
            .bind(ctx.indoor_court.into_uuid())
            .execute(&mut *holder)
            .await?;

        let impatient = PgReservationsService::new(
            Db::new(ctx.db.pool().clone())
                .with_lock_timeout(Duration::from_millis(100)),
        );

        let result = impatient
            .reserve(new_reservation(
                UserUuid::new(),
                ctx.indoor_court,
                date(2025, 12, 16),
                time(18, 0, 0, 0),
            ))
            .await;

        holder.rollback().await?;

        assert!(
            matches!(result, Err(ReservationsServiceError::ResourceBusy)),
            "expected ResourceBusy, got {result:?}"
        );

        Ok(())
    }
}
