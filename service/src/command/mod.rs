//! [`Command`] definition.

pub mod activate_contract;
pub mod block_dates;
pub mod cancel_booking;
pub mod cancel_contract;
pub mod complete_booking;
pub mod complete_contract;
pub mod create_booking;
pub mod generate_contract;
pub mod sign_contract;
pub mod unblock_dates;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    activate_contract::ActivateContract, block_dates::BlockDates,
    cancel_booking::CancelBooking, cancel_contract::CancelContract,
    complete_booking::CompleteBooking, complete_contract::CompleteContract,
    create_booking::CreateBooking, generate_contract::GenerateContract,
    sign_contract::SignContract, unblock_dates::UnblockDates,
};

#[cfg(test)]
mod spec {
    use common::{
        money::Currency,
        operations::{By, Insert, Select},
        Date, DateTime, Money,
    };

    use crate::{
        domain::{
            booking, contract, offer, user, Booking, Contract, Offer, Reason,
        },
        infra::{auth::OwnerRegistry, notify::Sink, Memory},
        read::booking::Confirmed,
        Service,
    };

    use super::{
        ActivateContract, BlockDates, CancelBooking, CancelContract,
        Command as _, CompleteBooking, CompleteContract, CreateBooking,
        GenerateContract, SignContract, UnblockDates,
    };

    type Svc = Service<Memory, OwnerRegistry, Sink>;

    fn err_of<E>(err: &tracerr::Traced<E>) -> &E {
        err.as_ref()
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn money(amount: u32) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Eur,
        }
    }

    fn reason(s: &str) -> Reason {
        s.parse().unwrap()
    }

    /// Seeds a [`Service`] with one offer owned by a registered provider.
    async fn seeded(price_per_day: Option<Money>) -> (Svc, Offer) {
        let offer = Offer {
            id: offer::Id::new(),
            owner_id: user::Id::new(),
            title: offer::Title::new("Cargo bike").unwrap(),
            description: offer::Description::new("Front-loader, 100kg")
                .unwrap(),
            kind: offer::Kind::Item,
            price_per_day,
            price_per_hour: None,
            deposit: Some(money(50)),
            created_at: DateTime::now().coerce(),
        };

        let registry = OwnerRegistry::new();
        registry.grant(offer.id, offer.owner_id).await;

        let svc = Service::new(Memory::new(), registry, Sink);
        svc.database()
            .execute(Insert(offer.clone()))
            .await
            .unwrap();

        (svc, offer)
    }

    fn create(offer: &Offer, start: &str, end: &str) -> CreateBooking {
        CreateBooking {
            offer_id: offer.id,
            customer_id: user::Id::new(),
            start: date(start),
            end: date(end),
            terms_accepted: true,
            withdrawal_acknowledged: true,
        }
    }

    async fn booked_period(svc: &Svc, offer: &Offer) -> Vec<String> {
        let confirmed: Vec<Confirmed<Booking>> = svc
            .database()
            .execute(Select(By::<Vec<Confirmed<Booking>>, _>::new(offer.id)))
            .await
            .unwrap();
        confirmed
            .iter()
            .flat_map(|b| b.0.period.days())
            .map(|d| d.to_string())
            .collect()
    }

    #[tokio::test]
    async fn creates_booking_with_deterministic_price() {
        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        assert_eq!(booking.status(), booking::Status::Confirmed);
        assert_eq!(booking.days_count, 5);
        assert_eq!(booking.total_price, money(75));
        assert_eq!(
            booked_period(&svc, &offer).await,
            [
                "2099-06-01",
                "2099-06-02",
                "2099-06-03",
                "2099-06-04",
                "2099-06-05",
            ],
        );
    }

    #[tokio::test]
    async fn single_day_booking_counts_one_day() {
        let (svc, offer) = seeded(Some(money(20))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-01"))
            .await
            .unwrap();

        assert_eq!(booking.days_count, 1);
        assert_eq!(booking.total_price, money(20));
    }

    #[tokio::test]
    async fn rejects_inverted_period_without_side_effects() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let err = svc
            .execute(create(&offer, "2099-06-05", "2099-06-01"))
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::PeriodInvalid { .. }));

        assert!(booked_period(&svc, &offer).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_period_in_the_past() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let err = svc
            .execute(create(&offer, "2020-06-01", "2099-06-01"))
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::PeriodInPast { .. }));
    }

    #[tokio::test]
    async fn rejects_missing_consents() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let err = svc
            .execute(CreateBooking {
                terms_accepted: false,
                ..create(&offer, "2099-06-01", "2099-06-05")
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::TermsNotAccepted));

        let err = svc
            .execute(CreateBooking {
                withdrawal_acknowledged: false,
                ..create(&offer, "2099-06-01", "2099-06-05")
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::WithdrawalNotAcknowledged));
    }

    #[tokio::test]
    async fn rejects_hourly_only_offer() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(None).await;

        let err = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::OfferNotPriced(_)));
    }

    #[tokio::test]
    async fn reports_unavailable_dates_on_overlap() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        svc.execute(create(&offer, "2099-06-01", "2099-06-03"))
            .await
            .unwrap();

        let err = svc
            .execute(create(&offer, "2099-06-03", "2099-06-05"))
            .await
            .unwrap_err();
        match err_of(&err) {
            E::DatesUnavailable { dates, .. } => {
                assert_eq!(
                    dates.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    ["2099-06-03"],
                );
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[tokio::test]
    async fn back_to_back_bookings_conflict() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        svc.execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        // Handover on a shared calendar day conflicts: the model has no
        // time-of-day granularity to sequence it.
        let err = svc
            .execute(create(&offer, "2099-06-05", "2099-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::DatesUnavailable { .. }));
    }

    #[tokio::test]
    async fn concurrent_requests_yield_exactly_one_booking() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let (a, b) = tokio::join!(
            svc.execute(create(&offer, "2099-06-01", "2099-06-05")),
            svc.execute(create(&offer, "2099-06-03", "2099-06-07")),
        );

        let (ok, err) = match (a, b) {
            (Ok(ok), Err(e)) | (Err(e), Ok(ok)) => (ok, e),
            (Ok(_), Ok(_)) => panic!("both rival bookings succeeded"),
            (Err(_), Err(_)) => panic!("both rival bookings failed"),
        };
        assert_eq!(ok.status(), booking::Status::Confirmed);
        assert!(matches!(err_of(&err), E::DatesUnavailable { .. }));
    }

    #[tokio::test]
    async fn cancellation_frees_the_dates() {
        use super::cancel_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        // Not the provider.
        let err = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                provider_id: user::Id::new(),
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::NotOwner { .. }));

        let cancelled = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                provider_id: offer.owner_id,
                reason: Some(reason("double booked offline")),
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status(), booking::Status::Cancelled);

        // Cancelling again is a conflict.
        let err = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                provider_id: offer.owner_id,
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::AlreadyCancelled(_)));

        // The exact same period is bookable again.
        let rebooked = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        assert_eq!(rebooked.status(), booking::Status::Confirmed);
    }

    #[tokio::test]
    async fn blocked_dates_refuse_bookings_until_released() {
        use super::create_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let overrides = svc
            .execute(BlockDates {
                offer_id: offer.id,
                provider_id: offer.owner_id,
                start: date("2099-06-02"),
                end: date("2099-06-04"),
                reason: Some(reason("maintenance")),
            })
            .await
            .unwrap();
        assert_eq!(overrides.len(), 3);
        assert!(overrides.iter().all(|o| o.is_blocking()));

        let err = svc
            .execute(create(&offer, "2099-06-01", "2099-06-02"))
            .await
            .unwrap_err();
        match err_of(&err) {
            E::DatesUnavailable { dates, .. } => {
                assert_eq!(
                    dates.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    ["2099-06-02"],
                );
            }
            e => panic!("unexpected error: {e}"),
        }

        svc.execute(UnblockDates {
            offer_id: offer.id,
            provider_id: offer.owner_id,
            start: date("2099-06-01"),
            end: date("2099-06-05"),
        })
        .await
        .unwrap();

        // Releasing already-available dates is a no-op.
        svc.execute(UnblockDates {
            offer_id: offer.id,
            provider_id: offer.owner_id,
            start: date("2099-06-01"),
            end: date("2099-06-05"),
        })
        .await
        .unwrap();

        svc.execute(create(&offer, "2099-06-01", "2099-06-02"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refuses_to_block_over_confirmed_booking() {
        use super::block_dates::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        let err = svc
            .execute(BlockDates {
                offer_id: offer.id,
                provider_id: offer.owner_id,
                start: date("2099-06-05"),
                end: date("2099-06-08"),
                reason: None,
            })
            .await
            .unwrap_err();
        match err_of(&err) {
            E::PeriodBooked { booking_id, .. } => {
                assert_eq!(*booking_id, booking.id);
            }
            e => panic!("unexpected error: {e}"),
        }

        // Only the provider may block.
        let err = svc
            .execute(BlockDates {
                offer_id: offer.id,
                provider_id: user::Id::new(),
                start: date("2099-07-01"),
                end: date("2099-07-02"),
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::NotOwner { .. }));
    }

    #[tokio::test]
    async fn generates_contract_snapshot_once() {
        use super::generate_contract::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        let contract = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        assert_eq!(contract.status(), contract::Status::Draft);
        assert_eq!(contract.booking_id, booking.id);
        assert_eq!(contract.lessor_id, offer.owner_id);
        assert_eq!(contract.lessee_id, booking.customer_id);
        assert_eq!(contract.offer_title, offer.title);
        assert_eq!(contract.total_price, money(75));
        assert_eq!(contract.deposit, Some(money(50)));
        assert_eq!(contract.days_count, 5);

        // Generation is strictly once per booking.
        let err = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        match err_of(&err) {
            E::AlreadyGenerated { contract_id, .. } => {
                assert_eq!(*contract_id, contract.id);
            }
            e => panic!("unexpected error: {e}"),
        }

        let stored: Option<Contract> = svc
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(booking.id)))
            .await
            .unwrap();
        assert_eq!(stored.map(|c| c.id), Some(contract.id));
    }

    #[tokio::test]
    async fn refuses_contract_for_cancelled_booking() {
        use super::generate_contract::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        svc.execute(CancelBooking {
            booking_id: booking.id,
            provider_id: offer.owner_id,
            reason: None,
        })
        .await
        .unwrap();

        let err = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::BookingCancelled(_)));
    }

    #[tokio::test]
    async fn signing_advances_in_either_order_and_is_idempotent() {
        use super::sign_contract::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        let contract = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        // The lessee may sign first.
        let signed = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessee_id,
            })
            .await
            .unwrap();
        assert_eq!(signed.status(), contract::Status::PartiallySigned);
        let first_signature = signed.signed_by_lessee_at;

        // Re-signing by the same party changes nothing.
        let resigned = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessee_id,
            })
            .await
            .unwrap();
        assert_eq!(resigned.status(), contract::Status::PartiallySigned);
        assert_eq!(resigned.signed_by_lessee_at, first_signature);

        // A stranger is not a party.
        let err = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: user::Id::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::NotParty { .. }));

        let signed = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
            })
            .await
            .unwrap();
        assert_eq!(signed.status(), contract::Status::FullySigned);
    }

    #[tokio::test]
    async fn contract_lifecycle_transitions_are_guarded() {
        use super::activate_contract::ExecutionError as ActivationE;
        use super::cancel_contract::ExecutionError as CancellationE;
        use super::complete_contract::ExecutionError as CompletionE;
        use super::sign_contract::ExecutionError as SignE;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        let contract = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        // Draft contracts can be neither activated nor completed.
        let err = svc
            .execute(ActivateContract {
                contract_id: contract.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), ActivationE::NotFullySigned { .. }));
        let err = svc
            .execute(CompleteContract {
                contract_id: contract.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), CompletionE::NotActive { .. }));

        svc.execute(SignContract {
            contract_id: contract.id,
            user_id: contract.lessor_id,
        })
        .await
        .unwrap();
        svc.execute(SignContract {
            contract_id: contract.id,
            user_id: contract.lessee_id,
        })
        .await
        .unwrap();

        let active = svc
            .execute(ActivateContract {
                contract_id: contract.id,
            })
            .await
            .unwrap();
        assert_eq!(active.status(), contract::Status::Active);

        let completed = svc
            .execute(CompleteContract {
                contract_id: contract.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status(), contract::Status::Completed);

        // A completed contract is terminal for signing and cancellation.
        let err = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), SignE::AlreadyCompleted(_)));
        let err = svc
            .execute(CancelContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
                reason: reason("changed my mind"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), CancellationE::AlreadyCompleted(_)));
    }

    #[tokio::test]
    async fn cancels_contract_with_reason() {
        use super::sign_contract::ExecutionError as SignE;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        let contract = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        let cancelled = svc
            .execute(CancelContract {
                contract_id: contract.id,
                user_id: contract.lessee_id,
                reason: reason("found a better option"),
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status(), contract::Status::Cancelled);
        assert_eq!(
            cancelled.cancellation_reason.as_ref().map(AsRef::as_ref),
            Some("found a better option"),
        );

        // Cancelling again changes nothing.
        let again = svc
            .execute(CancelContract {
                contract_id: contract.id,
                user_id: contract.lessee_id,
                reason: reason("still cancelled"),
            })
            .await
            .unwrap();
        assert_eq!(
            again.cancellation_reason.as_ref().map(AsRef::as_ref),
            Some("found a better option"),
        );

        // A cancelled contract cannot be signed.
        let err = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), SignE::AlreadyCancelled(_)));
    }

    #[tokio::test]
    async fn completes_booking_on_external_schedule() {
        use super::complete_booking::ExecutionError as E;

        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();

        let completed = svc
            .execute(CompleteBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status(), booking::Status::Completed);

        let err = svc
            .execute(CompleteBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err_of(&err), E::AlreadyCompleted(_)));
    }

    #[tokio::test]
    async fn end_to_end_booking_and_contract_flow() {
        let (svc, offer) = seeded(Some(money(15))).await;

        let booking = svc
            .execute(create(&offer, "2099-06-01", "2099-06-05"))
            .await
            .unwrap();
        assert_eq!(booking.total_price, money(75));

        let contract = svc
            .execute(GenerateContract {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(contract.status(), contract::Status::Draft);

        let contract = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
            })
            .await
            .unwrap();
        assert_eq!(contract.status(), contract::Status::PartiallySigned);

        let contract = svc
            .execute(SignContract {
                contract_id: contract.id,
                user_id: contract.lessee_id,
            })
            .await
            .unwrap();
        assert_eq!(contract.status(), contract::Status::FullySigned);

        let booking = svc
            .execute(CancelBooking {
                booking_id: booking.id,
                provider_id: offer.owner_id,
                reason: Some(reason("item broke")),
            })
            .await
            .unwrap();
        assert_eq!(booking.status(), booking::Status::Cancelled);

        // Cancelling the booking leaves the contract untouched.
        let stored: Option<Contract> = svc
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract.id)))
            .await
            .unwrap();
        let stored = stored.unwrap();
        assert_eq!(stored.status(), contract::Status::FullySigned);

        // Until it is cancelled explicitly.
        let contract = svc
            .execute(CancelContract {
                contract_id: contract.id,
                user_id: contract.lessor_id,
                reason: reason("booking fell through"),
            })
            .await
            .unwrap();
        assert_eq!(contract.status(), contract::Status::Cancelled);
    }
}
