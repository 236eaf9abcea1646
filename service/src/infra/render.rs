//! Document rendering collaborator definitions.
//!
//! Rendering is invoked on demand by callers holding a [`Contract`]
//! snapshot: it is not part of the signing state machine and the engine
//! itself never triggers it.

use crate::domain::Contract;

/// Rendering collaborator turning [`Contract`] snapshots into printable
/// documents.
pub use common::Handler as Renderer;

/// Operation to render the [`Contract`] into a PDF document.
///
/// Implementations resolve to the rendered document bytes.
#[derive(Clone, Debug)]
pub struct ContractPdf(pub Contract);

#[cfg(test)]
mod spec {
    use std::convert::Infallible;

    use common::{money::Currency, DateRange, DateTime, Money};

    use crate::domain::{booking, contract, offer, user, Contract};

    use super::{ContractPdf, Renderer};

    /// Renderer producing a plain-text stand-in for a PDF document.
    struct Inline;

    impl Renderer<ContractPdf> for Inline {
        type Ok = Vec<u8>;
        type Err = Infallible;

        async fn execute(
            &self,
            ContractPdf(contract): ContractPdf,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(format!(
                "{} for {}: {}",
                contract.offer_title, contract.period, contract.total_price,
            )
            .into_bytes())
        }
    }

    #[tokio::test]
    async fn renders_snapshot_fields() {
        let period = DateRange::new(
            "2024-06-01".parse().unwrap(),
            "2024-06-05".parse().unwrap(),
        )
        .unwrap();
        let contract = Contract {
            id: contract::Id::new(),
            booking_id: booking::Id::new(),
            lessor_id: user::Id::new(),
            lessee_id: user::Id::new(),
            offer_title: offer::Title::new("Cargo bike").unwrap(),
            offer_description: offer::Description::new("Front-loader")
                .unwrap(),
            offer_kind: offer::Kind::Item,
            price_per_day: None,
            deposit: None,
            period,
            days_count: period.days_count(),
            total_price: Money {
                amount: 75.into(),
                currency: Currency::Eur,
            },
            created_at: DateTime::now().coerce(),
            signed_by_lessor_at: None,
            signed_by_lessee_at: None,
            activated_at: None,
            completed_at: None,
            cancelled_at: None,
            cancellation_reason: None,
        };

        let document = Inline.execute(ContractPdf(contract)).await.unwrap();

        assert_eq!(
            String::from_utf8(document).unwrap(),
            "Cargo bike for 2024-06-01..=2024-06-05: 75EUR",
        );
    }
}
