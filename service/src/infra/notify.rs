//! Notification collaborator definitions.
//!
//! The engine fires an [`Event`] after a successful state transition and
//! moves on: delivery failures are logged by the calling command and never
//! influence the outcome of the transition itself.

use common::operations::Perform;
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::domain::{booking, contract, offer};
#[cfg(doc)]
use crate::domain::{Booking, Contract};

/// Notification collaborator of the engine.
pub use common::Handler as Notifier;

/// Event notifying interested parties about a state transition.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// A [`Booking`] was created and confirmed.
    BookingConfirmed {
        /// ID of the confirmed [`Booking`].
        booking_id: booking::Id,

        /// ID of the booked [`Offer`].
        ///
        /// [`Offer`]: crate::domain::Offer
        offer_id: offer::Id,
    },

    /// A [`Booking`] was cancelled by its provider.
    BookingCancelled {
        /// ID of the cancelled [`Booking`].
        booking_id: booking::Id,

        /// ID of the previously booked [`Offer`].
        ///
        /// [`Offer`]: crate::domain::Offer
        offer_id: offer::Id,
    },

    /// A [`Contract`] was signed by both of its parties.
    ContractSigned {
        /// ID of the fully signed [`Contract`].
        contract_id: contract::Id,
    },

    /// A [`Contract`] was cancelled.
    ContractCancelled {
        /// ID of the cancelled [`Contract`].
        contract_id: contract::Id,
    },
}

/// [`Notifier`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// The notification channel is closed.
    #[display("notification channel is closed")]
    ChannelClosed,
}

/// No-op [`Notifier`] dropping every [`Event`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Sink;

impl Notifier<Perform<Event>> for Sink {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(_): Perform<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}
