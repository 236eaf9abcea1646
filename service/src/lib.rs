//! Service contains the business logic of the booking engine.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

pub use self::{command::Command, query::Query};

/// Domain service.
///
/// Generic over its durable store `Db`, [`Authorizer`] `Az` and [`Notifier`]
/// `Nt` collaborators, which are the only outward dependencies of the engine.
///
/// [`Authorizer`]: infra::auth::Authorizer
/// [`Notifier`]: infra::notify::Notifier
#[derive(Clone, Debug)]
pub struct Service<Db, Az, Nt> {
    /// Durable store of this [`Service`].
    database: Db,

    /// Authorization collaborator of this [`Service`].
    authorizer: Az,

    /// Notification collaborator of this [`Service`].
    notifier: Nt,
}

impl<Db, Az, Nt> Service<Db, Az, Nt> {
    /// Creates a new [`Service`] with the provided collaborators.
    pub fn new(database: Db, authorizer: Az, notifier: Nt) -> Self {
        Self {
            database,
            authorizer,
            notifier,
        }
    }

    /// Returns the durable store of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the authorization collaborator of this [`Service`].
    #[must_use]
    pub fn authorizer(&self) -> &Az {
        &self.authorizer
    }

    /// Returns the notification collaborator of this [`Service`].
    #[must_use]
    pub fn notifier(&self) -> &Nt {
        &self.notifier
    }
}
