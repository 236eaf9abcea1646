//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler of some operation.
///
/// Commands, queries, storage operations and outward collaborator calls are
/// all expressed as [`Handler`]s of their argument types, so a concrete
/// backend is nothing but a set of [`Handler`] implementations.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
