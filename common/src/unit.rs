//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity confirmation.
#[derive(Clone, Copy, Debug)]
pub struct Confirmation;

/// Marker type describing an entity completion.
#[derive(Clone, Copy, Debug)]
pub struct Completion;

/// Marker type describing an entity cancellation.
#[derive(Clone, Copy, Debug)]
pub struct Cancellation;
