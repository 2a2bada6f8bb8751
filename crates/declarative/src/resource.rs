//! Provider and stored-state traits for declarative reconciliation
//!
//! A managed resource is described from two sides:
//! - a [`Provider`] that can physically create, update, and remove it
//! - a [`Stored`] snapshot of what the last successful call returned

/// Capability for creating, updating, and removing a remote resource
///
/// Implementations wrap a provider SDK or REST API. They are handed to
/// the reconciler per call and are not expected to hold state between
/// calls.
///
/// # Example
///
/// ```ignore
/// use declarative::Provider;
///
/// struct Noop;
///
/// impl Provider for Noop {
///     type Fields = String;
///     type Resource = String;
///     type Error = std::convert::Infallible;
///
///     fn create(&self, fields: &String) -> Result<String, Self::Error> {
///         Ok(fields.clone())
///     }
///
///     fn update(&self, _id: &str, fields: &String) -> Result<String, Self::Error> {
///         Ok(fields.clone())
///     }
///
///     fn remove(&self, _id: &str) -> Result<(), Self::Error> {
///         Ok(())
///     }
/// }
/// ```
pub trait Provider {
    /// The caller-supplied field set sent on create and update
    type Fields;
    /// What the provider returns after create or update
    type Resource;
    /// Failure raised by the provider
    type Error;

    /// Create a new resource from the full field set
    fn create(&self, fields: &Self::Fields) -> Result<Self::Resource, Self::Error>;

    /// Update the resource addressed by `id` with the full field set
    fn update(&self, id: &str, fields: &Self::Fields) -> Result<Self::Resource, Self::Error>;

    /// Delete the resource addressed by `id`
    fn remove(&self, id: &str) -> Result<(), Self::Error>;
}

/// Last known state of a managed resource
///
/// `Default` must produce the "absent" state: no id and no fields.
pub trait Stored: Default {
    /// Field set compared against the desired state
    type Fields: PartialEq;
    /// Provider response folded back into this state
    type Resource;

    /// Provider-assigned identifier, if a create or update has succeeded
    fn id(&self) -> Option<&str>;

    /// The comparable fields recorded by the last successful call
    fn fields(&self) -> &Self::Fields;

    /// Copy a provider response into this state
    ///
    /// Every attribute the response carries overwrites the stored one,
    /// including the identifier and timestamps.
    fn absorb(&mut self, resource: Self::Resource);

    /// Whether the recorded fields already match `desired`
    ///
    /// The identifier is not part of the comparison.
    fn matches(&self, desired: &Self::Fields) -> bool {
        self.fields() == desired
    }
}
