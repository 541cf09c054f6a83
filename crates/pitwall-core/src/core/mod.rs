pub mod browser;
pub mod source;
pub mod viewer;

#[cfg(test)]
pub(crate) mod testing;

/// Phase of a remote view, derived from its loading and error flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected or requested yet
    Empty,
    /// A request is in flight and nothing has been shown yet, or the
    /// shown data is being replaced
    Loading,
    /// Data is shown and the last request succeeded
    Ready,
    /// The last request failed; previously shown data, if any, is kept
    Degraded,
}
