/// What happens when an inserted key is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum InsertPolicy {
    /// Keep the existing entry and fail the insertion.
    #[default]
    Reject,
    /// Destroy the existing entry and put the new one in its place.
    Overwrite,
}

impl InsertPolicy {
    pub fn overwrites(&self) -> bool {
        matches!(self, InsertPolicy::Overwrite)
    }
}
