use std::fmt;

/// A client handle that is either configured or deliberately absent.
///
/// Modules hold one of these instead of a nullable client, so every call
/// site has to decide what the disabled branch does.
#[derive(Clone)]
pub enum Capability<C> {
    Enabled(C),
    Disabled,
}

impl<C> Capability<C> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub fn client(&self) -> Option<&C> {
        match self {
            Self::Enabled(client) => Some(client),
            Self::Disabled => None,
        }
    }
}

impl<C> fmt::Debug for Capability<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled(_) => f.write_str("Enabled"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}
