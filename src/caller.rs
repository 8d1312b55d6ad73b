use crate::auction::Identity;

/// Resolves the party acting in the current request
pub trait CallerIdentity {
    fn caller(&self) -> Identity;
}

/// A fixed identity, for hosts that resolve the caller up front
impl CallerIdentity for Identity {
    fn caller(&self) -> Identity {
        self.clone()
    }
}
